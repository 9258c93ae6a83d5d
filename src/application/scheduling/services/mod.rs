pub mod availability;
pub mod booking;
pub mod purge;
pub mod slot_service;

pub use availability::{AvailabilityPage, AvailabilityService};
pub use booking::{BookingService, Decision, NewRequest};
pub use purge::start_slot_purge_task;
pub use slot_service::SlotService;
