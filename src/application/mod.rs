pub mod access;
pub mod scheduling;

pub use access::{is_allowed, CallerRole, Operation};
pub use scheduling::{
    generate_slots, start_slot_purge_task, AvailabilityPage, AvailabilityService, BookingService,
    Decision, NewRequest, RecurrenceSpec, SlotCandidate, SlotService,
};
