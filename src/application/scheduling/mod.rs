pub mod generator;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use generator::{generate_slots, RecurrenceSpec, SlotCandidate};
pub use services::{
    start_slot_purge_task, AvailabilityPage, AvailabilityService, BookingService, Decision,
    NewRequest, SlotService,
};
