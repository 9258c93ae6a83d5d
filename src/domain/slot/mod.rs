pub mod model;
pub mod repository;

pub use model::Slot;
pub use repository::{AvailabilityCounts, SlotRepository};
