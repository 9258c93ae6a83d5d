pub mod error;
pub mod ports;
pub mod provider;
pub mod request;
pub mod slot;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use ports::{JobRegistry, NotificationSink, TechnicianDirectory};
pub use provider::RepositoryProvider;
pub use request::{AppointmentRequest, RequestStatus};
pub use slot::{AvailabilityCounts, Slot};
