pub mod model;
pub mod repository;

pub use model::{AppointmentRequest, RequestStatus};
pub use repository::RequestRepository;
