//! # SAV RDV Scheduling Service
//!
//! Appointment-slot scheduling and booking subsystem of the after-sales
//! service platform: technician slots, recurring availability generation
//! and the client request (demande de RDV) workflow.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, repository contracts and
//!   collaborator ports
//! - **application**: Business logic: slot generation, the slot store,
//!   the availability read model and the booking state machine
//! - **infrastructure**: External concerns (SeaORM persistence,
//!   in-process collaborator defaults)
//! - **interfaces**: REST API with Swagger documentation
//! - **notifications**: Transition events, bus and dispatcher
//! - **shared**: Clock injection and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
