//! Real-time notification events for appointment-request transitions

pub mod dispatcher;
pub mod event_bus;
pub mod events;

pub use dispatcher::{start_dispatcher, LoggingNotificationSink};
pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{Event, EventMessage};
