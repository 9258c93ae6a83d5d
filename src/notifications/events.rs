//! Notification events
//!
//! One event per appointment-request transition. The workflow publishes
//! these onto the event bus; the dispatcher hands them to the delivery
//! collaborator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A client submitted a new appointment request
    RequestCreated(RequestCreatedEvent),
    /// A manager accepted a request and a slot was reserved
    RequestConfirmed(RequestConfirmedEvent),
    /// A manager refused a request
    RequestRejected(RequestRejectedEvent),
    /// A request was withdrawn
    RequestCancelled(RequestCancelledEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::RequestCreated(_) => "request_created",
            Event::RequestConfirmed(_) => "request_confirmed",
            Event::RequestRejected(_) => "request_rejected",
            Event::RequestCancelled(_) => "request_cancelled",
        }
    }

    /// The appointment request this event refers to
    pub fn request_id(&self) -> Uuid {
        match self {
            Event::RequestCreated(e) => e.request_id,
            Event::RequestConfirmed(e) => e.request_id,
            Event::RequestRejected(e) => e.request_id,
            Event::RequestCancelled(e) => e.request_id,
        }
    }

    /// The client to notify
    pub fn client_id(&self) -> i64 {
        match self {
            Event::RequestCreated(e) => e.client_id,
            Event::RequestConfirmed(e) => e.client_id,
            Event::RequestRejected(e) => e.client_id,
            Event::RequestCancelled(e) => e.client_id,
        }
    }

    /// Whether the responsible manager is addressed too (creation only)
    pub fn notifies_manager(&self) -> bool {
        matches!(self, Event::RequestCreated(_))
    }
}

/// Appointment request created event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCreatedEvent {
    pub request_id: Uuid,
    pub client_id: i64,
    pub complaint_id: Option<i64>,
    pub motive: String,
    pub desired_date: Option<NaiveDate>,
    pub timestamp: DateTime<Utc>,
}

/// Appointment request confirmed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfirmedEvent {
    pub request_id: Uuid,
    pub client_id: i64,
    pub slot_id: Uuid,
    pub technician_id: i64,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

/// Appointment request rejected event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRejectedEvent {
    pub request_id: Uuid,
    pub client_id: i64,
    pub comment: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Appointment request cancelled event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCancelledEvent {
    pub request_id: Uuid,
    pub client_id: i64,
    /// Slot freed by the cancellation, if the request was confirmed
    pub released_slot_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
