//! Appointment request (demande de RDV) domain entity

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// Appointment request status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Waiting for a manager decision
    Pending,
    /// Accepted, slot reserved
    Confirmed,
    /// Refused by a manager
    Rejected,
    /// Withdrawn by the client or a manager
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parse a persisted or externally supplied status string.
    /// Unknown values are a validation error, never silently coerced.
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "Rejected" => Ok(Self::Rejected),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!(
                "unknown request status '{other}'"
            ))),
        }
    }

    /// Rejected and Cancelled are terminal; Confirmed can still be cancelled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A client's request for an appointment, optionally tied to a complaint.
#[derive(Debug, Clone)]
pub struct AppointmentRequest {
    /// Unique request ID
    pub id: Uuid,
    /// Linked complaint (réclamation), informational only
    pub complaint_id: Option<i64>,
    /// Requesting client
    pub client_id: i64,
    /// Chosen slot: pre-selected at creation or assigned on confirmation
    pub slot_id: Option<Uuid>,
    /// Free-text motive (required)
    pub motive: String,
    /// Preferred calendar date, if the client stated one
    pub desired_date: Option<NaiveDate>,
    /// Free-text time-of-day preference ("matin", "après-midi", ...)
    pub time_preference: Option<String>,
    /// Current status
    pub status: RequestStatus,
    /// Manager comment recorded at processing/cancellation
    pub comment: Option<String>,
    /// When the request was created
    pub created_at: DateTime<Utc>,
    /// When the request was processed (confirmed or rejected)
    pub processed_at: Option<DateTime<Utc>>,
}

impl AppointmentRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client_id: i64,
        motive: impl Into<String>,
        complaint_id: Option<i64>,
        slot_id: Option<Uuid>,
        desired_date: Option<NaiveDate>,
        time_preference: Option<String>,
        comment: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            complaint_id,
            client_id,
            slot_id,
            motive: motive.into(),
            desired_date,
            time_preference,
            status: RequestStatus::Pending,
            comment,
            created_at,
            processed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Accept: store the reserved slot and stamp the decision.
    pub fn confirm(&mut self, slot_id: Uuid, comment: Option<String>, at: DateTime<Utc>) {
        self.status = RequestStatus::Confirmed;
        self.slot_id = Some(slot_id);
        if comment.is_some() {
            self.comment = comment;
        }
        self.processed_at = Some(at);
    }

    /// Refuse: stamp the decision, no slot interaction.
    pub fn reject(&mut self, comment: Option<String>, at: DateTime<Utc>) {
        self.status = RequestStatus::Rejected;
        if comment.is_some() {
            self.comment = comment;
        }
        self.processed_at = Some(at);
    }

    pub fn cancel(&mut self) {
        self.status = RequestStatus::Cancelled;
    }
}

// ── Tests ──────────────────────────────────────────────────────
