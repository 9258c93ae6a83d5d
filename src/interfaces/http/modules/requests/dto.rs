//! Appointment request DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::AppointmentRequest;

/// Request to create an appointment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequestBody {
    /// Requesting client
    pub client_id: i64,
    /// Free-text motive
    #[validate(length(min = 1, max = 500))]
    pub motive: String,
    /// Linked complaint (réclamation), if any
    pub complaint_id: Option<i64>,
    /// Pre-selected slot; recorded but not reserved before acceptance
    pub slot_id: Option<String>,
    /// Preferred calendar date (YYYY-MM-DD)
    pub desired_date: Option<NaiveDate>,
    /// Time-of-day preference ("matin", "après-midi", ...)
    #[validate(length(max = 100))]
    pub time_preference: Option<String>,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

/// Manager decision on a pending request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProcessRequestBody {
    /// true = accept (reserves a slot), false = reject
    pub accept: bool,
    /// Slot to book; defaults to the request's pre-selected slot
    pub slot_id: Option<String>,
    /// Intervention reference for the reservation
    #[validate(length(max = 100))]
    pub job_id: Option<String>,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

/// Status filter for request listings
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct RequestStatusFilter {
    /// One of Pending, Confirmed, Rejected, Cancelled
    pub status: Option<String>,
}

/// Appointment request details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct RequestDto {
    pub id: String,
    pub complaint_id: Option<i64>,
    pub client_id: i64,
    pub slot_id: Option<String>,
    pub motive: String,
    pub desired_date: Option<NaiveDate>,
    pub time_preference: Option<String>,
    pub status: String,
    pub comment: Option<String>,
    pub created_at: String,
    pub processed_at: Option<String>,
}

impl RequestDto {
    pub fn from_domain(request: AppointmentRequest) -> Self {
        Self {
            id: request.id.to_string(),
            complaint_id: request.complaint_id,
            client_id: request.client_id,
            slot_id: request.slot_id.map(|id| id.to_string()),
            motive: request.motive,
            desired_date: request.desired_date,
            time_preference: request.time_preference,
            status: request.status.as_str().to_string(),
            comment: request.comment,
            created_at: request.created_at.to_rfc3339(),
            processed_at: request.processed_at.map(|t| t.to_rfc3339()),
        }
    }
}
