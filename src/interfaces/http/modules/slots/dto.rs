//! Slot DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Slot;

/// Request to create a single slot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSlotRequest {
    /// Technician the slot belongs to
    pub technician_id: i64,
    /// Window start (ISO 8601)
    pub start_time: DateTime<Utc>,
    /// Window end (ISO 8601), must be after start
    pub end_time: DateTime<Utc>,
}

/// Request to generate recurring slots
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateSlotsRequest {
    pub technician_id: i64,
    /// First calendar date considered (inclusive)
    pub range_start: NaiveDate,
    /// Last calendar date considered (inclusive)
    pub range_end: NaiveDate,
    /// Slot length in minutes (15-480)
    #[validate(range(min = 15, max = 480))]
    pub slot_duration_minutes: u32,
    /// Weekday names ("Mon", "Tuesday", ...)
    #[validate(length(min = 1, message = "at least one weekday is required"))]
    pub weekdays: Vec<String>,
    /// Daily window start, "HH:MM" or "HH:MM:SS"
    pub daily_start: String,
    /// Daily window end, "HH:MM" or "HH:MM:SS"
    pub daily_end: String,
}

/// Request to reserve a slot for a job
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReserveSlotRequest {
    /// Intervention (job) reference to book the slot under
    #[validate(length(min = 1, max = 100))]
    pub job_id: String,
}

/// Date filter for technician slot listings
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct SlotDateFilter {
    /// Restrict to one calendar date (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
}

/// Slot details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotDto {
    pub id: String,
    pub technician_id: i64,
    /// Display name from the technician directory, when known
    pub technician_name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub reserved: bool,
    pub job_id: Option<String>,
    pub created_at: String,
}

impl SlotDto {
    pub fn from_domain(slot: Slot, technician_name: Option<String>) -> Self {
        Self {
            id: slot.id.to_string(),
            technician_id: slot.technician_id,
            technician_name,
            start_time: slot.start_time.to_rfc3339(),
            end_time: slot.end_time.to_rfc3339(),
            reserved: slot.reserved,
            job_id: slot.job_id,
            created_at: slot.created_at.to_rfc3339(),
        }
    }
}

/// Response from generating recurring slots
#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratedSlotsResponse {
    /// Slots actually persisted (collisions are skipped)
    pub accepted: Vec<SlotDto>,
    pub accepted_count: usize,
}
