//! Availability DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::interfaces::http::modules::slots::SlotDto;

/// Range filter for availability queries
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AvailabilityFilter {
    /// Range start (ISO 8601)
    pub from: DateTime<Utc>,
    /// Range end (ISO 8601)
    pub to: DateTime<Utc>,
    /// Restrict to one technician
    pub technician_id: Option<i64>,
}

/// One page of availability with whole-set totals
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityPageDto {
    /// Slots on this page, ordered by start time
    pub items: Vec<SlotDto>,
    /// Matching slots across all pages
    pub total: u64,
    /// Unreserved matches across all pages
    pub free: u64,
    /// Reserved matches across all pages
    pub reserved: u64,
    /// Current page (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total page count
    pub total_pages: u32,
}
