//! Slot (créneau) domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A bookable time window belonging to one technician.
///
/// `reserved` and `job_id` always change together: both are set by
/// `reserve`, both cleared by `release`. No other code path writes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Unique slot ID
    pub id: Uuid,
    /// Technician this window belongs to
    pub technician_id: i64,
    /// Window start (inclusive)
    pub start_time: DateTime<Utc>,
    /// Window end (exclusive)
    pub end_time: DateTime<Utc>,
    /// Whether a job is currently booked on this slot
    pub reserved: bool,
    /// Reference to the linked job (intervention), present iff reserved
    pub job_id: Option<String>,
    /// When the slot was created
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn new(
        technician_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            technician_id,
            start_time,
            end_time,
            reserved: false,
            job_id: None,
            created_at,
        }
    }

    /// Half-open interval intersection: `[a.start, a.end)` vs `[b.start, b.end)`.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.technician_id == other.technician_id
            && self.start_time < other.end_time
            && self.end_time > other.start_time
    }

    /// Intersection with an arbitrary `[start, end)` range.
    pub fn overlaps_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    /// Mark the slot booked for a job. Both fields move together.
    pub fn reserve(&mut self, job_id: impl Into<String>) {
        self.reserved = true;
        self.job_id = Some(job_id.into());
    }

    /// Clear the booking. Releasing a free slot is a no-op.
    pub fn release(&mut self) {
        self.reserved = false;
        self.job_id = None;
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

// ── Tests ──────────────────────────────────────────────────────
