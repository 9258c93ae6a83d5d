//! Slot repository interface

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::model::Slot;
use crate::domain::DomainResult;

/// Whole-filtered-set counters for an availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityCounts {
    pub total: u64,
    pub reserved: u64,
}

impl AvailabilityCounts {
    pub fn free(&self) -> u64 {
        self.total - self.reserved
    }
}

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Persist a new slot
    async fn insert(&self, slot: Slot) -> DomainResult<()>;

    /// Find slot by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Slot>>;

    /// Whether any stored slot of this technician intersects `[start, end)`
    async fn has_overlap(
        &self,
        technician_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool>;

    /// Atomically book a free slot for a job.
    ///
    /// Exactly one caller among concurrent attempts on the same free slot
    /// succeeds (conditional update on the reservation flag); the others
    /// get `Conflict`. Unknown id yields `NotFound`.
    async fn reserve(&self, id: Uuid, job_id: &str) -> DomainResult<Slot>;

    /// Clear the booking. Idempotent: releasing a free slot is a no-op.
    /// Unknown id yields `NotFound`.
    async fn release(&self, id: Uuid) -> DomainResult<()>;

    /// Delete a slot. `Conflict` while reserved, `NotFound` if unknown.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Slots of one technician, optionally restricted to one calendar
    /// date, ordered by start time ascending.
    async fn list_by_technician(
        &self,
        technician_id: i64,
        date: Option<NaiveDate>,
    ) -> DomainResult<Vec<Slot>>;

    /// Slots whose interval intersects the closed range `[start, end]`,
    /// ordered by start time ascending. `limit: None` returns the whole
    /// matching set.
    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        technician_id: Option<i64>,
        offset: u64,
        limit: Option<u64>,
    ) -> DomainResult<Vec<Slot>>;

    /// Counters over the whole filtered set (not just one page).
    async fn count_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> DomainResult<AvailabilityCounts>;

    /// Delete unreserved slots that ended before `cutoff`.
    /// Returns the number of rows removed.
    async fn delete_ended_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64>;
}
