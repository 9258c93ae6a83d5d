//! Slot store business logic
//!
//! Sole mutation surface for slots: creation with the per-technician
//! non-overlap invariant, atomic reserve/release, administrative delete.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::scheduling::generator::{generate_slots, RecurrenceSpec, SlotCandidate};
use crate::domain::{
    DomainError, DomainResult, JobRegistry, RepositoryProvider, Slot,
};
use crate::shared::Clock;

/// Service for slot lifecycle operations
pub struct SlotService {
    repos: Arc<dyn RepositoryProvider>,
    jobs: Arc<dyn JobRegistry>,
    clock: Arc<dyn Clock>,
}

impl SlotService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jobs: Arc<dyn JobRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repos, jobs, clock }
    }

    /// Create a single slot. `Conflict` if it overlaps an existing slot
    /// of the same technician.
    pub async fn create_slot(
        &self,
        technician_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> DomainResult<Slot> {
        if end_time <= start_time {
            return Err(DomainError::Validation(
                "slot end must be after slot start".to_string(),
            ));
        }

        if self
            .repos
            .slots()
            .has_overlap(technician_id, start_time, end_time)
            .await?
        {
            return Err(DomainError::Conflict(format!(
                "technician {technician_id} already has a slot overlapping {start_time}..{end_time}"
            )));
        }

        let slot = Slot::new(technician_id, start_time, end_time, self.clock.now());
        self.repos.slots().insert(slot.clone()).await?;

        info!(
            slot_id = %slot.id,
            technician_id,
            start = %start_time,
            "Slot created"
        );

        Ok(slot)
    }

    /// Apply create semantics per candidate, silently skipping overlap
    /// collisions; returns the accepted subset.
    pub async fn bulk_create(&self, candidates: Vec<SlotCandidate>) -> DomainResult<Vec<Slot>> {
        let mut accepted = Vec::new();
        let mut skipped = 0u32;

        for candidate in candidates {
            if self
                .repos
                .slots()
                .has_overlap(
                    candidate.technician_id,
                    candidate.start_time,
                    candidate.end_time,
                )
                .await?
            {
                debug!(
                    technician_id = candidate.technician_id,
                    start = %candidate.start_time,
                    "Candidate collides with an existing slot, skipped"
                );
                skipped += 1;
                continue;
            }

            let slot = Slot::new(
                candidate.technician_id,
                candidate.start_time,
                candidate.end_time,
                self.clock.now(),
            );
            self.repos.slots().insert(slot.clone()).await?;
            accepted.push(slot);
        }

        info!(
            accepted = accepted.len(),
            skipped, "Bulk slot creation finished"
        );

        Ok(accepted)
    }

    /// Generate and persist recurring slots for a technician.
    pub async fn generate_recurring(&self, spec: &RecurrenceSpec) -> DomainResult<Vec<Slot>> {
        let candidates = generate_slots(spec)?;
        info!(
            technician_id = spec.technician_id,
            candidates = candidates.len(),
            "Generating recurring slots"
        );
        self.bulk_create(candidates).await
    }

    /// Atomically book a slot for a job. Exactly one concurrent caller
    /// wins; the others observe `Conflict`.
    pub async fn reserve(&self, slot_id: Uuid, job_id: &str) -> DomainResult<Slot> {
        if !self.jobs.job_exists(job_id).await {
            return Err(DomainError::Validation(format!("unknown job '{job_id}'")));
        }

        let slot = self.repos.slots().reserve(slot_id, job_id).await?;

        info!(slot_id = %slot_id, job_id, "Slot reserved");
        metrics::counter!("rdv_slots_reserved_total").increment(1);

        Ok(slot)
    }

    /// Release a slot. Idempotent: releasing a free slot is a no-op.
    pub async fn release(&self, slot_id: Uuid) -> DomainResult<()> {
        self.repos.slots().release(slot_id).await?;
        info!(slot_id = %slot_id, "Slot released");
        metrics::counter!("rdv_slots_released_total").increment(1);
        Ok(())
    }

    /// Administrative delete, only while unreserved.
    pub async fn delete(&self, slot_id: Uuid) -> DomainResult<()> {
        self.repos.slots().delete(slot_id).await?;
        info!(slot_id = %slot_id, "Slot deleted");
        Ok(())
    }

    pub async fn get(&self, slot_id: Uuid) -> DomainResult<Slot> {
        self.repos
            .slots()
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Slot", "id", slot_id))
    }

    pub async fn list_by_technician(
        &self,
        technician_id: i64,
        date: Option<NaiveDate>,
    ) -> DomainResult<Vec<Slot>> {
        self.repos
            .slots()
            .list_by_technician(technician_id, date)
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────
