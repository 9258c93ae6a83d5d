//! In-memory repository doubles for service-level tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::request::RequestRepository;
use crate::domain::slot::SlotRepository;
use crate::domain::{
    AppointmentRequest, AvailabilityCounts, DomainError, DomainResult, JobRegistry,
    RepositoryProvider, RequestStatus, Slot,
};

#[derive(Default)]
pub struct InMemorySlotRepository {
    slots: Mutex<Vec<Slot>>,
}

#[async_trait]
impl SlotRepository for InMemorySlotRepository {
    async fn insert(&self, slot: Slot) -> DomainResult<()> {
        self.slots.lock().unwrap().push(slot);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Slot>> {
        Ok(self.slots.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn has_overlap(
        &self,
        technician_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Ok(self
            .slots
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.technician_id == technician_id && s.overlaps_range(start, end)))
    }

    async fn reserve(&self, id: Uuid, job_id: &str) -> DomainResult<Slot> {
        let mut slots = self.slots.lock().unwrap();
        let slot = slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("Slot", "id", id))?;
        if slot.reserved {
            return Err(DomainError::Conflict(format!("slot {id} already reserved")));
        }
        slot.reserve(job_id);
        Ok(slot.clone())
    }

    async fn release(&self, id: Uuid) -> DomainResult<()> {
        let mut slots = self.slots.lock().unwrap();
        let slot = slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("Slot", "id", id))?;
        slot.release();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let mut slots = self.slots.lock().unwrap();
        let idx = slots
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("Slot", "id", id))?;
        if slots[idx].reserved {
            return Err(DomainError::Conflict(format!(
                "slot {id} is reserved and cannot be deleted"
            )));
        }
        slots.remove(idx);
        Ok(())
    }

    async fn list_by_technician(
        &self,
        technician_id: i64,
        date: Option<NaiveDate>,
    ) -> DomainResult<Vec<Slot>> {
        let mut out: Vec<Slot> = self
            .slots
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.technician_id == technician_id)
            .filter(|s| date.map_or(true, |d| s.start_time.date_naive() == d))
            .cloned()
            .collect();
        out.sort_by_key(|s| s.start_time);
        Ok(out)
    }

    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        technician_id: Option<i64>,
        offset: u64,
        limit: Option<u64>,
    ) -> DomainResult<Vec<Slot>> {
        let mut out: Vec<Slot> = self
            .slots
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.start_time <= end && s.end_time > start)
            .filter(|s| technician_id.map_or(true, |t| s.technician_id == t))
            .cloned()
            .collect();
        out.sort_by_key(|s| s.start_time);
        Ok(out
            .into_iter()
            .skip(offset as usize)
            .take(limit.unwrap_or(u64::MAX) as usize)
            .collect())
    }

    async fn count_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> DomainResult<AvailabilityCounts> {
        let slots = self.slots.lock().unwrap();
        let matching = slots
            .iter()
            .filter(|s| s.start_time <= end && s.end_time > start)
            .filter(|s| technician_id.map_or(true, |t| s.technician_id == t));
        let mut total = 0;
        let mut reserved = 0;
        for s in matching {
            total += 1;
            if s.reserved {
                reserved += 1;
            }
        }
        Ok(AvailabilityCounts { total, reserved })
    }

    async fn delete_ended_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64> {
        let mut slots = self.slots.lock().unwrap();
        let before = slots.len();
        slots.retain(|s| s.reserved || s.end_time >= cutoff);
        Ok((before - slots.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryRequestRepository {
    requests: Mutex<Vec<AppointmentRequest>>,
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn insert(&self, request: AppointmentRequest) -> DomainResult<()> {
        self.requests.lock().unwrap().push(request);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<AppointmentRequest>> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn update(&self, request: AppointmentRequest) -> DomainResult<()> {
        let mut requests = self.requests.lock().unwrap();
        let existing = requests
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or_else(|| DomainError::not_found("AppointmentRequest", "id", request.id))?;
        *existing = request;
        Ok(())
    }

    async fn list(&self, status: Option<RequestStatus>) -> DomainResult<Vec<AppointmentRequest>> {
        let mut out: Vec<AppointmentRequest> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        out.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(out)
    }

    async fn list_by_client(&self, client_id: i64) -> DomainResult<Vec<AppointmentRequest>> {
        let mut out: Vec<AppointmentRequest> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.client_id == client_id)
            .cloned()
            .collect();
        out.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(out)
    }
}

#[derive(Default)]
pub struct InMemoryProvider {
    slots: InMemorySlotRepository,
    requests: InMemoryRequestRepository,
}

impl RepositoryProvider for InMemoryProvider {
    fn slots(&self) -> &dyn SlotRepository {
        &self.slots
    }

    fn requests(&self) -> &dyn RequestRepository {
        &self.requests
    }
}

pub fn provider() -> Arc<InMemoryProvider> {
    Arc::new(InMemoryProvider::default())
}

/// Job registry double: accepts everything unless a closed set is given.
#[derive(Default)]
pub struct StubJobRegistry {
    pub known: Option<HashSet<String>>,
}

#[async_trait]
impl JobRegistry for StubJobRegistry {
    async fn job_exists(&self, job_id: &str) -> bool {
        match &self.known {
            Some(known) => known.contains(job_id),
            None => true,
        }
    }
}
