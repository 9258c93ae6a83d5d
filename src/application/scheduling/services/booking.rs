//! Appointment request workflow
//!
//! Sole mutation surface for requests. Slot reservation and release are
//! delegated to the slot store; every transition publishes exactly one
//! notification event, synchronously with the state change.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    AppointmentRequest, DomainError, DomainResult, JobRegistry, RepositoryProvider, RequestStatus,
};
use crate::notifications::events::{
    Event, RequestCancelledEvent, RequestConfirmedEvent, RequestCreatedEvent, RequestRejectedEvent,
};
use crate::notifications::SharedEventBus;
use crate::shared::Clock;

/// Longest accepted motive, characters
pub const MAX_MOTIVE_LEN: usize = 500;
/// Longest accepted time-of-day preference, characters
pub const MAX_PREFERENCE_LEN: usize = 100;

/// Input for a new appointment request
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub client_id: i64,
    pub motive: String,
    pub complaint_id: Option<i64>,
    /// Pre-selected slot. Recorded, never reserved before acceptance.
    pub slot_id: Option<Uuid>,
    pub desired_date: Option<NaiveDate>,
    pub time_preference: Option<String>,
    pub comment: Option<String>,
}

/// Manager decision on a pending request
#[derive(Debug, Clone, Default)]
pub struct Decision {
    pub accept: bool,
    /// Overrides the request's pre-selected slot when accepting
    pub slot_id: Option<Uuid>,
    /// Intervention reference to book the slot under
    pub job_id: Option<String>,
    pub comment: Option<String>,
}

/// Service driving the request state machine
pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    jobs: Arc<dyn JobRegistry>,
    event_bus: SharedEventBus,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jobs: Arc<dyn JobRegistry>,
        event_bus: SharedEventBus,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            jobs,
            event_bus,
            clock,
        }
    }

    /// Create a request in Pending. A supplied slot id is recorded but
    /// not reserved; reservation happens only on acceptance.
    pub async fn create(&self, new: NewRequest) -> DomainResult<AppointmentRequest> {
        let motive = new.motive.trim();
        if motive.is_empty() {
            return Err(DomainError::Validation("motive is required".to_string()));
        }
        if motive.chars().count() > MAX_MOTIVE_LEN {
            return Err(DomainError::Validation(format!(
                "motive exceeds {MAX_MOTIVE_LEN} characters"
            )));
        }
        if let Some(pref) = &new.time_preference {
            if pref.chars().count() > MAX_PREFERENCE_LEN {
                return Err(DomainError::Validation(format!(
                    "time preference exceeds {MAX_PREFERENCE_LEN} characters"
                )));
            }
        }
        if let Some(slot_id) = new.slot_id {
            // the pre-selection must at least point at a real slot
            self.repos
                .slots()
                .find_by_id(slot_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Slot", "id", slot_id))?;
        }

        let request = AppointmentRequest::new(
            new.client_id,
            motive,
            new.complaint_id,
            new.slot_id,
            new.desired_date,
            new.time_preference,
            new.comment,
            self.clock.now(),
        );
        self.repos.requests().insert(request.clone()).await?;

        info!(
            request_id = %request.id,
            client_id = request.client_id,
            complaint_id = request.complaint_id,
            "Appointment request created"
        );
        metrics::counter!("rdv_requests_created_total").increment(1);

        self.event_bus.publish(Event::RequestCreated(RequestCreatedEvent {
            request_id: request.id,
            client_id: request.client_id,
            complaint_id: request.complaint_id,
            motive: request.motive.clone(),
            desired_date: request.desired_date,
            timestamp: request.created_at,
        }));

        Ok(request)
    }

    /// Process a pending request: accept (reserving a slot) or reject.
    ///
    /// On a reservation conflict the request stays Pending and the error
    /// propagates, leaving no partial state.
    pub async fn process(
        &self,
        request_id: Uuid,
        decision: Decision,
    ) -> DomainResult<AppointmentRequest> {
        let mut request = self.get(request_id).await?;
        if !request.is_pending() {
            return Err(DomainError::InvalidState(format!(
                "request {request_id} is {}, expected Pending",
                request.status
            )));
        }

        if decision.accept {
            self.accept(&mut request, decision).await?;
        } else {
            request.reject(decision.comment, self.clock.now());
            self.repos.requests().update(request.clone()).await?;

            info!(request_id = %request.id, "Appointment request rejected");
            metrics::counter!("rdv_requests_rejected_total").increment(1);

            self.event_bus.publish(Event::RequestRejected(RequestRejectedEvent {
                request_id: request.id,
                client_id: request.client_id,
                comment: request.comment.clone(),
                timestamp: self.clock.now(),
            }));
        }

        Ok(request)
    }

    async fn accept(
        &self,
        request: &mut AppointmentRequest,
        decision: Decision,
    ) -> DomainResult<()> {
        let slot_id = decision.slot_id.or(request.slot_id).ok_or_else(|| {
            DomainError::Validation(format!(
                "request {} has no chosen slot and none was supplied",
                request.id
            ))
        })?;

        let job_ref = self.resolve_job_ref(request, decision.job_id).await?;

        // CAS: exactly one concurrent acceptance of this slot wins.
        let slot = self.repos.slots().reserve(slot_id, &job_ref).await?;

        request.confirm(slot_id, decision.comment, self.clock.now());
        if let Err(e) = self.repos.requests().update(request.clone()).await {
            // do not strand the slot on a request that stayed Pending
            if let Err(release_err) = self.repos.slots().release(slot_id).await {
                warn!(
                    slot_id = %slot_id,
                    error = %release_err,
                    "Failed to release slot after request update failure"
                );
            }
            return Err(e);
        }

        info!(
            request_id = %request.id,
            slot_id = %slot_id,
            job_ref,
            "Appointment request confirmed"
        );
        metrics::counter!("rdv_requests_confirmed_total").increment(1);

        self.event_bus.publish(Event::RequestConfirmed(RequestConfirmedEvent {
            request_id: request.id,
            client_id: request.client_id,
            slot_id,
            technician_id: slot.technician_id,
            slot_start: slot.start_time,
            slot_end: slot.end_time,
            timestamp: self.clock.now(),
        }));

        Ok(())
    }

    /// Job reference for the reservation: explicit intervention id
    /// (registry-checked), else the complaint, else the request itself.
    async fn resolve_job_ref(
        &self,
        request: &AppointmentRequest,
        job_id: Option<String>,
    ) -> DomainResult<String> {
        if let Some(job_id) = job_id {
            if !self.jobs.job_exists(&job_id).await {
                return Err(DomainError::Validation(format!("unknown job '{job_id}'")));
            }
            return Ok(job_id);
        }
        if let Some(complaint_id) = request.complaint_id {
            return Ok(format!("job:{complaint_id}"));
        }
        Ok(request.id.to_string())
    }

    /// Cancel a Pending or Confirmed request, releasing its slot first
    /// when one is reserved.
    pub async fn cancel(&self, request_id: Uuid) -> DomainResult<AppointmentRequest> {
        let mut request = self.get(request_id).await?;
        if request.status.is_terminal() {
            return Err(DomainError::InvalidState(format!(
                "request {request_id} is already {}",
                request.status
            )));
        }

        let mut released_slot_id = None;
        if request.status == RequestStatus::Confirmed {
            if let Some(slot_id) = request.slot_id {
                self.repos.slots().release(slot_id).await?;
                released_slot_id = Some(slot_id);
            }
        }

        request.cancel();
        self.repos.requests().update(request.clone()).await?;

        info!(
            request_id = %request.id,
            released_slot = ?released_slot_id,
            "Appointment request cancelled"
        );
        metrics::counter!("rdv_requests_cancelled_total").increment(1);

        self.event_bus.publish(Event::RequestCancelled(RequestCancelledEvent {
            request_id: request.id,
            client_id: request.client_id,
            released_slot_id,
            timestamp: self.clock.now(),
        }));

        Ok(request)
    }

    pub async fn get(&self, request_id: Uuid) -> DomainResult<AppointmentRequest> {
        self.repos
            .requests()
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| DomainError::not_found("AppointmentRequest", "id", request_id))
    }

    pub async fn list(
        &self,
        status: Option<RequestStatus>,
    ) -> DomainResult<Vec<AppointmentRequest>> {
        self.repos.requests().list(status).await
    }

    pub async fn list_by_client(&self, client_id: i64) -> DomainResult<Vec<AppointmentRequest>> {
        self.repos.requests().list_by_client(client_id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::scheduling::testing::{provider, InMemoryProvider, StubJobRegistry};
    use crate::domain::Slot;
    use crate::notifications::EventBus;
    use crate::shared::FixedClock;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, h, 0, 0).unwrap()
    }

    struct Fixture {
        repos: Arc<InMemoryProvider>,
        svc: BookingService,
        bus: SharedEventBus,
    }

    fn fixture() -> Fixture {
        let repos = provider();
        let bus = Arc::new(EventBus::new());
        let svc = BookingService::new(
            repos.clone(),
            Arc::new(StubJobRegistry::default()),
            bus.clone(),
            Arc::new(FixedClock(ts(1, 10))),
        );
        Fixture { repos, svc, bus }
    }

    async fn free_slot(repos: &Arc<InMemoryProvider>) -> Slot {
        let slot = Slot::new(7, ts(3, 9), ts(3, 10), ts(1, 0));
        repos.slots().insert(slot.clone()).await.unwrap();
        slot
    }

    fn new_request(slot_id: Option<Uuid>) -> NewRequest {
        NewRequest {
            client_id: 42,
            motive: "noisy fridge".to_string(),
            complaint_id: None,
            slot_id,
            desired_date: None,
            time_preference: None,
            comment: None,
        }
    }

    #[tokio::test]
    async fn create_requires_non_blank_motive() {
        let f = fixture();
        let mut req = new_request(None);
        req.motive = "   ".to_string();
        assert!(matches!(
            f.svc.create(req).await,
            Err(DomainError::Validation(_))
        ));

        let mut req = new_request(None);
        req.motive = "x".repeat(MAX_MOTIVE_LEN + 1);
        assert!(matches!(
            f.svc.create(req).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn create_records_preselected_slot_without_reserving() {
        let f = fixture();
        let slot = free_slot(&f.repos).await;

        let request = f.svc.create(new_request(Some(slot.id))).await.unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.slot_id, Some(slot.id));

        let stored = f.repos.slots().find_by_id(slot.id).await.unwrap().unwrap();
        assert!(!stored.reserved, "creation must not reserve the slot");
    }

    #[tokio::test]
    async fn create_rejects_unknown_preselected_slot() {
        let f = fixture();
        assert!(matches!(
            f.svc.create(new_request(Some(Uuid::new_v4()))).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn accept_reserves_slot_and_confirms() {
        let f = fixture();
        let mut events = f.bus.subscribe();
        let slot = free_slot(&f.repos).await;
        let request = f.svc.create(new_request(None)).await.unwrap();

        let processed = f
            .svc
            .process(
                request.id,
                Decision {
                    accept: true,
                    slot_id: Some(slot.id),
                    ..Decision::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(processed.status, RequestStatus::Confirmed);
        assert_eq!(processed.slot_id, Some(slot.id));
        assert_eq!(processed.processed_at, Some(ts(1, 10)));

        let stored = f.repos.slots().find_by_id(slot.id).await.unwrap().unwrap();
        assert!(stored.reserved);
        // no explicit job, no complaint: reserved under the request id
        assert_eq!(stored.job_id.as_deref(), Some(request.id.to_string().as_str()));

        // one created + one confirmed event, in order
        let first = events.recv().await.unwrap();
        assert_eq!(first.event.event_type(), "request_created");
        let second = events.recv().await.unwrap();
        assert_eq!(second.event.event_type(), "request_confirmed");
    }

    #[tokio::test]
    async fn second_process_call_is_invalid_state() {
        let f = fixture();
        let slot = free_slot(&f.repos).await;
        let request = f.svc.create(new_request(Some(slot.id))).await.unwrap();

        f.svc
            .process(
                request.id,
                Decision {
                    accept: true,
                    ..Decision::default()
                },
            )
            .await
            .unwrap();

        let err = f
            .svc
            .process(
                request.id,
                Decision {
                    accept: true,
                    ..Decision::default()
                },
            )
            .await;
        assert!(matches!(err, Err(DomainError::InvalidState(_))));
    }

    #[tokio::test]
    async fn accept_without_any_slot_is_validation_error() {
        let f = fixture();
        let request = f.svc.create(new_request(None)).await.unwrap();

        let err = f
            .svc
            .process(
                request.id,
                Decision {
                    accept: true,
                    ..Decision::default()
                },
            )
            .await;
        assert!(matches!(err, Err(DomainError::Validation(_))));

        // still processable afterwards
        let reloaded = f.svc.get(request.id).await.unwrap();
        assert!(reloaded.is_pending());
    }

    #[tokio::test]
    async fn accept_conflict_leaves_request_pending() {
        let f = fixture();
        let slot = free_slot(&f.repos).await;

        // two clients pre-selected the same slot
        let first = f.svc.create(new_request(Some(slot.id))).await.unwrap();
        let second = f.svc.create(new_request(Some(slot.id))).await.unwrap();

        f.svc
            .process(
                first.id,
                Decision {
                    accept: true,
                    ..Decision::default()
                },
            )
            .await
            .unwrap();

        let err = f
            .svc
            .process(
                second.id,
                Decision {
                    accept: true,
                    ..Decision::default()
                },
            )
            .await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));

        let still_pending = f.svc.get(second.id).await.unwrap();
        assert_eq!(still_pending.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn reject_touches_no_slot() {
        let f = fixture();
        let slot = free_slot(&f.repos).await;
        let request = f.svc.create(new_request(Some(slot.id))).await.unwrap();

        let processed = f
            .svc
            .process(
                request.id,
                Decision {
                    accept: false,
                    comment: Some("no technician available".to_string()),
                    ..Decision::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(processed.status, RequestStatus::Rejected);
        assert_eq!(processed.comment.as_deref(), Some("no technician available"));
        assert_eq!(processed.processed_at, Some(ts(1, 10)));

        let stored = f.repos.slots().find_by_id(slot.id).await.unwrap().unwrap();
        assert!(!stored.reserved);
    }

    #[tokio::test]
    async fn cancel_confirmed_request_frees_its_slot() {
        let f = fixture();
        let slot = free_slot(&f.repos).await;
        let request = f.svc.create(new_request(Some(slot.id))).await.unwrap();
        f.svc
            .process(
                request.id,
                Decision {
                    accept: true,
                    ..Decision::default()
                },
            )
            .await
            .unwrap();

        let cancelled = f.svc.cancel(request.id).await.unwrap();
        assert_eq!(cancelled.status, RequestStatus::Cancelled);

        let stored = f.repos.slots().find_by_id(slot.id).await.unwrap().unwrap();
        assert!(!stored.reserved, "cancellation must free the slot");
        assert!(stored.job_id.is_none());

        // the freed slot is bookable again
        f.repos.slots().reserve(slot.id, "job-9").await.unwrap();
    }

    #[tokio::test]
    async fn cancel_pending_request_is_allowed() {
        let f = fixture();
        let request = f.svc.create(new_request(None)).await.unwrap();
        let cancelled = f.svc.cancel(request.id).await.unwrap();
        assert_eq!(cancelled.status, RequestStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_terminal_request_is_invalid_state() {
        let f = fixture();
        let request = f.svc.create(new_request(None)).await.unwrap();
        f.svc
            .process(
                request.id,
                Decision {
                    accept: false,
                    ..Decision::default()
                },
            )
            .await
            .unwrap();

        // Rejected is terminal
        assert!(matches!(
            f.svc.cancel(request.id).await,
            Err(DomainError::InvalidState(_))
        ));

        let request = f.svc.create(new_request(None)).await.unwrap();
        f.svc.cancel(request.id).await.unwrap();
        // Cancelled is terminal too
        assert!(matches!(
            f.svc.cancel(request.id).await,
            Err(DomainError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn job_ref_prefers_explicit_then_complaint() {
        let f = fixture();
        let slot = free_slot(&f.repos).await;
        let mut req = new_request(Some(slot.id));
        req.complaint_id = Some(99);
        let request = f.svc.create(req).await.unwrap();

        f.svc
            .process(
                request.id,
                Decision {
                    accept: true,
                    ..Decision::default()
                },
            )
            .await
            .unwrap();

        let stored = f.repos.slots().find_by_id(slot.id).await.unwrap().unwrap();
        assert_eq!(stored.job_id.as_deref(), Some("job:99"));
    }

    #[tokio::test]
    async fn unknown_explicit_job_fails_acceptance() {
        let repos = provider();
        let bus = Arc::new(EventBus::new());
        let svc = BookingService::new(
            repos.clone(),
            Arc::new(StubJobRegistry {
                known: Some(["itv-1".to_string()].into()),
            }),
            bus,
            Arc::new(FixedClock(ts(1, 10))),
        );

        let slot = Slot::new(7, ts(3, 9), ts(3, 10), ts(1, 0));
        repos.slots().insert(slot.clone()).await.unwrap();
        let request = svc.create(new_request(Some(slot.id))).await.unwrap();

        let err = svc
            .process(
                request.id,
                Decision {
                    accept: true,
                    job_id: Some("itv-404".to_string()),
                    ..Decision::default()
                },
            )
            .await;
        assert!(matches!(err, Err(DomainError::Validation(_))));

        // slot untouched, request still pending
        let stored = repos.slots().find_by_id(slot.id).await.unwrap().unwrap();
        assert!(!stored.reserved);
        assert!(svc.get(request.id).await.unwrap().is_pending());
    }

    #[tokio::test]
    async fn list_filters_by_status_and_client() {
        let f = fixture();
        let a = f.svc.create(new_request(None)).await.unwrap();
        let mut other = new_request(None);
        other.client_id = 77;
        let b = f.svc.create(other).await.unwrap();
        f.svc
            .process(
                b.id,
                Decision {
                    accept: false,
                    ..Decision::default()
                },
            )
            .await
            .unwrap();

        let pending = f.svc.list(Some(RequestStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, a.id);

        let rejected = f.svc.list(Some(RequestStatus::Rejected)).await.unwrap();
        assert_eq!(rejected.len(), 1);

        let mine = f.svc.list_by_client(77).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, b.id);

        assert_eq!(f.svc.list(None).await.unwrap().len(), 2);
    }
}
