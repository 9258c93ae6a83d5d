//! Appointment request repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{AppointmentRequest, RequestStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Persist a new request
    async fn insert(&self, request: AppointmentRequest) -> DomainResult<()>;

    /// Find request by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<AppointmentRequest>>;

    /// Update an existing request. `NotFound` if unknown.
    async fn update(&self, request: AppointmentRequest) -> DomainResult<()>;

    /// All requests, optionally filtered by status, newest first.
    async fn list(&self, status: Option<RequestStatus>) -> DomainResult<Vec<AppointmentRequest>>;

    /// Requests of one client, newest first.
    async fn list_by_client(&self, client_id: i64) -> DomainResult<Vec<AppointmentRequest>>;
}
