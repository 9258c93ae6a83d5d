//! Outbound ports — interfaces to the platform's collaborator services
//!
//! The scheduling core never talks to the technician directory, the
//! intervention registry or the notification pipeline directly; it goes
//! through these traits. Production deployments wire the real service
//! clients here, the in-process defaults live in `infrastructure`.

use async_trait::async_trait;

use crate::notifications::EventMessage;

/// Resolve technician ids to display names. Presentation only; the
/// directory is not consulted for availability decisions.
#[async_trait]
pub trait TechnicianDirectory: Send + Sync {
    async fn display_name(&self, technician_id: i64) -> Option<String>;
}

/// Existence check for job (intervention) ids passed to reserve.
#[async_trait]
pub trait JobRegistry: Send + Sync {
    async fn job_exists(&self, job_id: &str) -> bool;
}

/// Delivery endpoint for workflow notification events.
///
/// Delivery is best-effort: a failed delivery is logged by the dispatcher
/// and never surfaces to the workflow caller.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, message: &EventMessage) -> Result<(), String>;
}
