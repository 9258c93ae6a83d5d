//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::request::RequestRepository;
use crate::domain::slot::SlotRepository;
use crate::domain::RepositoryProvider;

use super::request_repository::SeaOrmRequestRepository;
use super::slot_repository::SeaOrmSlotRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let slot = repos.slots().find_by_id(slot_id).await?;
/// let pending = repos.requests().list(Some(RequestStatus::Pending)).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    slots: SeaOrmSlotRepository,
    requests: SeaOrmRequestRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            slots: SeaOrmSlotRepository::new(db.clone()),
            requests: SeaOrmRequestRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn slots(&self) -> &dyn SlotRepository {
        &self.slots
    }

    fn requests(&self) -> &dyn RequestRepository {
        &self.requests
    }
}
