//! Unified repository access for the scheduling services

use crate::domain::request::RequestRepository;
use crate::domain::slot::SlotRepository;

/// Per-aggregate repository accessors behind one provider.
///
/// Services hold an `Arc<dyn RepositoryProvider>` and never construct
/// repositories themselves.
pub trait RepositoryProvider: Send + Sync {
    fn slots(&self) -> &dyn SlotRepository;
    fn requests(&self) -> &dyn RequestRepository;
}
