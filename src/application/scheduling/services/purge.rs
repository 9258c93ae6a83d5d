//! Background task that removes long-ended, never-reserved slots.
//!
//! Runs in a tokio::spawn loop until shutdown: every `interval_secs` it
//! deletes unreserved slots whose end time is older than the retention
//! window. Reserved slots are never touched; their history belongs to
//! the linked job.

use std::sync::Arc;

use tokio::time::Duration;
use tracing::{info, warn};

use crate::domain::{DomainResult, RepositoryProvider};
use crate::shared::{Clock, ShutdownSignal};

pub fn start_slot_purge_task(
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownSignal,
    interval_secs: u64,
    retention_days: i64,
) {
    tokio::spawn(async move {
        info!(
            interval = interval_secs,
            retention_days, "📅 Slot purge task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = purge_ended_slots(&repos, &clock, retention_days).await {
                        warn!(error = %e, "Slot purge error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("📅 Slot purge task shutting down");
                    break;
                }
            }
        }

        info!("📅 Slot purge task stopped");
    });
}

async fn purge_ended_slots(
    repos: &Arc<dyn RepositoryProvider>,
    clock: &Arc<dyn Clock>,
    retention_days: i64,
) -> DomainResult<()> {
    let cutoff = clock.now() - chrono::Duration::days(retention_days);
    let removed = repos.slots().delete_ended_before(cutoff).await?;

    if removed > 0 {
        info!(removed, %cutoff, "Purged stale unreserved slots");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::scheduling::testing::provider;
    use crate::domain::Slot;
    use crate::shared::FixedClock;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn purge_removes_only_stale_unreserved_slots() {
        let repos = provider();
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));

        let old_free = Slot::new(
            7,
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
            now,
        );
        let mut old_reserved = Slot::new(
            7,
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap(),
            now,
        );
        old_reserved.reserve("job-1");
        let recent = Slot::new(
            7,
            Utc.with_ymd_and_hms(2025, 3, 30, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 30, 10, 0, 0).unwrap(),
            now,
        );

        let repos_dyn: Arc<dyn RepositoryProvider> = repos.clone();
        repos_dyn.slots().insert(old_free.clone()).await.unwrap();
        repos_dyn.slots().insert(old_reserved.clone()).await.unwrap();
        repos_dyn.slots().insert(recent.clone()).await.unwrap();

        purge_ended_slots(&repos_dyn, &clock, 7).await.unwrap();

        assert!(repos_dyn.slots().find_by_id(old_free.id).await.unwrap().is_none());
        assert!(repos_dyn
            .slots()
            .find_by_id(old_reserved.id)
            .await
            .unwrap()
            .is_some());
        assert!(repos_dyn.slots().find_by_id(recent.id).await.unwrap().is_some());
    }
}
