//! SeaORM implementation of SlotRepository

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::domain::slot::{AvailabilityCounts, Slot, SlotRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::creneau;

pub struct SeaOrmSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::Database(format!("invalid uuid '{s}': {e}")))
}

fn model_to_domain(m: creneau::Model) -> DomainResult<Slot> {
    Ok(Slot {
        id: parse_uuid(&m.id)?,
        technician_id: m.technician_id,
        start_time: m.start_time,
        end_time: m.end_time,
        reserved: m.reserved,
        job_id: m.job_id,
        created_at: m.created_at,
    })
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// Slots intersecting the closed range `[start, end]`
fn range_filter(
    query: sea_orm::Select<creneau::Entity>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    technician_id: Option<i64>,
) -> sea_orm::Select<creneau::Entity> {
    let mut query = query
        .filter(creneau::Column::StartTime.lte(end))
        .filter(creneau::Column::EndTime.gt(start));
    if let Some(technician_id) = technician_id {
        query = query.filter(creneau::Column::TechnicianId.eq(technician_id));
    }
    query
}

// ── SlotRepository impl ─────────────────────────────────────────

#[async_trait]
impl SlotRepository for SeaOrmSlotRepository {
    async fn insert(&self, slot: Slot) -> DomainResult<()> {
        debug!("Saving slot: {}", slot.id);

        let model = creneau::ActiveModel {
            id: Set(slot.id.to_string()),
            technician_id: Set(slot.technician_id),
            start_time: Set(slot.start_time),
            end_time: Set(slot.end_time),
            reserved: Set(slot.reserved),
            job_id: Set(slot.job_id),
            created_at: Set(slot.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Slot>> {
        let model = creneau::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn has_overlap(
        &self,
        technician_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let count = creneau::Entity::find()
            .filter(creneau::Column::TechnicianId.eq(technician_id))
            .filter(creneau::Column::StartTime.lt(end))
            .filter(creneau::Column::EndTime.gt(start))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn reserve(&self, id: Uuid, job_id: &str) -> DomainResult<Slot> {
        // Conditional update: only a currently-free row is written, so
        // exactly one concurrent caller observes rows_affected == 1.
        let result = creneau::Entity::update_many()
            .col_expr(creneau::Column::Reserved, Expr::value(true))
            .col_expr(creneau::Column::JobId, Expr::value(job_id))
            .filter(creneau::Column::Id.eq(id.to_string()))
            .filter(creneau::Column::Reserved.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                Some(_) => Err(DomainError::Conflict(format!("slot {id} already reserved"))),
                None => Err(DomainError::not_found("Slot", "id", id)),
            };
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Slot", "id", id))
    }

    async fn release(&self, id: Uuid) -> DomainResult<()> {
        let result = creneau::Entity::update_many()
            .col_expr(creneau::Column::Reserved, Expr::value(false))
            .col_expr(creneau::Column::JobId, Expr::value(None::<String>))
            .filter(creneau::Column::Id.eq(id.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Slot", "id", id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        // Same conditional idiom as reserve: a reserved row is not deletable.
        let result = creneau::Entity::delete_many()
            .filter(creneau::Column::Id.eq(id.to_string()))
            .filter(creneau::Column::Reserved.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                Some(_) => Err(DomainError::Conflict(format!(
                    "slot {id} is reserved and cannot be deleted"
                ))),
                None => Err(DomainError::not_found("Slot", "id", id)),
            };
        }
        Ok(())
    }

    async fn list_by_technician(
        &self,
        technician_id: i64,
        date: Option<NaiveDate>,
    ) -> DomainResult<Vec<Slot>> {
        let mut query = creneau::Entity::find()
            .filter(creneau::Column::TechnicianId.eq(technician_id));

        if let Some(date) = date {
            let day_start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
            let day_end = day_start + Duration::days(1);
            query = query
                .filter(creneau::Column::StartTime.gte(day_start))
                .filter(creneau::Column::StartTime.lt(day_end));
        }

        let models = query
            .order_by_asc(creneau::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        technician_id: Option<i64>,
        offset: u64,
        limit: Option<u64>,
    ) -> DomainResult<Vec<Slot>> {
        let models = range_filter(creneau::Entity::find(), start, end, technician_id)
            .order_by_asc(creneau::Column::StartTime)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn count_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> DomainResult<AvailabilityCounts> {
        let total = range_filter(creneau::Entity::find(), start, end, technician_id)
            .count(&self.db)
            .await
            .map_err(db_err)?;
        let reserved = range_filter(creneau::Entity::find(), start, end, technician_id)
            .filter(creneau::Column::Reserved.eq(true))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(AvailabilityCounts { total, reserved })
    }

    async fn delete_ended_before(&self, cutoff: DateTime<Utc>) -> DomainResult<u64> {
        let result = creneau::Entity::delete_many()
            .filter(creneau::Column::Reserved.eq(false))
            .filter(creneau::Column::EndTime.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::migrator::Migrator;
    use chrono::TimeZone;
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;
    use std::sync::Arc;

    async fn repo() -> SeaOrmSlotRepository {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmSlotRepository::new(db)
    }

    fn ts(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, h, 0, 0).unwrap()
    }

    fn slot(technician_id: i64, day: u32, h: u32) -> Slot {
        Slot::new(technician_id, ts(day, h), ts(day, h + 1), ts(1, 0))
    }

    #[tokio::test]
    async fn insert_and_find_roundtrip() {
        let repo = repo().await;
        let s = slot(7, 3, 9);
        repo.insert(s.clone()).await.unwrap();

        let found = repo.find_by_id(s.id).await.unwrap().unwrap();
        assert_eq!(found, s);
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overlap_detection_matches_interval_semantics() {
        let repo = repo().await;
        repo.insert(slot(7, 3, 9)).await.unwrap();

        assert!(repo.has_overlap(7, ts(3, 9), ts(3, 10)).await.unwrap());
        assert!(repo
            .has_overlap(7, ts(3, 8) + Duration::minutes(90), ts(3, 11))
            .await
            .unwrap());
        // adjacent and other-technician windows are free
        assert!(!repo.has_overlap(7, ts(3, 10), ts(3, 11)).await.unwrap());
        assert!(!repo.has_overlap(8, ts(3, 9), ts(3, 10)).await.unwrap());
    }

    #[tokio::test]
    async fn reserve_is_compare_and_set() {
        let repo = Arc::new(repo().await);
        let s = slot(7, 3, 9);
        repo.insert(s.clone()).await.unwrap();

        let a = {
            let repo = repo.clone();
            let id = s.id;
            tokio::spawn(async move { repo.reserve(id, "job-a").await })
        };
        let b = {
            let repo = repo.clone();
            let id = s.id;
            tokio::spawn(async move { repo.reserve(id, "job-b").await })
        };

        let outcomes = [a.await.unwrap(), b.await.unwrap()];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|r| matches!(r, Err(DomainError::Conflict(_))))
                .count(),
            1
        );

        let stored = repo.find_by_id(s.id).await.unwrap().unwrap();
        assert!(stored.reserved);
        assert!(stored.job_id.is_some());
    }

    #[tokio::test]
    async fn reserve_unknown_slot_is_not_found() {
        let repo = repo().await;
        assert!(matches!(
            repo.reserve(Uuid::new_v4(), "job-a").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn release_is_idempotent_and_clears_job() {
        let repo = repo().await;
        let s = slot(7, 3, 9);
        repo.insert(s.clone()).await.unwrap();
        repo.reserve(s.id, "job-a").await.unwrap();

        repo.release(s.id).await.unwrap();
        repo.release(s.id).await.unwrap();

        let stored = repo.find_by_id(s.id).await.unwrap().unwrap();
        assert!(!stored.reserved);
        assert!(stored.job_id.is_none());

        assert!(matches!(
            repo.release(Uuid::new_v4()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_refuses_reserved_rows() {
        let repo = repo().await;
        let s = slot(7, 3, 9);
        repo.insert(s.clone()).await.unwrap();
        repo.reserve(s.id, "job-a").await.unwrap();

        assert!(matches!(
            repo.delete(s.id).await,
            Err(DomainError::Conflict(_))
        ));

        repo.release(s.id).await.unwrap();
        repo.delete(s.id).await.unwrap();
        assert!(repo.find_by_id(s.id).await.unwrap().is_none());

        assert!(matches!(
            repo.delete(s.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn technician_listing_orders_and_filters_by_date() {
        let repo = repo().await;
        repo.insert(slot(7, 4, 14)).await.unwrap();
        repo.insert(slot(7, 3, 9)).await.unwrap();
        repo.insert(slot(7, 3, 11)).await.unwrap();
        repo.insert(slot(8, 3, 9)).await.unwrap();

        let all = repo.list_by_technician(7, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].start_time <= w[1].start_time));

        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let march3 = repo.list_by_technician(7, Some(day)).await.unwrap();
        assert_eq!(march3.len(), 2);
    }

    #[tokio::test]
    async fn range_queries_page_and_count() {
        let repo = repo().await;
        for h in 9..14 {
            repo.insert(slot(7, 3, h)).await.unwrap();
        }
        repo.reserve(
            repo.list_by_technician(7, None).await.unwrap()[0].id,
            "job-a",
        )
        .await
        .unwrap();

        let counts = repo.count_in_range(ts(3, 0), ts(3, 23), Some(7)).await.unwrap();
        assert_eq!(counts.total, 5);
        assert_eq!(counts.reserved, 1);
        assert_eq!(counts.free(), 4);

        let page = repo
            .find_in_range(ts(3, 0), ts(3, 23), Some(7), 2, Some(2))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].start_time, ts(3, 11));
    }

    #[tokio::test]
    async fn purge_keeps_reserved_and_recent_slots() {
        let repo = repo().await;
        let old_free = slot(7, 1, 9);
        let old_reserved = slot(7, 1, 11);
        let recent = slot(7, 28, 9);
        repo.insert(old_free.clone()).await.unwrap();
        repo.insert(old_reserved.clone()).await.unwrap();
        repo.insert(recent.clone()).await.unwrap();
        repo.reserve(old_reserved.id, "job-a").await.unwrap();

        let removed = repo.delete_ended_before(ts(20, 0)).await.unwrap();
        assert_eq!(removed, 1);
        assert!(repo.find_by_id(old_free.id).await.unwrap().is_none());
        assert!(repo.find_by_id(old_reserved.id).await.unwrap().is_some());
        assert!(repo.find_by_id(recent.id).await.unwrap().is_some());
    }
}
