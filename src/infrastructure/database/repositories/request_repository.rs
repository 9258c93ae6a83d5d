//! SeaORM implementation of RequestRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::request::{AppointmentRequest, RequestRepository, RequestStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::demande;

pub struct SeaOrmRequestRepository {
    db: DatabaseConnection,
}

impl SeaOrmRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::Database(format!("invalid uuid '{s}': {e}")))
}

fn model_to_domain(m: demande::Model) -> DomainResult<AppointmentRequest> {
    let status = RequestStatus::parse(&m.status)
        .map_err(|_| DomainError::Database(format!("demande {} has status '{}'", m.id, m.status)))?;
    Ok(AppointmentRequest {
        id: parse_uuid(&m.id)?,
        complaint_id: m.complaint_id,
        client_id: m.client_id,
        slot_id: m.slot_id.as_deref().map(parse_uuid).transpose()?,
        motive: m.motive,
        desired_date: m.desired_date,
        time_preference: m.time_preference,
        status,
        comment: m.comment,
        created_at: m.created_at,
        processed_at: m.processed_at,
    })
}

fn domain_to_model(r: AppointmentRequest) -> demande::ActiveModel {
    demande::ActiveModel {
        id: Set(r.id.to_string()),
        complaint_id: Set(r.complaint_id),
        client_id: Set(r.client_id),
        slot_id: Set(r.slot_id.map(|id| id.to_string())),
        motive: Set(r.motive),
        desired_date: Set(r.desired_date),
        time_preference: Set(r.time_preference),
        status: Set(r.status.as_str().to_string()),
        comment: Set(r.comment),
        created_at: Set(r.created_at),
        processed_at: Set(r.processed_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

// ── RequestRepository impl ──────────────────────────────────────

#[async_trait]
impl RequestRepository for SeaOrmRequestRepository {
    async fn insert(&self, request: AppointmentRequest) -> DomainResult<()> {
        debug!("Saving appointment request: {}", request.id);
        domain_to_model(request)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<AppointmentRequest>> {
        let model = demande::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn update(&self, request: AppointmentRequest) -> DomainResult<()> {
        debug!("Updating appointment request: {}", request.id);

        let existing = demande::Entity::find_by_id(request.id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("AppointmentRequest", "id", request.id));
        }

        domain_to_model(request)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list(&self, status: Option<RequestStatus>) -> DomainResult<Vec<AppointmentRequest>> {
        let mut query = demande::Entity::find();
        if let Some(status) = status {
            query = query.filter(demande::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(demande::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn list_by_client(&self, client_id: i64) -> DomainResult<Vec<AppointmentRequest>> {
        let models = demande::Entity::find()
            .filter(demande::Column::ClientId.eq(client_id))
            .order_by_desc(demande::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────
