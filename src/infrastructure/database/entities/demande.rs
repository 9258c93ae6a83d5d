//! Appointment request (demande) entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "demandes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(nullable)]
    pub complaint_id: Option<i64>,

    pub client_id: i64,

    /// Chosen slot, set at creation (pre-selection) or on confirmation
    #[sea_orm(nullable)]
    pub slot_id: Option<String>,

    pub motive: String,

    #[sea_orm(nullable)]
    pub desired_date: Option<Date>,

    #[sea_orm(nullable)]
    pub time_preference: Option<String>,

    /// Request status: Pending, Confirmed, Rejected, Cancelled
    pub status: String,

    #[sea_orm(nullable)]
    pub comment: Option<String>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub processed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
