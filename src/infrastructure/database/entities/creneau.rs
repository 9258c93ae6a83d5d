//! Slot (créneau) entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "creneaux")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub technician_id: i64,

    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,

    /// Reservation flag; moves together with `job_id`
    pub reserved: bool,

    #[sea_orm(nullable)]
    pub job_id: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
