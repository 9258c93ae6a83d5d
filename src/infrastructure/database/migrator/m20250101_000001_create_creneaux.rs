//! Create creneaux table
//!
//! Stores technician time slots with their reservation state.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Creneaux::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Creneaux::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Creneaux::TechnicianId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Creneaux::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Creneaux::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Creneaux::Reserved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Creneaux::JobId).string())
                    .col(
                        ColumnDef::new(Creneaux::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_creneaux_technician")
                    .table(Creneaux::Table)
                    .col(Creneaux::TechnicianId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_creneaux_start_time")
                    .table(Creneaux::Table)
                    .col(Creneaux::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_creneaux_reserved")
                    .table(Creneaux::Table)
                    .col(Creneaux::Reserved)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Creneaux::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Creneaux {
    Table,
    Id,
    TechnicianId,
    StartTime,
    EndTime,
    Reserved,
    JobId,
    CreatedAt,
}
