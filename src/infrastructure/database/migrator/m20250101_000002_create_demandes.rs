//! Create demandes table
//!
//! Stores client appointment requests and their workflow state.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Demandes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Demandes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Demandes::ComplaintId).big_integer())
                    .col(
                        ColumnDef::new(Demandes::ClientId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Demandes::SlotId).string())
                    .col(ColumnDef::new(Demandes::Motive).string().not_null())
                    .col(ColumnDef::new(Demandes::DesiredDate).date())
                    .col(ColumnDef::new(Demandes::TimePreference).string())
                    .col(
                        ColumnDef::new(Demandes::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Demandes::Comment).string())
                    .col(
                        ColumnDef::new(Demandes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Demandes::ProcessedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_demandes_client")
                    .table(Demandes::Table)
                    .col(Demandes::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_demandes_status")
                    .table(Demandes::Table)
                    .col(Demandes::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Demandes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Demandes {
    Table,
    Id,
    ComplaintId,
    ClientId,
    SlotId,
    Motive,
    DesiredDate,
    TimePreference,
    Status,
    Comment,
    CreatedAt,
    ProcessedAt,
}
