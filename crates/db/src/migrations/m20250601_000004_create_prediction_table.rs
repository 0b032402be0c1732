//! Create prediction table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prediction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prediction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prediction::UserId).string_len(32))
                    .col(ColumnDef::new(Prediction::Latitude).double().not_null())
                    .col(ColumnDef::new(Prediction::Longitude).double().not_null())
                    .col(ColumnDef::new(Prediction::Temperature).double().not_null())
                    .col(ColumnDef::new(Prediction::Rainfall).double().not_null())
                    .col(ColumnDef::new(Prediction::Humidity).double().not_null())
                    .col(ColumnDef::new(Prediction::RiskLevel).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Prediction::SpreadDistanceKm)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Prediction::SpreadDirectionDeg)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Prediction::ExternalId).string_len(128))
                    .col(
                        ColumnDef::new(Prediction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prediction_user")
                            .from(Prediction::Table, Prediction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Prediction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Prediction {
    Table,
    Id,
    UserId,
    Latitude,
    Longitude,
    Temperature,
    Rainfall,
    Humidity,
    RiskLevel,
    SpreadDistanceKm,
    SpreadDirectionDeg,
    ExternalId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
