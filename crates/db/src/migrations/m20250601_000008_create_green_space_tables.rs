//! Create green_space and upload tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GreenSpace::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GreenSpace::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GreenSpace::Name).string_len(256).not_null())
                    .col(ColumnDef::new(GreenSpace::Polygon).json_binary().not_null())
                    .col(
                        ColumnDef::new(GreenSpace::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GreenSpace::TotalUploads)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GreenSpace::HealthyUploads)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(GreenSpace::HealthIndex).double())
                    .col(ColumnDef::new(GreenSpace::LastPrediction).string_len(128))
                    .col(ColumnDef::new(GreenSpace::LastConfidence).double())
                    .col(ColumnDef::new(GreenSpace::LastStatus).string_len(32))
                    .col(ColumnDef::new(GreenSpace::PhotoUrl).string_len(1024))
                    .col(ColumnDef::new(GreenSpace::CreatedBy).string_len(32).not_null())
                    .col(
                        ColumnDef::new(GreenSpace::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(GreenSpace::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Upload::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Upload::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Upload::GreenSpaceId).string_len(32).not_null())
                    .col(ColumnDef::new(Upload::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Upload::PredictedClass).string_len(128).not_null())
                    .col(ColumnDef::new(Upload::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Upload::ObservationStatus).string_len(16).not_null())
                    .col(ColumnDef::new(Upload::SummaryHealthy).integer().not_null().default(0))
                    .col(ColumnDef::new(Upload::SummaryDiseased).integer().not_null().default(0))
                    .col(ColumnDef::new(Upload::SummaryTotal).integer().not_null().default(0))
                    .col(ColumnDef::new(Upload::PhotoHealth).double())
                    .col(ColumnDef::new(Upload::Confidence).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Upload::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_upload_green_space")
                            .from(Upload::Table, Upload::GreenSpaceId)
                            .to(GreenSpace::Table, GreenSpace::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_upload_user")
                            .from(Upload::Table, Upload::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: created_at (leaderboard window scans)
        manager
            .create_index(
                Index::create()
                    .name("idx_upload_created_at")
                    .table(Upload::Table)
                    .col(Upload::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, created_at) for per-user counts
        manager
            .create_index(
                Index::create()
                    .name("idx_upload_user_created_at")
                    .table(Upload::Table)
                    .col(Upload::UserId)
                    .col(Upload::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Upload::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GreenSpace::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GreenSpace {
    Table,
    Id,
    Name,
    Polygon,
    IsActive,
    TotalUploads,
    HealthyUploads,
    HealthIndex,
    LastPrediction,
    LastConfidence,
    LastStatus,
    PhotoUrl,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Upload {
    Table,
    Id,
    GreenSpaceId,
    UserId,
    PredictedClass,
    Status,
    ObservationStatus,
    SummaryHealthy,
    SummaryDiseased,
    SummaryTotal,
    PhotoHealth,
    Confidence,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
