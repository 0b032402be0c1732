//! Create notification table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Notification::NotificationType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notification::Description).text().not_null())
                    .col(
                        ColumnDef::new(Notification::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notification::ReceiveNotifications)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Notification::UserId).string_len(32))
                    .col(ColumnDef::new(Notification::AdminId).string_len(32))
                    .col(ColumnDef::new(Notification::PredictionId).string_len(32))
                    .col(ColumnDef::new(Notification::ReportId).string_len(32))
                    .col(ColumnDef::new(Notification::Latitude).double())
                    .col(ColumnDef::new(Notification::Longitude).double())
                    .col(ColumnDef::new(Notification::Temperature).double())
                    .col(ColumnDef::new(Notification::Rainfall).double())
                    .col(ColumnDef::new(Notification::Humidity).double())
                    .col(ColumnDef::new(Notification::PredictedSpread).double())
                    .col(ColumnDef::new(Notification::PredictedRisk).string_len(16))
                    .col(
                        ColumnDef::new(Notification::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_user")
                            .from(Notification::Table, Notification::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_prediction")
                            .from(Notification::Table, Notification::PredictionId)
                            .to(Prediction::Table, Prediction::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_report")
                            .from(Notification::Table, Notification::ReportId)
                            .to(Report::Table, Report::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, created_at) for a user's feed
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user_created_at")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .col(Notification::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, is_read) for unread count
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user_is_read")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .col(Notification::IsRead)
                    .to_owned(),
            )
            .await?;

        // Index: notification_type for broadcast lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_type")
                    .table(Notification::Table)
                    .col(Notification::NotificationType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Notification {
    Table,
    Id,
    NotificationType,
    Description,
    IsRead,
    ReceiveNotifications,
    UserId,
    AdminId,
    PredictionId,
    ReportId,
    Latitude,
    Longitude,
    Temperature,
    Rainfall,
    Humidity,
    PredictedSpread,
    PredictedRisk,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Prediction {
    Table,
    Id,
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
}
