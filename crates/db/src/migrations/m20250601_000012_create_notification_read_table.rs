//! Create notification_read table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationRead::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationRead::NotificationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(NotificationRead::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(NotificationRead::ReadAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_notification_read")
                            .col(NotificationRead::NotificationId)
                            .col(NotificationRead::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_read_notification")
                            .from(NotificationRead::Table, NotificationRead::NotificationId)
                            .to(Notification::Table, Notification::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_read_user")
                            .from(NotificationRead::Table, NotificationRead::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_read_user")
                    .table(NotificationRead::Table)
                    .col(NotificationRead::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationRead::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum NotificationRead {
    Table,
    NotificationId,
    UserId,
    ReadAt,
}

#[derive(Iden)]
enum Notification {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
