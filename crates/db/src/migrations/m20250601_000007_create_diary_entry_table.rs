//! Create diary_entry table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DiaryEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiaryEntry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiaryEntry::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(DiaryEntry::Date).date().not_null())
                    .col(ColumnDef::new(DiaryEntry::Title).string_len(256))
                    .col(ColumnDef::new(DiaryEntry::Text).text().not_null())
                    .col(ColumnDef::new(DiaryEntry::ImageUrl).string_len(1024))
                    .col(
                        ColumnDef::new(DiaryEntry::IsFavourite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(DiaryEntry::PlantName).string_len(256))
                    .col(ColumnDef::new(DiaryEntry::PlantCondition).string_len(16))
                    .col(ColumnDef::new(DiaryEntry::PlantNotes).text())
                    .col(
                        ColumnDef::new(DiaryEntry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(DiaryEntry::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_diary_entry_user")
                            .from(DiaryEntry::Table, DiaryEntry::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one entry per user per day
        manager
            .create_index(
                Index::create()
                    .name("idx_diary_entry_user_date")
                    .table(DiaryEntry::Table)
                    .col(DiaryEntry::UserId)
                    .col(DiaryEntry::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiaryEntry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DiaryEntry {
    Table,
    Id,
    UserId,
    Date,
    Title,
    Text,
    ImageUrl,
    IsFavourite,
    PlantName,
    PlantCondition,
    PlantNotes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
