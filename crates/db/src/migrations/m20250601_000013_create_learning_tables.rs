//! Create learning_tip and learning_resource tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LearningTip::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LearningTip::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LearningTip::Title).string_len(200).not_null())
                    .col(ColumnDef::new(LearningTip::Description).text().not_null())
                    .col(ColumnDef::new(LearningTip::Category).string_len(16).not_null())
                    .col(ColumnDef::new(LearningTip::IconKey).string_len(64).not_null())
                    .col(ColumnDef::new(LearningTip::CreatedById).string_len(32))
                    .col(ColumnDef::new(LearningTip::CreatedByName).string_len(256))
                    .col(
                        ColumnDef::new(LearningTip::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(LearningTip::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_learning_tip_created_at")
                    .table(LearningTip::Table)
                    .col(LearningTip::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LearningResource::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LearningResource::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LearningResource::Title).string_len(200).not_null())
                    .col(ColumnDef::new(LearningResource::Description).text().not_null())
                    .col(
                        ColumnDef::new(LearningResource::ResourceType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LearningResource::IconKey).string_len(64).not_null())
                    .col(ColumnDef::new(LearningResource::Content).text().not_null())
                    .col(ColumnDef::new(LearningResource::Duration).string_len(64).not_null())
                    .col(
                        ColumnDef::new(LearningResource::Difficulty)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LearningResource::CreatedById).string_len(32))
                    .col(ColumnDef::new(LearningResource::CreatedByName).string_len(256))
                    .col(
                        ColumnDef::new(LearningResource::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(LearningResource::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_learning_resource_created_at")
                    .table(LearningResource::Table)
                    .col(LearningResource::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LearningResource::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LearningTip::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LearningTip {
    Table,
    Id,
    Title,
    Description,
    Category,
    IconKey,
    CreatedById,
    CreatedByName,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum LearningResource {
    Table,
    Id,
    Title,
    Description,
    ResourceType,
    IconKey,
    Content,
    Duration,
    Difficulty,
    CreatedById,
    CreatedByName,
    CreatedAt,
    UpdatedAt,
}
