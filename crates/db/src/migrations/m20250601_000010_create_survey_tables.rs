//! Create survey tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Survey::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Survey::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Survey::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Survey::Description).text().not_null())
                    .col(
                        ColumnDef::new(Survey::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Survey::IsVisible)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Survey::CreatedBy).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Survey::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Survey::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SurveyQuestion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyQuestion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SurveyQuestion::SurveyId).string_len(32).not_null())
                    .col(ColumnDef::new(SurveyQuestion::Position).integer().not_null())
                    .col(ColumnDef::new(SurveyQuestion::Text).text().not_null())
                    .col(ColumnDef::new(SurveyQuestion::QuestionType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(SurveyQuestion::Options)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_survey_question_survey")
                            .from(SurveyQuestion::Table, SurveyQuestion::SurveyId)
                            .to(Survey::Table, Survey::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_survey_question_survey_position")
                    .table(SurveyQuestion::Table)
                    .col(SurveyQuestion::SurveyId)
                    .col(SurveyQuestion::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SurveyResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyResponse::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SurveyResponse::SurveyId).string_len(32).not_null())
                    .col(ColumnDef::new(SurveyResponse::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(SurveyResponse::Answers).json_binary().not_null())
                    .col(
                        ColumnDef::new(SurveyResponse::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_survey_response_survey")
                            .from(SurveyResponse::Table, SurveyResponse::SurveyId)
                            .to(Survey::Table, Survey::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_survey_response_user")
                            .from(SurveyResponse::Table, SurveyResponse::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one response per user per survey
        manager
            .create_index(
                Index::create()
                    .name("idx_survey_response_survey_user")
                    .table(SurveyResponse::Table)
                    .col(SurveyResponse::SurveyId)
                    .col(SurveyResponse::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SurveyResponse::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SurveyQuestion::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Survey::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Survey {
    Table,
    Id,
    Title,
    Description,
    IsPublished,
    IsVisible,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SurveyQuestion {
    Table,
    Id,
    SurveyId,
    Position,
    Text,
    QuestionType,
    Options,
}

#[derive(Iden)]
enum SurveyResponse {
    Table,
    Id,
    SurveyId,
    UserId,
    Answers,
    SubmittedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
