//! Create forum tables migration (posts, replies, likes, fingerprints).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Post::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Post::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Post::AuthorName).string_len(256).not_null())
                    .col(ColumnDef::new(Post::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Post::Content).text().not_null())
                    .col(
                        ColumnDef::new(Post::Tags)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Post::Views).integer().not_null().default(0))
                    .col(ColumnDef::new(Post::Likes).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Post::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Post::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_user")
                            .from(Post::Table, Post::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_created_at")
                    .table(Post::Table)
                    .col(Post::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostReply::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostReply::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostReply::PostId).string_len(32).not_null())
                    .col(ColumnDef::new(PostReply::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(PostReply::Name).string_len(256).not_null())
                    .col(ColumnDef::new(PostReply::Text).text().not_null())
                    .col(ColumnDef::new(PostReply::AvatarUrl).string_len(1024))
                    .col(
                        ColumnDef::new(PostReply::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_reply_post")
                            .from(PostReply::Table, PostReply::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_reply_post_id")
                    .table(PostReply::Table)
                    .col(PostReply::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostLike::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostLike::PostId).string_len(32).not_null())
                    .col(ColumnDef::new(PostLike::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(PostLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_post_like")
                            .col(PostLike::PostId)
                            .col(PostLike::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_like_post")
                            .from(PostLike::Table, PostLike::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostFingerprint::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostFingerprint::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(PostFingerprint::Hash).string_len(64).not_null())
                    .col(ColumnDef::new(PostFingerprint::PostId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(PostFingerprint::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_post_fingerprint")
                            .col(PostFingerprint::Kind)
                            .col(PostFingerprint::Hash),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_fingerprint_post")
                            .from(PostFingerprint::Table, PostFingerprint::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostFingerprint::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostReply::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
    UserId,
    AuthorName,
    Title,
    Content,
    Tags,
    Views,
    Likes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PostReply {
    Table,
    Id,
    PostId,
    UserId,
    Name,
    Text,
    AvatarUrl,
    CreatedAt,
}

#[derive(Iden)]
enum PostLike {
    Table,
    PostId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum PostFingerprint {
    Table,
    Kind,
    Hash,
    PostId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
