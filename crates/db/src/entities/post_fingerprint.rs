//! Uniqueness keys for forum titles and bodies.
//!
//! Each post owns one `title` and one `content` fingerprint: the SHA-256 of
//! the normalized text. The primary key rejects a second post with the same
//! normalized title or body.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which field a fingerprint covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FingerprintKind {
    #[sea_orm(string_value = "title")]
    Title,
    #[sea_orm(string_value = "content")]
    Content,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post_fingerprint")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: FingerprintKind,

    /// Hex SHA-256 of the normalized text
    #[sea_orm(primary_key, auto_increment = false)]
    pub hash: String,

    pub post_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
}

impl ActiveModelBehavior for ActiveModel {}
