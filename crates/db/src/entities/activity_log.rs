//! Admin activity log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    #[sea_orm(string_value = "create")]
    Create,
    #[sea_orm(string_value = "update")]
    Update,
    #[sea_orm(string_value = "delete")]
    Delete,
}

/// What it happened to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntityKind {
    /// A green space drawn on the map.
    #[sea_orm(string_value = "map")]
    #[serde(rename = "map")]
    Map,
    #[sea_orm(string_value = "user")]
    #[serde(rename = "user")]
    User,
    #[sea_orm(string_value = "survey")]
    #[serde(rename = "survey")]
    Survey,
    #[sea_orm(string_value = "forumPost")]
    #[serde(rename = "forumPost")]
    ForumPost,
    #[sea_orm(string_value = "learningTip")]
    #[serde(rename = "learningTip")]
    LearningTip,
    #[sea_orm(string_value = "learningResource")]
    #[serde(rename = "learningResource")]
    LearningResource,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub action: ActivityAction,

    pub entity_type: EntityKind,

    pub entity_id: String,

    #[sea_orm(nullable)]
    pub entity_title: Option<String>,

    #[sea_orm(nullable)]
    pub actor_id: Option<String>,

    #[sea_orm(nullable)]
    pub actor_name: Option<String>,

    /// Snapshot of a deleted record
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub deleted_data: Option<Json>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
