//! Learning resource entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Resource format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ResourceType {
    #[sea_orm(string_value = "Guide")]
    Guide,
    #[sea_orm(string_value = "Video Course")]
    #[serde(rename = "Video Course")]
    VideoCourse,
    #[sea_orm(string_value = "Reference")]
    Reference,
}

/// Intended audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Difficulty {
    #[sea_orm(string_value = "Beginner")]
    Beginner,
    #[sea_orm(string_value = "Intermediate")]
    Intermediate,
    #[sea_orm(string_value = "Advanced")]
    Advanced,
    #[sea_orm(string_value = "All levels")]
    #[serde(rename = "All levels")]
    AllLevels,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "learning_resource")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    pub icon_key: String,

    /// Body shown when the resource is opened
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Free-form, e.g. "10 min read"
    pub duration: String,

    pub difficulty: Difficulty,

    #[sea_orm(nullable)]
    pub created_by_id: Option<String>,

    #[sea_orm(nullable)]
    pub created_by_name: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
