//! Diary entry entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How the user's plant looked that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PlantCondition {
    #[sea_orm(string_value = "Healthy")]
    Healthy,
    #[sea_orm(string_value = "A bit dry")]
    #[serde(rename = "A bit dry")]
    ABitDry,
    #[sea_orm(string_value = "Diseased")]
    Diseased,
    #[sea_orm(string_value = "Not sure")]
    #[serde(rename = "Not sure")]
    NotSure,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "diary_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    /// One entry per user per day
    pub date: Date,

    #[sea_orm(nullable)]
    pub title: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_favourite: bool,

    #[sea_orm(nullable)]
    pub plant_name: Option<String>,

    #[sea_orm(nullable)]
    pub plant_condition: Option<PlantCondition>,

    #[sea_orm(column_type = "Text", nullable)]
    pub plant_notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
