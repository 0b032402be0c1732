//! Gardening tip entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tip category shown as a filter chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TipCategory {
    #[sea_orm(string_value = "Watering")]
    Watering,
    #[sea_orm(string_value = "Planting")]
    Planting,
    #[sea_orm(string_value = "Soil Care")]
    #[serde(rename = "Soil Care")]
    SoilCare,
    #[sea_orm(string_value = "Maintenance")]
    Maintenance,
    #[sea_orm(string_value = "Nutrition")]
    Nutrition,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "learning_tip")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category: TipCategory,

    /// Client-side icon name
    pub icon_key: String,

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
