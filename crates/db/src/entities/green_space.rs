//! Green space entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "green_space")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// `[{"lat": .., "lng": ..}, ..]`
    #[sea_orm(column_type = "JsonBinary")]
    pub polygon: Json,

    /// Soft-delete flag
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(default_value = 0)]
    pub total_uploads: i32,

    #[sea_orm(default_value = 0)]
    pub healthy_uploads: i32,

    /// healthy_uploads / total_uploads
    #[sea_orm(nullable)]
    pub health_index: Option<f64>,

    #[sea_orm(nullable)]
    pub last_prediction: Option<String>,

    #[sea_orm(nullable)]
    pub last_confidence: Option<f64>,

    #[sea_orm(nullable)]
    pub last_status: Option<String>,

    #[sea_orm(nullable)]
    pub photo_url: Option<String>,

    pub created_by: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::upload::Entity")]
    Upload,
}

impl Related<super::upload::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Upload.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
