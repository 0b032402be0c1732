//! Photo upload entity.
//!
//! The photo itself is not kept; only what the model said about it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Observation derived from the detections in one photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ObservationStatus {
    #[sea_orm(string_value = "Healthy")]
    Healthy,
    #[sea_orm(string_value = "Diseased")]
    Diseased,
    #[sea_orm(string_value = "Unknown")]
    Unknown,
}

impl ObservationStatus {
    /// Observation for a photo with the given detection counts.
    #[must_use]
    pub const fn from_counts(healthy: u32, diseased: u32) -> Self {
        if healthy + diseased == 0 {
            Self::Unknown
        } else if diseased > 0 {
            Self::Diseased
        } else {
            Self::Healthy
        }
    }

    /// Whether this observation moves a green space's health index.
    #[must_use]
    pub const fn is_conclusive(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Label stored on the green space.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Diseased => "Diseased",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "upload")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub green_space_id: String,

    pub user_id: String,

    pub predicted_class: String,

    /// Photo health level (Healthy, Moderate, Unhealthy, Unknown)
    pub status: String,

    pub observation_status: ObservationStatus,

    pub summary_healthy: i32,
    pub summary_diseased: i32,
    pub summary_total: i32,

    #[sea_orm(nullable)]
    pub photo_health: Option<f64>,

    pub confidence: f64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::green_space::Entity",
        from = "Column::GreenSpaceId",
        to = "super::green_space::Column::Id",
        on_delete = "Cascade"
    )]
    GreenSpace,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::green_space::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GreenSpace.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_from_counts() {
        assert_eq!(ObservationStatus::from_counts(0, 0), ObservationStatus::Unknown);
        assert_eq!(ObservationStatus::from_counts(3, 0), ObservationStatus::Healthy);
        assert_eq!(ObservationStatus::from_counts(3, 1), ObservationStatus::Diseased);
        assert_eq!(ObservationStatus::from_counts(0, 2), ObservationStatus::Diseased);
    }
}
