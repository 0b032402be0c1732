//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Spread risk detected near the user.
    #[sea_orm(string_value = "ai_alert")]
    AiAlert,
    /// A new report for an admin to review.
    #[sea_orm(string_value = "user_report")]
    UserReport,
    /// Shown to every user; has no owner.
    #[sea_orm(string_value = "broadcast_alert")]
    BroadcastAlert,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub notification_type: NotificationType,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(default_value = false)]
    pub is_read: bool,

    /// Muted notifications are kept but never listed
    #[sea_orm(default_value = true)]
    pub receive_notifications: bool,

    /// Owner. NULL only for broadcast alerts.
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    /// Admin the report notification was addressed to
    #[sea_orm(nullable)]
    pub admin_id: Option<String>,

    #[sea_orm(nullable)]
    pub prediction_id: Option<String>,

    #[sea_orm(nullable)]
    pub report_id: Option<String>,

    // Snapshot of the prediction at alert time
    #[sea_orm(nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(nullable)]
    pub longitude: Option<f64>,
    #[sea_orm(nullable)]
    pub temperature: Option<f64>,
    #[sea_orm(nullable)]
    pub rainfall: Option<f64>,
    #[sea_orm(nullable)]
    pub humidity: Option<f64>,
    #[sea_orm(nullable)]
    pub predicted_spread: Option<f64>,
    #[sea_orm(nullable)]
    pub predicted_risk: Option<String>,

    pub created_at: DateTimeWithTimeZone,
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

    #[sea_orm(
        belongs_to = "super::prediction::Entity",
        from = "Column::PredictionId",
        to = "super::prediction::Column::Id",
        on_delete = "SetNull"
    )]
    Prediction,

    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::ReportId",
        to = "super::report::Column::Id",
        on_delete = "SetNull"
    )]
    Report,
}

impl Related<super::prediction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prediction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_joins_linked_prediction() {
        let sql = Entity::find()
            .find_also_related(crate::entities::prediction::Entity)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"LEFT JOIN "prediction""#));
    }
}
