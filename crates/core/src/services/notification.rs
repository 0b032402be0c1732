//! Notification service.

use std::collections::HashMap;

use florai_common::{AppError, AppResult, IdGenerator};
use florai_db::{
    entities::{
        notification::{self, NotificationType},
        notification_preference, prediction,
        prediction::RiskLevel,
        report,
    },
    repositories::{
        NotificationPreferenceRepository, NotificationRepository, PredictionRepository,
        ReportRepository,
    },
};
use sea_orm::Set;
use serde::Serialize;

use super::notification_preference::default_preferences;

/// Input for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotificationInput {
    pub notification_type: NotificationType,
    pub description: String,
    /// Owner; `None` only for broadcast alerts.
    pub user_id: Option<String>,
    pub admin_id: Option<String>,
    pub prediction_id: Option<String>,
    pub report_id: Option<String>,
}

/// Prediction attached to a listed notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionSummary {
    pub id: String,
    pub risk_level: RiskLevel,
    pub spread_distance_km: f64,
    pub spread_direction_deg: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Report attached to a listed notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: String,
    pub target_type: report::ReportTargetType,
    pub target_id: String,
    pub reason: String,
    pub status: report::ReportStatus,
}

/// A notification as shown in a user's feed.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: notification::Model,
    pub prediction: Option<PredictionSummary>,
    pub report: Option<ReportSummary>,
}

/// Notification service.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    preference_repo: NotificationPreferenceRepository,
    prediction_repo: PredictionRepository,
    report_repo: ReportRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(
        notification_repo: NotificationRepository,
        preference_repo: NotificationPreferenceRepository,
        prediction_repo: PredictionRepository,
        report_repo: ReportRepository,
    ) -> Self {
        Self {
            notification_repo,
            preference_repo,
            prediction_repo,
            report_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Store a notification.
    pub async fn create(&self, input: CreateNotificationInput) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            notification_type: Set(input.notification_type),
            description: Set(input.description),
            is_read: Set(false),
            receive_notifications: Set(true),
            user_id: Set(input.user_id),
            admin_id: Set(input.admin_id),
            prediction_id: Set(input.prediction_id),
            report_id: Set(input.report_id),
            latitude: Set(None),
            longitude: Set(None),
            temperature: Set(None),
            rainfall: Set(None),
            humidity: Set(None),
            predicted_spread: Set(None),
            predicted_risk: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// Store an AI alert carrying a snapshot of `prediction`.
    pub async fn create_ai_alert(
        &self,
        user_id: &str,
        prediction: &prediction::Model,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            notification_type: Set(NotificationType::AiAlert),
            description: Set(format!(
                "AI detected {} risk spread near your area.",
                prediction.risk_level.as_str()
            )),
            is_read: Set(false),
            receive_notifications: Set(true),
            user_id: Set(Some(user_id.to_string())),
            admin_id: Set(None),
            prediction_id: Set(Some(prediction.id.clone())),
            report_id: Set(None),
            latitude: Set(Some(prediction.latitude)),
            longitude: Set(Some(prediction.longitude)),
            temperature: Set(Some(prediction.temperature)),
            rainfall: Set(Some(prediction.rainfall)),
            humidity: Set(Some(prediction.humidity)),
            predicted_spread: Set(Some(prediction.spread_distance_km)),
            predicted_risk: Set(Some(prediction.risk_level.as_str().to_string())),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.notification_repo.create(model).await?;
        tracing::info!(
            user_id = %user_id,
            risk = prediction.risk_level.as_str(),
            "Created AI alert"
        );
        Ok(created)
    }

    /// A user's feed: own notifications plus broadcasts, filtered by preferences.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<NotificationView>> {
        let prefs = self
            .preference_repo
            .find_by_user_id(user_id)
            .await?
            .unwrap_or_else(|| default_preferences(user_id));

        if !prefs.enable_ai_alerts || !prefs.channel_in_app {
            return Ok(vec![]);
        }

        let mut notifications = self.notification_repo.find_feed(user_id).await?;
        let read_broadcasts = self
            .notification_repo
            .find_read_broadcast_ids(user_id)
            .await?;
        for n in &mut notifications {
            if read_broadcasts.contains(&n.id) {
                n.is_read = true;
            }
        }

        let prediction_ids = collect_ids(&notifications, |n| n.prediction_id.as_ref());
        let report_ids = collect_ids(&notifications, |n| n.report_id.as_ref());

        let predictions: HashMap<String, prediction::Model> = self
            .prediction_repo
            .find_by_ids(&prediction_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
        let reports: HashMap<String, report::Model> = self
            .report_repo
            .find_by_ids(&report_ids)
            .await?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        Ok(build_feed(&prefs, notifications, &predictions, &reports))
    }

    /// Report notifications addressed to an admin.
    pub async fn list_admin_reports(&self, admin_id: &str) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_admin_reports(admin_id).await
    }

    /// Mark one of the user's notifications, or a broadcast alert, as read.
    ///
    /// Broadcasts are marked for this user only.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        let updated = self
            .notification_repo
            .mark_as_read(user_id, notification_id)
            .await?;

        if updated == 0
            && !self
                .notification_repo
                .mark_broadcast_read(user_id, notification_id)
                .await?
        {
            return Err(AppError::NotFound(format!(
                "Notification not found: {notification_id}"
            )));
        }
        Ok(())
    }

    /// Mark every notification of the user as read.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Number of unread notifications.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}

fn collect_ids<F>(notifications: &[notification::Model], field: F) -> Vec<String>
where
    F: Fn(&notification::Model) -> Option<&String>,
{
    let mut ids: Vec<String> = notifications.iter().filter_map(field).cloned().collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Severity gate for AI alerts. Only the risk stored on the notification
/// itself counts; alerts without one always pass.
fn meets_min_severity(n: &notification::Model, min_rank: u8) -> bool {
    if n.notification_type != NotificationType::AiAlert {
        return true;
    }
    n.predicted_risk.as_deref().is_none_or(|risk| {
        RiskLevel::parse(risk).map_or(0, RiskLevel::rank) >= min_rank
    })
}

/// Apply preference filtering and attach related records.
///
/// `notifications` must already be ordered newest first.
#[must_use]
pub fn build_feed(
    prefs: &notification_preference::Model,
    notifications: Vec<notification::Model>,
    predictions: &HashMap<String, prediction::Model>,
    reports: &HashMap<String, report::Model>,
) -> Vec<NotificationView> {
    let min_rank = prefs.min_severity.rank();

    notifications
        .into_iter()
        .filter(|n| n.receive_notifications)
        .filter(|n| meets_min_severity(n, min_rank))
        .map(|mut n| {
            let linked = n.prediction_id.as_ref().and_then(|id| predictions.get(id));
            if let Some(p) = linked {
                n.latitude = n.latitude.or(Some(p.latitude));
                n.longitude = n.longitude.or(Some(p.longitude));
                n.temperature = n.temperature.or(Some(p.temperature));
                n.rainfall = n.rainfall.or(Some(p.rainfall));
                n.humidity = n.humidity.or(Some(p.humidity));
                n.predicted_spread = n.predicted_spread.or(Some(p.spread_distance_km));
                if n.predicted_risk.is_none() {
                    n.predicted_risk = Some(p.risk_level.as_str().to_string());
                }
            }

            let report = n
                .report_id
                .as_ref()
                .and_then(|id| reports.get(id))
                .map(|r| ReportSummary {
                    id: r.id.clone(),
                    target_type: r.target_type,
                    target_id: r.target_id.clone(),
                    reason: r.reason.clone(),
                    status: r.status,
                });

            NotificationView {
                prediction: linked.map(|p| PredictionSummary {
                    id: p.id.clone(),
                    risk_level: p.risk_level,
                    spread_distance_km: p.spread_distance_km,
                    spread_direction_deg: p.spread_direction_deg,
                    latitude: p.latitude,
                    longitude: p.longitude,
                }),
                report,
                notification: n,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use florai_db::entities::notification_preference::MinSeverity;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn note(id: &str, kind: NotificationType, risk: Option<&str>) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            notification_type: kind,
            description: "test".to_string(),
            is_read: false,
            receive_notifications: true,
            user_id: Some("u1".to_string()),
            admin_id: None,
            prediction_id: None,
            report_id: None,
            latitude: None,
            longitude: None,
            temperature: None,
            rainfall: None,
            humidity: None,
            predicted_spread: None,
            predicted_risk: risk.map(str::to_string),
            created_at: Utc::now().into(),
        }
    }

    fn prediction(id: &str, risk: RiskLevel) -> prediction::Model {
        prediction::Model {
            id: id.to_string(),
            user_id: Some("u1".to_string()),
            latitude: 1.5,
            longitude: 103.8,
            temperature: 30.0,
            rainfall: 2.0,
            humidity: 80.0,
            risk_level: risk,
            spread_distance_km: 3.0,
            spread_direction_deg: 90.0,
            external_id: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: DatabaseConnection) -> NotificationService {
        let db = Arc::new(db);
        NotificationService::new(
            NotificationRepository::new(db.clone()),
            NotificationPreferenceRepository::new(db.clone()),
            PredictionRepository::new(db.clone()),
            ReportRepository::new(db),
        )
    }

    #[test]
    fn test_build_feed_filters_by_severity() {
        let mut prefs = default_preferences("u1");
        prefs.min_severity = MinSeverity::High;

        let mut muted = note("n4", NotificationType::AiAlert, Some("High"));
        muted.receive_notifications = false;

        let feed = build_feed(
            &prefs,
            vec![
                note("n1", NotificationType::AiAlert, Some("High")),
                note("n2", NotificationType::AiAlert, Some("Medium")),
                note("n3", NotificationType::BroadcastAlert, None),
                muted,
                note("n5", NotificationType::AiAlert, None),
            ],
            &HashMap::new(),
            &HashMap::new(),
        );

        let ids: Vec<&str> = feed.iter().map(|v| v.notification.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n3", "n5"]);
    }

    #[test]
    fn test_build_feed_keeps_alert_without_risk() {
        let feed = build_feed(
            &default_preferences("u1"),
            vec![note("n1", NotificationType::AiAlert, None)],
            &HashMap::new(),
            &HashMap::new(),
        );

        assert_eq!(feed.len(), 1);
        assert!(feed[0].notification.predicted_risk.is_none());
    }

    #[test]
    fn test_build_feed_filters_before_prediction_fallback() {
        let mut prefs = default_preferences("u1");
        prefs.min_severity = MinSeverity::High;
        let mut alert = note("n1", NotificationType::AiAlert, None);
        alert.prediction_id = Some("p1".to_string());

        let predictions = HashMap::from([("p1".to_string(), prediction("p1", RiskLevel::Low))]);
        let feed = build_feed(&prefs, vec![alert], &predictions, &HashMap::new());

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].notification.predicted_risk.as_deref(), Some("Low"));
    }

    #[test]
    fn test_build_feed_falls_back_to_linked_prediction() {
        let prefs = default_preferences("u1");
        let mut alert = note("n1", NotificationType::AiAlert, None);
        alert.prediction_id = Some("p1".to_string());

        let predictions = HashMap::from([("p1".to_string(), prediction("p1", RiskLevel::High))]);
        let feed = build_feed(&prefs, vec![alert], &predictions, &HashMap::new());

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].notification.predicted_risk.as_deref(), Some("High"));
        assert_eq!(feed[0].notification.latitude, Some(1.5));
        assert_eq!(feed[0].prediction.as_ref().map(|p| p.id.as_str()), Some("p1"));
    }

    #[tokio::test]
    async fn test_list_for_user_with_alerts_disabled() {
        let mut prefs = default_preferences("u1");
        prefs.enable_ai_alerts = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[prefs]])
            .into_connection();

        assert!(service(db).list_for_user("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_as_read_owner() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        assert!(service(db).mark_as_read("u1", "n1").await.is_ok());
    }

    #[tokio::test]
    async fn test_mark_as_read_not_owner() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([Vec::<notification::Model>::new()])
            .into_connection();

        let result = service(db).mark_as_read("someone-else", "n1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_broadcast_as_read() {
        let mut broadcast = note("b1", NotificationType::BroadcastAlert, None);
        broadcast.user_id = None;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([[broadcast]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        assert!(service(db).mark_as_read("u1", "b1").await.is_ok());
    }
}
