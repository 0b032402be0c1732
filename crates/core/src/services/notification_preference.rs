//! Notification preference service.

use florai_common::AppResult;
use florai_db::{
    entities::{
        notification_preference::{self, Frequency, MinSeverity},
        prediction::RiskLevel,
    },
    repositories::NotificationPreferenceRepository,
};
use sea_orm::Set;
use serde::Deserialize;

/// Partial update of a user's preferences.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesInput {
    pub enable_ai_alerts: Option<bool>,
    pub min_severity: Option<MinSeverity>,
    pub channel_in_app: Option<bool>,
    pub channel_email: Option<bool>,
    pub frequency: Option<Frequency>,
}

/// Notification preference service.
#[derive(Clone)]
pub struct NotificationPreferenceService {
    repo: NotificationPreferenceRepository,
}

impl NotificationPreferenceService {
    /// Create a new notification preference service.
    #[must_use]
    pub const fn new(repo: NotificationPreferenceRepository) -> Self {
        Self { repo }
    }

    /// Load a user's preferences, storing the defaults on first read.
    pub async fn get_or_create(&self, user_id: &str) -> AppResult<notification_preference::Model> {
        if let Some(prefs) = self.repo.find_by_user_id(user_id).await? {
            return Ok(prefs);
        }

        self.repo.create(default_row(user_id)).await
    }

    /// Apply a partial update, creating the row when missing.
    pub async fn update(
        &self,
        user_id: &str,
        input: UpdatePreferencesInput,
    ) -> AppResult<notification_preference::Model> {
        let existing = self.repo.find_by_user_id(user_id).await?;
        let is_new = existing.is_none();

        let mut active: notification_preference::ActiveModel = match existing {
            Some(prefs) => prefs.into(),
            None => default_row(user_id),
        };

        if let Some(v) = input.enable_ai_alerts {
            active.enable_ai_alerts = Set(v);
        }
        if let Some(v) = input.min_severity {
            active.min_severity = Set(v);
        }
        if let Some(v) = input.channel_in_app {
            active.channel_in_app = Set(v);
        }
        if let Some(v) = input.channel_email {
            active.channel_email = Set(v);
        }
        if let Some(v) = input.frequency {
            active.frequency = Set(v);
        }
        active.last_updated = Set(chrono::Utc::now().into());

        if is_new {
            self.repo.create(active).await
        } else {
            self.repo.update(active).await
        }
    }
}

/// Whether an alert of `risk` may be raised for a user with `prefs`.
#[must_use]
pub fn allows_alert(prefs: &notification_preference::Model, risk: RiskLevel) -> bool {
    prefs.enable_ai_alerts && prefs.channel_in_app && risk.rank() >= prefs.min_severity.rank()
}

/// In-memory defaults, used when a row has not been stored yet.
#[must_use]
pub fn default_preferences(user_id: &str) -> notification_preference::Model {
    notification_preference::Model {
        user_id: user_id.to_string(),
        enable_ai_alerts: true,
        min_severity: MinSeverity::Medium,
        channel_in_app: true,
        channel_email: false,
        frequency: Frequency::Realtime,
        last_updated: chrono::Utc::now().into(),
    }
}

fn default_row(user_id: &str) -> notification_preference::ActiveModel {
    let defaults = default_preferences(user_id);
    notification_preference::ActiveModel {
        user_id: Set(defaults.user_id),
        enable_ai_alerts: Set(defaults.enable_ai_alerts),
        min_severity: Set(defaults.min_severity),
        channel_in_app: Set(defaults.channel_in_app),
        channel_email: Set(defaults.channel_email),
        frequency: Set(defaults.frequency),
        last_updated: Set(defaults.last_updated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[test]
    fn test_allows_alert() {
        let mut prefs = default_preferences("u1");
        assert!(!allows_alert(&prefs, RiskLevel::Low));
        assert!(allows_alert(&prefs, RiskLevel::Medium));
        assert!(allows_alert(&prefs, RiskLevel::High));

        prefs.channel_in_app = false;
        assert!(!allows_alert(&prefs, RiskLevel::High));

        prefs.channel_in_app = true;
        prefs.enable_ai_alerts = false;
        assert!(!allows_alert(&prefs, RiskLevel::High));
    }

    #[tokio::test]
    async fn test_get_or_create_stores_defaults() {
        let stored = default_preferences("u1");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification_preference::Model>::new()])
                .append_query_results([[stored.clone()]])
                .into_connection(),
        );

        let service =
            NotificationPreferenceService::new(NotificationPreferenceRepository::new(db));
        let prefs = service.get_or_create("u1").await.unwrap();
        assert_eq!(prefs.min_severity, MinSeverity::Medium);
        assert!(prefs.channel_in_app);
        assert!(!prefs.channel_email);
    }

    #[tokio::test]
    async fn test_update_existing() {
        let existing = default_preferences("u1");
        let mut updated = existing.clone();
        updated.min_severity = MinSeverity::High;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let service =
            NotificationPreferenceService::new(NotificationPreferenceRepository::new(db));
        let prefs = service
            .update(
                "u1",
                UpdatePreferencesInput {
                    min_severity: Some(MinSeverity::High),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(prefs.min_severity, MinSeverity::High);
    }
}
