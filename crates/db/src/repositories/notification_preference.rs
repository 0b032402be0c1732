//! Notification preference repository.

use std::sync::Arc;

use crate::entities::{NotificationPreference, notification_preference};
use florai_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Notification preference repository for database operations.
#[derive(Clone)]
pub struct NotificationPreferenceRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationPreferenceRepository {
    /// Create a new notification preference repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's preferences.
    pub async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> AppResult<Option<notification_preference::Model>> {
        NotificationPreference::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find preferences for many users at once.
    pub async fn find_by_user_ids(
        &self,
        user_ids: &[String],
    ) -> AppResult<Vec<notification_preference::Model>> {
        use sea_orm::{ColumnTrait, QueryFilter};

        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        NotificationPreference::find()
            .filter(notification_preference::Column::UserId.is_in(user_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a preferences row.
    pub async fn create(
        &self,
        model: notification_preference::ActiveModel,
    ) -> AppResult<notification_preference::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a preferences row.
    pub async fn update(
        &self,
        model: notification_preference::ActiveModel,
    ) -> AppResult<notification_preference::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
