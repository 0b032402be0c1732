//! Notification repository.

use std::sync::Arc;

use std::collections::HashSet;

use crate::entities::{
    Notification, NotificationRead, notification, notification::NotificationType,
    notification_read,
};
use florai_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
    sea_query::{OnConflict, Query},
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new notification.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A user's own notifications plus every broadcast alert, newest first.
    pub async fn find_feed(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(
                Condition::any()
                    .add(notification::Column::UserId.eq(user_id))
                    .add(
                        notification::Column::NotificationType
                            .eq(NotificationType::BroadcastAlert),
                    ),
            )
            .order_by_desc(notification::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Report notifications addressed to one admin, newest first.
    pub async fn find_admin_reports(&self, admin_id: &str) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::UserId.eq(admin_id))
            .filter(notification::Column::NotificationType.eq(NotificationType::UserReport))
            .order_by_desc(notification::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark one of the user's notifications as read.
    ///
    /// Returns the number of rows changed: 1, or 0 when the id is unknown or
    /// owned by someone else.
    pub async fn mark_as_read(&self, user_id: &str, id: &str) -> AppResult<u64> {
        let result = Notification::update_many()
            .col_expr(notification::Column::IsRead, true.into())
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Record that `user_id` has read a broadcast alert.
    ///
    /// Returns false when `id` is not a broadcast alert.
    pub async fn mark_broadcast_read(&self, user_id: &str, id: &str) -> AppResult<bool> {
        let broadcast = Notification::find_by_id(id)
            .filter(notification::Column::NotificationType.eq(NotificationType::BroadcastAlert))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if broadcast.is_none() {
            return Ok(false);
        }

        self.insert_read_markers(user_id, vec![id.to_string()])
            .await?;
        Ok(true)
    }

    /// Broadcast alerts `user_id` has read.
    pub async fn find_read_broadcast_ids(&self, user_id: &str) -> AppResult<HashSet<String>> {
        let markers = NotificationRead::find()
            .filter(notification_read::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(markers.into_iter().map(|m| m.notification_id).collect())
    }

    /// Mark all notifications as read for a user, broadcasts included.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        let result = Notification::update_many()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .col_expr(notification::Column::IsRead, true.into())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let unread: Vec<String> = unread_broadcasts(user_id)
            .select_only()
            .column(notification::Column::Id)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let marked = self.insert_read_markers(user_id, unread).await?;
        Ok(result.rows_affected + marked)
    }

    /// Count unread notifications for a user, broadcasts included.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        let own = Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .filter(notification::Column::ReceiveNotifications.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let broadcasts = unread_broadcasts(user_id)
            .filter(notification::Column::ReceiveNotifications.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(own + broadcasts)
    }

    async fn insert_read_markers(&self, user_id: &str, ids: Vec<String>) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now();
        let markers = ids.into_iter().map(|notification_id| notification_read::ActiveModel {
            notification_id: Set(notification_id),
            user_id: Set(user_id.to_string()),
            read_at: Set(now.into()),
        });

        NotificationRead::insert_many(markers)
            .on_conflict(
                OnConflict::columns([
                    notification_read::Column::NotificationId,
                    notification_read::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Broadcast alerts without a read marker for `user_id`.
fn unread_broadcasts(user_id: &str) -> Select<Notification> {
    Notification::find()
        .filter(notification::Column::NotificationType.eq(NotificationType::BroadcastAlert))
        .filter(
            notification::Column::Id.not_in_subquery(
                Query::select()
                    .column(notification_read::Column::NotificationId)
                    .from(NotificationRead)
                    .and_where(notification_read::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_mark_as_read_touches_one_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        assert_eq!(repo.mark_as_read("u1", "n1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_read_other_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        assert_eq!(repo.mark_as_read("intruder", "n1").await.unwrap(), 0);
    }

    fn broadcast(id: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            notification_type: NotificationType::BroadcastAlert,
            description: "Pest outbreak reported in the city park".to_string(),
            is_read: false,
            receive_notifications: true,
            user_id: None,
            admin_id: Some("a1".to_string()),
            prediction_id: None,
            report_id: None,
            latitude: None,
            longitude: None,
            temperature: None,
            rainfall: None,
            humidity: None,
            predicted_spread: None,
            predicted_risk: None,
            created_at: chrono::Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_mark_broadcast_read() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[broadcast("b1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        assert!(repo.mark_broadcast_read("u1", "b1").await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_broadcast_read_unknown_id() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification::Model>::new()])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        assert!(!repo.mark_broadcast_read("u1", "n1").await.unwrap());
    }
}
