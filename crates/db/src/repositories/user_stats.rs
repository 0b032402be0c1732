//! User stats repository.

use std::sync::Arc;

use crate::entities::{UserStats, user_stats};
use florai_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::OnConflict,
};

/// User stats repository for database operations.
#[derive(Clone)]
pub struct UserStatsRepository {
    db: Arc<DatabaseConnection>,
}

impl UserStatsRepository {
    /// Create a new user stats repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find stats for a user.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<user_stats::Model>> {
        UserStats::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a stats row.
    pub async fn create(&self, model: user_stats::ActiveModel) -> AppResult<user_stats::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a stats row.
    pub async fn update(&self, model: user_stats::ActiveModel) -> AppResult<user_stats::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Read-modify-write a user's row under a row lock.
    ///
    /// A missing row is created first, so concurrent first actions by the
    /// same user queue on the same lock instead of racing two inserts.
    /// `apply` returns `None` to leave the row unchanged.
    pub async fn update_locked<F>(&self, user_id: &str, apply: F) -> AppResult<user_stats::Model>
    where
        F: FnOnce(&user_stats::Model) -> Option<user_stats::ActiveModel> + Send,
    {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        UserStats::insert(Self::new_row(user_id))
            .on_conflict(
                OnConflict::column(user_stats::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let current = UserStats::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("User stats not found: {user_id}")))?;

        let result = match apply(&current) {
            Some(active) => active
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?,
            None => current,
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Every row with a running streak.
    pub async fn find_with_active_streak(&self) -> AppResult<Vec<user_stats::Model>> {
        UserStats::find()
            .filter(user_stats::Column::CurrentStreak.gt(0))
            .order_by_asc(user_stats::Column::UserId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Zero the current streak of every listed user in one transaction.
    pub async fn reset_streaks(&self, user_ids: &[String]) -> AppResult<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let now = chrono::Utc::now();
        let result = UserStats::update_many()
            .col_expr(user_stats::Column::CurrentStreak, 0.into())
            .col_expr(user_stats::Column::UpdatedAt, now.into())
            .filter(user_stats::Column::UserId.is_in(user_ids.to_vec()))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Build an empty stats row for a user.
    #[must_use]
    pub fn new_row(user_id: &str) -> user_stats::ActiveModel {
        user_stats::ActiveModel {
            user_id: Set(user_id.to_string()),
            current_streak: Set(0),
            longest_streak: Set(0),
            last_action_date: Set(None),
            badges: Set(serde_json::json!({})),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_reset_streaks_empty_is_noop() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = UserStatsRepository::new(db);
        assert_eq!(repo.reset_streaks(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reset_streaks_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );
        let repo = UserStatsRepository::new(db);
        let updated = repo
            .reset_streaks(&["u1".to_string(), "u2".to_string()])
            .await
            .unwrap();
        assert_eq!(updated, 2);
    }
}
