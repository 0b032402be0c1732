//! Upload repository.

use std::sync::Arc;

use crate::entities::{Upload, upload};
use chrono::{DateTime, Utc};
use florai_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Upload repository for database operations.
#[derive(Clone)]
pub struct UploadRepository {
    db: Arc<DatabaseConnection>,
}

impl UploadRepository {
    /// Create a new upload repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record an upload.
    pub async fn create(&self, model: upload::ActiveModel) -> AppResult<upload::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a user's uploads, optionally only those at or after `since`.
    pub async fn count_by_user(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<u64> {
        let mut query = Upload::find().filter(upload::Column::UserId.eq(user_id));

        if let Some(since) = since {
            query = query.filter(upload::Column::CreatedAt.gte(since));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every upload at or after `since`.
    pub async fn find_since(&self, since: DateTime<Utc>) -> AppResult<Vec<upload::Model>> {
        Upload::find()
            .filter(upload::Column::CreatedAt.gte(since))
            .order_by_asc(upload::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
