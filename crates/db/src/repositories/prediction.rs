//! Prediction repository.

use std::sync::Arc;

use crate::entities::{Prediction, prediction};
use florai_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Prediction repository for database operations.
#[derive(Clone)]
pub struct PredictionRepository {
    db: Arc<DatabaseConnection>,
}

impl PredictionRepository {
    /// Create a new prediction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Store a prediction.
    pub async fn create(&self, model: prediction::ActiveModel) -> AppResult<prediction::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find predictions by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<prediction::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Prediction::find()
            .filter(prediction::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
