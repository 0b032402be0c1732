//! Green space repository.

use std::sync::Arc;

use crate::entities::{GreenSpace, green_space};
use florai_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

/// What one conclusive photo says about a green space.
#[derive(Debug, Clone)]
pub struct ObservationUpdate {
    /// Whether the photo showed a healthy plant.
    pub healthy: bool,
    /// Class reported by the model.
    pub predicted_class: String,
    /// Model confidence.
    pub confidence: f64,
    /// Observation label (Healthy or Diseased).
    pub status: String,
}

/// Green space repository for database operations.
#[derive(Clone)]
pub struct GreenSpaceRepository {
    db: Arc<DatabaseConnection>,
}

impl GreenSpaceRepository {
    /// Create a new green space repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a green space by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<green_space::Model>> {
        GreenSpace::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a green space by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<green_space::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Green space not found: {id}")))
    }

    /// Active green spaces, newest first.
    pub async fn find_active(&self) -> AppResult<Vec<green_space::Model>> {
        GreenSpace::find()
            .filter(green_space::Column::IsActive.eq(true))
            .order_by_desc(green_space::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a green space.
    pub async fn create(&self, model: green_space::ActiveModel) -> AppResult<green_space::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a green space.
    pub async fn update(&self, model: green_space::ActiveModel) -> AppResult<green_space::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fold one observation into the counters and health index.
    ///
    /// The row is locked for the duration so concurrent uploads to the same
    /// space do not lose increments.
    pub async fn apply_observation(
        &self,
        id: &str,
        observation: ObservationUpdate,
    ) -> AppResult<green_space::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let current = GreenSpace::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Green space not found: {id}")))?;

        let total = current.total_uploads + 1;
        let healthy = current.healthy_uploads + i32::from(observation.healthy);

        let mut active: green_space::ActiveModel = current.into();
        active.total_uploads = Set(total);
        active.healthy_uploads = Set(healthy);
        active.health_index = Set(Some(f64::from(healthy) / f64::from(total)));
        active.last_prediction = Set(Some(observation.predicted_class));
        active.last_confidence = Set(Some(observation.confidence));
        active.last_status = Set(Some(observation.status));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn space(total: i32, healthy: i32) -> green_space::Model {
        green_space::Model {
            id: "gs1".to_string(),
            name: "Botanic Gardens".to_string(),
            polygon: serde_json::json!([]),
            is_active: true,
            total_uploads: total,
            healthy_uploads: healthy,
            health_index: None,
            last_prediction: None,
            last_confidence: None,
            last_status: None,
            photo_url: None,
            created_by: "admin".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_apply_observation_returns_updated_row() {
        let before = space(3, 2);
        let mut after = space(4, 3);
        after.health_index = Some(0.75);
        after.last_status = Some("Healthy".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[before]])
                .append_query_results([[after]])
                .into_connection(),
        );

        let repo = GreenSpaceRepository::new(db);
        let updated = repo
            .apply_observation(
                "gs1",
                ObservationUpdate {
                    healthy: true,
                    predicted_class: "Healthy".to_string(),
                    confidence: 0.9,
                    status: "Healthy".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.total_uploads, 4);
        assert_eq!(updated.health_index, Some(0.75));
    }

    #[tokio::test]
    async fn test_apply_observation_missing_space() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<green_space::Model>::new()])
                .into_connection(),
        );

        let repo = GreenSpaceRepository::new(db);
        let result = repo
            .apply_observation(
                "missing",
                ObservationUpdate {
                    healthy: false,
                    predicted_class: "Rust".to_string(),
                    confidence: 0.5,
                    status: "Diseased".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
