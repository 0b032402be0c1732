//! Learning content repository.

use std::sync::Arc;

use crate::entities::{LearningResource, LearningTip, learning_resource, learning_tip};
use florai_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

/// Repository for gardening tips and learning resources.
#[derive(Clone)]
pub struct LearningRepository {
    db: Arc<DatabaseConnection>,
}

impl LearningRepository {
    /// Create a new learning repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All tips, newest first.
    pub async fn find_tips(&self) -> AppResult<Vec<learning_tip::Model>> {
        LearningTip::find()
            .order_by_desc(learning_tip::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a tip by ID.
    pub async fn find_tip(&self, id: &str) -> AppResult<Option<learning_tip::Model>> {
        LearningTip::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a tip by ID.
    pub async fn get_tip(&self, id: &str) -> AppResult<learning_tip::Model> {
        self.find_tip(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tip not found: {id}")))
    }

    /// Create a tip.
    pub async fn create_tip(&self, model: learning_tip::ActiveModel) -> AppResult<learning_tip::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a tip.
    pub async fn update_tip(&self, model: learning_tip::ActiveModel) -> AppResult<learning_tip::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a tip. Returns the number of rows removed.
    pub async fn delete_tip(&self, id: &str) -> AppResult<u64> {
        let result = LearningTip::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// All resources, newest first.
    pub async fn find_resources(&self) -> AppResult<Vec<learning_resource::Model>> {
        LearningResource::find()
            .order_by_desc(learning_resource::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a resource by ID.
    pub async fn find_resource(&self, id: &str) -> AppResult<Option<learning_resource::Model>> {
        LearningResource::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a resource by ID.
    pub async fn get_resource(&self, id: &str) -> AppResult<learning_resource::Model> {
        self.find_resource(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource not found: {id}")))
    }

    /// Create a resource.
    pub async fn create_resource(
        &self,
        model: learning_resource::ActiveModel,
    ) -> AppResult<learning_resource::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a resource.
    pub async fn update_resource(
        &self,
        model: learning_resource::ActiveModel,
    ) -> AppResult<learning_resource::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a resource. Returns the number of rows removed.
    pub async fn delete_resource(&self, id: &str) -> AppResult<u64> {
        let result = LearningResource::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::learning_tip::TipCategory;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn tip(id: &str) -> learning_tip::Model {
        learning_tip::Model {
            id: id.to_string(),
            title: "Water early".to_string(),
            description: "Morning watering loses less to evaporation.".to_string(),
            category: TipCategory::Watering,
            icon_key: "droplet".to_string(),
            created_by_id: Some("a1".to_string()),
            created_by_name: Some("admin".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_tips() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[tip("t2"), tip("t1")]])
            .into_connection();

        let repo = LearningRepository::new(Arc::new(db));
        let tips = repo.find_tips().await.unwrap();
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0].id, "t2");
    }

    #[tokio::test]
    async fn test_get_tip_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<learning_tip::Model>::new()])
            .into_connection();

        let repo = LearningRepository::new(Arc::new(db));
        let result = repo.get_tip("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
