//! Monitored green spaces.

use std::sync::Arc;

use florai_common::{AppError, AppResult, IdGenerator, StorageBackend, green_space_photo_key};
use florai_db::{
    entities::{
        activity_log::{ActivityAction, EntityKind},
        green_space,
        upload::ObservationStatus,
        user,
    },
    repositories::{GreenSpaceRepository, ObservationUpdate},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::activity_log::{ActivityLogService, RecordActivityInput};

/// Minimum number of vertices in a zone outline.
const MIN_POLYGON_POINTS: usize = 3;

/// One polygon vertex.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct LatLng {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

/// Input for creating a green space.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGreenSpaceInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(nested)]
    pub polygon: Vec<LatLng>,
}

/// Partial update of a green space.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGreenSpaceInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(url)]
    pub photo_url: Option<String>,
}

/// Green space service.
#[derive(Clone)]
pub struct GreenSpaceService {
    repo: GreenSpaceRepository,
    storage: Arc<dyn StorageBackend>,
    activity_log: ActivityLogService,
    id_gen: IdGenerator,
}

impl GreenSpaceService {
    /// Create a new green space service.
    #[must_use]
    pub fn new(
        repo: GreenSpaceRepository,
        storage: Arc<dyn StorageBackend>,
        activity_log: ActivityLogService,
    ) -> Self {
        Self {
            repo,
            storage,
            activity_log,
            id_gen: IdGenerator::new(),
        }
    }

    /// Draw a new zone on the map.
    pub async fn create(
        &self,
        admin: &user::Model,
        input: CreateGreenSpaceInput,
    ) -> AppResult<green_space::Model> {
        input.validate()?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        if input.polygon.len() < MIN_POLYGON_POINTS {
            return Err(AppError::Validation(format!(
                "Polygon needs at least {MIN_POLYGON_POINTS} points"
            )));
        }

        let polygon = serde_json::to_value(&input.polygon)
            .map_err(|e| AppError::Internal(format!("Failed to encode polygon: {e}")))?;

        let model = green_space::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name),
            polygon: Set(polygon),
            is_active: Set(true),
            total_uploads: Set(0),
            healthy_uploads: Set(0),
            health_index: Set(None),
            last_prediction: Set(None),
            last_confidence: Set(None),
            last_status: Set(None),
            photo_url: Set(None),
            created_by: Set(admin.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.repo.create(model).await?;
        self.log(admin, ActivityAction::Create, &created, None).await?;
        Ok(created)
    }

    /// Zones shown on the map.
    pub async fn list_active(&self) -> AppResult<Vec<green_space::Model>> {
        self.repo.find_active().await
    }

    /// Get a zone by ID.
    pub async fn get(&self, id: &str) -> AppResult<green_space::Model> {
        self.repo.get_by_id(id).await
    }

    /// Hide a zone from the map. Its upload history is kept.
    pub async fn soft_delete(&self, admin: &user::Model, id: &str) -> AppResult<green_space::Model> {
        let existing = self.repo.get_by_id(id).await?;
        let snapshot = serde_json::to_value(&existing)
            .map_err(|e| AppError::Internal(format!("Failed to snapshot green space: {e}")))?;

        let mut active: green_space::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.repo.update(active).await?;
        self.log(admin, ActivityAction::Delete, &updated, Some(snapshot))
            .await?;
        Ok(updated)
    }

    /// Rename a zone or point it at an external photo.
    pub async fn update_meta(
        &self,
        admin: &user::Model,
        id: &str,
        input: UpdateGreenSpaceInput,
    ) -> AppResult<green_space::Model> {
        input.validate()?;

        let existing = self.repo.get_by_id(id).await?;
        let mut active: green_space::ActiveModel = existing.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation("Name is required".to_string()));
            }
            active.name = Set(name);
        }
        if let Some(url) = input.photo_url {
            active.photo_url = Set(Some(url));
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.repo.update(active).await?;
        self.log(admin, ActivityAction::Update, &updated, None).await?;
        Ok(updated)
    }

    /// Store a cover photo, replacing the previous one.
    pub async fn upload_photo(
        &self,
        id: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<green_space::Model> {
        if data.is_empty() {
            return Err(AppError::BadRequest("Photo is empty".to_string()));
        }
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest(format!(
                "Unsupported photo type: {content_type}"
            )));
        }

        let existing = self.repo.get_by_id(id).await?;
        let uploaded = self
            .storage
            .upload(&green_space_photo_key(id), data, content_type)
            .await?;

        let mut active: green_space::ActiveModel = existing.into();
        active.photo_url = Set(Some(uploaded.url));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.repo.update(active).await?;
        tracing::info!(green_space_id = %id, size = uploaded.size, "Green space photo stored");
        Ok(updated)
    }

    /// Drop the cover photo.
    pub async fn remove_photo(&self, id: &str) -> AppResult<green_space::Model> {
        let existing = self.repo.get_by_id(id).await?;
        self.storage.delete(&green_space_photo_key(id)).await?;

        let mut active: green_space::ActiveModel = existing.into();
        active.photo_url = Set(None);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.repo.update(active).await
    }

    /// Fold a conclusive photo observation into the zone's health index.
    pub async fn apply_observation(
        &self,
        id: &str,
        status: ObservationStatus,
        predicted_class: Option<String>,
        confidence: Option<f64>,
    ) -> AppResult<Option<green_space::Model>> {
        if !status.is_conclusive() {
            return Ok(None);
        }

        let updated = self
            .repo
            .apply_observation(
                id,
                ObservationUpdate {
                    healthy: status == ObservationStatus::Healthy,
                    predicted_class: predicted_class.unwrap_or_else(|| status.as_str().to_string()),
                    confidence: confidence.unwrap_or(0.0),
                    status: status.as_str().to_string(),
                },
            )
            .await?;
        Ok(Some(updated))
    }

    async fn log(
        &self,
        admin: &user::Model,
        action: ActivityAction,
        space: &green_space::Model,
        deleted_data: Option<serde_json::Value>,
    ) -> AppResult<()> {
        self.activity_log
            .record(
                Some(admin),
                RecordActivityInput {
                    action,
                    entity_type: EntityKind::Map,
                    entity_id: space.id.clone(),
                    entity_title: Some(space.name.clone()),
                    deleted_data,
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use florai_common::LocalStorage;
    use florai_db::{entities::user::UserRole, repositories::ActivityLogRepository};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    fn service(db: DatabaseConnection) -> GreenSpaceService {
        let db = Arc::new(db);
        let dir = std::env::temp_dir().join(format!("florai-gs-{}", uuid::Uuid::new_v4()));
        GreenSpaceService::new(
            GreenSpaceRepository::new(db.clone()),
            Arc::new(LocalStorage::new(dir, "/files".to_string())),
            ActivityLogService::new(ActivityLogRepository::new(db)),
        )
    }

    fn admin() -> user::Model {
        user::Model {
            id: "a1".to_string(),
            username: "admin".to_string(),
            username_lower: "admin".to_string(),
            email: None,
            name: None,
            avatar_url: None,
            password_hash: String::new(),
            token: None,
            role: UserRole::Admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn space() -> green_space::Model {
        green_space::Model {
            id: "g1".to_string(),
            name: "Botanic Gardens".to_string(),
            polygon: serde_json::json!([]),
            is_active: true,
            total_uploads: 0,
            healthy_uploads: 0,
            health_index: None,
            last_prediction: None,
            last_confidence: None,
            last_status: None,
            photo_url: None,
            created_by: "a1".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_needs_three_points() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create(
                &admin(),
                CreateGreenSpaceInput {
                    name: "Lawn".to_string(),
                    polygon: vec![LatLng { lat: 1.0, lng: 2.0 }, LatLng { lat: 1.1, lng: 2.1 }],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_observation_is_ignored() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .apply_observation("g1", ObservationStatus::Unknown, None, None)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_upload_photo_rejects_non_image() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db).upload_photo("g1", b"%PDF", "application/pdf").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_photo_sets_url() {
        let mut with_photo = space();
        with_photo.photo_url = Some("/files/greenSpaces/g1".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[space()]])
            .append_query_results([[with_photo]])
            .into_connection();

        let updated = service(db)
            .upload_photo("g1", b"jpeg", "image/jpeg")
            .await
            .unwrap();
        assert_eq!(updated.photo_url.as_deref(), Some("/files/greenSpaces/g1"));
    }
}
