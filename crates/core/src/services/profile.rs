//! Profile pictures.

use std::sync::Arc;

use florai_common::{AppError, AppResult, StorageBackend, profile_picture_key};
use florai_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;

/// Profile service.
#[derive(Clone)]
pub struct ProfileService {
    user_repo: UserRepository,
    storage: Arc<dyn StorageBackend>,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub fn new(user_repo: UserRepository, storage: Arc<dyn StorageBackend>) -> Self {
        Self { user_repo, storage }
    }

    /// Store a new profile picture and point the account's avatar at it.
    ///
    /// Each user has one slot, so a new upload overwrites the old file.
    pub async fn upload_avatar(
        &self,
        user: &user::Model,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<user::Model> {
        if data.is_empty() {
            return Err(AppError::BadRequest("Picture is empty".to_string()));
        }
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest(format!(
                "Unsupported picture type: {content_type}"
            )));
        }

        let uploaded = self
            .storage
            .upload(&profile_picture_key(&user.id), data, content_type)
            .await?;

        let mut active: user::ActiveModel = user.clone().into();
        active.avatar_url = Set(Some(uploaded.url));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.user_repo.update(active).await?;
        tracing::info!(user_id = %user.id, size = uploaded.size, "Profile picture stored");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use florai_common::LocalStorage;
    use florai_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::path::PathBuf;

    fn service(db: DatabaseConnection) -> (ProfileService, PathBuf) {
        let dir = std::env::temp_dir().join(format!("florai-profile-{}", uuid::Uuid::new_v4()));
        let service = ProfileService::new(
            UserRepository::new(Arc::new(db)),
            Arc::new(LocalStorage::new(dir.clone(), "/files".to_string())),
        );
        (service, dir)
    }

    fn user(avatar_url: Option<&str>) -> user::Model {
        user::Model {
            id: "u1".to_string(),
            username: "alice".to_string(),
            username_lower: "alice".to_string(),
            email: None,
            name: None,
            avatar_url: avatar_url.map(ToString::to_string),
            password_hash: String::new(),
            token: Some("tok".to_string()),
            role: UserRole::User,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_upload_avatar_rejects_non_image() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let (service, _) = service(db);

        let result = service.upload_avatar(&user(None), b"%PDF", "application/pdf").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_avatar_rejects_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let (service, _) = service(db);

        let result = service.upload_avatar(&user(None), b"", "image/png").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_avatar_stores_under_user_key() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user(Some("/files/profilePictures/u1"))]])
            .into_connection();
        let (service, dir) = service(db);

        let updated = service
            .upload_avatar(&user(None), b"png-bytes", "image/png")
            .await
            .unwrap();

        assert_eq!(updated.avatar_url.as_deref(), Some("/files/profilePictures/u1"));
        let stored = std::fs::read(dir.join("profilePictures").join("u1")).unwrap();
        assert_eq!(stored, b"png-bytes");
    }
}
