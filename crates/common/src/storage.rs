//! Photo storage for green spaces.
//!
//! Only a local filesystem backend ships; the trait keeps services
//! independent of where bytes end up.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Uploaded file metadata.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Storage key (relative path).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// MD5 hash of the file.
    pub md5: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store `data` under `key`, replacing any previous object.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str)
    -> AppResult<UploadedFile>;

    /// Delete a file. Missing files are not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;

    /// Check if a file exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty() || key.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(AppError::BadRequest(format!("Invalid storage key: {key}")));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile> {
        let path = self.path_for(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write file: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to delete file: {e}")))?;
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }
}

/// Storage key for a green space's cover photo.
#[must_use]
pub fn green_space_photo_key(green_space_id: &str) -> String {
    format!("greenSpaces/{green_space_id}")
}

/// Storage key for a user's profile picture.
#[must_use]
pub fn profile_picture_key(user_id: &str) -> String {
    format!("profilePictures/{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (LocalStorage, PathBuf) {
        let dir = std::env::temp_dir().join(format!("florai-storage-{}", uuid::Uuid::new_v4()));
        (
            LocalStorage::new(dir.clone(), "http://localhost/files/".to_string()),
            dir,
        )
    }

    #[test]
    fn test_green_space_photo_key() {
        assert_eq!(green_space_photo_key("abc"), "greenSpaces/abc");
        assert_eq!(profile_picture_key("u1"), "profilePictures/u1");
    }

    #[test]
    fn test_public_url_trims_slash() {
        let (storage, _) = temp_storage();
        assert_eq!(
            storage.public_url("greenSpaces/abc"),
            "http://localhost/files/greenSpaces/abc"
        );
    }

    #[tokio::test]
    async fn test_upload_then_delete() {
        let (storage, dir) = temp_storage();
        let uploaded = storage
            .upload("greenSpaces/abc", b"jpeg bytes", "image/jpeg")
            .await
            .unwrap();
        assert_eq!(uploaded.size, 10);
        assert!(storage.exists("greenSpaces/abc").await.unwrap());

        storage.delete("greenSpaces/abc").await.unwrap();
        assert!(!storage.exists("greenSpaces/abc").await.unwrap());
        // Deleting twice is fine.
        storage.delete("greenSpaces/abc").await.unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let (storage, _) = temp_storage();
        let err = storage.upload("../etc/passwd", b"x", "text/plain").await;
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }
}
