//! Community forum posts.

use florai_common::{AppError, AppResult, IdGenerator};
use florai_db::{
    entities::{post, post_reply, user},
    repositories::PostRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use validator::Validate;

/// Input for a new post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 20000))]
    pub content: String,

    #[validate(length(max = 20))]
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for editing a post body.
#[derive(Debug, Deserialize, Validate)]
pub struct EditPostInput {
    #[validate(length(min = 1, max = 20000))]
    pub content: String,
}

/// Input for replying to a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReplyInput {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

/// A post with its thread.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: post::Model,
    pub replies: Vec<post_reply::Model>,
    pub liked_by: Vec<String>,
}

/// Forum service.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(post_repo: PostRepository) -> Self {
        Self {
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Publish a post. Titles and bodies must be unique after normalization.
    pub async fn create(&self, author: &user::Model, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let title = input.title.trim().to_string();
        let content = input.content.trim().to_string();
        let tags: Vec<String> = input
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if title.is_empty() || content.is_empty() || tags.is_empty() {
            return Err(AppError::Validation(
                "Title, content and at least one tag are required".to_string(),
            ));
        }

        let title_hash = fingerprint(&title);
        let content_hash = fingerprint(&content);

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author.id.clone()),
            author_name: Set(author.display_name().to_string()),
            title: Set(title),
            content: Set(content),
            tags: Set(serde_json::json!(tags)),
            views: Set(0),
            likes: Set(0),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self
            .post_repo
            .create_with_fingerprints(model, title_hash, content_hash)
            .await?;
        tracing::info!(post_id = %created.id, user_id = %author.id, "Post created");
        Ok(created)
    }

    /// All posts, newest first.
    pub async fn list(&self) -> AppResult<Vec<post::Model>> {
        self.post_repo.find_all().await
    }

    /// A post with its replies and likers.
    pub async fn get(&self, post_id: &str) -> AppResult<PostDetail> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let replies = self.post_repo.find_replies(post_id).await?;
        let liked_by = self.post_repo.find_likers(post_id).await?;

        Ok(PostDetail {
            post,
            replies,
            liked_by,
        })
    }

    /// Replace the body of the caller's own post.
    pub async fn edit(
        &self,
        user_id: &str,
        post_id: &str,
        input: EditPostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        let post = self.get_owned(user_id, post_id).await?;
        let content = input.content.trim().to_string();
        if content.is_empty() {
            return Err(AppError::Validation("Content is required".to_string()));
        }

        let unchanged = normalize(&content) == normalize(&post.content);
        let mut active: post::ActiveModel = post.into();
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        if unchanged {
            return self.post_repo.update(active).await;
        }

        let new_hash = fingerprint(&content);
        active.content = Set(content);
        self.post_repo
            .replace_content(active, post_id, new_hash)
            .await
    }

    /// Delete the caller's own post.
    pub async fn delete(&self, user_id: &str, post_id: &str) -> AppResult<()> {
        self.get_owned(user_id, post_id).await?;
        self.post_repo.delete(post_id).await?;
        tracing::info!(post_id = %post_id, "Post deleted by author");
        Ok(())
    }

    /// Reply to a post.
    pub async fn add_reply(
        &self,
        author: &user::Model,
        post_id: &str,
        input: CreateReplyInput,
    ) -> AppResult<post_reply::Model> {
        input.validate()?;

        let text = input.text.trim().to_string();
        if text.is_empty() {
            return Err(AppError::Validation("Reply text is required".to_string()));
        }
        self.post_repo.get_by_id(post_id).await?;

        let model = post_reply::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            user_id: Set(author.id.clone()),
            name: Set(author.display_name().to_string()),
            text: Set(text),
            avatar_url: Set(author.avatar_url.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.post_repo.create_reply(model).await
    }

    /// Like a post once.
    pub async fn like(&self, user_id: &str, post_id: &str) -> AppResult<()> {
        self.post_repo.get_by_id(post_id).await?;
        self.post_repo.like(post_id, user_id).await
    }

    /// Count a view.
    pub async fn view(&self, post_id: &str) -> AppResult<()> {
        if self.post_repo.increment_views(post_id).await? == 0 {
            return Err(AppError::NotFound(format!("Post not found: {post_id}")));
        }
        Ok(())
    }

    async fn get_owned(&self, user_id: &str, post_id: &str) -> AppResult<post::Model> {
        let post = self.post_repo.get_by_id(post_id).await?;
        if post.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can change this post".to_string(),
            ));
        }
        Ok(post)
    }
}

/// Trim, collapse whitespace runs to one space, lowercase.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// SHA-256 hex of the normalized text.
#[must_use]
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(normalize(text).as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use florai_db::{
        entities::{post_fingerprint, user::UserRole},
        repositories::DUPLICATE_TITLE,
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> PostService {
        PostService::new(PostRepository::new(Arc::new(db)))
    }

    fn author() -> user::Model {
        user::Model {
            id: "u1".to_string(),
            username: "fern".to_string(),
            username_lower: "fern".to_string(),
            email: None,
            name: Some("Fern".to_string()),
            avatar_url: None,
            password_hash: String::new(),
            token: None,
            role: UserRole::User,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn stored_post(user_id: &str, content: &str) -> post::Model {
        post::Model {
            id: "p1".to_string(),
            user_id: user_id.to_string(),
            author_name: "Fern".to_string(),
            title: "Yellow leaves".to_string(),
            content: content.to_string(),
            tags: serde_json::json!(["help"]),
            views: 0,
            likes: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Yellow \n\t LEAVES  on  my fern "), "yellow leaves on my fern");
    }

    #[test]
    fn test_fingerprint_ignores_spacing_and_case() {
        assert_eq!(fingerprint("Hello   World"), fingerprint(" hello world"));
        assert_ne!(fingerprint("hello world"), fingerprint("hello, world"));
        assert_eq!(fingerprint("x").len(), 64);
    }

    #[tokio::test]
    async fn test_create_requires_tags() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create(
                &author(),
                CreatePostInput {
                    title: "Yellow leaves".to_string(),
                    content: "Why?".to_string(),
                    tags: vec!["  ".to_string()],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_title() {
        let existing = post_fingerprint::Model {
            kind: post_fingerprint::FingerprintKind::Title,
            hash: fingerprint("Yellow leaves"),
            post_id: "p0".to_string(),
            created_at: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();

        let result = service(db)
            .create(
                &author(),
                CreatePostInput {
                    title: "  yellow   LEAVES".to_string(),
                    content: "Why are they yellow?".to_string(),
                    tags: vec!["help".to_string()],
                },
            )
            .await;

        match result {
            Err(AppError::Conflict(code)) => assert_eq!(code, DUPLICATE_TITLE),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_edit_by_non_author() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored_post("u1", "Why?")]])
            .into_connection();

        let result = service(db)
            .edit(
                "u2",
                "p1",
                EditPostInput {
                    content: "Hijacked".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_edit_unchanged_content_only_touches_timestamp() {
        let mut touched = stored_post("u1", "Why are they yellow?");
        touched.updated_at = Some(Utc::now().into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored_post("u1", "Why are they yellow?")]])
            .append_query_results([[touched]])
            .into_connection();

        let updated = service(db)
            .edit(
                "u1",
                "p1",
                EditPostInput {
                    content: "why are   they YELLOW?".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.content, "Why are they yellow?");
        assert!(updated.updated_at.is_some());
    }
}
