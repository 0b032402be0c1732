//! Forum post repository.

use std::sync::Arc;

use crate::entities::{
    Post, PostFingerprint, PostLike, PostReply, post, post_fingerprint,
    post_fingerprint::FingerprintKind, post_like, post_reply,
};
use florai_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

use super::write_err;

/// Error message for a title that already exists.
pub const DUPLICATE_TITLE: &str = "DUPLICATE_TITLE";
/// Error message for a body that already exists.
pub const DUPLICATE_CONTENT: &str = "DUPLICATE_CONTENT";
/// Error message for a second like by the same user.
pub const ALREADY_LIKED: &str = "ALREADY_LIKED";

/// Forum post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post not found: {id}")))
    }

    /// All posts, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<post::Model>> {
        Post::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a post together with its title and content fingerprints.
    pub async fn create_with_fingerprints(
        &self,
        model: post::ActiveModel,
        title_hash: String,
        content_hash: String,
    ) -> AppResult<post::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if fingerprint_exists(&txn, FingerprintKind::Title, &title_hash).await? {
            return Err(AppError::Conflict(DUPLICATE_TITLE.to_string()));
        }
        if fingerprint_exists(&txn, FingerprintKind::Content, &content_hash).await? {
            return Err(AppError::Conflict(DUPLICATE_CONTENT.to_string()));
        }

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        insert_fingerprint(&txn, FingerprintKind::Title, title_hash, &created.id).await?;
        insert_fingerprint(&txn, FingerprintKind::Content, content_hash, &created.id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Swap a post's body and its content fingerprint.
    pub async fn replace_content(
        &self,
        model: post::ActiveModel,
        post_id: &str,
        new_hash: String,
    ) -> AppResult<post::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if fingerprint_exists(&txn, FingerprintKind::Content, &new_hash).await? {
            return Err(AppError::Conflict(DUPLICATE_CONTENT.to_string()));
        }

        PostFingerprint::delete_many()
            .filter(post_fingerprint::Column::PostId.eq(post_id))
            .filter(post_fingerprint::Column::Kind.eq(FingerprintKind::Content))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        insert_fingerprint(&txn, FingerprintKind::Content, new_hash, post_id).await?;

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Update a post without touching fingerprints.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post and release its fingerprints.
    pub async fn delete(&self, post_id: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        PostFingerprint::delete_many()
            .filter(post_fingerprint::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Post::delete_by_id(post_id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Replies to a post, oldest first.
    pub async fn find_replies(&self, post_id: &str) -> AppResult<Vec<post_reply::Model>> {
        PostReply::find()
            .filter(post_reply::Column::PostId.eq(post_id))
            .order_by_asc(post_reply::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add a reply.
    pub async fn create_reply(&self, model: post_reply::ActiveModel) -> AppResult<post_reply::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Users who liked a post.
    pub async fn find_likers(&self, post_id: &str) -> AppResult<Vec<String>> {
        let likes = PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .order_by_asc(post_like::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(likes.into_iter().map(|l| l.user_id).collect())
    }

    /// Record a like and bump the counter. A second like is a conflict.
    pub async fn like(&self, post_id: &str, user_id: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = PostLike::find_by_id((post_id.to_string(), user_id.to_string()))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if existing.is_some() {
            return Err(AppError::Conflict(ALREADY_LIKED.to_string()));
        }

        // A concurrent like from the same user lands here with zero rows.
        let inserted = PostLike::insert(post_like::ActiveModel {
            post_id: Set(post_id.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        })
        .on_conflict(
            OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
        .map_err(|e| write_err(e, ALREADY_LIKED))?;
        if inserted == 0 {
            return Err(AppError::Conflict(ALREADY_LIKED.to_string()));
        }

        Post::update_many()
            .col_expr(post::Column::Likes, Expr::col(post::Column::Likes).add(1))
            .filter(post::Column::Id.eq(post_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Increment the view counter (single UPDATE query, no fetch).
    pub async fn increment_views(&self, post_id: &str) -> AppResult<u64> {
        let result = Post::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

async fn fingerprint_exists<C: ConnectionTrait>(
    conn: &C,
    kind: FingerprintKind,
    hash: &str,
) -> AppResult<bool> {
    let found = PostFingerprint::find_by_id((kind, hash.to_string()))
        .one(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(found.is_some())
}

const fn duplicate_code(kind: FingerprintKind) -> &'static str {
    match kind {
        FingerprintKind::Title => DUPLICATE_TITLE,
        FingerprintKind::Content => DUPLICATE_CONTENT,
    }
}

/// Claim a fingerprint. Losing a race to another writer is a conflict.
async fn insert_fingerprint<C: ConnectionTrait>(
    conn: &C,
    kind: FingerprintKind,
    hash: String,
    post_id: &str,
) -> AppResult<()> {
    let inserted = PostFingerprint::insert(post_fingerprint::ActiveModel {
        kind: Set(kind),
        hash: Set(hash),
        post_id: Set(post_id.to_string()),
        created_at: Set(chrono::Utc::now().into()),
    })
    .on_conflict(
        OnConflict::columns([post_fingerprint::Column::Kind, post_fingerprint::Column::Hash])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await
    .map_err(|e| write_err(e, duplicate_code(kind)))?;

    if inserted == 0 {
        return Err(AppError::Conflict(duplicate_code(kind).to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn fingerprint(kind: FingerprintKind, hash: &str) -> post_fingerprint::Model {
        post_fingerprint::Model {
            kind,
            hash: hash.to_string(),
            post_id: "existing".to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn new_post() -> post::ActiveModel {
        post::ActiveModel {
            id: Set("p1".to_string()),
            user_id: Set("u1".to_string()),
            author_name: Set("Alice".to_string()),
            title: Set("Leaf spots".to_string()),
            content: Set("Brown spots on the oak".to_string()),
            tags: Set(serde_json::json!(["oak"])),
            views: Set(0),
            likes: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
    }

    #[tokio::test]
    async fn test_duplicate_title_is_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fingerprint(FingerprintKind::Title, "t")]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo
            .create_with_fingerprints(new_post(), "t".to_string(), "c".to_string())
            .await;
        match result {
            Err(AppError::Conflict(code)) => assert_eq!(code, DUPLICATE_TITLE),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_content_is_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post_fingerprint::Model>::new()])
                .append_query_results([[fingerprint(FingerprintKind::Content, "c")]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo
            .create_with_fingerprints(new_post(), "t".to_string(), "c".to_string())
            .await;
        match result {
            Err(AppError::Conflict(code)) => assert_eq!(code, DUPLICATE_CONTENT),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_like_is_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post_like::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        match repo.like("p1", "u1").await {
            Err(AppError::Conflict(code)) => assert_eq!(code, ALREADY_LIKED),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fingerprint_claimed_concurrently_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result =
            insert_fingerprint(&db, FingerprintKind::Content, "c".to_string(), "p1").await;
        match result {
            Err(AppError::Conflict(code)) => assert_eq!(code, DUPLICATE_CONTENT),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_like_is_conflict() {
        let like = post_like::Model {
            post_id: "p1".to_string(),
            user_id: "u1".to_string(),
            created_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.like("p1", "u1").await;
        match result {
            Err(AppError::Conflict(code)) => assert_eq!(code, ALREADY_LIKED),
            other => panic!("expected conflict, got {other:?}"),
        }
    }
}
