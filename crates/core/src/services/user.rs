//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use florai_common::{AppError, AppResult, IdGenerator};
use florai_db::{
    entities::{
        activity_log::{ActivityAction, EntityKind},
        user::{self, UserRole},
    },
    repositories::UserRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::activity_log::{ActivityLogService, RecordActivityInput};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    activity_log: ActivityLogService,
    id_gen: IdGenerator,
}

/// Input for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 128))]
    pub name: Option<String>,
}

/// Credentials for signing in.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninInput {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, activity_log: ActivityLogService) -> Self {
        Self {
            user_repo,
            activity_log,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account and issue its first token.
    pub async fn signup(&self, input: SignupInput) -> AppResult<user::Model> {
        input.validate()?;

        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }

        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username_lower: Set(username.to_lowercase()),
            username: Set(username),
            email: Set(input.email),
            name: Set(input.name.filter(|n| !n.trim().is_empty())),
            avatar_url: Set(None),
            password_hash: Set(password_hash),
            token: Set(Some(self.id_gen.generate_token())),
            role: Set(UserRole::User),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    /// Check credentials. The returned user carries a usable token.
    pub async fn signin(&self, input: SigninInput) -> AppResult<user::Model> {
        input.validate()?;

        let Some(user) = self.user_repo.find_by_username(input.username.trim()).await? else {
            return Err(AppError::Unauthorized);
        };

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        // Signing out clears the token; hand out a fresh one on the next sign-in.
        if user.token.is_some() {
            return Ok(user);
        }
        self.regenerate_token(&user.id).await
    }

    /// Resolve a bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Replace a user's token, invalidating the previous one.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(self.id_gen.generate_token()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Role of a user.
    pub async fn get_role(&self, user_id: &str) -> AppResult<UserRole> {
        Ok(self.user_repo.get_by_id(user_id).await?.role)
    }

    /// Name to show for a user id. Falls back to the id itself.
    pub async fn display_name(&self, user_id: &str) -> AppResult<String> {
        Ok(self
            .user_repo
            .find_by_id(user_id)
            .await?
            .map_or_else(|| user_id.to_string(), |u| u.display_name().to_string()))
    }

    /// Ids of every admin account.
    pub async fn list_admin_ids(&self) -> AppResult<Vec<String>> {
        Ok(self
            .user_repo
            .find_admins()
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect())
    }

    /// Delete an account and log a snapshot of it.
    ///
    /// Returns `false` when there was nothing to delete.
    pub async fn admin_remove_user(&self, admin: &user::Model, user_id: &str) -> AppResult<bool> {
        if admin.id == user_id {
            return Err(AppError::BadRequest(
                "Admins cannot remove their own account".to_string(),
            ));
        }

        let Some(target) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(false);
        };

        let snapshot = serde_json::to_value(&target)
            .map_err(|e| AppError::Internal(format!("Failed to snapshot user: {e}")))?;
        let title = target.display_name().to_string();

        self.user_repo.delete(target).await?;

        self.activity_log
            .record(
                Some(admin),
                RecordActivityInput {
                    action: ActivityAction::Delete,
                    entity_type: EntityKind::User,
                    entity_id: user_id.to_string(),
                    entity_title: Some(title),
                    deleted_data: Some(snapshot),
                },
            )
            .await?;

        tracing::info!(admin_id = %admin.id, user_id = %user_id, "Admin removed user");
        Ok(true)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use florai_db::{entities::activity_log, repositories::ActivityLogRepository};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_user(id: &str, username: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            email: None,
            name: None,
            avatar_url: None,
            password_hash: hash_password("correct horse").unwrap(),
            token: Some("tok".to_string()),
            role,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: DatabaseConnection) -> UserService {
        let db = Arc::new(db);
        UserService::new(
            UserRepository::new(db.clone()),
            ActivityLogService::new(ActivityLogRepository::new(db)),
        )
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("secret password").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret password", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_signup_rejects_taken_username() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u1", "Alice", UserRole::User)]])
            .into_connection();

        let result = service(db)
            .signup(SignupInput {
                username: "alice".to_string(),
                email: None,
                password: "long enough".to_string(),
                name: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .signup(SignupInput {
                username: "alice".to_string(),
                email: None,
                password: "short".to_string(),
                name: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u1", "alice", UserRole::User)]])
            .into_connection();

        let result = service(db)
            .signin(SigninInput {
                username: "alice".to_string(),
                password: "battery staple".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_signin_success_keeps_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u1", "alice", UserRole::User)]])
            .into_connection();

        let user = service(db)
            .signin(SigninInput {
                username: "alice".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_display_name_falls_back_to_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        assert_eq!(service(db).display_name("ghost").await.unwrap(), "ghost");
    }

    #[tokio::test]
    async fn test_admin_cannot_remove_self() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let admin = test_user("a1", "root", UserRole::Admin);

        let result = service(db).admin_remove_user(&admin, "a1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_admin_remove_user_logs_snapshot() {
        let admin = test_user("a1", "root", UserRole::Admin);
        let log = activity_log::Model {
            id: "l1".to_string(),
            action: ActivityAction::Delete,
            entity_type: EntityKind::User,
            entity_id: "u2".to_string(),
            entity_title: Some("bob".to_string()),
            actor_id: Some("a1".to_string()),
            actor_name: Some("root".to_string()),
            deleted_data: None,
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u2", "bob", UserRole::User)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[log]])
            .into_connection();

        assert!(service(db).admin_remove_user(&admin, "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_remove_missing_user_is_noop() {
        let admin = test_user("a1", "root", UserRole::Admin);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        assert!(!service(db).admin_remove_user(&admin, "u2").await.unwrap());
    }
}
