//! Gardening tips and learning resources.

use florai_common::{AppError, AppResult, IdGenerator};
use florai_db::{
    entities::{
        activity_log::{ActivityAction, EntityKind},
        learning_resource::{self, Difficulty, ResourceType},
        learning_tip::{self, TipCategory},
        user,
    },
    repositories::LearningRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::activity_log::{ActivityLogService, RecordActivityInput};

/// Input for creating a tip.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TipInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    pub category: TipCategory,

    #[validate(length(min = 1, max = 64))]
    pub icon_key: String,
}

/// Partial update of a tip.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTipInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,

    pub category: Option<TipCategory>,

    #[validate(length(min = 1, max = 64))]
    pub icon_key: Option<String>,
}

/// Input for creating a resource.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    #[validate(length(min = 1, max = 64))]
    pub icon_key: String,

    #[validate(length(min = 1, max = 100000))]
    pub content: String,

    #[validate(length(min = 1, max = 64))]
    pub duration: String,

    pub difficulty: Difficulty,
}

/// Partial update of a resource.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,

    #[validate(length(min = 1, max = 64))]
    pub icon_key: Option<String>,

    #[validate(length(min = 1, max = 100000))]
    pub content: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub duration: Option<String>,

    pub difficulty: Option<Difficulty>,
}

/// Learning content service.
#[derive(Clone)]
pub struct LearningService {
    repo: LearningRepository,
    activity_log: ActivityLogService,
    id_gen: IdGenerator,
}

impl LearningService {
    /// Create a new learning service.
    #[must_use]
    pub const fn new(repo: LearningRepository, activity_log: ActivityLogService) -> Self {
        Self {
            repo,
            activity_log,
            id_gen: IdGenerator::new(),
        }
    }

    /// Tips, newest first.
    pub async fn list_tips(&self) -> AppResult<Vec<learning_tip::Model>> {
        self.repo.find_tips().await
    }

    /// Publish a tip.
    pub async fn create_tip(
        &self,
        admin: &user::Model,
        input: TipInput,
    ) -> AppResult<learning_tip::Model> {
        input.validate()?;

        let model = learning_tip::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(required(&input.title, "Title")?),
            description: Set(required(&input.description, "Description")?),
            category: Set(input.category),
            icon_key: Set(input.icon_key),
            created_by_id: Set(Some(admin.id.clone())),
            created_by_name: Set(Some(admin.display_name().to_string())),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.repo.create_tip(model).await?;
        self.log(
            admin,
            ActivityAction::Create,
            EntityKind::LearningTip,
            &created.id,
            &created.title,
            None,
        )
        .await?;
        Ok(created)
    }

    /// Edit a tip.
    pub async fn update_tip(
        &self,
        admin: &user::Model,
        id: &str,
        input: UpdateTipInput,
    ) -> AppResult<learning_tip::Model> {
        input.validate()?;

        let existing = self.repo.get_tip(id).await?;
        let mut active: learning_tip::ActiveModel = existing.into();

        if let Some(title) = input.title {
            active.title = Set(required(&title, "Title")?);
        }
        if let Some(description) = input.description {
            active.description = Set(required(&description, "Description")?);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(icon_key) = input.icon_key {
            active.icon_key = Set(icon_key);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.repo.update_tip(active).await?;
        self.log(
            admin,
            ActivityAction::Update,
            EntityKind::LearningTip,
            &updated.id,
            &updated.title,
            None,
        )
        .await?;
        Ok(updated)
    }

    /// Remove a tip. Returns false when it was already gone.
    pub async fn delete_tip(&self, admin: &user::Model, id: &str) -> AppResult<bool> {
        let Some(existing) = self.repo.find_tip(id).await? else {
            return Ok(false);
        };
        let snapshot = serde_json::to_value(&existing)
            .map_err(|e| AppError::Internal(format!("Failed to snapshot tip: {e}")))?;

        self.repo.delete_tip(id).await?;
        self.log(
            admin,
            ActivityAction::Delete,
            EntityKind::LearningTip,
            &existing.id,
            &existing.title,
            Some(snapshot),
        )
        .await?;
        Ok(true)
    }

    /// Resources, newest first.
    pub async fn list_resources(&self) -> AppResult<Vec<learning_resource::Model>> {
        self.repo.find_resources().await
    }

    /// Publish a resource.
    pub async fn create_resource(
        &self,
        admin: &user::Model,
        input: ResourceInput,
    ) -> AppResult<learning_resource::Model> {
        input.validate()?;

        let model = learning_resource::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(required(&input.title, "Title")?),
            description: Set(required(&input.description, "Description")?),
            resource_type: Set(input.resource_type),
            icon_key: Set(input.icon_key),
            content: Set(input.content),
            duration: Set(input.duration),
            difficulty: Set(input.difficulty),
            created_by_id: Set(Some(admin.id.clone())),
            created_by_name: Set(Some(admin.display_name().to_string())),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.repo.create_resource(model).await?;
        self.log(
            admin,
            ActivityAction::Create,
            EntityKind::LearningResource,
            &created.id,
            &created.title,
            None,
        )
        .await?;
        Ok(created)
    }

    /// Edit a resource.
    pub async fn update_resource(
        &self,
        admin: &user::Model,
        id: &str,
        input: UpdateResourceInput,
    ) -> AppResult<learning_resource::Model> {
        input.validate()?;

        let existing = self.repo.get_resource(id).await?;
        let mut active: learning_resource::ActiveModel = existing.into();

        if let Some(title) = input.title {
            active.title = Set(required(&title, "Title")?);
        }
        if let Some(description) = input.description {
            active.description = Set(required(&description, "Description")?);
        }
        if let Some(resource_type) = input.resource_type {
            active.resource_type = Set(resource_type);
        }
        if let Some(icon_key) = input.icon_key {
            active.icon_key = Set(icon_key);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        if let Some(duration) = input.duration {
            active.duration = Set(duration);
        }
        if let Some(difficulty) = input.difficulty {
            active.difficulty = Set(difficulty);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.repo.update_resource(active).await?;
        self.log(
            admin,
            ActivityAction::Update,
            EntityKind::LearningResource,
            &updated.id,
            &updated.title,
            None,
        )
        .await?;
        Ok(updated)
    }

    /// Remove a resource. Returns false when it was already gone.
    pub async fn delete_resource(&self, admin: &user::Model, id: &str) -> AppResult<bool> {
        let Some(existing) = self.repo.find_resource(id).await? else {
            return Ok(false);
        };
        let snapshot = serde_json::to_value(&existing)
            .map_err(|e| AppError::Internal(format!("Failed to snapshot resource: {e}")))?;

        self.repo.delete_resource(id).await?;
        self.log(
            admin,
            ActivityAction::Delete,
            EntityKind::LearningResource,
            &existing.id,
            &existing.title,
            Some(snapshot),
        )
        .await?;
        Ok(true)
    }

    async fn log(
        &self,
        admin: &user::Model,
        action: ActivityAction,
        entity_type: EntityKind,
        id: &str,
        title: &str,
        deleted_data: Option<serde_json::Value>,
    ) -> AppResult<()> {
        self.activity_log
            .record(
                Some(admin),
                RecordActivityInput {
                    action,
                    entity_type,
                    entity_id: id.to_string(),
                    entity_title: Some(title.to_string()),
                    deleted_data,
                },
            )
            .await?;
        Ok(())
    }
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use florai_db::{
        entities::{activity_log, user::UserRole},
        repositories::ActivityLogRepository,
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> LearningService {
        let db = Arc::new(db);
        LearningService::new(
            LearningRepository::new(db.clone()),
            ActivityLogService::new(ActivityLogRepository::new(db)),
        )
    }

    fn admin() -> user::Model {
        user::Model {
            id: "a1".to_string(),
            username: "admin".to_string(),
            username_lower: "admin".to_string(),
            email: None,
            name: Some("Head Gardener".to_string()),
            avatar_url: None,
            password_hash: String::new(),
            token: None,
            role: UserRole::Admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn tip() -> learning_tip::Model {
        learning_tip::Model {
            id: "t1".to_string(),
            title: "Mulch in spring".to_string(),
            description: "Keeps roots cool.".to_string(),
            category: TipCategory::SoilCare,
            icon_key: "leaf".to_string(),
            created_by_id: Some("a1".to_string()),
            created_by_name: Some("Head Gardener".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn resource() -> learning_resource::Model {
        learning_resource::Model {
            id: "r1".to_string(),
            title: "Pruning basics".to_string(),
            description: "Where to cut.".to_string(),
            resource_type: ResourceType::Guide,
            icon_key: "scissors".to_string(),
            content: "Cut above an outward-facing bud.".to_string(),
            duration: "10 min read".to_string(),
            difficulty: Difficulty::Beginner,
            created_by_id: Some("a1".to_string()),
            created_by_name: Some("Head Gardener".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn log_entry(kind: EntityKind, action: ActivityAction, id: &str) -> activity_log::Model {
        activity_log::Model {
            id: "l1".to_string(),
            action,
            entity_type: kind,
            entity_id: id.to_string(),
            entity_title: None,
            actor_id: Some("a1".to_string()),
            actor_name: Some("Head Gardener".to_string()),
            deleted_data: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_tip_rejects_blank_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create_tip(
                &admin(),
                TipInput {
                    title: "   ".to_string(),
                    description: "Keeps roots cool.".to_string(),
                    category: TipCategory::SoilCare,
                    icon_key: "leaf".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_tip_records_author() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[tip()]])
            .append_query_results([[log_entry(
                EntityKind::LearningTip,
                ActivityAction::Create,
                "t1",
            )]])
            .into_connection();

        let created = service(db)
            .create_tip(
                &admin(),
                TipInput {
                    title: "Mulch in spring".to_string(),
                    description: "Keeps roots cool.".to_string(),
                    category: TipCategory::SoilCare,
                    icon_key: "leaf".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.created_by_name.as_deref(), Some("Head Gardener"));
    }

    #[tokio::test]
    async fn test_delete_tip_logs_snapshot() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[tip()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[log_entry(
                EntityKind::LearningTip,
                ActivityAction::Delete,
                "t1",
            )]])
            .into_connection();

        assert!(service(db).delete_tip(&admin(), "t1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_tip_is_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<learning_tip::Model>::new()])
            .into_connection();

        assert!(!service(db).delete_tip(&admin(), "t9").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_resource_changes_difficulty() {
        let mut changed = resource();
        changed.difficulty = Difficulty::AllLevels;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[resource()]])
            .append_query_results([[changed]])
            .append_query_results([[log_entry(
                EntityKind::LearningResource,
                ActivityAction::Update,
                "r1",
            )]])
            .into_connection();

        let updated = service(db)
            .update_resource(
                &admin(),
                "r1",
                UpdateResourceInput {
                    difficulty: Some(Difficulty::AllLevels),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.difficulty, Difficulty::AllLevels);
    }

    #[tokio::test]
    async fn test_delete_resource_logs_snapshot() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[resource()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[log_entry(
                EntityKind::LearningResource,
                ActivityAction::Delete,
                "r1",
            )]])
            .into_connection();

        assert!(service(db).delete_resource(&admin(), "r1").await.unwrap());
    }

    #[test]
    fn test_resource_input_accepts_display_labels() {
        let input: ResourceInput = serde_json::from_value(serde_json::json!({
            "title": "Composting",
            "description": "Turn waste into soil.",
            "type": "Video Course",
            "iconKey": "video",
            "content": "https://example.org/compost",
            "duration": "25 min",
            "difficulty": "All levels",
        }))
        .unwrap();

        assert_eq!(input.resource_type, ResourceType::VideoCourse);
        assert_eq!(input.difficulty, Difficulty::AllLevels);
    }
}
