//! Admin activity log service.

use florai_common::{AppResult, IdGenerator};
use florai_db::{
    entities::{
        activity_log,
        activity_log::{ActivityAction, EntityKind},
        user,
    },
    repositories::ActivityLogRepository,
};
use sea_orm::Set;
use serde_json::Value;

/// Default number of entries shown in the admin console.
pub const DEFAULT_LOG_LIMIT: u64 = 200;
const MAX_LOG_LIMIT: u64 = 500;

/// One thing an admin did.
#[derive(Debug, Clone)]
pub struct RecordActivityInput {
    pub action: ActivityAction,
    pub entity_type: EntityKind,
    pub entity_id: String,
    pub entity_title: Option<String>,
    pub deleted_data: Option<Value>,
}

/// Activity log service.
#[derive(Clone)]
pub struct ActivityLogService {
    repo: ActivityLogRepository,
    id_gen: IdGenerator,
}

impl ActivityLogService {
    /// Create a new activity log service.
    #[must_use]
    pub const fn new(repo: ActivityLogRepository) -> Self {
        Self {
            repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append an entry attributed to `actor`.
    pub async fn record(
        &self,
        actor: Option<&user::Model>,
        input: RecordActivityInput,
    ) -> AppResult<activity_log::Model> {
        let model = activity_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            action: Set(input.action),
            entity_type: Set(input.entity_type),
            entity_id: Set(input.entity_id),
            entity_title: Set(input.entity_title),
            actor_id: Set(actor.map(|a| a.id.clone())),
            actor_name: Set(actor.map(|a| a.display_name().to_string())),
            deleted_data: Set(input.deleted_data),
            created_at: Set(chrono::Utc::now().into()),
        };

        let entry = self.repo.create(model).await?;
        tracing::info!(
            action = ?entry.action,
            entity_type = ?entry.entity_type,
            entity_id = %entry.entity_id,
            "Recorded admin activity"
        );
        Ok(entry)
    }

    /// Recent entries, newest first.
    pub async fn list_recent(&self, limit: Option<u64>) -> AppResult<Vec<activity_log::Model>> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
        self.repo.find_recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn entry(id: &str) -> activity_log::Model {
        activity_log::Model {
            id: id.to_string(),
            action: ActivityAction::Delete,
            entity_type: EntityKind::User,
            entity_id: "u9".to_string(),
            entity_title: Some("bob".to_string()),
            actor_id: Some("admin".to_string()),
            actor_name: Some("Admin".to_string()),
            deleted_data: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_recent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry("l2"), entry("l1")]])
                .into_connection(),
        );

        let service = ActivityLogService::new(ActivityLogRepository::new(db));
        let entries = service.list_recent(Some(10_000)).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "l2");
    }
}
