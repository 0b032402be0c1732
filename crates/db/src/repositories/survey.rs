//! Survey repository.

use std::sync::Arc;

use crate::entities::{
    Survey, SurveyQuestion, SurveyResponse, survey, survey_question, survey_response,
};
use florai_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, TryIntoModel, sea_query::OnConflict,
};

use super::write_err;

/// Error message for a second response by the same user.
pub const ALREADY_ANSWERED: &str = "You have already answered this survey";

/// Survey repository for database operations.
#[derive(Clone)]
pub struct SurveyRepository {
    db: Arc<DatabaseConnection>,
}

impl SurveyRepository {
    /// Create a new survey repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a survey by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<survey::Model>> {
        Survey::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a survey by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<survey::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Survey not found: {id}")))
    }

    /// Every survey, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<survey::Model>> {
        Survey::find()
            .order_by_desc(survey::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Published and visible surveys, newest first.
    pub async fn find_open(&self) -> AppResult<Vec<survey::Model>> {
        Survey::find()
            .filter(survey::Column::IsPublished.eq(true))
            .filter(survey::Column::IsVisible.eq(true))
            .order_by_desc(survey::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Questions of a survey in display order.
    pub async fn find_questions(&self, survey_id: &str) -> AppResult<Vec<survey_question::Model>> {
        SurveyQuestion::find()
            .filter(survey_question::Column::SurveyId.eq(survey_id))
            .order_by_asc(survey_question::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a survey and its questions.
    pub async fn create(
        &self,
        model: survey::ActiveModel,
        questions: Vec<survey_question::ActiveModel>,
    ) -> AppResult<survey::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for question in questions {
            question
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Update a survey and replace its questions.
    pub async fn update_with_questions(
        &self,
        model: survey::ActiveModel,
        survey_id: &str,
        questions: Vec<survey_question::ActiveModel>,
    ) -> AppResult<survey::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        SurveyQuestion::delete_many()
            .filter(survey_question::Column::SurveyId.eq(survey_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for question in questions {
            question
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Update survey flags or text only.
    pub async fn update(&self, model: survey::ActiveModel) -> AppResult<survey::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a survey; questions and responses cascade.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Survey::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Responses to a survey, newest first.
    pub async fn find_responses(&self, survey_id: &str) -> AppResult<Vec<survey_response::Model>> {
        SurveyResponse::find()
            .filter(survey_response::Column::SurveyId.eq(survey_id))
            .order_by_desc(survey_response::Column::SubmittedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A user's response to one survey.
    pub async fn find_response(
        &self,
        survey_id: &str,
        user_id: &str,
    ) -> AppResult<Option<survey_response::Model>> {
        SurveyResponse::find()
            .filter(survey_response::Column::SurveyId.eq(survey_id))
            .filter(survey_response::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every response a user has submitted.
    pub async fn find_responses_by_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<survey_response::Model>> {
        SurveyResponse::find()
            .filter(survey_response::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a response. A user's second response is a conflict, even when
    /// both arrive at once.
    pub async fn create_response(
        &self,
        model: survey_response::ActiveModel,
    ) -> AppResult<survey_response::Model> {
        let inserted = SurveyResponse::insert(model.clone())
            .on_conflict(
                OnConflict::columns([
                    survey_response::Column::SurveyId,
                    survey_response::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| write_err(e, ALREADY_ANSWERED))?;

        if inserted == 0 {
            return Err(AppError::Conflict(ALREADY_ANSWERED.to_string()));
        }
        model
            .try_into_model()
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn response() -> survey_response::ActiveModel {
        survey_response::ActiveModel {
            id: Set("r1".to_string()),
            survey_id: Set("s1".to_string()),
            user_id: Set("u1".to_string()),
            answers: Set(serde_json::json!({"q1": "yes"})),
            submitted_at: Set(Utc::now().into()),
        }
    }

    fn repo(rows_affected: u64) -> SurveyRepository {
        SurveyRepository::new(Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected,
                }])
                .into_connection(),
        ))
    }

    #[tokio::test]
    async fn test_create_response() {
        let created = repo(1).create_response(response()).await.unwrap();
        assert_eq!(created.id, "r1");
        assert_eq!(created.user_id, "u1");
    }

    #[tokio::test]
    async fn test_concurrent_second_response_is_conflict() {
        match repo(0).create_response(response()).await {
            Err(AppError::Conflict(message)) => assert_eq!(message, ALREADY_ANSWERED),
            other => panic!("expected conflict, got {other:?}"),
        }
    }
}
