//! Community surveys.

use std::collections::HashSet;

use florai_common::{AppError, AppResult, IdGenerator};
use florai_db::{
    entities::{
        activity_log::{ActivityAction, EntityKind},
        survey, survey_question,
        survey_question::QuestionType,
        survey_response, user,
    },
    repositories::{ALREADY_ANSWERED, SurveyRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::activity_log::{ActivityLogService, RecordActivityInput};

/// One question in a survey definition.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    #[serde(default)]
    pub options: Vec<String>,
}

/// Survey definition sent by an admin.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SurveyInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 4000))]
    #[serde(default)]
    pub description: String,

    #[validate(length(min = 1, max = 100), nested)]
    pub questions: Vec<QuestionInput>,
}

/// A survey with its questions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub survey: survey::Model,
    pub questions: Vec<survey_question::Model>,
}

/// Whether the caller still has to answer a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyAvailability {
    Available,
    Completed,
}

/// A survey as listed to a regular user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSurvey {
    #[serde(flatten)]
    pub survey: survey::Model,
    pub status: SurveyAvailability,
}

/// Survey service.
#[derive(Clone)]
pub struct SurveyService {
    survey_repo: SurveyRepository,
    activity_log: ActivityLogService,
    id_gen: IdGenerator,
}

impl SurveyService {
    /// Create a new survey service.
    #[must_use]
    pub const fn new(survey_repo: SurveyRepository, activity_log: ActivityLogService) -> Self {
        Self {
            survey_repo,
            activity_log,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an unpublished survey.
    pub async fn create(&self, admin: &user::Model, input: SurveyInput) -> AppResult<SurveyDetail> {
        input.validate()?;
        check_questions(&input.questions)?;

        let survey_id = self.id_gen.generate();
        let questions = self.question_rows(&survey_id, &input.questions);

        let model = survey::ActiveModel {
            id: Set(survey_id.clone()),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            is_published: Set(false),
            is_visible: Set(false),
            created_by: Set(admin.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.survey_repo.create(model, questions).await?;
        self.log(admin, ActivityAction::Create, &created, None).await?;

        let questions = self.survey_repo.find_questions(&survey_id).await?;
        Ok(SurveyDetail {
            survey: created,
            questions,
        })
    }

    /// Replace a survey's text and questions.
    pub async fn update(
        &self,
        admin: &user::Model,
        survey_id: &str,
        input: SurveyInput,
    ) -> AppResult<SurveyDetail> {
        input.validate()?;
        check_questions(&input.questions)?;

        let existing = self.survey_repo.get_by_id(survey_id).await?;
        let questions = self.question_rows(survey_id, &input.questions);

        let mut active: survey::ActiveModel = existing.into();
        active.title = Set(input.title.trim().to_string());
        active.description = Set(input.description.trim().to_string());
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self
            .survey_repo
            .update_with_questions(active, survey_id, questions)
            .await?;
        self.log(admin, ActivityAction::Update, &updated, None).await?;

        let questions = self.survey_repo.find_questions(survey_id).await?;
        Ok(SurveyDetail {
            survey: updated,
            questions,
        })
    }

    /// Publish a hidden survey or hide a published one.
    pub async fn toggle_publish(&self, survey_id: &str) -> AppResult<survey::Model> {
        let existing = self.survey_repo.get_by_id(survey_id).await?;
        let publish = !existing.is_published;

        let mut active: survey::ActiveModel = existing.into();
        active.is_published = Set(publish);
        active.is_visible = Set(publish);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.survey_repo.update(active).await?;
        tracing::info!(survey_id = %survey_id, published = publish, "Survey publish state changed");
        Ok(updated)
    }

    /// Delete a survey with its questions and responses.
    pub async fn delete(&self, admin: &user::Model, survey_id: &str) -> AppResult<()> {
        let existing = self.survey_repo.get_by_id(survey_id).await?;
        let snapshot = serde_json::to_value(&existing)
            .map_err(|e| AppError::Internal(format!("Failed to snapshot survey: {e}")))?;

        self.survey_repo.delete(survey_id).await?;
        self.log(admin, ActivityAction::Delete, &existing, Some(snapshot))
            .await?;
        Ok(())
    }

    /// Every survey, for the admin console.
    pub async fn list_all(&self) -> AppResult<Vec<survey::Model>> {
        self.survey_repo.find_all().await
    }

    /// A survey with its questions, regardless of publish state.
    pub async fn get(&self, survey_id: &str) -> AppResult<SurveyDetail> {
        let survey = self.survey_repo.get_by_id(survey_id).await?;
        let questions = self.survey_repo.find_questions(survey_id).await?;
        Ok(SurveyDetail { survey, questions })
    }

    /// Submitted responses to a survey.
    pub async fn list_responses(&self, survey_id: &str) -> AppResult<Vec<survey_response::Model>> {
        self.survey_repo.get_by_id(survey_id).await?;
        self.survey_repo.find_responses(survey_id).await
    }

    /// Open surveys, marked completed where the user already answered.
    pub async fn list_available(&self, user_id: &str) -> AppResult<Vec<AvailableSurvey>> {
        let surveys = self.survey_repo.find_open().await?;
        let answered: HashSet<String> = self
            .survey_repo
            .find_responses_by_user(user_id)
            .await?
            .into_iter()
            .map(|r| r.survey_id)
            .collect();

        Ok(surveys
            .into_iter()
            .map(|survey| {
                let status = if answered.contains(&survey.id) {
                    SurveyAvailability::Completed
                } else {
                    SurveyAvailability::Available
                };
                AvailableSurvey { survey, status }
            })
            .collect())
    }

    /// An open survey the user has not answered yet.
    pub async fn get_for_answer(&self, user_id: &str, survey_id: &str) -> AppResult<SurveyDetail> {
        let survey = self.get_open(survey_id).await?;
        if self
            .survey_repo
            .find_response(survey_id, user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(ALREADY_ANSWERED.to_string()));
        }

        let questions = self.survey_repo.find_questions(survey_id).await?;
        Ok(SurveyDetail { survey, questions })
    }

    /// Record the user's answers.
    pub async fn submit(
        &self,
        user_id: &str,
        survey_id: &str,
        answers: Map<String, Value>,
    ) -> AppResult<survey_response::Model> {
        self.get_open(survey_id).await?;

        if self
            .survey_repo
            .find_response(survey_id, user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(ALREADY_ANSWERED.to_string()));
        }

        let questions = self.survey_repo.find_questions(survey_id).await?;
        let answers = validate_answers(&questions, &answers)?;

        let model = survey_response::ActiveModel {
            id: Set(self.id_gen.generate()),
            survey_id: Set(survey_id.to_string()),
            user_id: Set(user_id.to_string()),
            answers: Set(answers),
            submitted_at: Set(chrono::Utc::now().into()),
        };

        let created = self.survey_repo.create_response(model).await?;
        tracing::info!(survey_id = %survey_id, user_id = %user_id, "Survey answered");
        Ok(created)
    }

    async fn get_open(&self, survey_id: &str) -> AppResult<survey::Model> {
        self.survey_repo
            .find_by_id(survey_id)
            .await?
            .filter(survey::Model::is_open)
            .ok_or_else(|| AppError::NotFound(format!("Survey not found: {survey_id}")))
    }

    fn question_rows(
        &self,
        survey_id: &str,
        questions: &[QuestionInput],
    ) -> Vec<survey_question::ActiveModel> {
        questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let options: Vec<String> = if q.question_type == QuestionType::Mcq {
                    q.options
                        .iter()
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                } else {
                    vec![]
                };
                survey_question::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    survey_id: Set(survey_id.to_string()),
                    position: Set(i32::try_from(i).unwrap_or(i32::MAX)),
                    text: Set(q.text.trim().to_string()),
                    question_type: Set(q.question_type),
                    options: Set(serde_json::json!(options)),
                }
            })
            .collect()
    }

    async fn log(
        &self,
        admin: &user::Model,
        action: ActivityAction,
        survey: &survey::Model,
        deleted_data: Option<Value>,
    ) -> AppResult<()> {
        self.activity_log
            .record(
                Some(admin),
                RecordActivityInput {
                    action,
                    entity_type: EntityKind::Survey,
                    entity_id: survey.id.clone(),
                    entity_title: Some(survey.title.clone()),
                    deleted_data,
                },
            )
            .await?;
        Ok(())
    }
}

fn check_questions(questions: &[QuestionInput]) -> AppResult<()> {
    for q in questions {
        if q.text.trim().is_empty() {
            return Err(AppError::Validation("Question text is required".to_string()));
        }
        if q.question_type == QuestionType::Mcq
            && q.options.iter().filter(|o| !o.trim().is_empty()).count() < 2
        {
            return Err(AppError::Validation(
                "Multiple choice questions need at least two options".to_string(),
            ));
        }
    }
    Ok(())
}

/// Check every question has a usable answer and return the stored map.
pub fn validate_answers(
    questions: &[survey_question::Model],
    answers: &Map<String, Value>,
) -> AppResult<Value> {
    let mut stored = Map::new();

    for question in questions {
        let missing =
            || AppError::Validation(format!("Answer required for question: {}", question.text));
        let raw = answers.get(&question.id).ok_or_else(missing)?;

        let value = match question.question_type {
            QuestionType::Text => {
                let text = raw.as_str().map(str::trim).unwrap_or_default();
                if text.is_empty() {
                    return Err(missing());
                }
                Value::String(text.to_string())
            }
            QuestionType::Mcq => {
                let choice = raw.as_str().map(str::trim).unwrap_or_default();
                if choice.is_empty() {
                    return Err(missing());
                }
                if !question.option_list().iter().any(|o| o == choice) {
                    return Err(AppError::Validation(format!(
                        "Invalid option for question: {}",
                        question.text
                    )));
                }
                Value::String(choice.to_string())
            }
            QuestionType::Rating => {
                let rating = match raw {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) if !s.trim().is_empty() => s.trim().parse::<i64>().ok(),
                    Value::String(_) => return Err(missing()),
                    _ => None,
                };
                match rating {
                    Some(r @ 1..=5) => Value::from(r),
                    _ => {
                        return Err(AppError::Validation(format!(
                            "Rating must be between 1 and 5: {}",
                            question.text
                        )));
                    }
                }
            }
        };

        stored.insert(question.id.clone(), value);
    }

    Ok(Value::Object(stored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use florai_db::repositories::ActivityLogRepository;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    fn question(id: &str, kind: QuestionType, options: Value) -> survey_question::Model {
        survey_question::Model {
            id: id.to_string(),
            survey_id: "s1".to_string(),
            position: 0,
            text: format!("Question {id}"),
            question_type: kind,
            options,
        }
    }

    fn questions() -> Vec<survey_question::Model> {
        vec![
            question("q1", QuestionType::Text, json!([])),
            question("q2", QuestionType::Mcq, json!(["Park", "Garden"])),
            question("q3", QuestionType::Rating, json!([])),
        ]
    }

    fn answers(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn survey(published: bool) -> survey::Model {
        survey::Model {
            id: "s1".to_string(),
            title: "Park usage".to_string(),
            description: String::new(),
            is_published: published,
            is_visible: published,
            created_by: "a1".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: DatabaseConnection) -> SurveyService {
        let db = Arc::new(db);
        SurveyService::new(
            SurveyRepository::new(db.clone()),
            ActivityLogService::new(ActivityLogRepository::new(db)),
        )
    }

    #[test]
    fn test_question_input_keeps_wire_names() {
        let input = QuestionInput {
            text: "Favourite spot?".to_string(),
            question_type: QuestionType::Mcq,
            options: vec!["Park".to_string(), "Garden".to_string()],
        };

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["type"], "mcq");

        let back: QuestionInput = serde_json::from_value(value).unwrap();
        assert_eq!(back.options.len(), 2);
    }

    #[test]
    fn test_validate_answers_accepts_complete() {
        let stored = validate_answers(
            &questions(),
            &answers(json!({ "q1": " weekly ", "q2": "Park", "q3": "4" })),
        )
        .unwrap();
        assert_eq!(stored, json!({ "q1": "weekly", "q2": "Park", "q3": 4 }));
    }

    #[test]
    fn test_validate_answers_rejects_blank() {
        let result = validate_answers(
            &questions(),
            &answers(json!({ "q1": "  ", "q2": "Park", "q3": 3 })),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_answers_rejects_unknown_option() {
        let result = validate_answers(
            &questions(),
            &answers(json!({ "q1": "x", "q2": "Beach", "q3": 3 })),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_answers_rejects_out_of_range_rating() {
        let result = validate_answers(
            &questions(),
            &answers(json!({ "q1": "x", "q2": "Park", "q3": 6 })),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_to_unpublished_survey() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[survey(false)]])
            .into_connection();

        let result = service(db).submit("u1", "s1", Map::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_submit_twice_conflicts() {
        let previous = survey_response::Model {
            id: "r1".to_string(),
            survey_id: "s1".to_string(),
            user_id: "u1".to_string(),
            answers: json!({}),
            submitted_at: Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[survey(true)]])
            .append_query_results([[previous]])
            .into_connection();

        let result = service(db).submit("u1", "s1", Map::new()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
