//! Survey endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use florai_common::AppResult;
use florai_core::{AvailableSurvey, SurveyDetail, SurveyInput};
use florai_db::entities::{survey, survey_response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Answers keyed by question id.
#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    pub answers: Map<String, Value>,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

async fn list_available(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AvailableSurvey>>> {
    let surveys = state.survey_service.list_available(&user.id).await?;
    Ok(ApiResponse::ok(surveys))
}

/// A survey the caller has not answered yet.
async fn get_for_answer(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SurveyDetail>> {
    let detail = state.survey_service.get_for_answer(&user.id, &id).await?;
    Ok(ApiResponse::ok(detail))
}

async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitResponseRequest>,
) -> AppResult<ApiResponse<survey_response::Model>> {
    let response = state
        .survey_service
        .submit(&user.id, &id, req.answers)
        .await?;
    Ok(ApiResponse::created(response))
}

async fn list_all(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<survey::Model>>> {
    let surveys = state.survey_service.list_all().await?;
    Ok(ApiResponse::ok(surveys))
}

async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<SurveyInput>,
) -> AppResult<ApiResponse<SurveyDetail>> {
    let detail = state.survey_service.create(&admin, input).await?;
    Ok(ApiResponse::created(detail))
}

async fn get_survey(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SurveyDetail>> {
    let detail = state.survey_service.get(&id).await?;
    Ok(ApiResponse::ok(detail))
}

async fn update(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SurveyInput>,
) -> AppResult<ApiResponse<SurveyDetail>> {
    let detail = state.survey_service.update(&admin, &id, input).await?;
    Ok(ApiResponse::ok(detail))
}

async fn delete_survey(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OkResponse>> {
    state.survey_service.delete(&admin, &id).await?;
    Ok(ApiResponse::ok(OkResponse { ok: true }))
}

/// Flip published and visible together.
async fn toggle_publish(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<survey::Model>> {
    let survey = state.survey_service.toggle_publish(&id).await?;
    Ok(ApiResponse::ok(survey))
}

async fn list_responses(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<survey_response::Model>>> {
    let responses = state.survey_service.list_responses(&id).await?;
    Ok(ApiResponse::ok(responses))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_available))
        .route("/{id}", get(get_for_answer))
        .route("/{id}/responses", post(submit))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/surveys", get(list_all).post(create))
        .route(
            "/surveys/{id}",
            get(get_survey).put(update).delete(delete_survey),
        )
        .route("/surveys/{id}/publish", post(toggle_publish))
        .route("/surveys/{id}/responses", get(list_responses))
}
