//! Report endpoints and the admin review queue.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use florai_common::{AppError, AppResult};
use florai_core::{CreateReportInput, UpdateReportStatusInput};
use florai_db::entities::report::{self, ReportStatus};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Status filter for the review queue. Defaults to `open`.
#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    pub status: Option<String>,
}

/// Parse the status filter; `all` lifts it.
fn status_filter(raw: Option<&str>) -> AppResult<Option<ReportStatus>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Some(ReportStatus::Open)),
        Some("all") => Ok(None),
        Some(value) => serde_json::from_value(serde_json::Value::String(value.to_string()))
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Unknown report status: {value}"))),
    }
}

/// Optional report closed by a post takedown.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostQuery {
    pub report_id: Option<String>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// File a report.
async fn create_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReportInput>,
) -> AppResult<ApiResponse<report::Model>> {
    let report = state
        .moderation_service
        .create_report(&user.id, input)
        .await?;
    Ok(ApiResponse::created(report))
}

async fn list_reports(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<ApiResponse<Vec<report::Model>>> {
    let status = status_filter(query.status.as_deref())?;
    let reports = state.moderation_service.list_reports(status).await?;
    Ok(ApiResponse::ok(reports))
}

async fn update_report_status(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateReportStatusInput>,
) -> AppResult<ApiResponse<report::Model>> {
    let report = state
        .moderation_service
        .update_status(&admin, &id, input)
        .await?;
    Ok(ApiResponse::ok(report))
}

/// Take down a forum post.
async fn delete_post(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeletePostQuery>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state
        .moderation_service
        .admin_delete_post(&admin, &id, query.report_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(DeletedResponse { deleted: true }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_report))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/reports/{id}/status", post(update_report_status))
        .route("/posts/{id}", delete(delete_post))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter() {
        assert_eq!(status_filter(None).unwrap(), Some(ReportStatus::Open));
        assert_eq!(status_filter(Some("all")).unwrap(), None);
        assert_eq!(
            status_filter(Some("resolved")).unwrap(),
            Some(ReportStatus::Resolved)
        );
        assert!(matches!(
            status_filter(Some("closed")),
            Err(AppError::BadRequest(_))
        ));
    }
}
