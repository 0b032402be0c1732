//! Diary endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use florai_common::{AppError, AppResult};
use florai_core::SaveDiaryEntryInput;
use florai_db::entities::diary_entry;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Dates in paths are `YYYY-MM-DD`.
fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {raw}")))
}

async fn list_entries(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<diary_entry::Model>>> {
    let entries = state.diary_service.list(&user.id).await?;
    Ok(ApiResponse::ok(entries))
}

async fn list_favourites(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<diary_entry::Model>>> {
    let entries = state.diary_service.list_favourites(&user.id).await?;
    Ok(ApiResponse::ok(entries))
}

/// Write the entry for a day.
async fn save_entry(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(input): Json<SaveDiaryEntryInput>,
) -> AppResult<ApiResponse<diary_entry::Model>> {
    let date = parse_date(&date)?;
    let entry = state.diary_service.save(&user.id, date, input).await?;
    Ok(ApiResponse::ok(entry))
}

async fn delete_entry(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state.diary_service.delete(&user.id, &id).await?;
    Ok(ApiResponse::ok(DeletedResponse { deleted: true }))
}

async fn toggle_favourite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<diary_entry::Model>> {
    let entry = state.diary_service.toggle_favourite(&user.id, &id).await?;
    Ok(ApiResponse::ok(entry))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries))
        .route("/favourites", get(list_favourites))
        .route("/{date}", put(save_entry))
        .route("/entries/{id}", delete(delete_entry))
        .route("/entries/{id}/favourite", post(toggle_favourite))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(matches!(parse_date("01/03/2025"), Err(AppError::Validation(_))));
        assert!(matches!(parse_date("2025-02-30"), Err(AppError::Validation(_))));
    }
}
