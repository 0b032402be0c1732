//! Notifications endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use florai_common::AppResult;
use florai_core::{NotificationView, UpdatePreferencesInput};
use florai_db::entities::{notification, notification_preference};
use serde::Serialize;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Mark-all response.
#[derive(Serialize)]
pub struct MarkAllAsReadResponse {
    pub count: u64,
}

/// Unread count response.
#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// The caller's feed, filtered by their preferences.
async fn list_notifications(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<NotificationView>>> {
    let feed = state.notification_service.list_for_user(&user.id).await?;
    Ok(ApiResponse::ok(feed))
}

/// Mark a notification as read.
async fn mark_as_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .notification_service
        .mark_as_read(&user.id, &id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Mark all notifications as read.
async fn mark_all_as_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkAllAsReadResponse>> {
    let count = state
        .notification_service
        .mark_all_as_read(&user.id)
        .await?;
    Ok(ApiResponse::ok(MarkAllAsReadResponse { count }))
}

async fn unread_count(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state.notification_service.count_unread(&user.id).await?;
    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}

async fn get_preferences(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<notification_preference::Model>> {
    let prefs = state.preference_service.get_or_create(&user.id).await?;
    Ok(ApiResponse::ok(prefs))
}

async fn update_preferences(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdatePreferencesInput>,
) -> AppResult<ApiResponse<notification_preference::Model>> {
    let prefs = state.preference_service.update(&user.id, input).await?;
    Ok(ApiResponse::ok(prefs))
}

/// Report alerts addressed to the calling admin.
async fn admin_report_notifications(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<notification::Model>>> {
    let notifications = state
        .notification_service
        .list_admin_reports(&admin.id)
        .await?;
    Ok(ApiResponse::ok(notifications))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/{id}/read", post(mark_as_read))
        .route("/read-all", post(mark_all_as_read))
        .route("/unread-count", get(unread_count))
        .route(
            "/preferences",
            get(get_preferences).put(update_preferences),
        )
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/notifications/reports", get(admin_report_notifications))
}
