//! Admin console: account removal and the activity log.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{delete, get},
};
use florai_common::AppResult;
use florai_db::entities::activity_log;
use serde::{Deserialize, Serialize};

use crate::{extractors::AdminUser, middleware::AppState, response::ApiResponse};

#[derive(Debug, Deserialize)]
pub struct ActivityLogQuery {
    pub limit: Option<u64>,
}

/// Result of removing an account.
#[derive(Serialize)]
pub struct RemoveUserResponse {
    /// `false` when the account did not exist.
    pub removed: bool,
}

async fn remove_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RemoveUserResponse>> {
    let removed = state.user_service.admin_remove_user(&admin, &id).await?;
    Ok(ApiResponse::ok(RemoveUserResponse { removed }))
}

async fn activity_logs(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ActivityLogQuery>,
) -> AppResult<ApiResponse<Vec<activity_log::Model>>> {
    let entries = state.activity_log_service.list_recent(query.limit).await?;
    Ok(ApiResponse::ok(entries))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}", delete(remove_user))
        .route("/activity-logs", get(activity_logs))
}
