//! Learning hub: gardening tips and longer resources.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use florai_common::AppResult;
use florai_core::{ResourceInput, TipInput, UpdateResourceInput, UpdateTipInput};
use florai_db::entities::{learning_resource, learning_tip};
use serde::Serialize;

use crate::{extractors::AdminUser, middleware::AppState, response::ApiResponse};

/// Result of a delete.
#[derive(Serialize)]
pub struct RemoveContentResponse {
    /// `false` when the item did not exist.
    pub removed: bool,
}

async fn list_tips(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<learning_tip::Model>>> {
    let tips = state.learning_service.list_tips().await?;
    Ok(ApiResponse::ok(tips))
}

async fn list_resources(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<learning_resource::Model>>> {
    let resources = state.learning_service.list_resources().await?;
    Ok(ApiResponse::ok(resources))
}

async fn create_tip(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<TipInput>,
) -> AppResult<ApiResponse<learning_tip::Model>> {
    let tip = state.learning_service.create_tip(&admin, input).await?;
    Ok(ApiResponse::created(tip))
}

async fn update_tip(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTipInput>,
) -> AppResult<ApiResponse<learning_tip::Model>> {
    let tip = state.learning_service.update_tip(&admin, &id, input).await?;
    Ok(ApiResponse::ok(tip))
}

async fn delete_tip(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RemoveContentResponse>> {
    let removed = state.learning_service.delete_tip(&admin, &id).await?;
    Ok(ApiResponse::ok(RemoveContentResponse { removed }))
}

async fn create_resource(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<ResourceInput>,
) -> AppResult<ApiResponse<learning_resource::Model>> {
    let resource = state.learning_service.create_resource(&admin, input).await?;
    Ok(ApiResponse::created(resource))
}

async fn update_resource(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateResourceInput>,
) -> AppResult<ApiResponse<learning_resource::Model>> {
    let resource = state
        .learning_service
        .update_resource(&admin, &id, input)
        .await?;
    Ok(ApiResponse::ok(resource))
}

async fn delete_resource(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RemoveContentResponse>> {
    let removed = state.learning_service.delete_resource(&admin, &id).await?;
    Ok(ApiResponse::ok(RemoveContentResponse { removed }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tips", get(list_tips))
        .route("/resources", get(list_resources))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/learning/tips", post(create_tip))
        .route("/learning/tips/{id}", patch(update_tip).delete(delete_tip))
        .route("/learning/resources", post(create_resource))
        .route(
            "/learning/resources/{id}",
            patch(update_resource).delete(delete_resource),
        )
}
