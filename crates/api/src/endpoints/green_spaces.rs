//! Green space endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, patch, post},
};
use florai_common::AppResult;
use florai_core::{CreateGreenSpaceInput, UpdateGreenSpaceInput};
use florai_db::entities::green_space;

use crate::{
    extractors::{AdminUser, UploadForm},
    middleware::AppState,
    response::ApiResponse,
};

/// Zones shown on the map.
async fn list_green_spaces(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<green_space::Model>>> {
    let spaces = state.green_space_service.list_active().await?;
    Ok(ApiResponse::ok(spaces))
}

async fn get_green_space(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<green_space::Model>> {
    let space = state.green_space_service.get(&id).await?;
    Ok(ApiResponse::ok(space))
}

async fn create_green_space(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGreenSpaceInput>,
) -> AppResult<ApiResponse<green_space::Model>> {
    let space = state.green_space_service.create(&admin, input).await?;
    Ok(ApiResponse::created(space))
}

async fn update_green_space(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateGreenSpaceInput>,
) -> AppResult<ApiResponse<green_space::Model>> {
    let space = state
        .green_space_service
        .update_meta(&admin, &id, input)
        .await?;
    Ok(ApiResponse::ok(space))
}

/// Hide a zone; its uploads are kept.
async fn delete_green_space(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<green_space::Model>> {
    let space = state.green_space_service.soft_delete(&admin, &id).await?;
    Ok(ApiResponse::ok(space))
}

async fn upload_photo(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<green_space::Model>> {
    let photo = UploadForm::read(multipart).await?.require_file()?;
    let space = state
        .green_space_service
        .upload_photo(&id, &photo.bytes, &photo.content_type)
        .await?;
    Ok(ApiResponse::ok(space))
}

async fn remove_photo(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<green_space::Model>> {
    let space = state.green_space_service.remove_photo(&id).await?;
    Ok(ApiResponse::ok(space))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_green_spaces))
        .route("/{id}", get(get_green_space))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/green-spaces", post(create_green_space))
        .route(
            "/green-spaces/{id}",
            patch(update_green_space).delete(delete_green_space),
        )
        .route(
            "/green-spaces/{id}/photo",
            post(upload_photo).delete(remove_photo),
        )
}
