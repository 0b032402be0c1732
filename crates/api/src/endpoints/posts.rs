//! Forum endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use florai_common::AppResult;
use florai_core::{CreatePostInput, CreateReplyInput, EditPostInput, PostDetail};
use florai_db::entities::{post, post_reply};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

async fn list_posts(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<post::Model>>> {
    let posts = state.post_service.list().await?;
    Ok(ApiResponse::ok(posts))
}

async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<post::Model>> {
    let post = state.post_service.create(&user, input).await?;
    Ok(ApiResponse::created(post))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostDetail>> {
    let detail = state.post_service.get(&id).await?;
    Ok(ApiResponse::ok(detail))
}

async fn edit_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<EditPostInput>,
) -> AppResult<ApiResponse<post::Model>> {
    let post = state.post_service.edit(&user.id, &id, input).await?;
    Ok(ApiResponse::ok(post))
}

async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OkResponse>> {
    state.post_service.delete(&user.id, &id).await?;
    Ok(ApiResponse::ok(OkResponse { ok: true }))
}

async fn add_reply(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateReplyInput>,
) -> AppResult<ApiResponse<post_reply::Model>> {
    let reply = state.post_service.add_reply(&user, &id, input).await?;
    Ok(ApiResponse::created(reply))
}

/// Like a post. A second like answers `409 ALREADY_LIKED`.
async fn like_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OkResponse>> {
    state.post_service.like(&user.id, &id).await?;
    Ok(ApiResponse::ok(OkResponse { ok: true }))
}

async fn view_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OkResponse>> {
    state.post_service.view(&id).await?;
    Ok(ApiResponse::ok(OkResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route(
            "/{id}",
            get(get_post).patch(edit_post).delete(delete_post),
        )
        .route("/{id}/replies", post(add_reply))
        .route("/{id}/like", post(like_post))
        .route("/{id}/view", post(view_post))
}
