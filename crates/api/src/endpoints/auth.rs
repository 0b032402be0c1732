//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{get, post},
};
use florai_common::AppResult;
use florai_core::{SigninInput, SignupInput};
use florai_db::entities::user::{self, UserRole};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, UploadForm},
    middleware::AppState,
    response::ApiResponse,
};

/// Session response: the account and its bearer token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: UserRole,
    pub token: String,
}

impl From<user::Model> for SessionResponse {
    fn from(user: user::Model) -> Self {
        Self {
            name: user.display_name().to_string(),
            id: user.id,
            username: user.username,
            role: user.role,
            token: user.token.unwrap_or_default(),
        }
    }
}

/// Current-user response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: user::Model,
    pub is_admin: bool,
}

/// Signout response.
#[derive(Serialize)]
pub struct SignoutResponse {
    pub ok: bool,
}

/// Create a new user account.
async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.user_service.signup(input).await?;
    Ok(ApiResponse::created(user.into()))
}

/// Sign in to an existing account.
async fn signin(
    State(state): State<AppState>,
    Json(input): Json<SigninInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.user_service.signin(input).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Sign out (invalidate current token by regenerating).
async fn signout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SignoutResponse>> {
    state.user_service.regenerate_token(&user.id).await?;
    Ok(ApiResponse::ok(SignoutResponse { ok: true }))
}

/// The caller's account and role.
async fn me(AuthUser(user): AuthUser) -> AppResult<ApiResponse<MeResponse>> {
    let is_admin = user.is_admin();
    Ok(ApiResponse::ok(MeResponse { user, is_admin }))
}

/// Replace the caller's profile picture.
async fn upload_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<MeResponse>> {
    let picture = UploadForm::read(multipart).await?.require_file()?;
    let user = state
        .profile_service
        .upload_avatar(&user, &picture.bytes, &picture.content_type)
        .await?;
    let is_admin = user.is_admin();
    Ok(ApiResponse::ok(MeResponse { user, is_admin }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
        .route("/i", get(me))
        .route("/i/avatar", post(upload_avatar))
}
