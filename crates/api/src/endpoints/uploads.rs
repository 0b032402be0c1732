//! Photo upload endpoint.

use axum::{
    Router,
    extract::{Multipart, State},
    routing::post,
};
use florai_common::{AppError, AppResult};
use florai_core::UploadOutcome;

use crate::{
    extractors::{AuthUser, UploadForm},
    middleware::AppState,
    response::ApiResponse,
};

/// Score a photo taken in a green space.
///
/// Form fields: `file` (the photo) and `greenSpaceId`.
async fn upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<UploadOutcome>> {
    let form = UploadForm::read(multipart).await?;
    let green_space_id = form
        .field("greenSpaceId")
        .map(ToString::to_string)
        .ok_or_else(|| AppError::BadRequest("greenSpaceId is required".to_string()))?;
    let photo = form.require_file()?;

    let outcome = state
        .upload_service
        .upload_and_predict(&user.id, &green_space_id, photo)
        .await?;
    Ok(ApiResponse::created(outcome))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload))
}
