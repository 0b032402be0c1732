//! Prediction proxy and heatmap endpoints.
//!
//! These relay the model services' JSON without the `data` envelope.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use florai_common::AppResult;
use florai_core::{Heatmap, HeatmapInput, PhotoPrediction, RiskPrediction, RiskQuery};
use serde_json::Value;

use crate::{
    extractors::{MaybeAuthUser, UploadForm},
    middleware::AppState,
};

/// Forward a body to the risk model as-is.
async fn predict(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let result = state.prediction_service.predict(body).await?;
    Ok(Json(result))
}

async fn predict_all(
    State(state): State<AppState>,
    Json(query): Json<RiskQuery>,
) -> AppResult<Json<RiskPrediction>> {
    let result = state.prediction_service.predict_all(query).await?;
    Ok(Json(result))
}

/// Score a leaf photo sent as form-data `file`.
async fn predict_health(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<PhotoPrediction>> {
    let photo = UploadForm::read(multipart).await?.require_file()?;
    let result = state.prediction_service.predict_photo(photo).await?;
    Ok(Json(result))
}

/// Risk grid around a clicked point.
async fn heatmap(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(input): Json<HeatmapInput>,
) -> AppResult<Json<Heatmap>> {
    let user_id = user.as_ref().map(|u| u.id.as_str());
    let result = state.prediction_service.heatmap(user_id, input).await?;
    Ok(Json(result))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
        .route("/predict/all", post(predict_all))
        .route("/predict/health", post(predict_health))
        .route("/map/heatmap", post(heatmap))
}
