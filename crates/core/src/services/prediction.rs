//! Client for the external prediction services, photo normalization and
//! the risk heatmap.
//!
//! Two services sit behind [`PredictionBackend`]: a JSON risk/spread model
//! (`/predict`, `/predictAll`) and a leaf-photo detector (`/predict`,
//! multipart). [`HttpPredictionBackend`] talks to them over HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use florai_common::{AppError, AppResult, IdGenerator, config::PredictionConfig};
use florai_db::{
    entities::{prediction, prediction::RiskLevel},
    repositories::PredictionRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{
    notification::NotificationService,
    notification_preference::{NotificationPreferenceService, allows_alert},
};

/// Grid spacing of the heatmap in degrees.
pub const HEATMAP_STEP_DEG: f64 = 0.002;
/// Cells on each side of the centre.
pub const HEATMAP_RADIUS: i32 = 2;

/// Conditions at one point, as the risk model expects them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct RiskQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub temperature: f64,
    pub rainfall: f64,
    pub humidity: f64,
}

/// Risk and spread for one point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub risk_level: String,
    pub spread_distance_km: f64,
    pub spread_direction_deg: f64,
    #[serde(rename = "predictionID", default, skip_serializing_if = "Option::is_none")]
    pub prediction_id: Option<String>,
}

/// A photo to score.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: String,
}

/// Photo health bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthLevel {
    Healthy,
    Moderate,
    Unhealthy,
    Unknown,
}

impl HealthLevel {
    /// Bucket for a smoothed health score.
    #[must_use]
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= 0.8 => Self::Healthy,
            Some(s) if s >= 0.6 => Self::Moderate,
            Some(_) => Self::Unhealthy,
            None => Self::Unknown,
        }
    }

    /// Label stored on uploads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Moderate => "Moderate",
            Self::Unhealthy => "Unhealthy",
            Self::Unknown => "Unknown",
        }
    }
}

/// Detection counts in a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionSummary {
    pub healthy: u32,
    pub diseased: u32,
    pub total: u32,
}

/// A photo prediction in the shape the app consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPrediction {
    pub predicted_class: String,
    pub confidence: f64,
    pub status: HealthLevel,
    pub summary: DetectionSummary,
    pub photo_health: Option<f64>,
    pub photo_health_percent: Option<i64>,
    pub detections: Value,
}

/// Turn the detector's raw answer into a [`PhotoPrediction`].
#[must_use]
pub fn normalize_photo_prediction(raw: &Value) -> PhotoPrediction {
    let healthy = as_count(raw.pointer("/summary/healthy"));
    let diseased = as_count(raw.pointer("/summary/diseased"));
    let total = healthy.saturating_add(diseased);

    // Laplace smoothing so a single detection does not read as 0% or 100%.
    let photo_health =
        (total > 0).then(|| (f64::from(healthy) + 1.0) / (f64::from(total) + 2.0));

    let predicted_class = raw
        .get("status")
        .and_then(Value::as_str)
        .or_else(|| raw.get("predictedClass").and_then(Value::as_str))
        .unwrap_or("Unknown")
        .to_string();

    let detections = raw.get("detections").cloned().unwrap_or(Value::Null);
    let confidence = detections
        .as_array()
        .into_iter()
        .flatten()
        .map(|d| d.get("confidence").and_then(as_f64).unwrap_or(0.0))
        .reduce(f64::max)
        .unwrap_or(0.0);

    PhotoPrediction {
        predicted_class,
        confidence,
        status: HealthLevel::from_score(photo_health),
        summary: DetectionSummary {
            healthy,
            diseased,
            total,
        },
        photo_health,
        photo_health_percent: photo_health.map(|h| (h * 100.0).round() as i64),
        detections,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_count(value: Option<&Value>) -> u32 {
    value
        .and_then(as_f64)
        .filter(|n| n.is_finite() && *n > 0.0)
        .map_or(0, |n| n.min(f64::from(u32::MAX)) as u32)
}

/// Access to the prediction services.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Relay a JSON body to the risk model's `/predict`.
    async fn predict(&self, body: Value) -> AppResult<Value>;

    /// Risk and spread for one point.
    async fn predict_all(&self, query: &RiskQuery) -> AppResult<RiskPrediction>;

    /// Raw detector output for a photo.
    async fn predict_photo(&self, photo: PhotoUpload) -> AppResult<Value>;
}

/// HTTP implementation of [`PredictionBackend`].
pub struct HttpPredictionBackend {
    http_client: reqwest::Client,
    risk_url: Option<String>,
    photo_url: Option<String>,
}

impl HttpPredictionBackend {
    /// Build a client with the configured base URLs and timeout.
    pub fn new(config: &PredictionConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            risk_url: config.risk_url.clone(),
            photo_url: config.photo_url.clone(),
        })
    }

    fn endpoint(base: Option<&String>, setting: &str, path: &str) -> AppResult<String> {
        let base = base
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| AppError::Config(format!("prediction.{setting} is not configured")))?;
        Ok(format!("{}/{path}", base.trim_end_matches('/')))
    }
}

#[async_trait]
impl PredictionBackend for HttpPredictionBackend {
    async fn predict(&self, body: Value) -> AppResult<Value> {
        let url = Self::endpoint(self.risk_url.as_ref(), "risk_url", "predict")?;

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::BadGateway(format!("Failed to reach {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::BadGateway(format!("Invalid response from {url}: {e}")))
    }

    async fn predict_all(&self, query: &RiskQuery) -> AppResult<RiskPrediction> {
        let url = Self::endpoint(self.risk_url.as_ref(), "risk_url", "predictAll")?;

        let response = self
            .http_client
            .post(&url)
            .json(query)
            .send()
            .await
            .map_err(|e| AppError::BadGateway(format!("Failed to reach {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status,
                message: format!("Prediction failed: {details}"),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::BadGateway(format!("Invalid response from {url}: {e}")))
    }

    async fn predict_photo(&self, photo: PhotoUpload) -> AppResult<Value> {
        let url = Self::endpoint(self.photo_url.as_ref(), "photo_url", "predict")?;

        let part = reqwest::multipart::Part::bytes(photo.bytes.to_vec())
            .file_name(photo.file_name)
            .mime_str(&photo.content_type)
            .map_err(|e| AppError::BadRequest(format!("Invalid content type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::BadGateway(format!("Failed to reach {url}: {e}")))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| AppError::BadGateway(format!("Failed to read response from {url}: {e}")))?;

        let data: Value = if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw).map_err(|_| {
                AppError::BadGateway(format!("Prediction service returned non-JSON ({status})"))
            })?
        };

        if !status.is_success() {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Prediction service error")
                .to_string();
            return Err(AppError::Upstream { status, message });
        }

        Ok(data)
    }
}

/// Heatmap request: a clicked point and the weather there.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct HeatmapInput {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub temperature: f64,
    pub rainfall: f64,
    pub humidity: f64,
}

/// One heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
}

/// Heatmap around a point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    pub points: Vec<HeatPoint>,
    pub risk_level: String,
    pub spread_distance_km: f64,
    pub spread_direction_deg: f64,
    pub prediction_id: Option<String>,
}

/// Intensity of a cell from its risk label and spread distance.
#[must_use]
pub fn cell_intensity(risk_level: &str, spread_distance_km: f64) -> f64 {
    let base = match RiskLevel::parse(risk_level) {
        Some(RiskLevel::Low) => 0.2,
        Some(RiskLevel::Medium) => 0.5,
        Some(RiskLevel::High) => 0.8,
        None => 0.0,
    };
    (base + spread_distance_km.max(0.0) / 10.0).min(1.0)
}

/// Grid offsets in steps, centre first.
#[must_use]
pub fn grid_offsets() -> Vec<(i32, i32)> {
    let mut offsets = vec![(0, 0)];
    for i in -HEATMAP_RADIUS..=HEATMAP_RADIUS {
        for j in -HEATMAP_RADIUS..=HEATMAP_RADIUS {
            if (i, j) != (0, 0) {
                offsets.push((i, j));
            }
        }
    }
    offsets
}

/// Prediction service.
#[derive(Clone)]
pub struct PredictionService {
    backend: Arc<dyn PredictionBackend>,
    prediction_repo: PredictionRepository,
    notification_service: NotificationService,
    preference_service: NotificationPreferenceService,
    id_gen: IdGenerator,
}

impl PredictionService {
    /// Create a new prediction service.
    #[must_use]
    pub fn new(
        backend: Arc<dyn PredictionBackend>,
        prediction_repo: PredictionRepository,
        notification_service: NotificationService,
        preference_service: NotificationPreferenceService,
    ) -> Self {
        Self {
            backend,
            prediction_repo,
            notification_service,
            preference_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Relay a request to the risk model unchanged.
    pub async fn predict(&self, body: Value) -> AppResult<Value> {
        self.backend.predict(body).await
    }

    /// Risk and spread for one point.
    pub async fn predict_all(&self, query: RiskQuery) -> AppResult<RiskPrediction> {
        query.validate()?;
        self.backend.predict_all(&query).await
    }

    /// Score a leaf photo.
    pub async fn predict_photo(&self, photo: PhotoUpload) -> AppResult<PhotoPrediction> {
        if photo.bytes.is_empty() {
            return Err(AppError::BadRequest(
                "No file uploaded (expected form-data key: 'file')".to_string(),
            ));
        }
        let raw = self.backend.predict_photo(photo).await?;
        Ok(normalize_photo_prediction(&raw))
    }

    /// Sample a 5x5 grid around a point.
    ///
    /// Cells are requested one after another. A failing outer cell is left
    /// out; a failing centre fails the request. The centre prediction is
    /// stored and may raise an alert for `user_id`.
    pub async fn heatmap(&self, user_id: Option<&str>, input: HeatmapInput) -> AppResult<Heatmap> {
        input.validate()?;

        let mut points = Vec::with_capacity(25);
        let mut centre: Option<RiskPrediction> = None;

        for (i, j) in grid_offsets() {
            let query = RiskQuery {
                latitude: input.latitude + f64::from(i) * HEATMAP_STEP_DEG,
                longitude: input.longitude + f64::from(j) * HEATMAP_STEP_DEG,
                temperature: input.temperature,
                rainfall: input.rainfall,
                humidity: input.humidity,
            };

            let cell = match self.backend.predict_all(&query).await {
                Ok(cell) => cell,
                Err(e) if (i, j) != (0, 0) => {
                    tracing::warn!(lat = query.latitude, lng = query.longitude, error = %e, "Heatmap cell failed");
                    continue;
                }
                Err(e) => return Err(e),
            };

            points.push(HeatPoint {
                lat: query.latitude,
                lng: query.longitude,
                intensity: cell_intensity(&cell.risk_level, cell.spread_distance_km),
            });
            if (i, j) == (0, 0) {
                centre = Some(cell);
            }
        }

        let centre = centre.ok_or_else(|| {
            AppError::Internal("Heatmap centre cell was not computed".to_string())
        })?;

        let prediction_id = self.store_centre(user_id, &input, &centre).await?;

        Ok(Heatmap {
            points,
            risk_level: centre.risk_level,
            spread_distance_km: centre.spread_distance_km,
            spread_direction_deg: centre.spread_direction_deg,
            prediction_id,
        })
    }

    async fn store_centre(
        &self,
        user_id: Option<&str>,
        input: &HeatmapInput,
        centre: &RiskPrediction,
    ) -> AppResult<Option<String>> {
        let Some(risk) = RiskLevel::parse(&centre.risk_level) else {
            tracing::warn!(risk = %centre.risk_level, "Unrecognised risk level, prediction not stored");
            return Ok(None);
        };

        let model = prediction::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.map(str::to_string)),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            temperature: Set(input.temperature),
            rainfall: Set(input.rainfall),
            humidity: Set(input.humidity),
            risk_level: Set(risk),
            spread_distance_km: Set(centre.spread_distance_km),
            spread_direction_deg: Set(centre.spread_direction_deg),
            external_id: Set(centre.prediction_id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };
        let saved = self.prediction_repo.create(model).await?;

        if let Some(user_id) = user_id {
            let prefs = self.preference_service.get_or_create(user_id).await?;
            if allows_alert(&prefs, risk) {
                self.notification_service
                    .create_ai_alert(user_id, &saved)
                    .await?;
            }
        }

        Ok(Some(saved.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification_preference::default_preferences;
    use chrono::Utc;
    use florai_db::repositories::{
        NotificationPreferenceRepository, NotificationRepository, ReportRepository,
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every cell with the same prediction, failing the listed calls.
    struct FakeBackend {
        answer: RiskPrediction,
        fail_calls: Vec<usize>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(risk: &str, spread: f64, fail_calls: Vec<usize>) -> Self {
            Self {
                answer: RiskPrediction {
                    risk_level: risk.to_string(),
                    spread_distance_km: spread,
                    spread_direction_deg: 45.0,
                    prediction_id: None,
                },
                fail_calls,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PredictionBackend for FakeBackend {
        async fn predict(&self, body: Value) -> AppResult<Value> {
            Ok(body)
        }

        async fn predict_all(&self, _query: &RiskQuery) -> AppResult<RiskPrediction> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_calls.contains(&call) {
                return Err(AppError::Upstream {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    message: "down".to_string(),
                });
            }
            Ok(self.answer.clone())
        }

        async fn predict_photo(&self, _photo: PhotoUpload) -> AppResult<Value> {
            Ok(json!({ "summary": { "healthy": 3, "diseased": 0 } }))
        }
    }

    fn service(backend: FakeBackend, db: DatabaseConnection) -> PredictionService {
        let db = Arc::new(db);
        PredictionService::new(
            Arc::new(backend),
            PredictionRepository::new(db.clone()),
            NotificationService::new(
                NotificationRepository::new(db.clone()),
                NotificationPreferenceRepository::new(db.clone()),
                PredictionRepository::new(db.clone()),
                ReportRepository::new(db.clone()),
            ),
            NotificationPreferenceService::new(NotificationPreferenceRepository::new(db)),
        )
    }

    fn stored_prediction(risk: RiskLevel) -> prediction::Model {
        prediction::Model {
            id: "p1".to_string(),
            user_id: None,
            latitude: 1.35,
            longitude: 103.8,
            temperature: 31.0,
            rainfall: 0.0,
            humidity: 70.0,
            risk_level: risk,
            spread_distance_km: 2.0,
            spread_direction_deg: 45.0,
            external_id: None,
            created_at: Utc::now().into(),
        }
    }

    fn input() -> HeatmapInput {
        HeatmapInput {
            latitude: 1.35,
            longitude: 103.8,
            temperature: 31.0,
            rainfall: 0.0,
            humidity: 70.0,
        }
    }

    #[test]
    fn test_normalize_photo_prediction() {
        let raw = json!({
            "status": "Leaf Spot",
            "summary": { "healthy": 3, "diseased": 1 },
            "detections": [{ "confidence": 0.42 }, { "confidence": "0.91" }]
        });
        let p = normalize_photo_prediction(&raw);

        assert_eq!(p.predicted_class, "Leaf Spot");
        assert_eq!(p.summary.total, 4);
        assert_eq!(p.photo_health, Some(4.0 / 6.0));
        assert_eq!(p.photo_health_percent, Some(67));
        assert_eq!(p.status, HealthLevel::Moderate);
        assert_eq!(p.confidence, 0.91);
    }

    #[test]
    fn test_normalize_without_detections() {
        let p = normalize_photo_prediction(&json!({ "predictedClass": "Healthy" }));

        assert_eq!(p.predicted_class, "Healthy");
        assert_eq!(p.summary.total, 0);
        assert_eq!(p.photo_health, None);
        assert_eq!(p.photo_health_percent, None);
        assert_eq!(p.status, HealthLevel::Unknown);
        assert_eq!(p.confidence, 0.0);
        assert_eq!(p.detections, Value::Null);
    }

    #[test]
    fn test_health_level_thresholds() {
        assert_eq!(HealthLevel::from_score(Some(0.8)), HealthLevel::Healthy);
        assert_eq!(HealthLevel::from_score(Some(0.6)), HealthLevel::Moderate);
        assert_eq!(HealthLevel::from_score(Some(0.59)), HealthLevel::Unhealthy);
    }

    #[test]
    fn test_cell_intensity() {
        assert_eq!(cell_intensity("Low", 0.0), 0.2);
        assert_eq!(cell_intensity("medium", 1.0), 0.6);
        assert_eq!(cell_intensity("High", 5.0), 1.0);
        assert_eq!(cell_intensity("???", 0.0), 0.0);
    }

    #[test]
    fn test_grid_offsets() {
        let offsets = grid_offsets();
        assert_eq!(offsets.len(), 25);
        assert_eq!(offsets[0], (0, 0));
        assert_eq!(offsets.iter().filter(|o| **o == (0, 0)).count(), 1);
    }

    #[tokio::test]
    async fn test_heatmap_skips_failed_cells() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored_prediction(RiskLevel::Medium)]])
            .into_connection();

        let heatmap = service(FakeBackend::new("Medium", 1.0, vec![3, 7]), db)
            .heatmap(None, input())
            .await
            .unwrap();

        assert_eq!(heatmap.points.len(), 23);
        assert_eq!(heatmap.risk_level, "Medium");
        assert_eq!(heatmap.prediction_id.as_deref(), Some("p1"));
        assert_eq!(heatmap.points[0].lat, 1.35);
    }

    #[tokio::test]
    async fn test_heatmap_centre_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(FakeBackend::new("High", 1.0, vec![0]), db)
            .heatmap(None, input())
            .await;

        assert!(matches!(result, Err(AppError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_heatmap_below_min_severity_skips_alert() {
        let prefs = default_preferences("u1");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored_prediction(RiskLevel::Low)]])
            .append_query_results([[prefs]])
            .into_connection();

        let heatmap = service(FakeBackend::new("Low", 0.0, vec![]), db)
            .heatmap(Some("u1"), input())
            .await
            .unwrap();

        assert_eq!(heatmap.points.len(), 25);
    }

    #[tokio::test]
    async fn test_predict_photo_requires_file() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(FakeBackend::new("Low", 0.0, vec![]), db)
            .predict_photo(PhotoUpload {
                bytes: Bytes::new(),
                file_name: "leaf.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
