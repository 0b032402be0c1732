//! Photo uploads to green spaces.

use florai_common::{AppError, AppResult, IdGenerator, dates};
use florai_db::{
    entities::upload::{self, ObservationStatus},
    repositories::UploadRepository,
};
use sea_orm::Set;
use serde::Serialize;

use super::{
    green_space::GreenSpaceService,
    prediction::{PhotoPrediction, PhotoUpload, PredictionService},
    user_stats::UserStatsService,
};

/// Result of one upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub upload_id: String,
    pub observation_status: ObservationStatus,
    pub prediction: PhotoPrediction,
    pub current_streak: i32,
}

/// Upload service.
#[derive(Clone)]
pub struct UploadService {
    upload_repo: UploadRepository,
    green_spaces: GreenSpaceService,
    predictions: PredictionService,
    user_stats: UserStatsService,
    id_gen: IdGenerator,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub const fn new(
        upload_repo: UploadRepository,
        green_spaces: GreenSpaceService,
        predictions: PredictionService,
        user_stats: UserStatsService,
    ) -> Self {
        Self {
            upload_repo,
            green_spaces,
            predictions,
            user_stats,
            id_gen: IdGenerator::new(),
        }
    }

    /// Score a photo of a green space, record it and count it towards the
    /// user's streak. The photo itself is not kept.
    pub async fn upload_and_predict(
        &self,
        user_id: &str,
        green_space_id: &str,
        photo: PhotoUpload,
    ) -> AppResult<UploadOutcome> {
        let space = self.green_spaces.get(green_space_id).await?;
        if !space.is_active {
            return Err(AppError::NotFound(format!(
                "Green space not found: {green_space_id}"
            )));
        }

        let prediction = self.predictions.predict_photo(photo).await?;
        let observation =
            ObservationStatus::from_counts(prediction.summary.healthy, prediction.summary.diseased);

        let model = upload::ActiveModel {
            id: Set(self.id_gen.generate()),
            green_space_id: Set(green_space_id.to_string()),
            user_id: Set(user_id.to_string()),
            predicted_class: Set(prediction.predicted_class.clone()),
            status: Set(prediction.status.as_str().to_string()),
            observation_status: Set(observation),
            summary_healthy: Set(count_i32(prediction.summary.healthy)),
            summary_diseased: Set(count_i32(prediction.summary.diseased)),
            summary_total: Set(count_i32(prediction.summary.total)),
            photo_health: Set(prediction.photo_health),
            confidence: Set(prediction.confidence),
            created_at: Set(chrono::Utc::now().into()),
        };
        let stored = self.upload_repo.create(model).await?;

        self.green_spaces
            .apply_observation(
                green_space_id,
                observation,
                Some(prediction.predicted_class.clone()),
                Some(prediction.confidence),
            )
            .await?;

        let stats = self.user_stats.record_action(user_id, dates::today()).await?;

        tracing::info!(
            upload_id = %stored.id,
            green_space_id = %green_space_id,
            observation = observation.as_str(),
            "Upload scored"
        );

        Ok(UploadOutcome {
            upload_id: stored.id,
            observation_status: observation,
            prediction,
            current_streak: stats.current_streak,
        })
    }
}

fn count_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        activity_log::ActivityLogService,
        notification::NotificationService,
        notification_preference::NotificationPreferenceService,
        prediction::{PredictionBackend, RiskPrediction, RiskQuery},
    };
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;
    use florai_common::LocalStorage;
    use florai_db::{
        entities::{green_space, user_stats},
        repositories::{
            ActivityLogRepository, GreenSpaceRepository, NotificationPreferenceRepository,
            NotificationRepository, PredictionRepository, ReportRepository, UserStatsRepository,
        },
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use serde_json::{Value, json};
    use std::sync::Arc;

    struct PhotoOnly(Value);

    #[async_trait]
    impl PredictionBackend for PhotoOnly {
        async fn predict(&self, body: Value) -> AppResult<Value> {
            Ok(body)
        }

        async fn predict_all(&self, _query: &RiskQuery) -> AppResult<RiskPrediction> {
            Err(AppError::Config("not used".to_string()))
        }

        async fn predict_photo(&self, _photo: PhotoUpload) -> AppResult<Value> {
            Ok(self.0.clone())
        }
    }

    fn service(db: DatabaseConnection, detector: Value) -> UploadService {
        let db = Arc::new(db);
        let activity_log = ActivityLogService::new(ActivityLogRepository::new(db.clone()));
        let storage = Arc::new(LocalStorage::new(
            std::env::temp_dir().join("florai-upload-tests"),
            "/files".to_string(),
        ));
        let preferences =
            NotificationPreferenceService::new(NotificationPreferenceRepository::new(db.clone()));

        UploadService::new(
            UploadRepository::new(db.clone()),
            GreenSpaceService::new(GreenSpaceRepository::new(db.clone()), storage, activity_log),
            PredictionService::new(
                Arc::new(PhotoOnly(detector)),
                PredictionRepository::new(db.clone()),
                NotificationService::new(
                    NotificationRepository::new(db.clone()),
                    NotificationPreferenceRepository::new(db.clone()),
                    PredictionRepository::new(db.clone()),
                    ReportRepository::new(db.clone()),
                ),
                preferences,
            ),
            UserStatsService::new(UserStatsRepository::new(db)),
        )
    }

    fn space(active: bool) -> green_space::Model {
        green_space::Model {
            id: "g1".to_string(),
            name: "Botanic Gardens".to_string(),
            polygon: json!([]),
            is_active: active,
            total_uploads: 0,
            healthy_uploads: 0,
            health_index: None,
            last_prediction: None,
            last_confidence: None,
            last_status: None,
            photo_url: None,
            created_by: "a1".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn photo() -> PhotoUpload {
        PhotoUpload {
            bytes: Bytes::from_static(b"jpeg"),
            file_name: "leaf.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upload_to_inactive_space() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[space(false)]])
            .into_connection();

        let result = service(db, json!({}))
            .upload_and_predict("u1", "g1", photo())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_inconclusive_upload_skips_green_space() {
        let stored = upload::Model {
            id: "up1".to_string(),
            green_space_id: "g1".to_string(),
            user_id: "u1".to_string(),
            predicted_class: "Unknown".to_string(),
            status: "Unknown".to_string(),
            observation_status: ObservationStatus::Unknown,
            summary_healthy: 0,
            summary_diseased: 0,
            summary_total: 0,
            photo_health: None,
            confidence: 0.0,
            created_at: Utc::now().into(),
        };
        let stats = user_stats::Model {
            user_id: "u1".to_string(),
            current_streak: 1,
            longest_streak: 1,
            last_action_date: Some(dates::today()),
            badges: json!({}),
            updated_at: Utc::now().into(),
        };

        let mut fresh = stats.clone();
        fresh.current_streak = 0;
        fresh.longest_streak = 0;
        fresh.last_action_date = None;

        // green space, upload insert, stats row claim, locked read, stats update
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[space(true)]])
            .append_query_results([[stored]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[fresh]])
            .append_query_results([[stats]])
            .into_connection();

        let outcome = service(db, json!({ "summary": { "healthy": 0, "diseased": 0 } }))
            .upload_and_predict("u1", "g1", photo())
            .await
            .unwrap();

        assert_eq!(outcome.observation_status, ObservationStatus::Unknown);
        assert_eq!(outcome.current_streak, 1);
        assert_eq!(outcome.prediction.photo_health, None);
    }
}
