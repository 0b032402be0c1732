//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use florai_common::StorageBackend;
use florai_core::{
    ActivityLogService, DiaryService, GamificationService, GreenSpaceService, LearningService,
    ModerationService, NotificationPreferenceService, NotificationService, PostService,
    PredictionBackend, PredictionService, ProfileService, SurveyService, UploadService,
    UserService, UserStatsService,
};
use florai_db::repositories::{
    ActivityLogRepository, DiaryRepository, GreenSpaceRepository, LearningRepository,
    NotificationPreferenceRepository, NotificationRepository, PostRepository, PredictionRepository, ReportRepository,
    SurveyRepository, UploadRepository, UserRepository, UserStatsRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub activity_log_service: ActivityLogService,
    pub notification_service: NotificationService,
    pub preference_service: NotificationPreferenceService,
    pub moderation_service: ModerationService,
    pub diary_service: DiaryService,
    pub green_space_service: GreenSpaceService,
    pub upload_service: UploadService,
    pub user_stats_service: UserStatsService,
    pub gamification_service: GamificationService,
    pub post_service: PostService,
    pub survey_service: SurveyService,
    pub learning_service: LearningService,
    pub profile_service: ProfileService,
    pub prediction_service: PredictionService,
    /// Shared secret for the cron route; `None` leaves it open.
    pub cron_secret: Option<String>,
}

impl AppState {
    /// Wire every repository and service over one connection.
    pub fn new(
        db: Arc<DatabaseConnection>,
        prediction_backend: Arc<dyn PredictionBackend>,
        storage: Arc<dyn StorageBackend>,
        cron_secret: Option<String>,
    ) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let post_repo = PostRepository::new(Arc::clone(&db));
        let upload_repo = UploadRepository::new(Arc::clone(&db));
        let preference_repo = NotificationPreferenceRepository::new(Arc::clone(&db));
        let prediction_repo = PredictionRepository::new(Arc::clone(&db));
        let report_repo = ReportRepository::new(Arc::clone(&db));

        let activity_log_service =
            ActivityLogService::new(ActivityLogRepository::new(Arc::clone(&db)));
        let user_service = UserService::new(user_repo.clone(), activity_log_service.clone());
        let preference_service = NotificationPreferenceService::new(preference_repo.clone());
        let notification_service = NotificationService::new(
            NotificationRepository::new(Arc::clone(&db)),
            preference_repo,
            prediction_repo.clone(),
            report_repo.clone(),
        );
        let moderation_service = ModerationService::new(
            report_repo,
            post_repo.clone(),
            user_service.clone(),
            notification_service.clone(),
            activity_log_service.clone(),
        );
        let profile_service = ProfileService::new(user_repo.clone(), Arc::clone(&storage));
        let green_space_service = GreenSpaceService::new(
            GreenSpaceRepository::new(Arc::clone(&db)),
            storage,
            activity_log_service.clone(),
        );
        let prediction_service = PredictionService::new(
            prediction_backend,
            prediction_repo,
            notification_service.clone(),
            preference_service.clone(),
        );
        let user_stats_service =
            UserStatsService::new(UserStatsRepository::new(Arc::clone(&db)));
        let upload_service = UploadService::new(
            upload_repo.clone(),
            green_space_service.clone(),
            prediction_service.clone(),
            user_stats_service.clone(),
        );

        Self {
            user_service,
            activity_log_service: activity_log_service.clone(),
            notification_service,
            preference_service,
            moderation_service,
            diary_service: DiaryService::new(DiaryRepository::new(Arc::clone(&db))),
            green_space_service,
            upload_service,
            user_stats_service,
            gamification_service: GamificationService::new(upload_repo, user_repo),
            post_service: PostService::new(post_repo),
            survey_service: SurveyService::new(
                SurveyRepository::new(Arc::clone(&db)),
                activity_log_service.clone(),
            ),
            learning_service: LearningService::new(
                LearningRepository::new(Arc::clone(&db)),
                activity_log_service,
            ),
            profile_service,
            prediction_service,
            cron_secret: cron_secret.filter(|s| !s.is_empty()),
        }
    }
}

const BEARER: &str = "Bearer";

/// The bearer token of a request, if any.
///
/// The scheme is matched case-insensitively and may be followed by any run
/// of whitespace.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim_start();
    let (scheme, rest) = value.split_at_checked(BEARER.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER) || !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim()).filter(|t| !t.is_empty())
}

/// Authentication middleware.
///
/// A valid token puts the user into the request extensions. Invalid or
/// missing tokens are not rejected here; the extractors decide.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(req.headers()).map(ToString::to_string) {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
