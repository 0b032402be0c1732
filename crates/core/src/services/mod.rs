//! Business logic services.

#![allow(missing_docs)]

pub mod activity_log;
pub mod badges;
pub mod diary;
pub mod gamification;
pub mod green_space;
pub mod learning;
pub mod moderation;
pub mod notification;
pub mod notification_preference;
pub mod post;
pub mod prediction;
pub mod profile;
pub mod survey;
pub mod upload;
pub mod user;
pub mod user_stats;

pub use activity_log::{ActivityLogService, DEFAULT_LOG_LIMIT, RecordActivityInput};
pub use badges::{BADGES, BadgeDefinition, BadgeStatus, badge_statuses, parse_badge_key};
pub use diary::{DiaryService, SaveDiaryEntryInput};
pub use gamification::{GamificationService, LeaderboardEntry, LeaderboardMode, UploadCounts};
pub use green_space::{
    CreateGreenSpaceInput, GreenSpaceService, LatLng, UpdateGreenSpaceInput,
};
pub use learning::{
    LearningService, ResourceInput, TipInput, UpdateResourceInput, UpdateTipInput,
};
pub use moderation::{CreateReportInput, ModerationService, UpdateReportStatusInput};
pub use notification::{CreateNotificationInput, NotificationService, NotificationView};
pub use notification_preference::{
    NotificationPreferenceService, UpdatePreferencesInput, allows_alert,
};
pub use post::{CreatePostInput, CreateReplyInput, EditPostInput, PostDetail, PostService};
pub use prediction::{
    Heatmap, HeatmapInput, HttpPredictionBackend, PhotoPrediction, PhotoUpload,
    PredictionBackend, PredictionService, RiskPrediction, RiskQuery,
};
pub use profile::ProfileService;
pub use survey::{AvailableSurvey, SurveyDetail, SurveyInput, SurveyService};
pub use upload::{UploadOutcome, UploadService};
pub use user::{SigninInput, SignupInput, UserService};
pub use user_stats::{StreakResetSummary, StreakStats, UserStatsService};
