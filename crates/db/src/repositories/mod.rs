//! Repositories: query helpers over the entities, one per aggregate.

mod activity_log;
mod diary;
mod green_space;
mod learning;
mod notification;
mod notification_preference;
mod post;
mod prediction;
mod report;
mod survey;
mod upload;
mod user;
mod user_stats;

pub use activity_log::ActivityLogRepository;
pub use diary::DiaryRepository;
pub use green_space::{GreenSpaceRepository, ObservationUpdate};
pub use learning::LearningRepository;
pub use notification::NotificationRepository;
pub use notification_preference::NotificationPreferenceRepository;
pub use post::{ALREADY_LIKED, DUPLICATE_CONTENT, DUPLICATE_TITLE, PostRepository};
pub use prediction::PredictionRepository;
pub use report::ReportRepository;
pub use survey::{ALREADY_ANSWERED, SurveyRepository};
pub use upload::UploadRepository;
pub use user::UserRepository;
pub use user_stats::UserStatsRepository;

use florai_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a failed write, reporting a unique-key violation as `Conflict(message)`.
pub(crate) fn write_err(err: DbErr, message: &str) -> AppError {
    classify_write_err(err.sql_err(), &err, message)
}

fn classify_write_err(sql_err: Option<SqlErr>, err: &DbErr, message: &str) -> AppError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message.to_string()),
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = DbErr::Custom("duplicate key".to_string());
        let mapped = classify_write_err(
            Some(SqlErr::UniqueConstraintViolation("pk_post_like".to_string())),
            &err,
            "ALREADY_LIKED",
        );
        assert!(matches!(mapped, AppError::Conflict(ref m) if m == "ALREADY_LIKED"));
    }

    #[test]
    fn test_other_errors_stay_database() {
        let err = DbErr::Custom("connection reset".to_string());
        assert!(matches!(
            classify_write_err(None, &err, "ALREADY_LIKED"),
            AppError::Database(_)
        ));
        assert!(matches!(
            write_err(DbErr::RecordNotInserted, "ALREADY_LIKED"),
            AppError::Database(_)
        ));
    }
}
