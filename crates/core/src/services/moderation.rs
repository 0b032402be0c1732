//! Moderation service: user reports and admin takedowns.

use florai_common::{AppError, AppResult, IdGenerator};
use florai_db::{
    entities::{
        activity_log::{ActivityAction, EntityKind},
        notification::NotificationType,
        report::{self, ReportStatus, ReportTargetType},
        user,
    },
    repositories::{PostRepository, ReportRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::{
    activity_log::{ActivityLogService, RecordActivityInput},
    notification::{CreateNotificationInput, NotificationService},
    user::UserService,
};

/// Input for reporting content or a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportInput {
    pub target_type: ReportTargetType,

    #[validate(length(min = 1, max = 256))]
    pub target_id: String,

    #[validate(length(min = 1, max = 2000))]
    pub reason: String,

    #[validate(length(max = 4000))]
    pub details: Option<String>,
}

/// Input for an admin changing a report's status.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportStatusInput {
    pub status: ReportStatus,

    #[validate(length(max = 4000))]
    pub admin_notes: Option<String>,
}

/// Moderation service.
#[derive(Clone)]
pub struct ModerationService {
    report_repo: ReportRepository,
    post_repo: PostRepository,
    user_service: UserService,
    notification_service: NotificationService,
    activity_log: ActivityLogService,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        post_repo: PostRepository,
        user_service: UserService,
        notification_service: NotificationService,
        activity_log: ActivityLogService,
    ) -> Self {
        Self {
            report_repo,
            post_repo,
            user_service,
            notification_service,
            activity_log,
            id_gen: IdGenerator::new(),
        }
    }

    /// File a report and notify every admin.
    pub async fn create_report(
        &self,
        reporter_id: &str,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;

        let reason = input.reason.trim().to_string();
        if reason.is_empty() {
            return Err(AppError::Validation("Reason is required".to_string()));
        }

        let target_user_id = match input.target_type {
            ReportTargetType::User => Some(input.target_id.clone()),
            ReportTargetType::Forum => self
                .post_repo
                .find_by_id(&input.target_id)
                .await?
                .map(|p| p.user_id),
            ReportTargetType::Event => None,
        };

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(reporter_id.to_string()),
            target_type: Set(input.target_type),
            target_id: Set(input.target_id),
            target_user_id: Set(target_user_id),
            reason: Set(reason),
            details: Set(input.details.filter(|d| !d.trim().is_empty())),
            status: Set(ReportStatus::Open),
            admin_notes: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            resolved_at: Set(None),
            resolved_by: Set(None),
        };

        let created = self.report_repo.create(model).await?;

        let description = format!(
            "New report: {} ({})",
            created.target_type.as_str(),
            created.target_id
        );
        for admin_id in self.user_service.list_admin_ids().await? {
            self.notification_service
                .create(CreateNotificationInput {
                    notification_type: NotificationType::UserReport,
                    description: description.clone(),
                    user_id: Some(admin_id.clone()),
                    admin_id: Some(admin_id),
                    prediction_id: None,
                    report_id: Some(created.id.clone()),
                })
                .await?;
        }

        tracing::info!(
            report_id = %created.id,
            target_type = created.target_type.as_str(),
            "Report filed"
        );
        Ok(created)
    }

    /// Reports with the given status (all when `None`), newest first.
    pub async fn list_reports(&self, status: Option<ReportStatus>) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_status(status).await
    }

    /// Change a report's status.
    pub async fn update_status(
        &self,
        admin: &user::Model,
        report_id: &str,
        input: UpdateReportStatusInput,
    ) -> AppResult<report::Model> {
        input.validate()?;

        let report = self.report_repo.get_by_id(report_id).await?;
        let mut active: report::ActiveModel = report.into();
        active.status = Set(input.status);
        if let Some(notes) = input.admin_notes {
            active.admin_notes = Set(Some(notes));
        }
        if input.status.is_final() {
            active.resolved_at = Set(Some(chrono::Utc::now().into()));
            active.resolved_by = Set(Some(admin.id.clone()));
        }

        let updated = self.report_repo.update(active).await?;
        tracing::info!(report_id = %report_id, status = ?updated.status, "Report status changed");
        Ok(updated)
    }

    /// Take down a forum post, optionally closing the report that flagged it.
    pub async fn admin_delete_post(
        &self,
        admin: &user::Model,
        post_id: &str,
        report_id: Option<&str>,
    ) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let snapshot = serde_json::to_value(&post)
            .map_err(|e| AppError::Internal(format!("Failed to snapshot post: {e}")))?;

        self.post_repo.delete(post_id).await?;

        self.activity_log
            .record(
                Some(admin),
                RecordActivityInput {
                    action: ActivityAction::Delete,
                    entity_type: EntityKind::ForumPost,
                    entity_id: post.id.clone(),
                    entity_title: Some(post.title.clone()),
                    deleted_data: Some(snapshot),
                },
            )
            .await?;

        if let Some(report_id) = report_id {
            self.update_status(
                admin,
                report_id,
                UpdateReportStatusInput {
                    status: ReportStatus::Resolved,
                    admin_notes: None,
                },
            )
            .await?;
        }

        Ok(())
    }
}
