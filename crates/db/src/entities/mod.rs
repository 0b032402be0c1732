//! Database entities.

pub mod activity_log;
pub mod diary_entry;
pub mod green_space;
pub mod learning_resource;
pub mod learning_tip;
pub mod notification;
pub mod notification_preference;
pub mod notification_read;
pub mod post;
pub mod post_fingerprint;
pub mod post_like;
pub mod post_reply;
pub mod prediction;
pub mod report;
pub mod survey;
pub mod survey_question;
pub mod survey_response;
pub mod upload;
pub mod user;
pub mod user_stats;

pub use activity_log::Entity as ActivityLog;
pub use diary_entry::Entity as DiaryEntry;
pub use green_space::Entity as GreenSpace;
pub use learning_resource::Entity as LearningResource;
pub use learning_tip::Entity as LearningTip;
pub use notification::Entity as Notification;
pub use notification_preference::Entity as NotificationPreference;
pub use notification_read::Entity as NotificationRead;
pub use post::Entity as Post;
pub use post_fingerprint::Entity as PostFingerprint;
pub use post_like::Entity as PostLike;
pub use post_reply::Entity as PostReply;
pub use prediction::Entity as Prediction;
pub use report::Entity as Report;
pub use survey::Entity as Survey;
pub use survey_question::Entity as SurveyQuestion;
pub use survey_response::Entity as SurveyResponse;
pub use upload::Entity as Upload;
pub use user::Entity as User;
pub use user_stats::Entity as UserStats;
