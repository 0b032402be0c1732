//! Daily streaks and badge unlocks.

use chrono::NaiveDate;
use florai_common::{AppResult, dates};
use florai_db::{entities::user_stats, repositories::UserStatsRepository};
use sea_orm::Set;
use serde::Serialize;
use serde_json::Value;

use super::badges::{BadgeStatus, STREAK_BADGE_THRESHOLDS, badge_statuses};

/// Maximum number of streak resets committed in one transaction.
pub const STREAK_RESET_BATCH_SIZE: usize = 400;

/// Streak counters as shown to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_action_date: Option<NaiveDate>,
    pub badges: Vec<BadgeStatus>,
}

/// Outcome of a stale-streak sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakResetSummary {
    /// Records with a non-zero streak that were examined.
    pub checked: usize,
    /// Records reset to zero.
    pub updated: u64,
}

/// User stats service.
#[derive(Clone)]
pub struct UserStatsService {
    repo: UserStatsRepository,
}

impl UserStatsService {
    /// Create a new user stats service.
    #[must_use]
    pub const fn new(repo: UserStatsRepository) -> Self {
        Self { repo }
    }

    /// Streak counters for a user. Zeros when nothing was recorded yet.
    pub async fn get(&self, user_id: &str, today: NaiveDate) -> AppResult<StreakStats> {
        let Some(stats) = self.repo.find_by_user_id(user_id).await? else {
            return Ok(StreakStats {
                current_streak: 0,
                longest_streak: 0,
                last_action_date: None,
                badges: badge_statuses(0, &Value::Null),
            });
        };

        let current = effective_streak(&stats, today);
        Ok(StreakStats {
            current_streak: current,
            longest_streak: stats.longest_streak,
            last_action_date: stats.last_action_date,
            badges: badge_statuses(current, &stats.badges),
        })
    }

    /// Count an action on `today` towards the user's streak.
    ///
    /// Runs under a row lock; two actions on the same day advance the
    /// streak once.
    pub async fn record_action(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> AppResult<user_stats::Model> {
        let recorded = self
            .repo
            .update_locked(user_id, |stats| advance_streak(stats, today))
            .await?;
        tracing::debug!(user_id = %user_id, streak = recorded.current_streak, "Streak recorded");
        Ok(recorded)
    }

    /// Zero every streak whose last action is neither today nor yesterday.
    pub async fn reset_stale_streaks(&self, today: NaiveDate) -> AppResult<StreakResetSummary> {
        let active = self.repo.find_with_active_streak().await?;
        let stale = stale_user_ids(&active, today);

        let mut summary = StreakResetSummary {
            checked: active.len(),
            updated: 0,
        };

        for batch in stale.chunks(STREAK_RESET_BATCH_SIZE) {
            summary.updated += self.repo.reset_streaks(batch).await?;
        }

        tracing::info!(
            checked = summary.checked,
            updated = summary.updated,
            "Stale streaks reset"
        );
        Ok(summary)
    }
}

/// Streak to display: a lapsed streak reads as zero before the nightly reset.
#[must_use]
pub fn effective_streak(stats: &user_stats::Model, today: NaiveDate) -> i32 {
    match stats.last_action_date {
        Some(last) if dates::is_today_or_yesterday(last, today) => stats.current_streak,
        _ => 0,
    }
}

/// New streak after an action on `today`, or `None` if today already counted.
#[must_use]
pub fn next_streak(current: i32, last: Option<NaiveDate>, today: NaiveDate) -> Option<i32> {
    match last {
        Some(last) if last == today => None,
        Some(last) if last == dates::yesterday_of(today) => Some(current + 1),
        _ => Some(1),
    }
}

/// The row after an action on `today`, or `None` when today already counted.
fn advance_streak(stats: &user_stats::Model, today: NaiveDate) -> Option<user_stats::ActiveModel> {
    let current = next_streak(stats.current_streak, stats.last_action_date, today)?;

    let mut active: user_stats::ActiveModel = stats.clone().into();
    active.current_streak = Set(current);
    active.longest_streak = Set(stats.longest_streak.max(current));
    active.last_action_date = Set(Some(today));
    active.badges = Set(unlock_badges(&stats.badges, current));
    active.updated_at = Set(chrono::Utc::now().into());
    Some(active)
}

/// Ids of users whose streak has lapsed.
#[must_use]
pub fn stale_user_ids(stats: &[user_stats::Model], today: NaiveDate) -> Vec<String> {
    stats
        .iter()
        .filter(|s| {
            !s.last_action_date
                .is_some_and(|last| dates::is_today_or_yesterday(last, today))
        })
        .map(|s| s.user_id.clone())
        .collect()
}

fn unlock_badges(flags: &Value, streak: i32) -> Value {
    let mut map = flags.as_object().cloned().unwrap_or_default();
    for (key, threshold) in STREAK_BADGE_THRESHOLDS {
        if streak >= threshold {
            map.insert(key.to_string(), Value::Bool(true));
        }
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;

    fn day(offset_back: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .checked_sub_days(Days::new(offset_back))
            .unwrap()
    }

    fn stats(user_id: &str, streak: i32, last: Option<NaiveDate>) -> user_stats::Model {
        user_stats::Model {
            user_id: user_id.to_string(),
            current_streak: streak,
            longest_streak: streak,
            last_action_date: last,
            badges: json!({}),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_next_streak() {
        let today = day(0);
        assert_eq!(next_streak(4, Some(today), today), None);
        assert_eq!(next_streak(4, Some(day(1)), today), Some(5));
        assert_eq!(next_streak(4, Some(day(2)), today), Some(1));
        assert_eq!(next_streak(0, None, today), Some(1));
    }

    #[test]
    fn test_effective_streak_lapses() {
        let today = day(0);
        assert_eq!(effective_streak(&stats("u1", 5, Some(day(1))), today), 5);
        assert_eq!(effective_streak(&stats("u1", 5, Some(day(3))), today), 0);
    }

    #[test]
    fn test_unlock_badges_keeps_existing() {
        let badges = unlock_badges(&json!({ "streak30": true }), 7);
        assert_eq!(
            badges,
            json!({ "streak3": true, "streak7": true, "streak30": true })
        );
    }

    #[test]
    fn test_stale_user_ids() {
        let today = day(0);
        let records = vec![
            stats("today", 3, Some(today)),
            stats("yesterday", 3, Some(day(1))),
            stats("lapsed", 3, Some(day(2))),
            stats("never", 3, None),
        ];
        assert_eq!(stale_user_ids(&records, today), vec!["lapsed", "never"]);
    }

    fn insert_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[test]
    fn test_advance_streak_from_fresh_row() {
        let today = day(0);
        let active = advance_streak(&stats("u1", 0, None), today).unwrap();
        assert_eq!(active.current_streak, Set(1));
        assert_eq!(active.longest_streak, Set(1));
        assert_eq!(active.last_action_date, Set(Some(today)));
        assert!(advance_streak(&stats("u1", 1, Some(today)), today).is_none());
    }

    #[tokio::test]
    async fn test_record_action_first_time() {
        let today = day(0);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([insert_result(1)])
                .append_query_results([[stats("u1", 0, None)]])
                .append_query_results([[stats("u1", 1, Some(today))]])
                .into_connection(),
        );

        let service = UserStatsService::new(UserStatsRepository::new(db));
        let recorded = service.record_action("u1", today).await.unwrap();
        assert_eq!(recorded.current_streak, 1);
    }

    #[tokio::test]
    async fn test_record_action_after_concurrent_first_action() {
        // The other request created and advanced the row first; this one
        // finds today already counted instead of failing on the insert.
        let today = day(0);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([insert_result(0)])
                .append_query_results([[stats("u1", 1, Some(today))]])
                .into_connection(),
        );

        let service = UserStatsService::new(UserStatsRepository::new(db));
        let recorded = service.record_action("u1", today).await.unwrap();
        assert_eq!(recorded.current_streak, 1);
        assert_eq!(recorded.last_action_date, Some(today));
    }

    #[tokio::test]
    async fn test_record_action_same_day_is_noop() {
        let today = day(0);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([insert_result(0)])
                .append_query_results([[stats("u1", 4, Some(today))]])
                .into_connection(),
        );

        let service = UserStatsService::new(UserStatsRepository::new(db));
        let recorded = service.record_action("u1", today).await.unwrap();
        assert_eq!(recorded.current_streak, 4);
    }

    #[tokio::test]
    async fn test_reset_stale_streaks_in_batches() {
        let today = day(0);
        let mut records: Vec<user_stats::Model> = (0..401)
            .map(|i| stats(&format!("lapsed{i:03}"), 2, Some(day(2))))
            .collect();
        records.push(stats("active", 6, Some(day(1))));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([records])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 400,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let service = UserStatsService::new(UserStatsRepository::new(db));
        let summary = service.reset_stale_streaks(today).await.unwrap();
        assert_eq!(
            summary,
            StreakResetSummary {
                checked: 402,
                updated: 401
            }
        );
    }
}
