//! Upload counts and leaderboards.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use florai_common::{AppResult, dates};
use florai_db::{
    entities::upload,
    repositories::{UploadRepository, UserRepository},
};
use serde::{Deserialize, Serialize};

/// Number of leaderboard rows returned.
pub const LEADERBOARD_SIZE: usize = 10;

/// Leaderboard period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardMode {
    #[default]
    Weekly,
    Monthly,
}

impl LeaderboardMode {
    /// First instant counted for this period.
    #[must_use]
    pub fn period_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Weekly => dates::week_start(now),
            Self::Monthly => dates::month_start(now),
        }
    }
}

/// Upload totals for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCounts {
    pub total_uploads: u64,
    pub uploads_this_week: u64,
    pub uploads_this_month: u64,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub name: String,
    pub uploads: u64,
}

/// Gamification service.
#[derive(Clone)]
pub struct GamificationService {
    upload_repo: UploadRepository,
    user_repo: UserRepository,
}

impl GamificationService {
    /// Create a new gamification service.
    #[must_use]
    pub const fn new(upload_repo: UploadRepository, user_repo: UserRepository) -> Self {
        Self {
            upload_repo,
            user_repo,
        }
    }

    /// All-time, weekly and monthly upload totals.
    pub async fn upload_counts(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<UploadCounts> {
        let total_uploads = self.upload_repo.count_by_user(user_id, None).await?;
        let uploads_this_week = self
            .upload_repo
            .count_by_user(user_id, Some(dates::week_start(now)))
            .await?;
        let uploads_this_month = self
            .upload_repo
            .count_by_user(user_id, Some(dates::month_start(now)))
            .await?;

        Ok(UploadCounts {
            total_uploads,
            uploads_this_week,
            uploads_this_month,
        })
    }

    /// Top uploaders for the current week or month.
    pub async fn leaderboard(
        &self,
        mode: LeaderboardMode,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let uploads = self.upload_repo.find_since(mode.period_start(now)).await?;
        let top = rank_uploaders(&uploads);

        let ids: Vec<String> = top.iter().map(|(id, _)| id.clone()).collect();
        let names: HashMap<String, String> = self
            .user_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| {
                let name = u.display_name().to_string();
                (u.id, name)
            })
            .collect();

        Ok(top
            .into_iter()
            .enumerate()
            .map(|(i, (user_id, uploads))| LeaderboardEntry {
                rank: i + 1,
                name: names.get(&user_id).cloned().unwrap_or_else(|| user_id.clone()),
                user_id,
                uploads,
            })
            .collect())
    }
}

/// Count uploads per user and keep the top rows.
///
/// Sorted by count descending, then user id ascending.
#[must_use]
pub fn rank_uploaders(uploads: &[upload::Model]) -> Vec<(String, u64)> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for upload in uploads {
        *counts.entry(upload.user_id.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(id, count)| (id.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(LEADERBOARD_SIZE);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use florai_db::entities::upload::ObservationStatus;

    fn upload(user_id: &str) -> upload::Model {
        upload::Model {
            id: florai_common::IdGenerator::new().generate(),
            green_space_id: "g1".to_string(),
            user_id: user_id.to_string(),
            predicted_class: "Healthy".to_string(),
            status: "Healthy".to_string(),
            observation_status: ObservationStatus::Healthy,
            summary_healthy: 1,
            summary_diseased: 0,
            summary_total: 1,
            photo_health: Some(0.67),
            confidence: 0.9,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_rank_uploaders_ties_by_id() {
        let uploads = vec![upload("bob"), upload("amy"), upload("cat"), upload("cat")];
        assert_eq!(
            rank_uploaders(&uploads),
            vec![
                ("cat".to_string(), 2),
                ("amy".to_string(), 1),
                ("bob".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_rank_uploaders_keeps_top_ten() {
        let uploads: Vec<upload::Model> = (0..15).map(|i| upload(&format!("user{i:02}"))).collect();
        let ranked = rank_uploaders(&uploads);
        assert_eq!(ranked.len(), LEADERBOARD_SIZE);
        assert_eq!(ranked[0].0, "user00");
    }

    #[test]
    fn test_period_start() {
        // Thursday
        let now = DateTime::parse_from_rfc3339("2025-06-12T15:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            LeaderboardMode::Weekly.period_start(now).to_rfc3339(),
            "2025-06-09T00:00:00+00:00"
        );
        assert_eq!(
            LeaderboardMode::Monthly.period_start(now).to_rfc3339(),
            "2025-06-01T00:00:00+00:00"
        );
    }
}
