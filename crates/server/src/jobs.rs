//! Scheduled job bindings to the services.

use florai_common::dates;
use florai_core::UserStatsService;
use florai_scheduler::{JobExecutor, SweepCounts};

/// Runs scheduled jobs against the live services.
#[derive(Clone)]
pub struct ServiceJobExecutor {
    user_stats: UserStatsService,
}

impl ServiceJobExecutor {
    pub const fn new(user_stats: UserStatsService) -> Self {
        Self { user_stats }
    }
}

#[async_trait::async_trait]
impl JobExecutor for ServiceJobExecutor {
    async fn reset_stale_streaks(
        &self,
    ) -> Result<SweepCounts, Box<dyn std::error::Error + Send + Sync>> {
        let summary = self
            .user_stats
            .reset_stale_streaks(dates::today())
            .await?;
        Ok(SweepCounts {
            checked: summary.checked,
            updated: summary.updated,
        })
    }
}
