//! Scheduled jobs for periodic maintenance tasks.

#![allow(missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use florai_common::config::CronConfig;
use serde::{Deserialize, Serialize};
use tokio::{sync::RwLock, task::JoinHandle, time::interval};

/// Scheduled job types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledJob {
    /// Zero streaks whose last action is older than yesterday.
    ResetStaleStreaks,
}

impl ScheduledJob {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ResetStaleStreaks => "reset_stale_streaks",
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether the streak reset runs at all.
    pub streak_reset_enabled: bool,
    /// Interval for the streak reset (default: 1 day).
    pub streak_reset_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            streak_reset_enabled: true,
            streak_reset_interval: Duration::from_secs(86_400),
        }
    }
}

impl From<&CronConfig> for SchedulerConfig {
    fn from(cron: &CronConfig) -> Self {
        Self {
            streak_reset_enabled: cron.streak_reset_enabled,
            // A zero period would make tokio's interval panic.
            streak_reset_interval: Duration::from_secs(cron.streak_reset_interval_secs.max(1)),
        }
    }
}

/// Records examined and changed by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepCounts {
    pub checked: usize,
    pub updated: u64,
}

/// Scheduler state for tracking job runs.
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    pub last_streak_reset: Option<DateTime<Utc>>,
    pub last_streak_reset_counts: Option<SweepCounts>,
    pub streak_reset_failures: u64,
}

/// Job executor trait for scheduled jobs.
#[async_trait::async_trait]
pub trait JobExecutor: Send + Sync {
    /// Execute the stale streak reset.
    async fn reset_stale_streaks(
        &self,
    ) -> Result<SweepCounts, Box<dyn std::error::Error + Send + Sync>>;
}

/// Running job tasks and their shared state.
pub struct JobHandles {
    pub state: Arc<RwLock<SchedulerState>>,
    tasks: Vec<JoinHandle<()>>,
}

impl JobHandles {
    /// Number of spawned job loops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Stop every job loop.
    pub fn abort_all(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Run the scheduler with the given configuration and executor.
pub async fn run_scheduler<E: JobExecutor + 'static>(
    config: SchedulerConfig,
    executor: Arc<E>,
) -> JobHandles {
    let state = Arc::new(RwLock::new(SchedulerState::default()));
    let mut tasks = Vec::new();

    if config.streak_reset_enabled {
        let state = state.clone();
        let period = config.streak_reset_interval;

        tasks.push(tokio::spawn(async move {
            let mut interval = interval(period);
            loop {
                interval.tick().await;
                match executor.reset_stale_streaks().await {
                    Ok(counts) => {
                        tracing::info!(
                            job = ScheduledJob::ResetStaleStreaks.name(),
                            checked = counts.checked,
                            updated = counts.updated,
                            "Reset stale streaks"
                        );
                        let mut state = state.write().await;
                        state.last_streak_reset = Some(Utc::now());
                        state.last_streak_reset_counts = Some(counts);
                    }
                    Err(e) => {
                        tracing::error!(
                            job = ScheduledJob::ResetStaleStreaks.name(),
                            error = %e,
                            "Failed to reset stale streaks"
                        );
                        state.write().await.streak_reset_failures += 1;
                    }
                }
            }
        }));
    } else {
        tracing::info!("Streak reset job disabled");
    }

    JobHandles { state, tasks }
}
