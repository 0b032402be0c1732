//! Periodic background jobs for florai-rs.
//!
//! Jobs run on tokio intervals inside the server process. The work itself
//! sits behind [`JobExecutor`], so this crate knows nothing about services.

pub mod scheduler;

pub use scheduler::{
    JobExecutor, JobHandles, ScheduledJob, SchedulerConfig, SchedulerState, SweepCounts,
    run_scheduler,
};
