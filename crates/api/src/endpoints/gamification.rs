//! Streaks, badges and the upload leaderboard.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::Utc;
use florai_common::{AppError, AppResult, dates};
use florai_core::{
    BadgeStatus, LeaderboardEntry, LeaderboardMode, StreakStats, UploadCounts, parse_badge_key,
};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Streak counters and upload totals.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub streak: StreakStats,
    #[serde(flatten)]
    pub uploads: UploadCounts,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub mode: LeaderboardMode,
}

async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<StatsResponse>> {
    let streak = state
        .user_stats_service
        .get(&user.id, dates::today())
        .await?;
    let uploads = state
        .gamification_service
        .upload_counts(&user.id, Utc::now())
        .await?;
    Ok(ApiResponse::ok(StatsResponse { streak, uploads }))
}

/// Top uploaders this week (default) or month.
async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<ApiResponse<Vec<LeaderboardEntry>>> {
    let rows = state
        .gamification_service
        .leaderboard(query.mode, Utc::now())
        .await?;
    Ok(ApiResponse::ok(rows))
}

async fn badges(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<BadgeStatus>>> {
    let stats = state
        .user_stats_service
        .get(&user.id, dates::today())
        .await?;
    Ok(ApiResponse::ok(stats.badges))
}

/// One badge, looked up by key or label.
async fn badge(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<ApiResponse<BadgeStatus>> {
    let key = parse_badge_key(&name)
        .ok_or_else(|| AppError::NotFound(format!("Badge not found: {name}")))?;
    let stats = state
        .user_stats_service
        .get(&user.id, dates::today())
        .await?;

    stats
        .badges
        .into_iter()
        .find(|b| b.badge.key == key)
        .map(ApiResponse::ok)
        .ok_or_else(|| AppError::NotFound(format!("Badge not found: {name}")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/leaderboard", get(leaderboard))
        .route("/badges", get(badges))
        .route("/badges/{name}", get(badge))
}
