//! Externally triggered jobs.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
};
use florai_common::{AppError, AppResult, dates};
use serde::{Deserialize, Serialize};

use crate::middleware::{AppState, bearer_token};

#[derive(Debug, Default, Deserialize)]
pub struct CronQuery {
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetStreaksResponse {
    pub ok: bool,
    pub checked: usize,
    pub updated: u64,
}

/// Open when no secret is configured; otherwise the `key` query or the
/// bearer token must match it.
fn is_authorized(secret: Option<&str>, key: Option<&str>, bearer: Option<&str>) -> bool {
    match secret {
        None => true,
        Some(secret) => key == Some(secret) || bearer == Some(secret),
    }
}

async fn reset_streaks(
    State(state): State<AppState>,
    Query(query): Query<CronQuery>,
    headers: HeaderMap,
) -> AppResult<Json<ResetStreaksResponse>> {
    if !is_authorized(
        state.cron_secret.as_deref(),
        query.key.as_deref(),
        bearer_token(&headers),
    ) {
        return Err(AppError::Unauthorized);
    }

    let summary = state
        .user_stats_service
        .reset_stale_streaks(dates::today())
        .await?;

    Ok(Json(ResetStreaksResponse {
        ok: true,
        checked: summary.checked,
        updated: summary.updated,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/reset-streaks", get(reset_streaks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_without_secret() {
        assert!(is_authorized(None, None, None));
    }

    #[test]
    fn test_secret_via_key_or_bearer() {
        assert!(is_authorized(Some("s"), Some("s"), None));
        assert!(is_authorized(Some("s"), None, Some("s")));
        assert!(!is_authorized(Some("s"), Some("x"), Some("y")));
        assert!(!is_authorized(Some("s"), None, None));
    }
}
