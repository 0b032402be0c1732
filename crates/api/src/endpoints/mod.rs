//! API endpoints.

mod admin;
mod auth;
mod cron;
mod diary;
mod gamification;
mod green_spaces;
mod learning;
mod notifications;
mod posts;
mod prediction;
mod reports;
mod surveys;
mod uploads;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    let admin = Router::new()
        .merge(admin::admin_router())
        .merge(notifications::admin_router())
        .merge(reports::admin_router())
        .merge(green_spaces::admin_router())
        .merge(learning::admin_router())
        .merge(surveys::admin_router());

    Router::new()
        .merge(auth::router())
        .merge(prediction::router())
        .nest("/notifications", notifications::router())
        .nest("/reports", reports::router())
        .nest("/diary", diary::router())
        .nest("/green-spaces", green_spaces::router())
        .nest("/uploads", uploads::router())
        .nest("/gamification", gamification::router())
        .nest("/posts", posts::router())
        .nest("/surveys", surveys::router())
        .nest("/learning", learning::router())
        .nest("/cron", cron::router())
        .nest("/admin", admin)
}
