//! HTTP API layer for florai-rs.
//!
//! - **Endpoints**: the JSON routes mounted under `/api`
//! - **Extractors**: bearer-token users, admins and multipart forms
//! - **Middleware**: token authentication and shared state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::Router;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};

/// The `/api` tree with token authentication applied.
pub fn app(state: AppState) -> Router {
    let api = router().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    Router::new().nest("/api", api).with_state(state)
}
