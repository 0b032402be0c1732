//! FlorAI server entry point.

mod jobs;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use florai_api::AppState;
use florai_common::{Config, LocalStorage};
use florai_core::HttpPredictionBackend;
use florai_scheduler::{SchedulerConfig, run_scheduler};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::jobs::ServiceJobExecutor;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "florai=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting florai server...");

    let config = Config::load()?;

    let db = florai_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    florai_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    let prediction_backend = Arc::new(HttpPredictionBackend::new(&config.prediction)?);
    if config.prediction.risk_url.is_none() || config.prediction.photo_url.is_none() {
        tracing::warn!("Prediction service URLs are incomplete; prediction routes will fail");
    }

    tokio::fs::create_dir_all(&config.storage.base_path).await?;
    let storage = Arc::new(LocalStorage::new(
        config.storage.base_path.clone(),
        config.storage.base_url.clone(),
    ));

    let state = AppState::new(
        db,
        prediction_backend,
        storage,
        config.cron.secret.clone(),
    );
    if state.cron_secret.is_none() {
        tracing::warn!("cron.secret is not set; /api/cron routes are open");
    }

    let jobs = run_scheduler(
        SchedulerConfig::from(&config.cron),
        Arc::new(ServiceJobExecutor::new(state.user_stats_service.clone())),
    )
    .await;
    info!(jobs = jobs.len(), "Scheduler started");

    let mut app = florai_api::app(state).route("/health", get(|| async { "ok" }));

    if config.storage.base_url.starts_with('/') {
        app = app.nest_service(
            &config.storage.base_url,
            ServeDir::new(&config.storage.base_path),
        );
    }

    let app: Router = app
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    jobs.abort_all();
    info!("Server shutdown complete");
    Ok(())
}
