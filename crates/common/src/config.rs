//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Prediction service endpoints.
    #[serde(default)]
    pub prediction: PredictionConfig,
    /// Scheduled job configuration.
    #[serde(default)]
    pub cron: CronConfig,
    /// Photo storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this deployment.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// External prediction services.
///
/// Both URLs are optional so the server can boot without them; the routes
/// that need a missing URL answer with a configuration error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionConfig {
    /// Base URL of the risk/spread service (`/predict`, `/predictAll`).
    #[serde(default)]
    pub risk_url: Option<String>,
    /// Base URL of the leaf photo service (`/predict`, multipart).
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Scheduled job configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CronConfig {
    /// Shared secret for the cron endpoint. When unset the endpoint is open.
    #[serde(default)]
    pub secret: Option<String>,
    /// Whether the in-process streak reset runs.
    #[serde(default = "default_true")]
    pub streak_reset_enabled: bool,
    /// Interval between streak resets.
    #[serde(default = "default_streak_reset_interval")]
    pub streak_reset_interval_secs: u64,
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            secret: None,
            streak_reset_enabled: true,
            streak_reset_interval_secs: default_streak_reset_interval(),
        }
    }
}

/// Local photo storage.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory photos are written to.
    #[serde(default = "default_storage_path")]
    pub base_path: PathBuf,
    /// URL prefix photos are served from.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_true() -> bool {
    true
}

const fn default_streak_reset_interval() -> u64 {
    86_400
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./files")
}

fn default_storage_url() -> String {
    "/files".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `FLORAI_ENV`)
    /// 3. Environment variables with `FLORAI__` prefix, after reading `.env`
    pub fn load() -> Result<Self, config::ConfigError> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();

        let env = std::env::var("FLORAI_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FLORAI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("FLORAI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let raw = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                url = "http://localhost:3000"

                [database]
                url = "postgres://localhost/florai"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: Config = raw.try_deserialize().unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 100);
        assert!(config.prediction.risk_url.is_none());
        assert!(config.cron.secret.is_none());
        assert!(config.cron.streak_reset_enabled);
        assert_eq!(config.cron.streak_reset_interval_secs, 86_400);
        assert_eq!(config.storage.base_url, "/files");
    }

    #[test]
    fn test_prediction_section() {
        let raw = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                url = "http://localhost:3000"

                [database]
                url = "postgres://localhost/florai"

                [prediction]
                risk_url = "http://model:8000"
                timeout_secs = 5

                [cron]
                secret = "s3cret"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: Config = raw.try_deserialize().unwrap();

        assert_eq!(config.prediction.risk_url.as_deref(), Some("http://model:8000"));
        assert!(config.prediction.photo_url.is_none());
        assert_eq!(config.prediction.timeout_secs, 5);
        assert_eq!(config.cron.secret.as_deref(), Some("s3cret"));
    }
}
