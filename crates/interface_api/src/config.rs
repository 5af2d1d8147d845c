//! API configuration
//!
//! Layered the usual way: defaults, then an optional `.env` file (loaded by
//! the binary), then `API__`-prefixed environment variables with `__`
//! separating nested keys, e.g. `API__SINKS__BUCKET_NAME`.

use serde::Deserialize;

use core_kernel::{CoreError, SinkConfig};
use infra_db::DatabaseConfig;
use infra_external::{ObjectStoreConfig, SmtpConfig};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
    /// Largest accepted request body, photo included
    pub max_upload_bytes: usize,
    /// Makes the stub damage classifier deterministic
    pub classifier_seed: Option<u64>,
    pub database: DatabaseConfig,
    pub sinks: SinkConfig,
    pub smtp: SmtpConfig,
    pub image_store: ObjectStoreConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            max_upload_bytes: 10 * 1024 * 1024,
            classifier_seed: None,
            database: DatabaseConfig::default(),
            sinks: SinkConfig::default(),
            smtp: SmtpConfig::default(),
            image_store: ObjectStoreConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API__*` environment variables over defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("API").prefix_separator("__").separator("__").try_parsing(true))
    }

    /// Loads configuration from any `config` source over defaults
    pub fn from_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Checks the sink settings
    pub fn validate(&self) -> Result<(), CoreError> {
        self.sinks.validate()?;
        if self.max_upload_bytes == 0 {
            return Err(CoreError::configuration("max_upload_bytes must be positive"));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
