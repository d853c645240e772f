//! Configuration management for the wijnen client.
//!
//! Settings are layered from three sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use wijnen_client::config::ClientConfig;
//!
//! // Load from file with env overrides
//! let config = ClientConfig::load("wijnen.yaml")?;
//!
//! // Or load from environment only
//! let config = ClientConfig::from_env()?;
//! ```

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::batch::{DispatcherConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CONCURRENCY};

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ClientConfig {
    /// Where the wijnen web-api lives and how to authenticate
    #[serde(default)]
    pub connection: ConnectionSettings,

    /// Batching of variation lookups
    #[serde(default)]
    pub batch: BatchSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Connection settings.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct ConnectionSettings {
    /// Hostname or IP address of the web-api
    #[serde(default = "default_host")]
    pub host: String,

    /// Port of the web-api
    #[serde(default = "default_port")]
    pub port: u16,

    /// API key assigned to this client. Hashed before use, never sent as-is.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ConnectionSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

/// Batching settings.
///
/// Override with `WIJNEN_BATCH__CHUNK_SIZE` and `WIJNEN_BATCH__MAX_CONCURRENCY`.
///
/// ```yaml
/// batch:
///   chunk_size: 100
///   max_concurrency: 10
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BatchSettings {
    /// Variations per request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Requests in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl TryFrom<&BatchSettings> for DispatcherConfig {
    type Error = ConfigLoadError;

    fn try_from(settings: &BatchSettings) -> Result<Self, Self::Error> {
        let chunk_size =
            NonZeroUsize::new(settings.chunk_size).ok_or_else(|| ConfigLoadError::Invalid {
                message: "batch.chunk_size must be greater than 0".to_string(),
            })?;
        let max_concurrency =
            NonZeroUsize::new(settings.max_concurrency).ok_or_else(|| ConfigLoadError::Invalid {
                message: "batch.max_concurrency must be greater than 0".to_string(),
            })?;

        Ok(DispatcherConfig::default()
            .with_chunk_size(chunk_size)
            .with_max_concurrency(max_concurrency))
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ClientConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `WIJNEN_` and use `__` as separator:
    /// - `WIJNEN_CONNECTION__PORT=9090` overrides `connection.port`
    /// - `WIJNEN_CONNECTION__API_KEY=...` overrides `connection.api_key`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ClientConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(env_source())
            .build()?;

        let client_config: ClientConfig = config.try_deserialize()?;
        client_config.validate()?;

        Ok(client_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ClientConfig::default())?)
            .add_source(env_source())
            .build()?;

        let client_config: ClientConfig = config.try_deserialize()?;
        client_config.validate()?;

        Ok(client_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.connection.host.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "connection.host must not be empty".to_string(),
            });
        }

        if self.connection.port == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "connection.port must be greater than 0".to_string(),
            });
        }

        if self.connection.request_timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "connection.request_timeout_secs must be greater than 0".to_string(),
            });
        }

        DispatcherConfig::try_from(&self.batch)?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }
}

// WIJNEN_CONNECTION__HOST -> connection.host
fn env_source() -> Environment {
    Environment::with_prefix("WIJNEN")
        .prefix_separator("_")
        .separator("__")
}
