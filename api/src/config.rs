//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use shared::queue::DEFAULT_QUEUE_KEY;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable is set but its value is not usable.
    #[error("Invalid value for {var}: {message}")]
    InvalidValue {
        /// Name of the offending variable.
        var: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Output format for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected 'text' or 'json'")),
        }
    }
}

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `LOGSINK_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `LOGSINK_PORT`: The port to listen on (default: 8080)
/// - `LOGSINK_REDIS_URL`: Redis connection URL (default: "redis://127.0.0.1:6379")
/// - `LOGSINK_QUEUE_KEY`: List key entries are pushed under (default: "logs")
/// - `LOGSINK_QUEUE_TIMEOUT_MS`: Deadline for each queue operation (default: 2000)
/// - `LOGSINK_MAX_BODY_BYTES`: Largest accepted request body (default: 1 MiB)
/// - `LOGSINK_BASELINE_PATH`: JSON file of normal entries for anomaly detection (optional)
/// - `LOGSINK_LOG_FORMAT`: "text" or "json" (default: "text")
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Redis connection URL.
    pub redis_url: String,
    /// List key log entries are pushed under.
    pub queue_key: String,
    /// Deadline for each queue operation.
    pub queue_timeout: Duration,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
    /// Baseline of normal entries used to train the anomaly detector.
    pub baseline_path: Option<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or if the
    /// resulting configuration is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Creates a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or if the
    /// resulting configuration is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout_ms: u64 = parse_var(&lookup, "LOGSINK_QUEUE_TIMEOUT_MS")?.unwrap_or(2000);
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                var: "LOGSINK_QUEUE_TIMEOUT_MS",
                message: "must be greater than zero".to_string(),
            });
        }

        let queue_key = lookup("LOGSINK_QUEUE_KEY").unwrap_or(defaults.queue_key);
        if queue_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "LOGSINK_QUEUE_KEY",
                message: "must not be empty".to_string(),
            });
        }

        let config = Self {
            host: lookup("LOGSINK_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "LOGSINK_PORT")?.unwrap_or(defaults.port),
            redis_url: lookup("LOGSINK_REDIS_URL").unwrap_or(defaults.redis_url),
            queue_key,
            queue_timeout: Duration::from_millis(timeout_ms),
            max_body_bytes: parse_var(&lookup, "LOGSINK_MAX_BODY_BYTES")?
                .unwrap_or(defaults.max_body_bytes),
            baseline_path: lookup("LOGSINK_BASELINE_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            log_format: parse_var(&lookup, "LOGSINK_LOG_FORMAT")?.unwrap_or_default(),
        };

        config.socket_addr()?;
        Ok(config)
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port combination is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                var: "LOGSINK_HOST",
                message: format!("'{}' is not a valid address: {e}", self.host),
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            queue_key: DEFAULT_QUEUE_KEY.to_string(),
            queue_timeout: Duration::from_secs(2),
            max_body_bytes: 1024 * 1024,
            baseline_path: None,
            log_format: LogFormat::Text,
        }
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue {
                    var,
                    message: format!("'{raw}': {e}"),
                })
        })
        .transpose()
}
