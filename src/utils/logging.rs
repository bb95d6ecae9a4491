//! Logging configuration and subscriber setup

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{TrimcastError, TrimcastResult};

/// Levels accepted by the `log_level` setting
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!(
                "Invalid log format: {}. Valid formats: pretty, compact, json",
                other
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Logging configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Check a `log_level` value
pub fn validate_level(level: &str) -> TrimcastResult<()> {
    if LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(TrimcastError::config(format!(
            "Invalid log level: {}. Valid levels: {}",
            level,
            LOG_LEVELS.join(", ")
        )))
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// free for reports. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> TrimcastResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| TrimcastError::LoggingInitError {
            message: e.to_string(),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| TrimcastError::LoggingInitError {
        message: e.to_string(),
    })?;

    tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}
