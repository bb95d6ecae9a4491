// TOML config adapter - Typed configuration loaded from a `[trimcast]` table

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::model::FailurePolicy;
use crate::error::{TrimcastError, TrimcastResult};
use crate::utils::logging::{validate_level, LogFormat, LoggingConfig};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "trimcast.toml";

/// Environment variables and the settings they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("TRIMCAST_FFMPEG_PATH", "ffmpeg_path"),
    ("TRIMCAST_DOWNLOAD_DIR", "download_dir"),
    ("TRIMCAST_FAILURE_POLICY", "failure_policy"),
    ("TRIMCAST_LOG_LEVEL", "log_level"),
    ("TRIMCAST_LOG_FORMAT", "log_format"),
    ("TRIMCAST_THREADS", "threads"),
    ("TRIMCAST_TIMEOUT_SECS", "timeout_secs"),
];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Engine executable
    pub ffmpeg_path: String,
    /// Directory finished artifacts are saved into
    pub download_dir: PathBuf,
    /// Source handling after a failed conversion
    pub failure_policy: FailurePolicy,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Worker threads handed to the engine
    pub threads: usize,
    /// Optional limit on a single engine command
    pub timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            download_dir: PathBuf::from("."),
            failure_policy: FailurePolicy::Reset,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            threads: num_cpus::get().max(1),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    trimcast: Option<AppConfig>,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration from TOML text; a missing table yields defaults
    pub fn parse(content: &str) -> TrimcastResult<AppConfig> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| TrimcastError::config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(file.trimcast.unwrap_or_default())
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> TrimcastResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrimcastError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }
}

impl AppConfig {
    /// Override settings from the environment; returns how many were applied
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> TrimcastResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        for (env_var, key) in ENV_MAPPINGS {
            if let Some(value) = lookup(env_var) {
                tracing::debug!("Environment override: {} = {}", env_var, value);
                self.set(key, &value)?;
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Set one setting from its textual value
    pub fn set(&mut self, key: &str, value: &str) -> TrimcastResult<()> {
        match key {
            "ffmpeg_path" => self.ffmpeg_path = value.to_string(),
            "download_dir" => self.download_dir = PathBuf::from(value),
            "failure_policy" => {
                self.failure_policy = value.parse().map_err(TrimcastError::config)?;
            }
            "log_level" => self.log_level = value.to_string(),
            "log_format" => self.log_format = value.parse().map_err(TrimcastError::config)?,
            "threads" => {
                self.threads = value.trim().parse().map_err(|e| {
                    TrimcastError::config(format!("Invalid thread count {}: {}", value, e))
                })?;
            }
            "timeout_secs" => {
                self.timeout_secs = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.trim().parse().map_err(|e| {
                        TrimcastError::config(format!("Invalid timeout {}: {}", value, e))
                    })?)
                };
            }
            other => {
                return Err(TrimcastError::config(format!("Unknown setting: {}", other)));
            }
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> TrimcastResult<()> {
        validate_level(&self.log_level)?;
        if self.ffmpeg_path.trim().is_empty() {
            return Err(TrimcastError::config("ffmpeg_path cannot be empty"));
        }
        if self.threads == 0 {
            return Err(TrimcastError::config("threads must be at least 1"));
        }
        if self.timeout_secs == Some(0) {
            return Err(TrimcastError::config("timeout_secs must be at least 1"));
        }
        Ok(())
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.to_lowercase(),
            format: self.log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.ffmpeg_path, "ffmpeg");
        assert_eq!(config.failure_policy, FailurePolicy::Reset);
        assert!(config.threads >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_table() {
        let config = TomlConfigAdapter::parse(
            r#"
            [trimcast]
            download_dir = "/tmp/out"
            failure_policy = "keep"
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.failure_policy, FailurePolicy::KeepSource);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn test_parse_without_table_gives_defaults() {
        assert_eq!(TomlConfigAdapter::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        assert!(TomlConfigAdapter::parse("[trimcast]\ncrf = 18\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TRIMCAST_FFMPEG_PATH", "/opt/ffmpeg/bin/ffmpeg"),
            ("TRIMCAST_THREADS", "2"),
            ("TRIMCAST_TIMEOUT_SECS", "30"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        let applied = config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(applied, 3);
        assert_eq!(config.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(config.threads, 2);
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_invalid_env_value_is_reported() {
        let mut config = AppConfig::default();
        let result = config.apply_env_overrides(|key| {
            (key == "TRIMCAST_FAILURE_POLICY").then(|| "retry".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let config = AppConfig {
            threads: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
