//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::info;

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter, DEFAULT_CONFIG_FILE};
use crate::cli::{Cli, Commands};
use crate::domain::model::FailurePolicy;
use crate::error::TrimcastResult;

/// Build configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> TrimcastResult<AppConfig> {
    initialize_with_env(cli, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an explicit environment
pub fn initialize_with_env<F>(cli: &Cli, lookup: F) -> TrimcastResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Steps 1 and 2: defaults, then the config file when there is one
    let mut config = match config_file_path(cli.config.as_deref()) {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            TomlConfigAdapter::load(&path)?
        }
        None => AppConfig::default(),
    };

    // Step 3: environment
    let env_overrides = config.apply_env_overrides(lookup)?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    // Step 4: command line
    apply_cli_configuration_overrides(&mut config, cli)?;

    config.validate()?;
    Ok(config)
}

/// Explicit `--config` wins; otherwise `trimcast.toml` if it exists
fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

/// Apply CLI argument overrides to configuration
fn apply_cli_configuration_overrides(config: &mut AppConfig, cli: &Cli) -> TrimcastResult<()> {
    if let Some(level) = &cli.log_level {
        config.set("log_level", level)?;
    }
    if let Some(format) = &cli.log_format {
        config.set("log_format", format)?;
    }
    if let Some(ffmpeg) = &cli.ffmpeg {
        config.set("ffmpeg_path", ffmpeg)?;
    }
    if cli.keep_on_failure {
        config.failure_policy = FailurePolicy::KeepSource;
    }

    let out_dir = match &cli.command {
        Commands::Convert(args) => args.out_dir.as_ref(),
        Commands::Session(args) => args.out_dir.as_ref(),
        Commands::EngineCheck => None,
    };
    if let Some(dir) = out_dir {
        config.download_dir = dir.clone();
    }

    Ok(())
}
