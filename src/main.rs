//! Trimcast
//!
//! Trim a video and convert the segment to a looping GIF or an MP3 track.
//!
//! # Usage
//!
//! ```bash
//! trimcast convert --input holiday.mp4 --name clip --start 5 --time 3
//! trimcast convert --input holiday.mp4 --mp3 --out-dir ~/Downloads
//! trimcast session
//! trimcast engine-check --ffmpeg /opt/ffmpeg/bin/ffmpeg
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use trimcast_cli::app::DefaultAppContainer;
use trimcast_cli::cli::{commands, Cli, Commands};
use trimcast_cli::config_initialization::initialize_configuration_hierarchy;
use trimcast_cli::utils::logging::init_logging;

/// Main entry point for the Trimcast CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;

    // Initialize logging
    init_logging(&config.logging())?;

    info!("Starting Trimcast");

    let container = DefaultAppContainer::new(&config);

    // The engine starts loading right away; submits wait for it
    let _loading = container.lifecycle().start();

    // Execute the requested command
    match cli.command {
        Commands::Convert(args) => {
            info!("Executing convert command");
            commands::convert(&container, args).await?;
        }
        Commands::Session(_) => {
            info!("Executing session command");
            commands::session(&container).await?;
        }
        Commands::EngineCheck => {
            info!("Executing engine-check command");
            commands::engine_check(&container).await?;
        }
    }

    info!("Trimcast completed successfully");
    Ok(())
}
