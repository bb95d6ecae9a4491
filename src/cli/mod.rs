//! CLI module for Trimcast
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;
pub mod session_input;

/// Trimcast
///
/// Trim a video and convert the segment to a looping GIF or an MP3 track.
#[derive(Parser, Debug)]
#[command(name = "trimcast")]
#[command(about = "Trimcast - trim a video into a GIF or an MP3")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./trimcast.toml when present)
    #[arg(long, global = true, env = "TRIMCAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format: pretty, compact or json
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Path to the ffmpeg executable
    #[arg(long, global = true)]
    pub ffmpeg: Option<String>,

    /// Keep the selected video after a failed conversion
    #[arg(long, global = true)]
    pub keep_on_failure: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one video segment and save the result
    Convert(args::ConvertArgs),
    /// Fill in the conversion form interactively
    Session(args::SessionArgs),
    /// Load the media engine and report whether it is ready
    EngineCheck,
}
