//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::OutputKind;
use crate::domain::rules::parse_seconds;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Convert to an animated GIF (default)
    #[arg(long, conflicts_with = "mp3")]
    pub gif: bool,

    /// Convert to an MP3 audio track
    #[arg(long)]
    pub mp3: bool,

    /// Name to download, without extension
    #[arg(short, long, default_value = "output")]
    pub name: String,

    /// Start offset in seconds
    #[arg(short, long, default_value = "0", value_parser = parse_seconds, allow_negative_numbers = true)]
    pub start: f64,

    /// Duration in seconds
    #[arg(short, long, default_value = "10", value_parser = parse_seconds, allow_negative_numbers = true)]
    pub time: f64,

    /// Directory the result is saved into
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ConvertArgs {
    pub fn kind(&self) -> OutputKind {
        if self.mp3 {
            OutputKind::Mp3
        } else {
            OutputKind::Gif
        }
    }
}

/// Arguments for the session command
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Directory results are saved into
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}
