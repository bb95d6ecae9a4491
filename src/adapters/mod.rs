// Adapters - External system implementations

pub mod console_notify;
pub mod engine_ffmpeg;
pub mod fs_download;
pub mod mock_engine;
pub mod preview_registry;
pub mod toml_config;

// Re-export adapters
pub use console_notify::ConsoleNotifier;
pub use engine_ffmpeg::FfmpegProcessEngine;
pub use fs_download::FsDownloadAdapter;
pub use mock_engine::{FailAt, MockEngine};
pub use preview_registry::BlobUrlRegistry;
pub use toml_config::{AppConfig, TomlConfigAdapter};
