//! Trimcast library
//!
//! Trim a video and convert the segment to a looping GIF or an MP3 track.
//! Decoding and encoding are delegated to an external media engine reached
//! through [`ports::EnginePort`]; this crate owns the form state, the job
//! orchestration and the hand-off of the finished artifact.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{ConversionError, EngineError, SelectionError};
pub use domain::model::{
    Artifact, EngineData, FailurePolicy, JobRequest, JobState, MediaFile, OutputKind, PreviewRef,
    SavedArtifact, SourceMedia,
};
pub use error::{TrimcastError, TrimcastResult};
