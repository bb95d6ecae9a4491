// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ConversionError;
use crate::domain::rules;

/// Default base name of the produced file
pub const DEFAULT_OUTPUT_NAME: &str = "output";

/// Default seek offset in seconds
pub const DEFAULT_START_SECONDS: f64 = 0.0;

/// Default duration limit in seconds
pub const DEFAULT_DURATION_SECONDS: f64 = 10.0;

/// Output kind - a single radio choice between animated image and audio track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Looping animated GIF
    #[default]
    Gif,
    /// MP3 audio track
    Mp3,
}

impl OutputKind {
    /// Lowercase token passed to the engine as the forced output format
    pub fn token(&self) -> &'static str {
        match self {
            OutputKind::Gif => "gif",
            OutputKind::Mp3 => "mp3",
        }
    }

    /// File extension of the produced artifact, including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::Gif => ".gif",
            OutputKind::Mp3 => ".mp3",
        }
    }

    /// MIME type the artifact is tagged with
    pub fn mime(&self) -> &'static str {
        match self {
            OutputKind::Gif => "image/gif",
            OutputKind::Mp3 => "audio/mp3",
        }
    }

    /// Uppercase label used in the form
    pub fn label(&self) -> &'static str {
        match self {
            OutputKind::Gif => "GIF",
            OutputKind::Mp3 => "MP3",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gif" => Ok(OutputKind::Gif),
            "mp3" => Ok(OutputKind::Mp3),
            other => Err(ConversionError::InvalidRequest(format!(
                "Unknown output kind: {}. Valid kinds: gif, mp3",
                other
            ))),
        }
    }
}

/// A file offered by the picker: name, media type and contents
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub name: String,
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Revocable local reference to the selected file, used for preview playback
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewRef(String);

impl PreviewRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The currently selected source: file plus its live preview reference
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMedia {
    pub file: MediaFile,
    pub preview: PreviewRef,
}

impl SourceMedia {
    pub fn display_name(&self) -> &str {
        &self.file.name
    }
}

/// One conversion request, built fresh from the form on every submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRequest {
    pub output_name: String,
    pub start_offset_seconds: f64,
    pub duration_seconds: f64,
    pub output_kind: OutputKind,
}

impl Default for JobRequest {
    fn default() -> Self {
        Self {
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            start_offset_seconds: DEFAULT_START_SECONDS,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            output_kind: OutputKind::default(),
        }
    }
}

impl JobRequest {
    /// Create a validated job request
    pub fn new(
        output_name: impl Into<String>,
        start_offset_seconds: f64,
        duration_seconds: f64,
        output_kind: OutputKind,
    ) -> Result<Self, ConversionError> {
        let request = Self {
            output_name: output_name.into(),
            start_offset_seconds,
            duration_seconds,
            output_kind,
        };
        request.validate()?;
        Ok(request)
    }

    /// Build a request from raw form text; empty fields fall back to their defaults
    pub fn from_form(
        name: &str,
        start: &str,
        time: &str,
        output_kind: OutputKind,
    ) -> Result<Self, ConversionError> {
        let output_name = if name.is_empty() {
            DEFAULT_OUTPUT_NAME.to_string()
        } else {
            name.to_string()
        };
        let start_offset_seconds = if start.trim().is_empty() {
            DEFAULT_START_SECONDS
        } else {
            rules::parse_seconds(start)
                .map_err(|e| ConversionError::InvalidRequest(format!("start: {}", e)))?
        };
        let duration_seconds = if time.trim().is_empty() {
            DEFAULT_DURATION_SECONDS
        } else {
            rules::parse_seconds(time)
                .map_err(|e| ConversionError::InvalidRequest(format!("time: {}", e)))?
        };

        Self::new(output_name, start_offset_seconds, duration_seconds, output_kind)
    }

    /// Validate field ranges and the output name
    pub fn validate(&self) -> Result<(), ConversionError> {
        rules::validate_seconds(self.start_offset_seconds)
            .map_err(|e| ConversionError::InvalidRequest(format!("start: {}", e)))?;
        rules::validate_seconds(self.duration_seconds)
            .map_err(|e| ConversionError::InvalidRequest(format!("time: {}", e)))?;
        rules::validate_output_name(&self.output_name)
    }

    /// `{name}.gif` or `{name}.mp3`
    pub fn output_file_name(&self) -> String {
        format!("{}{}", self.output_name, self.output_kind.extension())
    }

    pub fn mime(&self) -> &'static str {
        self.output_kind.mime()
    }
}

/// Data read back from the engine workspace
#[derive(Debug, Clone, PartialEq)]
pub enum EngineData {
    Binary(Vec<u8>),
    Text(String),
}

impl EngineData {
    /// Raw bytes; text is encoded as UTF-8
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            EngineData::Binary(bytes) => bytes,
            EngineData::Text(text) => text.into_bytes(),
        }
    }
}

/// Produced artifact ready to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}

/// Where an artifact ended up after saving
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
    pub size: u64,
}

/// States of a single submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Validating,
    Staging,
    Executing,
    Reading,
    Saving,
    Failed,
}

impl JobState {
    /// True for every state except `Idle`
    pub fn is_loading(&self) -> bool {
        !matches!(self, JobState::Idle)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Idle => "idle",
            JobState::Validating => "validating",
            JobState::Staging => "staging",
            JobState::Executing => "executing",
            JobState::Reading => "reading",
            JobState::Saving => "saving",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What happens to the selected source after a failed conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Discard the source after every job, successful or not
    #[default]
    #[serde(rename = "reset")]
    Reset,
    /// Keep the source after a failure so the user can retry
    #[serde(rename = "keep")]
    KeepSource,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reset" => Ok(FailurePolicy::Reset),
            "keep" => Ok(FailurePolicy::KeepSource),
            other => Err(format!(
                "Invalid failure policy: {}. Valid policies: reset, keep",
                other
            )),
        }
    }
}
