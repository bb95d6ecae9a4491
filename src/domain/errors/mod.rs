// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Errors reported by a media engine implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Engine could not be loaded
    #[error("engine failed to load: {0}")]
    Load(String),

    /// Operation attempted before the engine was loaded
    #[error("engine is not loaded")]
    NotLoaded,

    /// File name escapes the engine workspace or is empty
    #[error("invalid engine file name: {0:?}")]
    InvalidFileName(String),

    /// File does not exist in the engine workspace
    #[error("engine file not found: {0}")]
    FileNotFound(String),

    /// Engine command exited unsuccessfully
    #[error("engine command failed: {message}")]
    CommandFailed {
        message: String,
        exit_code: Option<i32>,
    },

    /// Engine command did not finish in time
    #[error("engine command timed out after {0} seconds")]
    Timeout(u64),

    /// I/O failure inside the engine workspace
    #[error("engine I/O error: {0}")]
    Io(String),
}

impl EngineError {
    /// Create a command failure error
    pub fn command_failed(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::CommandFailed {
            message: message.into(),
            exit_code,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Conversion failures, tagged by the step that failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Engine initialization failed; conversions are unavailable
    #[error("engine initialization failed: {0}")]
    Initialization(#[source] EngineError),

    /// Engine has not finished initializing
    #[error("engine is not ready")]
    NotReady,

    /// No source media is selected
    #[error("no source media selected")]
    NoSource,

    /// Another job is already in flight
    #[error("a conversion is already in progress")]
    JobInFlight,

    /// Job request fields are invalid
    #[error("invalid job request: {0}")]
    InvalidRequest(String),

    /// Copying the source into the engine workspace failed
    #[error("failed to stage {file}: {source}")]
    Staging {
        file: String,
        #[source]
        source: EngineError,
    },

    /// Engine command failed
    #[error("engine execution failed: {0}")]
    Execution(#[source] EngineError),

    /// Reading the produced artifact failed
    #[error("failed to read {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: EngineError,
    },

    /// Saving the artifact failed
    #[error("failed to save {file}: {message}")]
    Save { file: String, message: String },
}

impl ConversionError {
    /// True for guard rejections that never reached the engine
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotReady | Self::NoSource | Self::JobInFlight | Self::InvalidRequest(_)
        )
    }
}

/// Errors raised when a file is offered to the upload controller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Only `video/*` media is accepted
    #[error("{name} is not a video (media type {mime})")]
    NotVideo { name: String, mime: String },
}
