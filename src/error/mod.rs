//! Error handling module for Trimcast

use thiserror::Error;

use crate::domain::errors::{ConversionError, EngineError, SelectionError};

/// Main error type for Trimcast operations
#[derive(Error, Debug)]
pub enum TrimcastError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Logging could not be initialized
    #[error("Failed to initialize logging: {message}")]
    LoggingInitError { message: String },

    /// Offered file was rejected by the picker
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Conversion failed
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Media engine error
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TrimcastError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// Result type alias for Trimcast operations
pub type TrimcastResult<T> = std::result::Result<T, TrimcastError>;
