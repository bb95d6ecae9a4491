// Ports - Interface definitions (contracts)

use async_trait::async_trait;

use crate::domain::errors::EngineError;
use crate::domain::model::*;

/// Port for the external media-processing engine.
///
/// The engine owns a private workspace. Files are staged into it by name,
/// a command runs against those names, and the produced file is read back.
#[async_trait]
pub trait EnginePort: Send + Sync {
    /// Load the engine; must succeed before any other call
    async fn initialize(&self) -> Result<(), EngineError>;

    /// Stage bytes under `name` in the engine workspace
    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), EngineError>;

    /// Run a transcoding command with ffmpeg-compatible arguments
    async fn execute(&self, args: &[String]) -> Result<(), EngineError>;

    /// Read a file from the engine workspace
    async fn read_file(&self, name: &str) -> Result<EngineData, EngineError>;

    /// Remove a file from the engine workspace; a missing file is not an error
    async fn delete_file(&self, name: &str) -> Result<(), EngineError>;

    /// Engine identification, once loaded
    fn version(&self) -> Option<String> {
        None
    }
}

/// Port for issuing and revoking local preview references
pub trait PreviewPort: Send + Sync {
    /// Issue a new reference for the file
    fn create(&self, file: &MediaFile) -> PreviewRef;

    /// Revoke a reference; revoking twice is harmless
    fn revoke(&self, preview: &PreviewRef);

    /// Whether the reference is still live
    fn is_live(&self, preview: &PreviewRef) -> bool;
}

/// Port for handing a finished artifact to the user
#[async_trait]
pub trait SavePort: Send + Sync {
    /// Save the artifact under its suggested file name
    async fn save(&self, artifact: &Artifact) -> std::io::Result<SavedArtifact>;
}

/// Port for blocking user notifications
pub trait NotifyPort: Send + Sync {
    fn alert(&self, message: &str);
}
