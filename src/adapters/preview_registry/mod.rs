// Preview registry - Issues and revokes `blob:` style preview references

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::domain::model::{MediaFile, PreviewRef};
use crate::ports::PreviewPort;

/// Scheme prefix of every issued reference
pub const PREVIEW_PREFIX: &str = "blob:trimcast/";

/// In-process registry of live preview references
#[derive(Debug, Default)]
pub struct BlobUrlRegistry {
    live: Mutex<HashSet<String>>,
}

impl BlobUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn live(&self) -> MutexGuard<'_, HashSet<String>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of references issued and not yet revoked
    pub fn live_count(&self) -> usize {
        self.live().len()
    }
}

impl PreviewPort for BlobUrlRegistry {
    fn create(&self, file: &MediaFile) -> PreviewRef {
        let reference = format!("{}{}", PREVIEW_PREFIX, Uuid::new_v4());
        debug!("Issued preview {} for {}", reference, file.name);
        self.live().insert(reference.clone());
        PreviewRef::new(reference)
    }

    fn revoke(&self, preview: &PreviewRef) {
        if self.live().remove(preview.as_str()) {
            debug!("Revoked preview {}", preview);
        }
    }

    fn is_live(&self, preview: &PreviewRef) -> bool {
        self.live().contains(preview.as_str())
    }
}
