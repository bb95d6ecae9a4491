// Upload controller - Holds the selected source file and its preview

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::SelectionError;
use crate::domain::model::{MediaFile, SourceMedia};
use crate::domain::rules;
use crate::ports::PreviewPort;

/// What the upload area shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presentation<'a> {
    /// No file selected: offer the picker
    UploadPrompt,
    /// File selected: playable preview plus a close control
    Preview(&'a SourceMedia),
}

/// Manages at most one selected source
pub struct UploadController {
    previews: Arc<dyn PreviewPort>,
    current: Option<SourceMedia>,
}

impl UploadController {
    pub fn new(previews: Arc<dyn PreviewPort>) -> Self {
        Self {
            previews,
            current: None,
        }
    }

    /// Replace the selection with `file`. Only `video/*` files are accepted;
    /// the previous preview is revoked before a new one is issued.
    pub fn select_file(&mut self, file: MediaFile) -> Result<&SourceMedia, SelectionError> {
        if !rules::is_video_mime(&file.mime) {
            return Err(SelectionError::NotVideo {
                name: file.name,
                mime: file.mime,
            });
        }

        if let Some(previous) = self.current.take() {
            debug!("Replacing {}", previous.display_name());
            self.previews.revoke(&previous.preview);
        }

        let preview = self.previews.create(&file);
        info!("Selected {} ({}, {} bytes)", file.name, file.mime, file.len());
        Ok(&*self.current.insert(SourceMedia { file, preview }))
    }

    /// Drop the selection and revoke its preview. Returns false when there
    /// was nothing to clear.
    pub fn clear(&mut self) -> bool {
        match self.current.take() {
            Some(source) => {
                self.previews.revoke(&source.preview);
                debug!("Cleared {}", source.display_name());
                true
            }
            None => false,
        }
    }

    pub fn source(&self) -> Option<&SourceMedia> {
        self.current.as_ref()
    }

    pub fn has_source(&self) -> bool {
        self.current.is_some()
    }

    /// Display name of the selection, empty when none
    pub fn display_name(&self) -> &str {
        self.current
            .as_ref()
            .map(SourceMedia::display_name)
            .unwrap_or("")
    }

    pub fn presentation(&self) -> Presentation<'_> {
        match &self.current {
            Some(source) => Presentation::Preview(source),
            None => Presentation::UploadPrompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::preview_registry::BlobUrlRegistry;

    fn video(name: &str) -> MediaFile {
        MediaFile::new(name, "video/mp4", vec![0u8; 16])
    }

    fn controller() -> (Arc<BlobUrlRegistry>, UploadController) {
        let registry = Arc::new(BlobUrlRegistry::new());
        let controller = UploadController::new(registry.clone());
        (registry, controller)
    }

    #[test]
    fn test_starts_with_upload_prompt() {
        let (_, controller) = controller();
        assert_eq!(controller.presentation(), Presentation::UploadPrompt);
        assert_eq!(controller.display_name(), "");
    }

    #[test]
    fn test_select_shows_preview() {
        let (registry, mut controller) = controller();
        let preview = controller.select_file(video("beach.mp4")).unwrap().preview.clone();

        assert!(registry.is_live(&preview));
        assert_eq!(controller.display_name(), "beach.mp4");
        assert!(matches!(controller.presentation(), Presentation::Preview(_)));
    }

    #[test]
    fn test_replacing_revokes_previous_preview() {
        let (registry, mut controller) = controller();
        let first = controller.select_file(video("a.mp4")).unwrap().preview.clone();
        let second = controller.select_file(video("b.mp4")).unwrap().preview.clone();

        assert!(!registry.is_live(&first));
        assert!(registry.is_live(&second));
        assert_eq!(registry.live_count(), 1);
        assert_eq!(controller.display_name(), "b.mp4");
    }

    #[test]
    fn test_rejects_non_video() {
        let (registry, mut controller) = controller();
        controller.select_file(video("keep.mp4")).unwrap();
        let err = controller
            .select_file(MediaFile::new("notes.txt", "text/plain", vec![1u8]))
            .unwrap_err();

        assert!(matches!(err, SelectionError::NotVideo { .. }));
        assert_eq!(controller.display_name(), "keep.mp4");
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (registry, mut controller) = controller();
        controller.select_file(video("a.mp4")).unwrap();

        assert!(controller.clear());
        assert!(!controller.clear());
        assert_eq!(controller.presentation(), Presentation::UploadPrompt);
        assert_eq!(registry.live_count(), 0);
    }
}
