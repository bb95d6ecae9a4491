//! Path utilities for workspace and download handling

use std::path::Path;

use crate::domain::model::MediaFile;
use crate::domain::rules;
use crate::error::{TrimcastError, TrimcastResult};

/// Media type reported for files the picker does not recognize
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// True if `name` is a single plain file name with no directory parts
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Browser-style name for the `n`th duplicate: `clip (1).gif`
pub fn numbered_file_name(file_name: &str, n: usize) -> String {
    if n == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, n, ext),
        _ => format!("{} ({})", file_name, n),
    }
}

/// Media type the picker assigns to a path, judged by extension
pub fn mime_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(rules::video_mime_for_extension)
        .unwrap_or(UNKNOWN_MIME)
}

/// Read a file from disk the way the picker hands it over
pub async fn load_media_file(path: &Path) -> TrimcastResult<MediaFile> {
    if !path.is_file() {
        return Err(TrimcastError::InputFileNotFound {
            path: path.display().to_string(),
        });
    }

    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(MediaFile::new(name, mime_for_path(path), bytes))
}
