// Business rules - Naming, validation and engine argument construction

use crate::domain::errors::ConversionError;
use crate::domain::model::{JobRequest, MediaFile};
use crate::utils::path::is_plain_file_name;

/// Stem of the file staged into the engine workspace
pub const STAGED_INPUT_STEM: &str = "input";

/// Extension used when nothing better can be derived from the upload
pub const FALLBACK_INPUT_EXTENSION: &str = "mp4";

/// Video containers the picker knows by extension
const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("ogv", "video/ogg"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("3gp", "video/3gpp"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("ts", "video/mp2t"),
];

/// True for any `video/*` media type
pub fn is_video_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("video/")
}

/// Look up the video media type for a file extension
pub fn video_mime_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    VIDEO_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

/// Look up the preferred extension for a video media type
pub fn extension_for_video_mime(mime: &str) -> Option<&'static str> {
    let mime = mime.trim().to_ascii_lowercase();
    VIDEO_TYPES
        .iter()
        .find(|(_, known)| *known == mime)
        .map(|(ext, _)| *ext)
}

/// Extension of a display name, if it looks like a real one
fn name_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 5 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Name the source is staged under: `input.<ext>`, with the extension taken
/// from the upload's name, then its media type, then `mp4`
pub fn staged_input_name(file: &MediaFile) -> String {
    let extension = name_extension(&file.name)
        .or_else(|| extension_for_video_mime(&file.mime).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_INPUT_EXTENSION.to_string());
    format!("{}.{}", STAGED_INPUT_STEM, extension)
}

/// Engine argument list for a job. `-t` precedes `-ss`.
pub fn build_engine_args(staged_input: &str, request: &JobRequest) -> Vec<String> {
    vec![
        "-i".to_string(),
        staged_input.to_string(),
        "-t".to_string(),
        format_seconds(request.duration_seconds),
        "-ss".to_string(),
        format_seconds(request.start_offset_seconds),
        "-f".to_string(),
        request.output_kind.token().to_string(),
        request.output_file_name(),
    ]
}

/// Seconds as the engine expects them: `3`, `2.5`. Negative zero prints as `0`.
pub fn format_seconds(seconds: f64) -> String {
    (seconds + 0.0).to_string()
}

/// Parse a non-negative number of seconds
pub fn parse_seconds(value: &str) -> Result<f64, String> {
    let seconds = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    validate_seconds(seconds)?;
    Ok(seconds + 0.0)
}

/// Seconds must be finite and non-negative
pub fn validate_seconds(seconds: f64) -> Result<(), String> {
    if !seconds.is_finite() {
        return Err("value must be a finite number".to_string());
    }
    if seconds < 0.0 {
        return Err(format!("{} is below the minimum of 0", seconds));
    }
    Ok(())
}

/// Output base names are plain file names inside the engine workspace
pub fn validate_output_name(name: &str) -> Result<(), ConversionError> {
    if name.is_empty() {
        return Err(ConversionError::InvalidRequest(
            "output name cannot be empty".to_string(),
        ));
    }
    if !is_plain_file_name(name) {
        return Err(ConversionError::InvalidRequest(format!(
            "output name must be a plain file name: {}",
            name
        )));
    }
    // the engine would read a leading dash as an option
    if name.starts_with('-') {
        return Err(ConversionError::InvalidRequest(format!(
            "output name cannot start with '-': {}",
            name
        )));
    }
    Ok(())
}
