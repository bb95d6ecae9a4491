// Form state - Output kind, text fields and the upload area, as the user sees them

use std::fmt::Write as _;
use std::sync::Arc;

use crate::app::upload_controller::{Presentation, UploadController};
use crate::domain::errors::{ConversionError, SelectionError};
use crate::domain::model::*;
use crate::ports::PreviewPort;

/// Raw text of the form inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub start: String,
    pub time: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            start: "0".to_string(),
            time: "10".to_string(),
        }
    }
}

/// Form model. The kind selection survives a reset; the text fields do not.
pub struct FormState {
    upload: UploadController,
    kind: OutputKind,
    fields: FormFields,
}

impl FormState {
    pub fn new(previews: Arc<dyn PreviewPort>) -> Self {
        Self {
            upload: UploadController::new(previews),
            kind: OutputKind::default(),
            fields: FormFields::default(),
        }
    }

    pub fn select_file(&mut self, file: MediaFile) -> Result<&SourceMedia, SelectionError> {
        self.upload.select_file(file)
    }

    /// Close control: discard the file and reset the text fields
    pub fn close(&mut self) {
        self.upload.clear();
        self.fields = FormFields::default();
    }

    /// Radio choice; exactly one kind is selected at any time
    pub fn select_kind(&mut self, kind: OutputKind) {
        self.kind = kind;
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    pub fn is_selected(&self, kind: OutputKind) -> bool {
        self.kind == kind
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.name = name.into();
    }

    pub fn set_start(&mut self, start: impl Into<String>) {
        self.fields.start = start.into();
    }

    pub fn set_time(&mut self, time: impl Into<String>) {
        self.fields.time = time.into();
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn upload(&self) -> &UploadController {
        &self.upload
    }

    pub fn source(&self) -> Option<&SourceMedia> {
        self.upload.source()
    }

    pub fn has_source(&self) -> bool {
        self.upload.has_source()
    }

    /// Submit is enabled only with a file selected and no job in flight
    pub fn submit_enabled(&self, loading: bool) -> bool {
        self.has_source() && !loading
    }

    pub fn submit_label(&self, loading: bool) -> String {
        if loading {
            "Converting...".to_string()
        } else {
            format!("Download and convert to {}", self.kind.label())
        }
    }

    /// Job request from the current field values
    pub fn job_request(&self) -> Result<JobRequest, ConversionError> {
        JobRequest::from_form(
            &self.fields.name,
            &self.fields.start,
            &self.fields.time,
            self.kind,
        )
    }

    /// Text rendering of the whole form
    pub fn render(&self, loading: bool) -> String {
        let mut out = String::new();
        match self.upload.presentation() {
            Presentation::UploadPrompt => {
                out.push_str("[ Upload a video to Convert to GIF or MP3 ]\n");
            }
            Presentation::Preview(source) => {
                let _ = writeln!(out, "[ Preview {} ]  (close)", source.preview);
                let _ = writeln!(out, "{}", source.display_name());
            }
        }

        let mark = |kind: OutputKind| if self.is_selected(kind) { "(x)" } else { "( )" };
        let _ = writeln!(
            out,
            "{} Convert to GIF   {} Convert to MP3",
            mark(OutputKind::Gif),
            mark(OutputKind::Mp3)
        );

        let name = if self.fields.name.is_empty() {
            "Ex: output"
        } else {
            self.fields.name.as_str()
        };
        let _ = writeln!(out, "Name to Download: {}", name);
        let _ = writeln!(out, "Start: {}", self.fields.start);
        let _ = writeln!(out, "Time: {}", self.fields.time);

        let state = if self.submit_enabled(loading) { "" } else { " (disabled)" };
        let _ = writeln!(out, "< {} >{}", self.submit_label(loading), state);
        out
    }
}
