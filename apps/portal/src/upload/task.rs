use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use serde::Serialize;

use crate::upload::PDF_CONTENT_TYPE;

/// A selected file: name, declared MIME type, and contents.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub contents: Bytes,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        contents: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            contents: contents.into(),
        }
    }

    /// Reads a file from disk, declaring its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Ok(Self::new(file_name, content_type_for(path), contents))
    }

    pub fn is_pdf(&self) -> bool {
        is_pdf_content_type(&self.content_type)
    }
}

/// Compares the MIME essence (parameters stripped, case-insensitive).
pub fn is_pdf_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => PDF_CONTENT_TYPE,
        Some("txt") => "text/plain",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

/// One upload attempt for one selected file.
///
/// Lifecycle: Idle → Uploading → Succeeded | Failed. Terminal tasks are not
/// reused; `retry` hands back a fresh task for the same file.
#[derive(Debug)]
pub struct UploadTask {
    file: UploadFile,
    state: UploadState,
    error_message: Option<String>,
}

impl UploadTask {
    pub fn new(file: UploadFile) -> Self {
        Self {
            file,
            state: UploadState::Idle,
            error_message: None,
        }
    }

    pub fn file(&self) -> &UploadFile {
        &self.file
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether the submit affordance is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == UploadState::Idle
    }

    pub fn retry(&self) -> UploadTask {
        UploadTask::new(self.file.clone())
    }

    pub(crate) fn begin(&mut self) {
        self.state = UploadState::Uploading;
        self.error_message = None;
    }

    pub(crate) fn succeed(&mut self) {
        self.state = UploadState::Succeeded;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.state = UploadState::Failed;
        self.error_message = Some(message);
    }
}
