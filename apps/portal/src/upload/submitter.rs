use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::AnalysisBackend;
use crate::upload::task::{UploadState, UploadTask};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UploadError {
    #[error("Unsupported file type '{content_type}'. Only PDF documents can be analyzed")]
    UnsupportedType { content_type: String },

    #[error("File is {size} bytes, larger than the {limit} byte upload limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Upload failed: {0}")]
    Transport(String),

    #[error("{0}")]
    ServerRejected(String),

    #[error("No file selected")]
    NoFileSelected,

    #[error("An upload is already in progress")]
    InProgress,

    #[error("This upload has already finished. Select a file to start a new one")]
    Finished,
}

/// Acknowledgement returned by the upload endpoint on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadAck {
    #[serde(default = "default_ack_message")]
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

fn default_ack_message() -> String {
    "Uploaded successfully".to_string()
}

impl Default for UploadAck {
    fn default() -> Self {
        Self {
            message: default_ack_message(),
            filename: None,
            bytes: None,
            uploaded_at: None,
        }
    }
}

/// Validates and transmits upload tasks. Never retries on its own.
#[derive(Clone)]
pub struct UploadSubmitter {
    backend: Arc<dyn AnalysisBackend>,
    max_bytes: usize,
}

impl UploadSubmitter {
    pub fn new(backend: Arc<dyn AnalysisBackend>, max_bytes: usize) -> Self {
        Self { backend, max_bytes }
    }

    /// Submits the task's file. On `Ok` the task is `Succeeded` and the caller
    /// should move on to the result view; on `Err` the task is `Failed` with a
    /// user-facing message (except for `InProgress`/`Finished`, which leave the
    /// task untouched).
    pub async fn submit(&self, task: &mut UploadTask) -> Result<UploadAck, UploadError> {
        match task.state() {
            UploadState::Idle => {}
            UploadState::Uploading => return Err(UploadError::InProgress),
            _ => return Err(UploadError::Finished),
        }

        if let Err(e) = self.validate(task) {
            warn!(file = %task.file().file_name, "upload rejected locally: {e}");
            task.fail(e.to_string());
            return Err(e);
        }

        task.begin();
        info!(
            file = %task.file().file_name,
            bytes = task.file().contents.len(),
            "submitting document for analysis"
        );

        match self.transmit(task).await {
            Ok(ack) => {
                task.succeed();
                info!(file = %task.file().file_name, "upload acknowledged: {}", ack.message);
                Ok(ack)
            }
            Err(e) => {
                warn!(file = %task.file().file_name, "upload failed: {e}");
                task.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn validate(&self, task: &UploadTask) -> Result<(), UploadError> {
        let file = task.file();
        if !file.is_pdf() {
            return Err(UploadError::UnsupportedType {
                content_type: file.content_type.clone(),
            });
        }
        if file.contents.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: file.contents.len(),
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    async fn transmit(&self, task: &UploadTask) -> Result<UploadAck, UploadError> {
        let response = self
            .backend
            .upload(task.file())
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(match response.error_message() {
                Some(message) => UploadError::ServerRejected(message),
                None => UploadError::Transport(format!(
                    "server responded with status {}",
                    response.status
                )),
            });
        }

        Ok(serde_json::from_slice(&response.body).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{self, MockBackend};
    use crate::upload::{UploadFile, PDF_CONTENT_TYPE};

    fn pdf(len: usize) -> UploadTask {
        UploadTask::new(UploadFile::new("tender.pdf", PDF_CONTENT_TYPE, vec![0u8; len]))
    }

    fn submitter(backend: &Arc<MockBackend>) -> UploadSubmitter {
        UploadSubmitter::new(backend.clone(), 1024)
    }

    #[tokio::test]
    async fn test_non_pdf_never_reaches_transport() {
        let backend = Arc::new(MockBackend::new());
        let mut task = UploadTask::new(UploadFile::new("notes.txt", "text/plain", vec![1u8]));

        let err = submitter(&backend).submit(&mut task).await.unwrap_err();

        assert_eq!(
            err,
            UploadError::UnsupportedType {
                content_type: "text/plain".to_string()
            }
        );
        assert_eq!(backend.upload_calls(), 0);
        assert_eq!(task.state(), UploadState::Failed);
        assert!(task.error_message().unwrap().contains("text/plain"));
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_locally() {
        let backend = Arc::new(MockBackend::new());
        let mut task = pdf(1025);

        let err = submitter(&backend).submit(&mut task).await.unwrap_err();

        assert_eq!(err, UploadError::TooLarge { size: 1025, limit: 1024 });
        assert_eq!(backend.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_file_at_limit_is_accepted() {
        let backend = Arc::new(MockBackend::new().with_uploads([mock::json(
            200,
            r#"{"message": "Uploaded successfully"}"#,
        )]));
        let mut task = pdf(1024);

        let ack = submitter(&backend).submit(&mut task).await.unwrap();

        assert_eq!(ack.message, "Uploaded successfully");
        assert_eq!(task.state(), UploadState::Succeeded);
        assert_eq!(backend.upload_calls(), 1);
    }

    #[tokio::test]
    async fn test_non_json_ack_still_succeeds() {
        let backend =
            Arc::new(MockBackend::new().with_uploads([mock::raw(201, "text/plain", b"ok")]));
        let mut task = pdf(10);

        let ack = submitter(&backend).submit(&mut task).await.unwrap();
        assert_eq!(ack, UploadAck::default());
    }

    #[tokio::test]
    async fn test_server_error_message_surfaced_verbatim() {
        let backend = Arc::new(MockBackend::new().with_uploads([mock::json(
            500,
            r#"{"error": "Failed to save file"}"#,
        )]));
        let mut task = pdf(10);

        let err = submitter(&backend).submit(&mut task).await.unwrap_err();

        assert_eq!(err, UploadError::ServerRejected("Failed to save file".to_string()));
        assert_eq!(task.state(), UploadState::Failed);
        assert_eq!(task.error_message(), Some("Failed to save file"));
    }

    #[tokio::test]
    async fn test_status_without_message_is_generic_transport_error() {
        let backend = Arc::new(MockBackend::new().with_uploads([mock::raw(
            502,
            "text/html",
            b"<h1>Bad Gateway</h1>",
        )]));
        let mut task = pdf(10);

        let err = submitter(&backend).submit(&mut task).await.unwrap_err();
        assert_eq!(
            err,
            UploadError::Transport("server responded with status 502".to_string())
        );
    }

    #[tokio::test]
    async fn test_network_failure_is_transport_error_without_retry() {
        let backend = Arc::new(MockBackend::new().with_uploads([mock::offline()]));
        let mut task = pdf(10);

        let err = submitter(&backend).submit(&mut task).await.unwrap_err();

        assert!(matches!(err, UploadError::Transport(_)));
        assert_eq!(backend.upload_calls(), 1);
        assert_eq!(task.state(), UploadState::Failed);
    }

    #[tokio::test]
    async fn test_finished_task_cannot_be_resubmitted() {
        let backend = Arc::new(
            MockBackend::new().with_uploads([mock::json(200, "{}"), mock::json(200, "{}")]),
        );
        let s = submitter(&backend);
        let mut task = pdf(10);
        s.submit(&mut task).await.unwrap();

        assert_eq!(s.submit(&mut task).await.unwrap_err(), UploadError::Finished);
        assert_eq!(backend.upload_calls(), 1);
        assert_eq!(task.state(), UploadState::Succeeded);
    }

    #[tokio::test]
    async fn test_uploading_task_reports_in_progress() {
        let backend = Arc::new(MockBackend::new());
        let mut task = pdf(10);
        task.begin();
        assert!(!task.can_submit());

        let err = submitter(&backend).submit(&mut task).await.unwrap_err();
        assert_eq!(err, UploadError::InProgress);
        assert_eq!(backend.upload_calls(), 0);
    }
}
