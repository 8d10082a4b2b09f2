//! Transport seam between the client workflow and the analysis backend.
//!
//! The upload submitter and result fetcher only ever see `BackendResponse`
//! values; interpreting status codes and bodies is their job, moving bytes is
//! the backend's. `AppState`-style callers hold an `Arc<dyn AnalysisBackend>`.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

use crate::upload::UploadFile;

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpBackend;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("could not reach the analysis backend: {0}")]
    Unreachable(String),

    #[error("request timed out: {0}")]
    TimedOut(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::TimedOut(e.to_string())
        } else if e.is_connect() {
            TransportError::Unreachable(e.to_string())
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

/// A fully buffered backend response.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Flat { error: String },
    Nested { error: NestedError },
}

#[derive(Debug, Deserialize)]
struct NestedError {
    message: String,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the declared media type is JSON (`application/json` or a
    /// `+json` suffix type).
    pub fn is_json(&self) -> bool {
        self.media_type()
            .map(|m| m == "application/json" || m.ends_with("+json"))
            .unwrap_or(false)
    }

    /// Content type without parameters, lowercased.
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    /// Extracts a human-readable error from `{"error": "..."}` or
    /// `{"error": {"message": "..."}}` bodies.
    pub fn error_message(&self) -> Option<String> {
        let message = match serde_json::from_slice::<ErrorBody>(&self.body).ok()? {
            ErrorBody::Flat { error } => error,
            ErrorBody::Nested { error } => error.message,
        };
        let message = message.trim();
        (!message.is_empty()).then(|| message.to_string())
    }
}

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Sends one document as a multipart body.
    async fn upload(&self, file: &UploadFile) -> Result<BackendResponse, TransportError>;

    /// Reads the current analysis result.
    async fn fetch_report(&self) -> Result<BackendResponse, TransportError>;

    /// Reads the persisted PDF artifact.
    async fn fetch_artifact(&self) -> Result<BackendResponse, TransportError>;
}
