use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::backend::AnalysisBackend;
use crate::upload::PDF_CONTENT_TYPE;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArtifactError {
    #[error("No report PDF is available yet")]
    NotFound,

    #[error("Invalid report PDF response: {0}")]
    InvalidResponse(String),

    #[error("Failed to download report PDF: {0}")]
    Transport(String),
}

/// Downloads the persisted report PDF in a single attempt.
pub async fn download_artifact(backend: &dyn AnalysisBackend) -> Result<Bytes, ArtifactError> {
    let response = backend
        .fetch_artifact()
        .await
        .map_err(|e| ArtifactError::Transport(e.to_string()))?;

    if response.status == 404 {
        return Err(ArtifactError::NotFound);
    }
    if !response.is_success() {
        return Err(ArtifactError::InvalidResponse(format!(
            "HTTP status {}",
            response.status
        )));
    }
    if response.media_type().as_deref() != Some(PDF_CONTENT_TYPE) {
        return Err(ArtifactError::InvalidResponse(format!(
            "expected {PDF_CONTENT_TYPE}, got {}",
            response.content_type.as_deref().unwrap_or("no content type")
        )));
    }

    info!(bytes = response.body.len(), "downloaded report PDF");
    Ok(response.body)
}
