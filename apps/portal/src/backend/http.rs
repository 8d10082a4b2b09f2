use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, multipart, Client, Response};
use tracing::debug;

use crate::backend::{AnalysisBackend, BackendResponse, TransportError};
use crate::config::Config;
use crate::upload::UploadFile;

/// Multipart form field the upload endpoint reads the document from.
pub const UPLOAD_FIELD: &str = "file";

/// reqwest-backed client for the analysis backend endpoints.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    upload_url: String,
    result_url: String,
    artifact_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.http_timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            upload_url: config.upload_url(),
            result_url: config.result_url(),
            artifact_url: config.artifact_url(),
        }
    }

    async fn buffer(response: Response) -> Result<BackendResponse, TransportError> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?;
        debug!(status, ?content_type, bytes = body.len(), "backend responded");
        Ok(BackendResponse {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn upload(&self, file: &UploadFile) -> Result<BackendResponse, TransportError> {
        let part = multipart::Part::bytes(file.contents.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        debug!(url = %self.upload_url, file = %file.file_name, "uploading document");
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;
        Self::buffer(response).await
    }

    async fn fetch_report(&self) -> Result<BackendResponse, TransportError> {
        let response = self.client.get(&self.result_url).send().await?;
        Self::buffer(response).await
    }

    async fn fetch_artifact(&self) -> Result<BackendResponse, TransportError> {
        let response = self.client.get(&self.artifact_url).send().await?;
        Self::buffer(response).await
    }
}
