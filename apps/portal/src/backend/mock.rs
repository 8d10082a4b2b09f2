use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::backend::{AnalysisBackend, BackendResponse, TransportError};
use crate::upload::UploadFile;

type Scripted = Result<BackendResponse, TransportError>;

/// Scripted backend for tests. Each endpoint pops its next queued outcome and
/// counts how often it was called.
#[derive(Default)]
pub struct MockBackend {
    uploads: Mutex<VecDeque<Scripted>>,
    reports: Mutex<VecDeque<Scripted>>,
    artifacts: Mutex<VecDeque<Scripted>>,
    upload_calls: AtomicUsize,
    report_calls: AtomicUsize,
    artifact_calls: AtomicUsize,
    report_delay: Option<Duration>,
}

pub fn json(status: u16, body: &str) -> Scripted {
    Ok(BackendResponse {
        status,
        content_type: Some("application/json".to_string()),
        body: Bytes::from(body.to_string()),
    })
}

pub fn raw(status: u16, content_type: &str, body: &[u8]) -> Scripted {
    Ok(BackendResponse {
        status,
        content_type: Some(content_type.to_string()),
        body: Bytes::copy_from_slice(body),
    })
}

pub fn offline() -> Scripted {
    Err(TransportError::Unreachable("connection refused".to_string()))
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uploads(self, outcomes: impl IntoIterator<Item = Scripted>) -> Self {
        self.uploads.lock().unwrap().extend(outcomes);
        self
    }

    pub fn with_reports(self, outcomes: impl IntoIterator<Item = Scripted>) -> Self {
        self.reports.lock().unwrap().extend(outcomes);
        self
    }

    /// Holds every report request open for `delay` before answering.
    pub fn with_report_delay(mut self, delay: Duration) -> Self {
        self.report_delay = Some(delay);
        self
    }

    pub fn with_artifacts(self, outcomes: impl IntoIterator<Item = Scripted>) -> Self {
        self.artifacts.lock().unwrap().extend(outcomes);
        self
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn report_calls(&self) -> usize {
        self.report_calls.load(Ordering::SeqCst)
    }

    pub fn artifact_calls(&self) -> usize {
        self.artifact_calls.load(Ordering::SeqCst)
    }

    fn next(queue: &Mutex<VecDeque<Scripted>>) -> Scripted {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Http("no scripted response".to_string())))
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn upload(&self, _file: &UploadFile) -> Result<BackendResponse, TransportError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.uploads)
    }

    async fn fetch_report(&self) -> Result<BackendResponse, TransportError> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.report_delay {
            tokio::time::sleep(delay).await;
        }
        Self::next(&self.reports)
    }

    async fn fetch_artifact(&self) -> Result<BackendResponse, TransportError> {
        self.artifact_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.artifacts)
    }
}
