use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::{AnalysisBackend, BackendResponse, TransportError};
use crate::fetch::session::{FetchSession, FetchState};
use crate::models::report::ComplianceReport;

/// Statuses the result endpoint uses to say "analysis not finished yet".
const NOT_READY_STATUSES: &[u16] = &[202, 404, 425, 503];

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(3);

/// Why an attempt failed in a way worth retrying.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransientCause {
    #[error("network failure: {0}")]
    Network(String),

    #[error("report not ready yet (status {status})")]
    NotReady { status: u16 },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("{0}")]
    Transient(TransientCause),

    #[error("Invalid response from analysis backend: {0}")]
    InvalidResponse(String),

    #[error("Report was not ready after {attempts} attempts")]
    Timeout {
        attempts: u32,
        last_error: Option<String>,
    },

    #[error("Fetch was cancelled")]
    Cancelled,

    #[error("Fetch session is already {0}; start a new session")]
    SessionClosed(FetchState),
}

impl FetchError {
    /// Whether the view should offer a "try again" affordance.
    pub fn offers_retry(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

impl From<TransportError> for FetchError {
    fn from(e: TransportError) -> Self {
        FetchError::Transient(TransientCause::Network(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Hard ceiling on attempts per session (at least 1).
    pub max_attempts: u32,
    /// Fixed wait between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

#[derive(Clone)]
pub struct ResultFetcher {
    backend: Arc<dyn AnalysisBackend>,
    policy: RetryPolicy,
}

impl ResultFetcher {
    pub fn new(backend: Arc<dyn AnalysisBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Polls until the report is available.
    ///
    /// Attempts are strictly sequential. Transient failures back off and retry
    /// until `max_attempts` is reached (`Timeout`); invalid responses end the
    /// session immediately. Cancelling the session's token abandons the
    /// in-flight attempt or backoff and discards any late response.
    pub async fn fetch_report(
        &self,
        session: &mut FetchSession,
    ) -> Result<ComplianceReport, FetchError> {
        if session.state() != FetchState::Pending {
            return Err(FetchError::SessionClosed(session.state()));
        }
        let cancel = session.cancel_token();
        let max_attempts = self.policy.max_attempts.max(1);

        loop {
            debug!(
                session = %session.id(),
                attempt = session.attempt(),
                "requesting compliance report"
            );

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                response = self.backend.fetch_report() => Some(response),
            };
            let response = match response {
                Some(r) if !cancel.is_cancelled() => r,
                _ => return Err(Self::abandon(session)),
            };

            match classify(response) {
                Ok(report) => {
                    session.finish(FetchState::Ready);
                    info!(
                        session = %session.id(),
                        attempt = session.attempt(),
                        "compliance report received"
                    );
                    return Ok(report);
                }
                Err(FetchError::Transient(cause)) => {
                    session.record_error(cause.to_string());
                    if session.attempt() + 1 >= max_attempts {
                        session.finish(FetchState::Exhausted);
                        warn!(
                            session = %session.id(),
                            "giving up after {max_attempts} attempts: {cause}"
                        );
                        return Err(FetchError::Timeout {
                            attempts: max_attempts,
                            last_error: session.last_error().map(String::from),
                        });
                    }

                    warn!(
                        session = %session.id(),
                        attempt = session.attempt(),
                        "{cause}, retrying after {}ms...",
                        self.policy.backoff.as_millis()
                    );
                    session.advance();

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(Self::abandon(session)),
                        _ = tokio::time::sleep(self.policy.backoff) => {}
                    }
                }
                Err(terminal) => {
                    session.record_error(terminal.to_string());
                    session.finish(FetchState::Failed);
                    warn!(session = %session.id(), "compliance report fetch failed: {terminal}");
                    return Err(terminal);
                }
            }
        }
    }

    fn abandon(session: &mut FetchSession) -> FetchError {
        session.cancel();
        debug!(session = %session.id(), "fetch session cancelled, discarding response");
        FetchError::Cancelled
    }
}

/// Maps one attempt's outcome onto the error taxonomy.
fn classify(
    response: Result<BackendResponse, TransportError>,
) -> Result<ComplianceReport, FetchError> {
    let response = response?;

    if NOT_READY_STATUSES.contains(&response.status) {
        return Err(FetchError::Transient(TransientCause::NotReady {
            status: response.status,
        }));
    }

    if !response.is_success() {
        let detail = response
            .error_message()
            .map(|m| format!(": {m}"))
            .unwrap_or_default();
        return Err(FetchError::InvalidResponse(format!(
            "HTTP status {}{detail}",
            response.status
        )));
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::Transient(TransientCause::NotReady {
            status: response.status,
        }));
    }

    if !response.is_json() {
        return Err(FetchError::InvalidResponse(format!(
            "expected application/json, got {}",
            response.content_type.as_deref().unwrap_or("no content type")
        )));
    }

    ComplianceReport::from_json(&response.body)
        .map_err(|e| FetchError::InvalidResponse(format!("malformed compliance report: {e}")))
}
