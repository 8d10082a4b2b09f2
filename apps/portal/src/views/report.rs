use tracing::info;

use crate::fetch::{CancelToken, FetchError, FetchSession, ResultFetcher};
use crate::render::{render_report, Dashboard};

/// What the result view shows after a load.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loaded(Dashboard),
    Error { message: String, can_retry: bool },
    /// The view was torn down; nothing should be shown.
    Cancelled,
}

/// Result screen: owns exactly one `FetchSession` at a time. Every session
/// shares the view's teardown token, so dropping the view (or cancelling the
/// handle) cancels whichever session is current.
pub struct ReportView {
    fetcher: ResultFetcher,
    teardown: CancelToken,
    session: FetchSession,
}

impl ReportView {
    pub fn new(fetcher: ResultFetcher) -> Self {
        let teardown = CancelToken::new();
        Self {
            fetcher,
            session: FetchSession::with_cancel(teardown.clone()),
            teardown,
        }
    }

    pub fn session(&self) -> &FetchSession {
        &self.session
    }

    /// Handle for tearing the view down from elsewhere (e.g. navigation).
    pub fn teardown_handle(&self) -> CancelToken {
        self.teardown.clone()
    }

    pub async fn load(&mut self) -> ViewState {
        match self.fetcher.fetch_report(&mut self.session).await {
            Ok(report) => ViewState::Loaded(render_report(&report)),
            Err(FetchError::Cancelled) => ViewState::Cancelled,
            Err(e) => ViewState::Error {
                message: format!("Failed to load compliance data: {e}"),
                can_retry: e.offers_retry(),
            },
        }
    }

    /// "Try again": replaces the finished session with a new one and loads.
    pub async fn retry(&mut self) -> ViewState {
        self.session = FetchSession::with_cancel(self.teardown.clone());
        info!(session = %self.session.id(), "starting fresh fetch session");
        self.load().await
    }
}

impl Drop for ReportView {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
