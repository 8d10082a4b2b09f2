use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

/// Shared cancellation flag. Cloned into whoever may tear the view down.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchState {
    Pending,
    Ready,
    Exhausted,
    Failed,
    Cancelled,
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchState::Pending => "pending",
            FetchState::Ready => "ready",
            FetchState::Exhausted => "exhausted",
            FetchState::Failed => "failed",
            FetchState::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// One bounded polling sequence. `attempt` is zero-indexed: it names the
/// attempt currently in flight, or the one that produced the final outcome.
#[derive(Debug)]
pub struct FetchSession {
    id: Uuid,
    attempt: u32,
    state: FetchState,
    last_error: Option<String>,
    cancel: CancelToken,
}

impl FetchSession {
    pub fn new() -> Self {
        Self::with_cancel(CancelToken::new())
    }

    /// A session that is cancelled together with `cancel`.
    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            attempt: 0,
            state: FetchState::Pending,
            last_error: None,
            cancel,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if self.state == FetchState::Pending {
            self.state = FetchState::Cancelled;
        }
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    pub(crate) fn advance(&mut self) {
        self.attempt += 1;
    }

    pub(crate) fn finish(&mut self, state: FetchState) {
        self.state = state;
    }
}

impl Default for FetchSession {
    fn default() -> Self {
        Self::new()
    }
}
