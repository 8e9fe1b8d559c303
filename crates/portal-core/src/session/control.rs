//! Exactly-once session termination.
//!
//! Submit, cancel, a listener fault and the session timeout all race to end
//! the session. [`SessionControl`] is the single arbiter: the first
//! [`finish`](SessionControl::finish) call stores its result and cancels the
//! shutdown token; every later call is ignored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use portal_types::session::SessionResult;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct Inner {
    result: OnceLock<SessionResult>,
    closing: AtomicBool,
    shutdown: CancellationToken,
}

/// Shared handle for ending a session. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SessionControl {
    inner: Arc<Inner>,
}

impl SessionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the terminal result and signal shutdown.
    ///
    /// Returns `true` only for the call that actually ended the session.
    pub fn finish(&self, result: SessionResult) -> bool {
        let outcome = result.outcome;
        let won = self.inner.result.set(result).is_ok();
        if won {
            self.inner.closing.store(true, Ordering::SeqCst);
            tracing::info!(outcome = %outcome, "Session terminated");
            self.inner.shutdown.cancel();
        } else {
            tracing::debug!(outcome = %outcome, "Session already terminated, ignoring");
        }
        won
    }

    /// Claim the right to schedule termination from a user action.
    ///
    /// Only the first caller gets `true`; later submit or cancel requests are
    /// rejected while the session winds down.
    pub fn begin_closing(&self) -> bool {
        self.inner
            .closing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Finish with `result` after `grace`, unless the session ends first.
    pub fn schedule_finish(&self, result: SessionResult, grace: Duration) -> JoinHandle<bool> {
        let control = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(grace) => control.finish(result),
                _ = control.inner.shutdown.cancelled() => false,
            }
        })
    }

    /// Signal shutdown without recording a result.
    pub fn abort(&self) {
        self.inner.closing.store(true, Ordering::SeqCst);
        self.inner.shutdown.cancel();
    }

    pub fn is_closing(&self) -> bool {
        self.inner.closing.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.inner.result.get().is_some()
    }

    pub fn result(&self) -> Option<SessionResult> {
        self.inner.result.get().cloned()
    }

    /// Token cancelled when the session ends; listeners shut down on it.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    /// Resolves once the session has ended or been aborted.
    pub async fn finished(&self) {
        self.inner.shutdown.cancelled().await
    }
}
