//! Session orchestrator: runs one portal session from startup to its single
//! terminal outcome.
//!
//! Startup is fail-fast and ordered:
//! 1. working directory present
//! 2. every enabled notifier verified
//! 3. upload cache provisioned
//! 4. listener bound
//! 5. every enabled notifier told where the portal is
//!
//! The serve loop then races the session timeout. Whichever resolves first
//! decides the outcome through [`SessionControl`], and cleanup runs last.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use portal_types::error::SessionError;
use portal_types::field::FieldSchema;
use portal_types::session::{SessionOutcome, SessionResult};

use crate::cache::{CacheFs, UploadCache};
use crate::notify::NotifierSet;

use super::launcher::{PortalContext, PortalLauncher};
use super::SessionControl;

/// Prefix of the message sent when the listener fails.
pub const LISTENER_FAILURE_MESSAGE: &str =
    "A failure has occurred while starting/running your self-hosted portal:";

/// Session timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// What happens to the upload cache once the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPolicy {
    /// Keep directories after a submit (their paths were reported), remove
    /// them on every other outcome.
    #[default]
    RemoveUnlessSubmitted,
    /// Never remove anything.
    Retain,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub title: Option<String>,
    pub timeout_secs: u64,
    /// Directory the cache lives under. `None` aborts startup.
    pub working_dir: Option<PathBuf>,
    pub cleanup: CleanupPolicy,
    /// How long to wait for in-flight requests after the timeout fires.
    pub drain_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            title: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            working_dir: None,
            cleanup: CleanupPolicy::default(),
            drain_timeout: Duration::from_secs(10),
        }
    }
}

pub struct SessionOrchestrator<F: CacheFs, L: PortalLauncher<F>> {
    settings: SessionSettings,
    schema: FieldSchema,
    notifiers: NotifierSet,
    fs: F,
    launcher: L,
}

impl<F, L> SessionOrchestrator<F, L>
where
    F: CacheFs + 'static,
    L: PortalLauncher<F>,
{
    pub fn new(
        settings: SessionSettings,
        schema: FieldSchema,
        notifiers: NotifierSet,
        fs: F,
        launcher: L,
    ) -> Self {
        Self {
            settings,
            schema,
            notifiers,
            fs,
            launcher,
        }
    }

    /// Run the session to completion.
    ///
    /// `Err` means startup failed and no terminal outcome was reached.
    pub async fn run(self) -> Result<SessionResult, SessionError> {
        let Self {
            settings,
            schema,
            notifiers,
            fs,
            launcher,
        } = self;
        let title = settings.title.as_deref();

        let working_dir = settings
            .working_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| {
                tracing::error!("Working directory is not set");
                SessionError::WorkingContextMissing
            })?;

        notifiers
            .verify_all()
            .await
            .map_err(SessionError::Verification)?;

        let cache = Arc::new(UploadCache::provision(fs, working_dir, &schema).await?);
        tracing::debug!(fields = schema.len(), cached = cache.mapping().len(), "Upload cache ready");

        let control = SessionControl::new();
        let context = PortalContext {
            schema: Arc::new(schema),
            cache: Arc::clone(&cache),
            control: control.clone(),
        };

        let bound = match launcher.launch(context).await {
            Ok(bound) => bound,
            Err(e) => {
                tracing::error!(error = %e, "Unable to start portal listener");
                notifiers
                    .broadcast_best_effort(title, &format!("{LISTENER_FAILURE_MESSAGE} {e}"))
                    .await;
                cleanup(&cache, settings.cleanup, None).await;
                return Err(e);
            }
        };

        tracing::info!(url = %bound.url, "Your Interactive Inputs portal is reachable at: {}", bound.url);

        if let Err(e) = notifiers.announce_portal(title, &bound.url).await {
            control.abort();
            drop(bound.serve);
            cleanup(&cache, settings.cleanup, None).await;
            return Err(SessionError::Notification(e));
        }

        let mut serve = bound.serve;
        let timeout = Duration::from_secs(settings.timeout_secs);

        let race = tokio::select! {
            served = &mut serve => Race::Served(served),
            _ = tokio::time::sleep(timeout) => Race::TimedOut,
        };

        match race {
            Race::Served(Err(reason)) => {
                tracing::error!(%reason, "Portal listener failed");
                let message = format!("{LISTENER_FAILURE_MESSAGE} {reason}");
                if control.finish(SessionResult::server_error(message.clone())) {
                    notifiers.broadcast_best_effort(title, &message).await;
                }
            }
            Race::Served(Ok(())) => {
                if !control.is_finished() {
                    tracing::warn!("Portal listener stopped without a terminal action");
                    control.finish(SessionResult::server_error(format!(
                        "{LISTENER_FAILURE_MESSAGE} listener stopped unexpectedly"
                    )));
                }
            }
            Race::TimedOut => {
                control.finish(SessionResult::timed_out(settings.timeout_secs));
                match tokio::time::timeout(settings.drain_timeout, serve).await {
                    Ok(Ok(())) => tracing::debug!("Portal listener drained"),
                    Ok(Err(reason)) => tracing::warn!(%reason, "Portal listener failed while draining"),
                    Err(_) => tracing::warn!(
                        drain_secs = settings.drain_timeout.as_secs(),
                        "Portal listener did not stop in time"
                    ),
                }
            }
        }

        let result = control.result().unwrap_or_else(|| {
            SessionResult::server_error(format!("{LISTENER_FAILURE_MESSAGE} no terminal outcome recorded"))
        });
        cleanup(&cache, settings.cleanup, Some(result.outcome)).await;

        Ok(result)
    }
}

enum Race {
    Served(Result<(), String>),
    TimedOut,
}

async fn cleanup<F: CacheFs>(
    cache: &UploadCache<F>,
    policy: CleanupPolicy,
    outcome: Option<SessionOutcome>,
) {
    let keep = match policy {
        CleanupPolicy::Retain => true,
        CleanupPolicy::RemoveUnlessSubmitted => outcome == Some(SessionOutcome::Submitted),
    };
    if keep {
        if let Some(base) = cache.base_dir() {
            tracing::debug!(path = %base.display(), "Retaining upload cache");
        }
        return;
    }
    if let Err(e) = cache.teardown().await {
        tracing::warn!(error = %e, "Unable to remove upload cache");
    }
}
