//! Dispatch over every configured channel.

use portal_types::error::NotifyError;

use super::BoxNotifier;

/// Prefix of the message announcing where the portal can be reached.
pub const PORTAL_READY_MESSAGE: &str = "Your Interactive Inputs portal is reachable at:";

/// Ordered collection of notifiers, one per channel.
#[derive(Debug, Default)]
pub struct NotifierSet {
    notifiers: Vec<BoxNotifier>,
}

impl NotifierSet {
    pub fn new(notifiers: Vec<BoxNotifier>) -> Self {
        Self { notifiers }
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.notifiers.iter().filter(|n| n.is_enabled()).count()
    }

    /// Probe each enabled notifier in order; the first failure is returned.
    pub async fn verify_all(&self) -> Result<(), NotifyError> {
        for notifier in self.notifiers.iter().filter(|n| n.is_enabled()) {
            tracing::debug!(channel = %notifier.channel(), "Verifying notifier credential");
            notifier.verify().await.inspect_err(|e| {
                tracing::error!(channel = %notifier.channel(), error = %e, "Notifier verification failed");
            })?;
            tracing::info!(channel = %notifier.channel(), "Notifier verified");
        }
        Ok(())
    }

    /// Tell every enabled channel where the portal is reachable.
    ///
    /// Stops at the first delivery failure.
    pub async fn announce_portal(&self, title: Option<&str>, url: &str) -> Result<(), NotifyError> {
        for notifier in self.notifiers.iter().filter(|n| n.is_enabled()) {
            let message = format!("{PORTAL_READY_MESSAGE} {}", notifier.portal_link(url));
            let thread = notifier.notify(title, &message).await.inspect_err(|e| {
                tracing::error!(channel = %notifier.channel(), error = %e, "Unable to announce portal");
            })?;
            tracing::info!(channel = %notifier.channel(), thread = ?thread, "Portal announced");
        }
        Ok(())
    }

    /// Send the same message to every enabled channel, logging failures.
    pub async fn broadcast_best_effort(&self, title: Option<&str>, message: &str) {
        for notifier in self.notifiers.iter().filter(|n| n.is_enabled()) {
            if let Err(e) = notifier.notify(title, message).await {
                tracing::warn!(channel = %notifier.channel(), error = %e, "Notification not delivered");
            }
        }
    }
}
