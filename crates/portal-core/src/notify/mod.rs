//! Notifier capability and dispatch.
//!
//! A [`Notifier`] announces the portal to one external messaging channel.
//! Concrete channels live in portal-infra; a disabled channel is modelled by
//! [`DisabledNotifier`] so call sites never branch on an enabled flag.

pub mod box_notifier;
pub mod disabled;
pub mod set;

use portal_types::error::NotifyError;
use portal_types::notifier::Channel;

pub use box_notifier::BoxNotifier;
pub use disabled::DisabledNotifier;
pub use set::NotifierSet;

/// Trait for channel notifiers.
///
/// Uses native async fn in traits (Rust 2024 edition, RPITIT).
/// Not object-safe; use [`BoxNotifier`] for dynamic dispatch.
pub trait Notifier: Send + Sync {
    fn channel(&self) -> Channel;

    /// Whether calls reach the provider. Disabled notifiers return `false`.
    fn is_enabled(&self) -> bool;

    /// Render a link to the portal in the channel's markup dialect.
    fn portal_link(&self, url: &str) -> String;

    /// Lightweight authenticated probe of the configured credential.
    fn verify(&self) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;

    /// Post a message rendered with the run context and optional title.
    ///
    /// Returns the provider's thread reference when it issues one.
    fn notify(
        &self,
        title: Option<&str>,
        message: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, NotifyError>> + Send;
}
