//! BoxNotifier -- object-safe dynamic dispatch wrapper for Notifier.
//!
//! 1. `NotifierDyn` is an object-safe trait with boxed futures
//! 2. Blanket impl of `NotifierDyn` for every `T: Notifier`
//! 3. `BoxNotifier` wraps `Box<dyn NotifierDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use portal_types::error::NotifyError;
use portal_types::notifier::Channel;

use super::Notifier;

/// Object-safe version of [`Notifier`] with boxed futures.
pub trait NotifierDyn: Send + Sync {
    fn channel(&self) -> Channel;

    fn is_enabled(&self) -> bool;

    fn portal_link(&self, url: &str) -> String;

    fn verify_boxed(&self) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>>;

    fn notify_boxed<'a>(
        &'a self,
        title: Option<&'a str>,
        message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, NotifyError>> + Send + 'a>>;
}

impl<T: Notifier> NotifierDyn for T {
    fn channel(&self) -> Channel {
        Notifier::channel(self)
    }

    fn is_enabled(&self) -> bool {
        Notifier::is_enabled(self)
    }

    fn portal_link(&self, url: &str) -> String {
        Notifier::portal_link(self, url)
    }

    fn verify_boxed(&self) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>> {
        Box::pin(self.verify())
    }

    fn notify_boxed<'a>(
        &'a self,
        title: Option<&'a str>,
        message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, NotifyError>> + Send + 'a>> {
        Box::pin(self.notify(title, message))
    }
}

/// Type-erased notifier, selected per channel at construction time.
pub struct BoxNotifier {
    inner: Box<dyn NotifierDyn + Send + Sync>,
}

impl BoxNotifier {
    pub fn new<T: Notifier + 'static>(notifier: T) -> Self {
        Self {
            inner: Box::new(notifier),
        }
    }

    pub fn channel(&self) -> Channel {
        self.inner.channel()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    pub fn portal_link(&self, url: &str) -> String {
        self.inner.portal_link(url)
    }

    pub async fn verify(&self) -> Result<(), NotifyError> {
        self.inner.verify_boxed().await
    }

    pub async fn notify(
        &self,
        title: Option<&str>,
        message: &str,
    ) -> Result<Option<String>, NotifyError> {
        self.inner.notify_boxed(title, message).await
    }
}

impl std::fmt::Debug for BoxNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxNotifier")
            .field("channel", &self.channel())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
