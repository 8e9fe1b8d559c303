//! PortalLauncher trait for binding the HTTP listener.
//!
//! Defined in portal-core so the orchestrator stays free of any HTTP crate.
//! The axum implementation lives in portal-api.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use portal_types::error::SessionError;
use portal_types::field::FieldSchema;

use crate::cache::{CacheFs, UploadCache};

use super::SessionControl;

/// Serve loop of a bound listener. Resolves when the listener stops.
pub type ServeFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

/// A listener that has bound successfully but is not yet serving.
pub struct BoundPortal {
    /// Address users open to reach the form.
    pub url: String,
    pub serve: ServeFuture,
}

impl std::fmt::Debug for BoundPortal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundPortal").field("url", &self.url).finish_non_exhaustive()
    }
}

/// Everything request handlers need for the lifetime of the session.
pub struct PortalContext<F: CacheFs> {
    pub schema: Arc<FieldSchema>,
    pub cache: Arc<UploadCache<F>>,
    pub control: SessionControl,
}

impl<F: CacheFs> Clone for PortalContext<F> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            cache: Arc::clone(&self.cache),
            control: self.control.clone(),
        }
    }
}

/// Binds the portal listener for one session.
///
/// The serve loop must stop once `context.control` signals shutdown.
pub trait PortalLauncher<F: CacheFs>: Send {
    fn launch(
        self,
        context: PortalContext<F>,
    ) -> impl Future<Output = Result<BoundPortal, SessionError>> + Send;
}
