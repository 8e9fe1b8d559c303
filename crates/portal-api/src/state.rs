//! Shared state handed to every request handler.
//!
//! The session pieces (schema, cache, control) come from the orchestrator
//! through [`PortalContext`]; the rest is fixed for the process lifetime.

use std::sync::Arc;

use portal_core::output::OutputSink;
use portal_core::session::PortalContext;
use portal_infra::filesystem::LocalCacheFs;
use portal_types::run::RunContext;

use crate::config::TerminationPolicy;
use crate::render::{self, FormRenderer};

pub type ConcretePortalContext = PortalContext<LocalCacheFs>;

/// Request-independent settings for the HTTP layer.
#[derive(Clone)]
pub struct PortalPresentation {
    pub title: Option<String>,
    pub timeout_secs: u64,
    pub run: RunContext,
    pub output: Arc<dyn OutputSink>,
    pub renderer: Arc<dyn FormRenderer>,
    pub termination: TerminationPolicy,
}

#[derive(Clone)]
pub struct PortalState {
    pub context: ConcretePortalContext,
    pub output: Arc<dyn OutputSink>,
    pub renderer: Arc<dyn FormRenderer>,
    pub title: Option<String>,
    /// Timeout pre-formatted as `m:ss`.
    pub timeout_display: String,
    /// Repository owner shown in the form header.
    pub display_context: String,
    pub run_url: String,
    pub termination: TerminationPolicy,
}

impl PortalState {
    pub fn new(context: ConcretePortalContext, presentation: PortalPresentation) -> Self {
        Self {
            context,
            timeout_display: render::format_timeout(presentation.timeout_secs),
            display_context: presentation.run.repository_owner().to_string(),
            run_url: presentation.run.run_url(),
            output: presentation.output,
            renderer: presentation.renderer,
            title: presentation.title,
            termination: presentation.termination,
        }
    }
}
