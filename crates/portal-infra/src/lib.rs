//! Infrastructure layer for the interactive inputs portal.
//!
//! Implements the ports defined in `portal-core`: the on-disk upload cache
//! filesystem, the Slack and Discord notifiers, and the workflow output
//! sinks. Also resolves the run context and listener endpoint from the
//! process environment.

pub mod filesystem;
pub mod notifier;
pub mod output;
pub mod run_context;
pub mod tunnel;
