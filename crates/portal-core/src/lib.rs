//! Business logic and port traits for the interactive inputs portal.
//!
//! This crate defines the "ports" (`CacheFs`, `Notifier`, `OutputSink`,
//! `PortalLauncher`) that the infrastructure and API layers implement, plus
//! the logic that runs against them: field schema validation, the per-field
//! upload cache, notifier dispatch, and the session orchestrator. It depends
//! only on `portal-types` -- never on `portal-infra` or any HTTP crate.

pub mod cache;
pub mod notify;
pub mod output;
pub mod schema;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
