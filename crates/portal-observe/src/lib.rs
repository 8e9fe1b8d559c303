//! Observability setup for the interactive inputs portal.

pub mod tracing_setup;

pub use tracing_setup::{default_filter, init_tracing, shutdown_tracing};
