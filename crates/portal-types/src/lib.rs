//! Shared domain types for the interactive inputs portal.
//!
//! This crate contains the types passed between the portal layers: the
//! validated field schema, per-request upload/reset outcome records, the
//! terminal session result, notifier configuration, the workflow run
//! context, and the error enums for every layer.
//!
//! Zero infrastructure dependencies -- only serde, thiserror, secrecy.

pub mod error;
pub mod field;
pub mod notifier;
pub mod outcome;
pub mod run;
pub mod session;
