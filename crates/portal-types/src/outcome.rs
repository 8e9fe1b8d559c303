//! Per-request outcome records for upload and reset actions.
//!
//! Both actions process a batch of items and never abort on a single item
//! failure. Progress is accumulated in a [`BatchTally`] and the tri-state
//! [`BatchStatus`] is derived from it once the loop finishes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cumulative status of a batch of per-item operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "partial success")]
    PartialSuccess,
    #[serde(rename = "failed")]
    Failed,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Success => write!(f, "success"),
            BatchStatus::PartialSuccess => write!(f, "partial success"),
            BatchStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Accumulator for succeeded and failed item names, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTally {
    succeeded: Vec<String>,
    failed: Vec<String>,
}

impl BatchTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, item: impl Into<String>) {
        self.succeeded.push(item.into());
    }

    pub fn record_failure(&mut self, item: impl Into<String>) {
        self.failed.push(item.into());
    }

    pub fn succeeded(&self) -> &[String] {
        &self.succeeded
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// `Success` with zero failures, `Failed` with zero successes, otherwise
    /// `PartialSuccess`. An empty batch counts as `Success`.
    pub fn status(&self) -> BatchStatus {
        match (self.succeeded.is_empty(), self.failed.is_empty()) {
            (_, true) => BatchStatus::Success,
            (true, false) => BatchStatus::Failed,
            (false, false) => BatchStatus::PartialSuccess,
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.succeeded, self.failed)
    }
}

/// Result of one upload request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub status: BatchStatus,
    pub uploaded_files: Vec<String>,
    pub failed_files: Vec<String>,
    pub total_files: usize,
}

impl From<BatchTally> for UploadOutcome {
    fn from(tally: BatchTally) -> Self {
        let status = tally.status();
        let total_files = tally.total();
        let (uploaded_files, failed_files) = tally.into_parts();
        Self {
            status,
            uploaded_files,
            failed_files,
            total_files,
        }
    }
}

/// Result of clearing one field's cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetOutcome {
    pub status: BatchStatus,
    pub deleted_files: Vec<String>,
    pub failed_files: Vec<String>,
    pub total_files_to_delete: usize,
    pub total_files_deleted: usize,
}

impl From<BatchTally> for ResetOutcome {
    fn from(tally: BatchTally) -> Self {
        let status = tally.status();
        let total_files_to_delete = tally.total();
        let (deleted_files, failed_files) = tally.into_parts();
        Self {
            status,
            total_files_deleted: deleted_files.len(),
            deleted_files,
            failed_files,
            total_files_to_delete,
        }
    }
}
