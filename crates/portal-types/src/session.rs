use std::fmt;

use serde::{Deserialize, Serialize};

/// The single event that ends a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionOutcome {
    Submitted,
    Cancelled,
    ServerError,
    TimedOut,
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Submitted => write!(f, "submitted"),
            SessionOutcome::Cancelled => write!(f, "cancelled"),
            SessionOutcome::ServerError => write!(f, "server-error"),
            SessionOutcome::TimedOut => write!(f, "timed-out"),
        }
    }
}

/// Terminal outcome plus a human-readable detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub outcome: SessionOutcome,
    pub detail: String,
}

impl SessionResult {
    pub fn new(outcome: SessionOutcome, detail: impl Into<String>) -> Self {
        Self {
            outcome,
            detail: detail.into(),
        }
    }

    pub fn submitted() -> Self {
        Self::new(SessionOutcome::Submitted, "Your inputs have successfully been received")
    }

    pub fn cancelled() -> Self {
        Self::new(SessionOutcome::Cancelled, "The portal was cancelled by the user")
    }

    pub fn server_error(detail: impl Into<String>) -> Self {
        Self::new(SessionOutcome::ServerError, detail)
    }

    /// Timeout expressed as the user-facing expiry message.
    pub fn timed_out(timeout_secs: u64) -> Self {
        Self::new(
            SessionOutcome::TimedOut,
            format!(
                "Your session has expired (timed out) due to inactivity for {timeout_secs} seconds"
            ),
        )
    }

    /// Only a submitted session counts as success for the host workflow.
    pub fn is_success(&self) -> bool {
        self.outcome == SessionOutcome::Submitted
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

impl fmt::Display for SessionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.outcome, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_out_mentions_seconds() {
        let result = SessionResult::timed_out(1);
        assert_eq!(result.outcome, SessionOutcome::TimedOut);
        assert!(result.detail.contains("1 seconds"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(SessionResult::submitted().exit_code(), 0);
        assert_eq!(SessionResult::cancelled().exit_code(), 1);
        assert_eq!(SessionResult::server_error("boom").exit_code(), 1);
        assert_eq!(SessionResult::timed_out(5).exit_code(), 1);
    }

    #[test]
    fn test_outcome_serde_names() {
        assert_eq!(
            serde_json::to_string(&SessionOutcome::ServerError).unwrap(),
            "\"server-error\""
        );
        assert_eq!(SessionOutcome::TimedOut.to_string(), "timed-out");
    }
}
