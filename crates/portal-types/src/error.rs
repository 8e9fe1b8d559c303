use thiserror::Error;

use crate::notifier::Channel;
use crate::outcome::ResetOutcome;

/// Errors from validating the declarative field list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("malformed fields input data provided: {0}")]
    MalformedFieldsInputDataProvided(String),

    #[error("no fields provided")]
    NoFieldsProvided,

    #[error("invalid field type '{provided}' for field '{label}', valid types are: {valid}")]
    InvalidFieldType {
        label: String,
        provided: String,
        valid: String,
    },

    #[error("invalid label '{0}': not kebab case compatible")]
    InvalidLabel(String),

    #[error("duplicate field label detected: '{0}'")]
    DuplicateFieldLabel(String),
}

impl SchemaError {
    /// Stable machine-readable key.
    pub fn key(&self) -> &'static str {
        match self {
            SchemaError::MalformedFieldsInputDataProvided(_) => "MalformedFieldsInputDataProvided",
            SchemaError::NoFieldsProvided => "NoFieldsProvided",
            SchemaError::InvalidFieldType { .. } => "InvalidFieldType",
            SchemaError::InvalidLabel(_) => "InvalidLabel",
            SchemaError::DuplicateFieldLabel(_) => "DuplicateFieldLabel",
        }
    }
}

/// Errors from the per-field upload cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("target input field id (label) missing or malformatted")]
    InvalidInputFieldId,

    #[error("no cache directory found for input field label '{0}'")]
    NoCacheDirFound(String),

    #[error("unable to read cache directory for '{label}': {reason}")]
    UnableToReadCacheDir { label: String, reason: String },

    /// At least one entry could not be deleted. `outcome` records every
    /// deletion attempted, including the ones that succeeded.
    #[error("unable to remove cache directory content(s) for '{label}'")]
    UnableToRemoveCacheDirContents { label: String, outcome: ResetOutcome },

    #[error("unable to write '{file}' to cache directory for '{label}': {reason}")]
    UnableToWriteFile {
        label: String,
        file: String,
        reason: String,
    },

    #[error("invalid file name '{0}'")]
    InvalidFileName(String),

    #[error("unable to create cache directory '{path}': {reason}")]
    ProvisionFailed { path: String, reason: String },
}

impl CacheError {
    /// Stable machine-readable key.
    pub fn key(&self) -> &'static str {
        match self {
            CacheError::InvalidInputFieldId => "InvalidInputFieldId",
            CacheError::NoCacheDirFound(_) => "NoCacheDirFound",
            CacheError::UnableToReadCacheDir { .. } => "UnableToReadCacheDir",
            CacheError::UnableToRemoveCacheDirContents { .. } => "UnableToRemoveCacheDirContents",
            CacheError::UnableToWriteFile { .. } => "UnableToWriteFile",
            CacheError::InvalidFileName(_) => "InvalidFileName",
            CacheError::ProvisionFailed { .. } => "ProvisionFailed",
        }
    }
}

/// Errors from notifier verification and delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("invalid {channel} credential provided")]
    InvalidCredentialProvided { channel: Channel },

    #[error("unexpected {channel} verification status code: {status}")]
    UnexpectedVerificationStatusCode { channel: Channel, status: u16 },

    #[error("failed to send message with {channel} notifier: {reason}")]
    FailedToSendMessage { channel: Channel, reason: String },

    #[error("{channel} request failed: {reason}")]
    Transport { channel: Channel, reason: String },

    #[error("unexpected {channel} response body: {reason}")]
    Decode { channel: Channel, reason: String },
}

impl NotifyError {
    pub fn channel(&self) -> Channel {
        match self {
            NotifyError::InvalidCredentialProvided { channel }
            | NotifyError::UnexpectedVerificationStatusCode { channel, .. }
            | NotifyError::FailedToSendMessage { channel, .. }
            | NotifyError::Transport { channel, .. }
            | NotifyError::Decode { channel, .. } => *channel,
        }
    }

    /// Stable machine-readable key.
    pub fn key(&self) -> &'static str {
        match self {
            NotifyError::InvalidCredentialProvided { .. } => "InvalidCredentialProvided",
            NotifyError::UnexpectedVerificationStatusCode { .. } => {
                "UnexpectedVerificationStatusCode"
            }
            NotifyError::FailedToSendMessage { .. } => "FailedToSendMessage",
            NotifyError::Transport { .. } => "NotifierTransportError",
            NotifyError::Decode { .. } => "NotifierDecodeError",
        }
    }
}

/// Errors that abort a session before it reaches a terminal outcome.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: working context identifier is missing")]
    WorkingContextMissing,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration error: {0}")]
    Schema(#[from] SchemaError),

    /// An enabled channel was configured with an empty or placeholder credential.
    #[error("configuration error: {0}")]
    Credential(NotifyError),

    #[error("verification error: {0}")]
    Verification(NotifyError),

    #[error("notification error: {0}")]
    Notification(NotifyError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("listener error: {0}")]
    Listener(String),
}

impl SessionError {
    /// Which class of failure aborted the session.
    pub fn category(&self) -> &'static str {
        match self {
            SessionError::WorkingContextMissing
            | SessionError::Config(_)
            | SessionError::Schema(_)
            | SessionError::Credential(_) => "configuration",
            SessionError::Verification(_) => "verification",
            SessionError::Notification(_) => "notification",
            SessionError::Cache(_) => "cache",
            SessionError::Listener(_) => "listener",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::BatchTally;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::DuplicateFieldLabel("name".to_string());
        assert_eq!(err.to_string(), "duplicate field label detected: 'name'");
        assert_eq!(err.key(), "DuplicateFieldLabel");
    }

    #[test]
    fn test_remove_error_carries_outcome() {
        let mut tally = BatchTally::new();
        tally.record_success("a.txt");
        tally.record_failure("b.txt");
        let err = CacheError::UnableToRemoveCacheDirContents {
            label: "logs".to_string(),
            outcome: tally.into(),
        };
        match err {
            CacheError::UnableToRemoveCacheDirContents { outcome, .. } => {
                assert_eq!(outcome.total_files_deleted, 1);
                assert_eq!(outcome.failed_files, vec!["b.txt"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_session_error_category() {
        let err = SessionError::Verification(NotifyError::InvalidCredentialProvided {
            channel: Channel::Slack,
        });
        assert_eq!(err.category(), "verification");
        assert_eq!(err.to_string(), "verification error: invalid slack credential provided");
        assert_eq!(SessionError::from(SchemaError::NoFieldsProvided).category(), "configuration");
    }
}
