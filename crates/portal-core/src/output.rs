//! OutputSink trait for reporting submitted values to the calling workflow.
//!
//! portal-infra provides the file-backed and log-only implementations.

/// Destination for resolved field values.
pub trait OutputSink: Send + Sync {
    /// Record one `key = value` pair. Values may span several lines.
    fn set_output(&self, key: &str, value: &str) -> std::io::Result<()>;
}

impl<T: OutputSink + ?Sized> OutputSink for std::sync::Arc<T> {
    fn set_output(&self, key: &str, value: &str) -> std::io::Result<()> {
        (**self).set_output(key, value)
    }
}
