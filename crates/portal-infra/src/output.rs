//! Output sinks for submitted field values.
//!
//! Remote runs append to the workflow output file using the multi-line
//! delimiter form:
//!
//! ```text
//! release-notes<<ghadelimiter_0191c6...
//! first line
//! second line
//! ghadelimiter_0191c6...
//! ```
//!
//! Local runs have no output file, so values are only logged.

use std::io::Write;
use std::path::{Path, PathBuf};

use portal_core::output::OutputSink;
use uuid::Uuid;

/// Environment variable naming the workflow output file.
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Appends outputs to a workflow output file.
#[derive(Debug, Clone)]
pub struct GithubOutputFile {
    path: PathBuf,
}

impl GithubOutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the output file from the environment, if set.
    pub fn from_env() -> Option<Self> {
        std::env::var_os(OUTPUT_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for GithubOutputFile {
    fn set_output(&self, key: &str, value: &str) -> std::io::Result<()> {
        let delimiter = format!("ghadelimiter_{}", Uuid::now_v7().simple());
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{key}<<{delimiter}")?;
        writeln!(file, "{value}")?;
        writeln!(file, "{delimiter}")?;
        tracing::debug!(key = %key, "Output written");
        Ok(())
    }
}

/// Logs outputs instead of writing them anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOutputSink;

impl OutputSink for LogOutputSink {
    fn set_output(&self, key: &str, value: &str) -> std::io::Result<()> {
        tracing::info!(key = %key, value = %value, "Output set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_appends_delimited_entries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("output");
        std::fs::write(&path, "existing=1\n").unwrap();

        let sink = GithubOutputFile::new(&path);
        sink.set_output("name", "Jane").unwrap();
        sink.set_output("notes", "line one\nline two").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "existing=1");

        let (key, delimiter) = lines[1].split_once("<<").unwrap();
        assert_eq!(key, "name");
        assert!(delimiter.starts_with("ghadelimiter_"));
        assert_eq!(lines[2], "Jane");
        assert_eq!(lines[3], delimiter);

        let (key, second) = lines[4].split_once("<<").unwrap();
        assert_eq!(key, "notes");
        assert_ne!(second, delimiter);
        assert_eq!(&lines[5..7], &["line one", "line two"]);
        assert_eq!(lines[7], second);
    }

    #[test]
    fn test_log_sink_never_fails() {
        assert!(LogOutputSink.set_output("k", "v").is_ok());
    }
}
