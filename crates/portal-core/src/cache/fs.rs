//! CacheFs trait for abstracting upload cache I/O.
//!
//! Defined in portal-core so the upload cache can be exercised against an
//! in-memory implementation. The `LocalCacheFs` adapter lives in portal-infra.

use std::path::Path;

/// Filesystem operations needed by the upload cache.
pub trait CacheFs: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Write bytes to a file, replacing any existing content.
    fn write_file(
        &self,
        path: &Path,
        contents: &[u8],
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Names of the direct entries of a directory.
    fn list_dir(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<Vec<String>, std::io::Error>> + Send;

    /// Remove a single entry: a file, or a directory with its contents.
    fn remove_entry(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Remove a directory and all its contents.
    fn remove_dir_all(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;
}
