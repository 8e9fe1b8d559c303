//! Local filesystem implementation of the `CacheFs` trait.
//!
//! All operations go through `tokio::fs` for async I/O.

use std::path::Path;

use portal_core::cache::CacheFs;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCacheFs;

impl LocalCacheFs {
    pub fn new() -> Self {
        Self
    }
}

impl CacheFs for LocalCacheFs {
    async fn create_dir_all(&self, path: &Path) -> Result<(), std::io::Error> {
        tokio::fs::create_dir_all(path).await
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), std::io::Error> {
        tokio::fs::write(path, contents).await
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, std::io::Error> {
        let mut entries = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn remove_entry(&self, path: &Path) -> Result<(), std::io::Error> {
        // symlink_metadata so a link to a directory is unlinked, not followed
        let metadata = tokio::fs::symlink_metadata(path).await?;
        if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        }
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<(), std::io::Error> {
        tokio::fs::remove_dir_all(path).await
    }
}
