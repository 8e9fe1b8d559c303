//! Per-field upload cache.
//!
//! Every `file` / `multifile` field owns one scratch directory for the
//! session. All of them live under a single base directory inside the
//! working directory, so one recursive delete reclaims everything:
//!
//! ```text
//! {working_dir}/.__interactive-inputs-cache/
//!   release-artifacts-0191c6.../
//!     build.zip
//!   screenshots-0191c6.../
//!     before.png
//!     after.png
//! ```
//!
//! The label -> directory table is built once at startup and never changes.
//! Each slot carries an async lock so a write and a reset on the same label
//! never interleave; different labels proceed independently.

pub mod fs;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use portal_types::error::CacheError;
use portal_types::field::FieldSchema;
use portal_types::outcome::{BatchTally, ResetOutcome, UploadOutcome};
use tokio::sync::Mutex;
use uuid::Uuid;

pub use fs::CacheFs;

/// Name of the shared base directory created inside the working directory.
pub const BASE_DIR_NAME: &str = ".__interactive-inputs-cache";

/// Separator between field label and file index in multipart part names,
/// e.g. `screenshots__index__2`.
pub const INDEX_SEPARATOR: &str = "__index__";

/// Resolve the field label from a multipart part name.
pub fn field_label_from_part(part_name: &str) -> &str {
    part_name
        .split_once(INDEX_SEPARATOR)
        .map(|(label, _)| label)
        .unwrap_or(part_name)
}

/// Reject names that could escape the field's directory.
pub fn validate_file_name(file_name: &str) -> Result<&str, CacheError> {
    let invalid = file_name.trim().is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains('\0');
    if invalid {
        return Err(CacheError::InvalidFileName(file_name.to_string()));
    }
    Ok(file_name)
}

/// One uploaded file as received by the HTTP layer.
///
/// `contents` is `Err` when the part could not be read fully; the reason is
/// logged and the file is recorded as failed.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub part_name: String,
    pub file_name: String,
    pub contents: Result<Vec<u8>, String>,
}

impl IncomingFile {
    /// Name reported in outcome records: the file name when present,
    /// otherwise the part name.
    fn display_name(&self) -> &str {
        if self.file_name.is_empty() {
            &self.part_name
        } else {
            &self.file_name
        }
    }
}

struct CacheSlot {
    dir: PathBuf,
    lock: Mutex<()>,
}

/// Label -> scratch directory table plus the operations on it.
pub struct UploadCache<F: CacheFs> {
    fs: F,
    base_dir: Option<PathBuf>,
    slots: HashMap<String, CacheSlot>,
}

impl<F: CacheFs> UploadCache<F> {
    /// A cache with no file fields.
    pub fn empty(fs: F) -> Self {
        Self {
            fs,
            base_dir: None,
            slots: HashMap::new(),
        }
    }

    /// Create one uniquely named directory per file-backed field.
    ///
    /// The base directory is only created when at least one such field exists.
    pub async fn provision(
        fs: F,
        working_dir: &Path,
        schema: &FieldSchema,
    ) -> Result<Self, CacheError> {
        let base = working_dir.join(BASE_DIR_NAME);
        let mut cache = Self::empty(fs);

        for field in schema.file_fields() {
            if cache.base_dir.is_none() {
                cache
                    .fs
                    .create_dir_all(&base)
                    .await
                    .map_err(|e| provision_error(&base, e))?;
                tracing::debug!(path = %base.display(), "Base cache directory created");
                cache.base_dir = Some(base.clone());
            }

            let dir = base.join(format!("{}-{}", field.label, Uuid::now_v7().simple()));
            cache
                .fs
                .create_dir_all(&dir)
                .await
                .map_err(|e| provision_error(&dir, e))?;
            tracing::debug!(label = %field.label, path = %dir.display(), "Cache sub-directory created");

            cache.slots.insert(
                field.label.clone(),
                CacheSlot {
                    dir,
                    lock: Mutex::new(()),
                },
            );
        }

        Ok(cache)
    }

    /// Shared ancestor of all field directories, if any were created.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn dir_for(&self, label: &str) -> Option<&Path> {
        self.slots.get(label).map(|slot| slot.dir.as_path())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot of the label -> directory table, sorted by label.
    pub fn mapping(&self) -> BTreeMap<String, PathBuf> {
        self.slots
            .iter()
            .map(|(label, slot)| (label.clone(), slot.dir.clone()))
            .collect()
    }

    /// Write one file into a field's directory under its original name.
    ///
    /// An existing file with the same name is overwritten.
    pub async fn upload_file(
        &self,
        label: &str,
        file_name: &str,
        contents: &[u8],
    ) -> Result<PathBuf, CacheError> {
        let slot = self
            .slots
            .get(label)
            .ok_or_else(|| CacheError::NoCacheDirFound(label.to_string()))?;
        let file_name = validate_file_name(file_name)?;
        let path = slot.dir.join(file_name);

        let _guard = slot.lock.lock().await;
        self.fs
            .write_file(&path, contents)
            .await
            .map_err(|e| CacheError::UnableToWriteFile {
                label: label.to_string(),
                file: file_name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(path)
    }

    /// Store every file of an upload request, continuing past failures.
    pub async fn store_batch(&self, files: Vec<IncomingFile>) -> UploadOutcome {
        let total = files.len();
        let mut tally = BatchTally::new();

        for (index, file) in files.into_iter().enumerate() {
            let position = index + 1;
            let label = field_label_from_part(&file.part_name);
            tracing::debug!(
                label = %label,
                file = %file.file_name,
                "[{position} of {total}] Initiating file upload flow"
            );

            let contents = match &file.contents {
                Ok(contents) => contents,
                Err(reason) => {
                    tracing::error!(file = %file.display_name(), %reason, "[{position} of {total}] Unable to read file");
                    tally.record_failure(file.display_name());
                    continue;
                }
            };

            match self.upload_file(label, &file.file_name, contents).await {
                Ok(path) => {
                    tracing::debug!(path = %path.display(), size = contents.len(), "[{position} of {total}] File stored");
                    tally.record_success(file.display_name());
                }
                Err(e) => {
                    tracing::error!(error = %e, "[{position} of {total}] Unable to store file");
                    tally.record_failure(file.display_name());
                }
            }
        }

        let outcome = UploadOutcome::from(tally);
        tracing::info!(
            status = %outcome.status,
            "Successfully uploaded {} of {} files",
            outcome.uploaded_files.len(),
            total
        );
        outcome
    }

    /// Delete every entry in a field's directory.
    ///
    /// Each entry is attempted once; a failed delete is recorded and the
    /// remaining entries are still processed. If any delete failed the error
    /// carries the full outcome.
    pub async fn reset_field(&self, label: &str) -> Result<ResetOutcome, CacheError> {
        if label.trim().is_empty() {
            tracing::error!("Input field label not found in request");
            return Err(CacheError::InvalidInputFieldId);
        }

        let slot = self.slots.get(label).ok_or_else(|| {
            tracing::error!(label = %label, "No cache directory found for input field label");
            CacheError::NoCacheDirFound(label.to_string())
        })?;

        let _guard = slot.lock.lock().await;

        tracing::info!(label = %label, path = %slot.dir.display(), "Resetting cache directory contents");

        let entries = self.fs.list_dir(&slot.dir).await.map_err(|e| {
            tracing::error!(path = %slot.dir.display(), error = %e, "Unable to read cache directory");
            CacheError::UnableToReadCacheDir {
                label: label.to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut tally = BatchTally::new();
        for entry in entries {
            let path = slot.dir.join(&entry);
            tracing::debug!(path = %path.display(), "Removing cached file");
            match self.fs.remove_entry(&path).await {
                Ok(()) => tally.record_success(entry),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Unable to remove cached file");
                    tally.record_failure(entry);
                }
            }
        }

        let failed = tally.has_failures();
        let outcome = ResetOutcome::from(tally);
        if failed {
            return Err(CacheError::UnableToRemoveCacheDirContents {
                label: label.to_string(),
                outcome,
            });
        }

        tracing::info!(
            label = %label,
            deleted = outcome.total_files_deleted,
            "Cache directory contents reset"
        );
        Ok(outcome)
    }

    /// Remove the base directory and every field directory beneath it.
    pub async fn teardown(&self) -> Result<(), std::io::Error> {
        match &self.base_dir {
            Some(base) => {
                self.fs.remove_dir_all(base).await?;
                tracing::debug!(path = %base.display(), "Cache directory removed");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

fn provision_error(path: &Path, e: std::io::Error) -> CacheError {
    tracing::error!(path = %path.display(), error = %e, "Unable to create cache directory");
    CacheError::ProvisionFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use crate::testing::MemoryFs;
    use portal_types::outcome::BatchStatus;

    const SCHEMA: &str = "fields:\n  - label: name\n    properties:\n      type: text\n  - label: Build Artifacts\n    properties:\n      type: multifile\n  - label: logo\n    properties:\n      type: file\n";

    async fn provisioned(fs: MemoryFs) -> UploadCache<MemoryFs> {
        let schema = schema::validate(SCHEMA).unwrap();
        UploadCache::provision(fs, Path::new("/work"), &schema).await.unwrap()
    }

    fn incoming(part: &str, file: &str, contents: &[u8]) -> IncomingFile {
        IncomingFile {
            part_name: part.to_string(),
            file_name: file.to_string(),
            contents: Ok(contents.to_vec()),
        }
    }

    #[test]
    fn test_field_label_from_part() {
        assert_eq!(field_label_from_part("logo__index__0"), "logo");
        assert_eq!(field_label_from_part("build-artifacts__index__12"), "build-artifacts");
        assert_eq!(field_label_from_part("logo"), "logo");
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("report.pdf").is_ok());
        assert!(validate_file_name("notes..txt").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("../etc/passwd").is_err());
        assert!(validate_file_name("a\\b").is_err());
    }

    #[tokio::test]
    async fn test_provision_only_file_fields() {
        let fs = MemoryFs::new();
        let cache = provisioned(fs.clone()).await;

        let mapping = cache.mapping();
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["build-artifacts", "logo"]);
        let base = cache.base_dir().unwrap();
        assert_eq!(base, Path::new("/work").join(BASE_DIR_NAME));
        for dir in mapping.values() {
            assert_eq!(dir.parent(), Some(base));
            assert!(fs.is_dir(dir));
        }
        assert_ne!(mapping["logo"], mapping["build-artifacts"]);
        assert!(cache.dir_for("name").is_none());
    }

    #[tokio::test]
    async fn test_provision_is_lazy_without_file_fields() {
        let fs = MemoryFs::new();
        let schema = schema::validate("fields:\n  - label: name\n    properties:\n      type: text\n").unwrap();
        let cache = UploadCache::provision(fs.clone(), Path::new("/work"), &schema).await.unwrap();
        assert!(cache.is_empty());
        assert!(cache.base_dir().is_none());
        assert!(!fs.is_dir(&Path::new("/work").join(BASE_DIR_NAME)));
    }

    #[tokio::test]
    async fn test_upload_overwrites_same_name() {
        let fs = MemoryFs::new();
        let cache = provisioned(fs.clone()).await;

        let first = cache.upload_file("logo", "logo.png", b"v1").await.unwrap();
        let second = cache.upload_file("logo", "logo.png", b"v2").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(fs.read(&second).unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_upload_unknown_label() {
        let cache = provisioned(MemoryFs::new()).await;
        let err = cache.upload_file("name", "a.txt", b"x").await.unwrap_err();
        assert_eq!(err, CacheError::NoCacheDirFound("name".to_string()));
    }

    #[tokio::test]
    async fn test_store_batch_partial_failure() {
        let fs = MemoryFs::new();
        fs.fail_writes_named("broken.bin");
        let cache = provisioned(fs).await;

        let outcome = cache
            .store_batch(vec![
                incoming("build-artifacts__index__0", "app.zip", b"zip"),
                incoming("build-artifacts__index__1", "broken.bin", b"bin"),
                IncomingFile {
                    part_name: "logo__index__0".to_string(),
                    file_name: "logo.png".to_string(),
                    contents: Err("connection reset".to_string()),
                },
                incoming("unknown__index__0", "stray.txt", b"?"),
                incoming("logo__index__1", "logo.svg", b"<svg/>"),
            ])
            .await;

        assert_eq!(outcome.status, BatchStatus::PartialSuccess);
        assert_eq!(outcome.uploaded_files, vec!["app.zip", "logo.svg"]);
        assert_eq!(outcome.failed_files, vec!["broken.bin", "logo.png", "stray.txt"]);
        assert_eq!(outcome.uploaded_files.len() + outcome.failed_files.len(), 5);
        assert_eq!(outcome.total_files, 5);
    }

    #[tokio::test]
    async fn test_store_batch_status_rule() {
        // N files, M of which fail: success iff M == 0, failed iff no successes.
        for n in 1..=4usize {
            for m in 0..=n {
                let fs = MemoryFs::new();
                let mut files = Vec::new();
                for i in 0..n {
                    let name = format!("f{i}.txt");
                    if i < m {
                        fs.fail_writes_named(&name);
                    }
                    files.push(incoming(&format!("logo__index__{i}"), &name, b"data"));
                }
                let cache = provisioned(fs).await;
                let outcome = cache.store_batch(files).await;

                let expected = if m == 0 {
                    BatchStatus::Success
                } else if m == n {
                    BatchStatus::Failed
                } else {
                    BatchStatus::PartialSuccess
                };
                assert_eq!(outcome.status, expected, "n={n} m={m}");
                assert_eq!(outcome.uploaded_files.len() + outcome.failed_files.len(), n);
                assert_eq!(outcome.failed_files.len(), m);
            }
        }
    }

    #[tokio::test]
    async fn test_reset_removes_everything() {
        let fs = MemoryFs::new();
        let cache = provisioned(fs.clone()).await;
        cache.upload_file("logo", "a.png", b"a").await.unwrap();
        cache.upload_file("logo", "b.png", b"b").await.unwrap();
        cache.upload_file("build-artifacts", "keep.zip", b"z").await.unwrap();

        let outcome = cache.reset_field("logo").await.unwrap();
        assert_eq!(outcome.status, BatchStatus::Success);
        assert_eq!(outcome.total_files_to_delete, 2);
        assert_eq!(outcome.total_files_deleted, 2);
        assert!(fs.list(cache.dir_for("logo").unwrap()).is_empty());
        assert_eq!(fs.list(cache.dir_for("build-artifacts").unwrap()), vec!["keep.zip"]);
    }

    #[tokio::test]
    async fn test_reset_empty_directory() {
        let cache = provisioned(MemoryFs::new()).await;
        let outcome = cache.reset_field("logo").await.unwrap();
        assert_eq!(outcome.status, BatchStatus::Success);
        assert_eq!(outcome.total_files_to_delete, 0);
    }

    #[tokio::test]
    async fn test_reset_continues_past_failures() {
        let fs = MemoryFs::new();
        let cache = provisioned(fs.clone()).await;
        for name in ["a.png", "b.png", "c.png", "d.png"] {
            cache.upload_file("logo", name, b"x").await.unwrap();
        }
        fs.fail_removal_named("b.png");
        fs.fail_removal_named("d.png");

        let err = cache.reset_field("logo").await.unwrap_err();
        match err {
            CacheError::UnableToRemoveCacheDirContents { label, outcome } => {
                assert_eq!(label, "logo");
                assert_eq!(outcome.status, BatchStatus::PartialSuccess);
                assert_eq!(outcome.total_files_to_delete, 4);
                assert_eq!(outcome.total_files_deleted, 2);
                assert_eq!(outcome.deleted_files, vec!["a.png", "c.png"]);
                assert_eq!(outcome.failed_files, vec!["b.png", "d.png"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs.list(cache.dir_for("logo").unwrap()), vec!["b.png", "d.png"]);
    }

    #[tokio::test]
    async fn test_reset_all_failures() {
        let fs = MemoryFs::new();
        let cache = provisioned(fs.clone()).await;
        cache.upload_file("logo", "a.png", b"x").await.unwrap();
        fs.fail_removal_named("a.png");

        match cache.reset_field("logo").await.unwrap_err() {
            CacheError::UnableToRemoveCacheDirContents { outcome, .. } => {
                assert_eq!(outcome.status, BatchStatus::Failed);
                assert_eq!(outcome.total_files_deleted, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_reset_errors() {
        let fs = MemoryFs::new();
        let cache = provisioned(fs.clone()).await;

        assert_eq!(cache.reset_field("").await.unwrap_err(), CacheError::InvalidInputFieldId);
        assert_eq!(
            cache.reset_field("name").await.unwrap_err(),
            CacheError::NoCacheDirFound("name".to_string())
        );

        fs.fail_listing();
        assert_eq!(cache.reset_field("logo").await.unwrap_err().key(), "UnableToReadCacheDir");
    }

    #[tokio::test]
    async fn test_upload_waits_for_reset_of_same_label() {
        let fs = MemoryFs::new();
        let cache = std::sync::Arc::new(provisioned(fs.clone()).await);
        let dir = cache.dir_for("logo").unwrap().to_path_buf();
        cache.upload_file("logo", "old.png", b"old").await.unwrap();

        let gate = fs.gate_listing();
        let reset = tokio::spawn({
            let cache = cache.clone();
            async move { cache.reset_field("logo").await }
        });
        gate.wait_entered().await;

        let mut upload = tokio::spawn({
            let cache = cache.clone();
            async move { cache.upload_file("logo", "new.png", b"new").await }
        });
        let blocked = tokio::time::timeout(std::time::Duration::from_millis(50), &mut upload).await;
        assert!(blocked.is_err(), "upload ran while the reset held the label");
        assert!(fs.read(&dir.join("new.png")).is_none());

        gate.open();
        let outcome = reset.await.unwrap().unwrap();
        assert_eq!(outcome.deleted_files, vec!["old.png"]);

        upload.await.unwrap().unwrap();
        assert_eq!(fs.read(&dir.join("new.png")), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_other_labels_not_blocked_by_reset() {
        let fs = MemoryFs::new();
        let cache = std::sync::Arc::new(provisioned(fs.clone()).await);

        let gate = fs.gate_listing();
        let reset = tokio::spawn({
            let cache = cache.clone();
            async move { cache.reset_field("logo").await }
        });
        gate.wait_entered().await;

        let path = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            cache.upload_file("build-artifacts", "app.zip", b"zip"),
        )
        .await
        .expect("upload to another label waited on the reset")
        .unwrap();
        assert_eq!(fs.read(&path), Some(b"zip".to_vec()));
        assert!(!reset.is_finished());

        gate.open();
        assert_eq!(reset.await.unwrap().unwrap().total_files_to_delete, 0);
    }

    #[tokio::test]
    async fn test_teardown_removes_base() {
        let fs = MemoryFs::new();
        let cache = provisioned(fs.clone()).await;
        cache.upload_file("logo", "a.png", b"x").await.unwrap();
        cache.teardown().await.unwrap();
        assert!(!fs.is_dir(cache.base_dir().unwrap()));
        assert!(fs.read(&cache.dir_for("logo").unwrap().join("a.png")).is_none());
    }
}
