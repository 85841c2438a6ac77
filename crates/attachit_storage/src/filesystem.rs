//! Filesystem-based content store.
//!
//! Each key maps to one blob file plus a JSON sidecar carrying its
//! [`BlobReference`], sharded by a hash of the key.

use crate::reference::compute_hash;
use crate::{BlobReference, ContentStore};
use attachit_core::StorageKey;
use attachit_error::{AttachItError, AttachItResult, StorageError, StorageErrorKind};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem content store.
///
/// Stores blobs in a sharded structure:
/// `{root}/{sha256(key)[0:2]}/{key}.blob` with metadata in
/// `{root}/{sha256(key)[0:2]}/{key}.json`
///
/// # Example Structure
///
/// ```text
/// /var/attachit/
/// ├── 3f/
/// │   ├── 42_avatar_thumb.blob
/// │   └── 42_avatar_thumb.json
/// └── a9/
///     ├── 42_avatar_original.blob
///     └── 42_avatar_original.json
/// ```
///
/// # Features
///
/// - **Upsert**: Re-putting a key replaces the previous blob
/// - **Atomic writes**: Uses temp file + rename for atomicity
/// - **Organized structure**: One level of shard directories prevents directory bloat
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
}

impl FileSystemStore {
    /// Create a new filesystem store.
    ///
    /// Creates the root directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> AttachItResult<Self> {
        let root = root.into();

        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        tracing::info!(path = %root.display(), "Created filesystem store");
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the blob file for a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be used as a file name.
    pub fn blob_path(&self, key: &StorageKey) -> AttachItResult<PathBuf> {
        Ok(self.shard_dir(key)?.join(format!("{}.blob", key)))
    }

    fn meta_path(&self, key: &StorageKey) -> AttachItResult<PathBuf> {
        Ok(self.shard_dir(key)?.join(format!("{}.json", key)))
    }

    fn shard_dir(&self, key: &StorageKey) -> AttachItResult<PathBuf> {
        validate_key(key)?;
        let hash = compute_hash(key.as_str().as_bytes());
        Ok(self.root.join(&hash[0..2]))
    }

    /// Write through a uniquely named temp file, then rename over `path`.
    async fn write_atomic(&self, path: &Path, key: &StorageKey, data: &[u8]) -> AttachItResult<()> {
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
        let write_error = |reason: String| {
            StorageError::new(StorageErrorKind::Write {
                key: key.to_string(),
                reason,
            })
        };

        tokio::fs::write(&temp_path, data)
            .await
            .map_err(|e| write_error(format!("{}: {}", temp_path.display(), e)))?;

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))
            .into());
        }
        Ok(())
    }
}

/// Reject keys that would escape or confuse the directory layout.
fn validate_key(key: &StorageKey) -> AttachItResult<()> {
    let k = key.as_str();
    let bad = k.is_empty()
        || k == "."
        || k == ".."
        || k.contains(['/', '\\', '\0']);
    if bad {
        return Err(StorageError::new(StorageErrorKind::InvalidKey(k.to_string())).into());
    }
    Ok(())
}

fn read_error(key: &StorageKey, path: &Path, e: std::io::Error) -> StorageError {
    if e.kind() == ErrorKind::NotFound {
        StorageError::new(StorageErrorKind::NotFound(key.to_string()))
    } else {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        )))
    }
}

#[async_trait::async_trait]
impl ContentStore for FileSystemStore {
    #[tracing::instrument(skip(self, data, key), fields(size = data.len(), key = %key))]
    async fn put(
        &self,
        data: &[u8],
        key: &StorageKey,
        filename: &str,
    ) -> AttachItResult<BlobReference> {
        let path = self.blob_path(key)?;
        let meta_path = self.meta_path(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let reference = BlobReference::new(key.clone(), filename, data, self.backend());
        let meta = serde_json::to_vec_pretty(&reference)
            .map_err(|e| StorageError::new(StorageErrorKind::Metadata(e.to_string())))?;

        // Metadata never describes a blob that failed to land.
        let previous_meta = tokio::fs::read(&meta_path).await.ok();
        self.write_atomic(&meta_path, key, &meta).await?;

        if let Err(e) = self.write_atomic(&path, key, data).await {
            let restored = match previous_meta {
                Some(previous) => self.write_atomic(&meta_path, key, &previous).await,
                None => tokio::fs::remove_file(&meta_path).await.map_err(|io| {
                    AttachItError::from(StorageError::new(StorageErrorKind::Metadata(
                        io.to_string(),
                    )))
                }),
            };
            if let Err(restore) = restored {
                tracing::warn!(path = %meta_path.display(), error = %restore, "Failed to restore blob metadata");
            }
            return Err(e);
        }

        tracing::info!(
            path = %path.display(),
            size = data.len(),
            filename,
            "Stored blob"
        );

        Ok(reference)
    }

    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn get(&self, key: &StorageKey) -> AttachItResult<Vec<u8>> {
        let path = self.blob_path(key)?;
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| read_error(key, &path, e))?;

        tracing::debug!(path = %path.display(), size = data.len(), "Retrieved blob");
        Ok(data)
    }

    async fn metadata(&self, key: &StorageKey) -> AttachItResult<BlobReference> {
        let path = self.meta_path(key)?;
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|e| read_error(key, &path, e))?;

        serde_json::from_slice(&raw).map_err(|e| {
            StorageError::new(StorageErrorKind::Metadata(format!("{}: {}", path.display(), e)))
                .into()
        })
    }

    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn delete(&self, key: &StorageKey) -> AttachItResult<()> {
        let path = self.blob_path(key)?;
        let meta_path = self.meta_path(key)?;

        let removed = tokio::fs::remove_file(&path).await;

        // The sidecar goes even when the blob is already gone.
        if let Err(e) = tokio::fs::remove_file(&meta_path).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %meta_path.display(), error = %e, "Failed to remove blob metadata");
            }
        }

        removed.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(key.to_string()))
            } else {
                StorageError::new(StorageErrorKind::Delete {
                    key: key.to_string(),
                    reason: format!("{}: {}", path.display(), e),
                })
            }
        })?;

        tracing::info!(path = %path.display(), "Deleted blob");
        Ok(())
    }

    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn exists(&self, key: &StorageKey) -> AttachItResult<bool> {
        let path = self.blob_path(key)?;
        Ok(tokio::fs::try_exists(path).await.unwrap_or(false))
    }

    fn backend(&self) -> &'static str {
        "filesystem"
    }
}
