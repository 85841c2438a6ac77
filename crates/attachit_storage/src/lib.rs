//! Content stores and the attachment storage adapter for AttachIt.
//!
//! This crate provides pluggable content-store backends addressed by
//! deterministic string keys, plus the [`StorageAdapter`] that writes an
//! attachment's original and styles into a store, purges them, and reads
//! them back.
//!
//! # Features
//!
//! - **Pluggable backends**: Trait-based abstraction over put/get/delete
//! - **Failure isolation**: A failing style never stops the rest of a flush
//! - **Idempotent purges**: Deleting an absent key is not an error
//! - **Atomic writes**: The filesystem backend writes through temp files
//!
//! # Example
//!
//! ```rust
//! use attachit_core::{Attachment, AttachmentDescriptor};
//! use attachit_storage::{MemoryStore, StorageAdapter};
//! use attachit_transform::FnTransform;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = std::env::temp_dir();
//! # let upload = dir.join("attachit-doc-me.jpg");
//! # std::fs::write(&upload, b"original bytes")?;
//! let store = Arc::new(MemoryStore::new());
//! let transform = FnTransform::new(|style: &String, _source: &std::path::Path| {
//!     Ok(style.as_bytes().to_vec())
//! });
//! let adapter = StorageAdapter::new(store, transform);
//!
//! let mut avatar = AttachmentDescriptor::builder()
//!     .object_id("42")
//!     .name("avatar")
//!     .assigned_file(&upload)
//!     .style("thumb", "64x64>".to_string())
//!     .build()?;
//!
//! let report = adapter.flush_write(&mut avatar).await;
//! assert!(avatar.errors().is_empty());
//! assert_eq!(report.written().len(), 2);
//!
//! let original = adapter.read(Some(&avatar.key("original"))).await?;
//! assert_eq!(original.as_deref(), Some(&b"original bytes"[..]));
//!
//! let purge = adapter.flush_delete(&report.written_keys()).await;
//! assert!(purge.is_clean());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use attachit_core::StorageKey;
use attachit_error::AttachItResult;

mod adapter;
mod filesystem;
mod memory;
mod reference;
mod report;

pub use adapter::StorageAdapter;
pub use attachit_error::{StorageError, StorageErrorKind};
pub use filesystem::FileSystemStore;
pub use memory::MemoryStore;
pub use reference::BlobReference;
pub use report::{DeleteFailure, DeleteReport, FlushReport, StyleFailure};

/// Trait for pluggable content-store backends.
///
/// Implementations store opaque blobs under caller-chosen keys. Keys are the
/// only index: a store never invents or rewrites them.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a blob under `key`, replacing any previous blob at that key.
    ///
    /// # Arguments
    ///
    /// * `data` - The encoded bytes
    /// * `key` - The lookup key
    /// * `filename` - Display name kept as metadata, never used for lookup
    ///
    /// # Returns
    ///
    /// A `BlobReference` describing what was stored
    async fn put(
        &self,
        data: &[u8],
        key: &StorageKey,
        filename: &str,
    ) -> AttachItResult<BlobReference>;

    /// Retrieve a blob.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` storage error when nothing is stored under `key`.
    async fn get(&self, key: &StorageKey) -> AttachItResult<Vec<u8>>;

    /// Describe a stored blob without reading its bytes.
    async fn metadata(&self, key: &StorageKey) -> AttachItResult<BlobReference>;

    /// Delete a blob.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` storage error when nothing is stored under `key`.
    async fn delete(&self, key: &StorageKey) -> AttachItResult<()>;

    /// Check if a blob exists.
    async fn exists(&self, key: &StorageKey) -> AttachItResult<bool>;

    /// Short backend name, e.g. `"memory"` or `"filesystem"`.
    fn backend(&self) -> &'static str;
}
