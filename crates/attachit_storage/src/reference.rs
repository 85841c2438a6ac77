//! Description of a stored blob.

use attachit_core::StorageKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Reference to a stored blob.
///
/// Returned by every successful `put`, and persisted next to the blob by
/// backends that keep metadata out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct BlobReference {
    /// Lookup key
    key: StorageKey,
    /// Display filename
    filename: String,
    /// Size of the blob in bytes
    size_bytes: u64,
    /// SHA-256 hash of the content
    content_hash: String,
    /// Storage backend name
    backend: String,
}

impl BlobReference {
    /// Describe `data` stored under `key`.
    pub fn new(key: StorageKey, filename: impl Into<String>, data: &[u8], backend: &str) -> Self {
        Self {
            key,
            filename: filename.into(),
            size_bytes: data.len() as u64,
            content_hash: compute_hash(data),
            backend: backend.to_string(),
        }
    }
}

/// Compute SHA-256 hash of data.
pub(crate) fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
