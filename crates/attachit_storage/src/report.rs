//! Outcomes of write and delete batches.

use crate::BlobReference;
use attachit_core::StorageKey;

/// A style (or the original) that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StyleFailure {
    /// Style name, `original` for the upload itself
    style: String,
    /// Key the blob would have been stored under
    key: StorageKey,
    /// Message recorded on the attachment
    message: String,
}

impl StyleFailure {
    pub(crate) fn new(style: impl Into<String>, key: StorageKey, message: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            key,
            message: message.into(),
        }
    }
}

/// Result of `flush_write`.
///
/// The attachment's error list stays the authoritative record of failures;
/// the report additionally says which keys now hold data.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct FlushReport {
    /// Blobs written, styles first and the original last
    written: Vec<BlobReference>,
    /// Styles that failed, in processing order
    failed: Vec<StyleFailure>,
}

impl FlushReport {
    pub(crate) fn record_written(&mut self, reference: BlobReference) {
        self.written.push(reference);
    }

    pub(crate) fn record_failed(&mut self, failure: StyleFailure) {
        self.failed.push(failure);
    }

    /// Keys that were written, in write order.
    pub fn written_keys(&self) -> Vec<StorageKey> {
        self.written.iter().map(|r| r.key().clone()).collect()
    }

    /// Whether every style and the original were stored.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A key whose deletion failed for a reason other than being absent.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct DeleteFailure {
    /// Key that could not be deleted
    key: StorageKey,
    /// Failure message
    message: String,
}

/// Result of `flush_delete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct DeleteReport {
    /// Keys that held a blob and were deleted
    deleted: Vec<StorageKey>,
    /// Keys that held nothing (already purged, or never written)
    missing: Vec<StorageKey>,
    /// Keys whose deletion failed
    failed: Vec<DeleteFailure>,
}

impl DeleteReport {
    pub(crate) fn record_deleted(&mut self, key: StorageKey) {
        self.deleted.push(key);
    }

    pub(crate) fn record_missing(&mut self, key: StorageKey) {
        self.missing.push(key);
    }

    pub(crate) fn record_failed(&mut self, key: StorageKey, message: String) {
        self.failed.push(DeleteFailure { key, message });
    }

    /// Whether no deletion failed. Missing keys do not count as failures.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
