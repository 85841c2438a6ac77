//! In-process content store.

use crate::{BlobReference, ContentStore};
use attachit_core::StorageKey;
use attachit_error::{AttachItResult, StorageError, StorageErrorKind};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Blob {
    data: Vec<u8>,
    reference: BlobReference,
}

/// Content store kept in memory.
///
/// Contents live as long as the store. Useful for tests and for callers that
/// only need a scratch area.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<StorageKey, Blob>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether the store holds nothing.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    /// Stored keys in sorted order.
    pub async fn keys(&self) -> Vec<StorageKey> {
        let mut keys: Vec<_> = self.blobs.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn not_found(key: &StorageKey) -> StorageError {
    StorageError::new(StorageErrorKind::NotFound(key.to_string()))
}

#[async_trait::async_trait]
impl ContentStore for MemoryStore {
    #[tracing::instrument(skip(self, data, key), fields(size = data.len(), key = %key))]
    async fn put(
        &self,
        data: &[u8],
        key: &StorageKey,
        filename: &str,
    ) -> AttachItResult<BlobReference> {
        let reference = BlobReference::new(key.clone(), filename, data, self.backend());
        let previous = self.blobs.write().await.insert(
            key.clone(),
            Blob {
                data: data.to_vec(),
                reference: reference.clone(),
            },
        );

        tracing::debug!(replaced = previous.is_some(), "Stored blob in memory");
        Ok(reference)
    }

    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn get(&self, key: &StorageKey) -> AttachItResult<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(key)
            .map(|blob| blob.data.clone())
            .ok_or_else(|| not_found(key).into())
    }

    async fn metadata(&self, key: &StorageKey) -> AttachItResult<BlobReference> {
        self.blobs
            .read()
            .await
            .get(key)
            .map(|blob| blob.reference.clone())
            .ok_or_else(|| not_found(key).into())
    }

    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn delete(&self, key: &StorageKey) -> AttachItResult<()> {
        match self.blobs.write().await.remove(key) {
            Some(_) => {
                tracing::debug!("Deleted blob from memory");
                Ok(())
            }
            None => Err(not_found(key).into()),
        }
    }

    async fn exists(&self, key: &StorageKey) -> AttachItResult<bool> {
        Ok(self.blobs.read().await.contains_key(key))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
