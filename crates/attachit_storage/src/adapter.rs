//! Attachment storage adapter: write, purge, and read batches.

use crate::{BlobReference, ContentStore, DeleteReport, FlushReport, StyleFailure};
use attachit_core::{Attachment, ORIGINAL_STYLE, StorageKey};
use attachit_error::{AttachItResult, StorageError, StorageErrorKind, TransformError};
use attachit_transform::Transform;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Persists attachments into a content store.
///
/// The adapter owns nothing but a handle to the store and the transform used
/// to render styles. Construct one at startup and share it; it keeps no state
/// between calls.
///
/// Writes never fail as a whole: each style and the original are attempted
/// independently, and failures are recorded on the attachment.
///
/// Transforms run on tokio's blocking pool, so style parameters are cloned
/// into each task.
pub struct StorageAdapter<S: ?Sized, T> {
    store: Arc<S>,
    transform: Arc<T>,
}

impl<S, T> StorageAdapter<S, T>
where
    S: ContentStore + ?Sized,
    T: Transform + 'static,
    T::Style: Clone + Send + 'static,
{
    /// Create an adapter over an already connected store.
    pub fn new(store: Arc<S>, transform: T) -> Self {
        Self {
            store,
            transform: Arc::new(transform),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The transform used to render styles.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Every key a flush of `attachment` writes: styles in order, then the original.
    pub fn keys_for<A>(&self, attachment: &A) -> Vec<StorageKey>
    where
        A: Attachment<Style = T::Style>,
    {
        attachment
            .styles()
            .names()
            .chain(std::iter::once(ORIGINAL_STYLE))
            .map(|style| attachment.key(style))
            .collect()
    }

    /// Render and store every style of `attachment`, then store the original.
    ///
    /// Styles are processed in declaration order. A failing transform or put
    /// appends one message to the attachment's errors and the batch moves on.
    /// The original is always attempted last, whatever happened to the styles.
    #[tracing::instrument(
        skip(self, attachment),
        fields(
            object_id = attachment.object_id(),
            name = attachment.name(),
            styles = attachment.styles().len()
        )
    )]
    pub async fn flush_write<A>(&self, attachment: &mut A) -> FlushReport
    where
        A: Attachment<Style = T::Style>,
    {
        let mut report = FlushReport::default();
        let source = attachment.assigned_file().to_path_buf();
        let styles: Vec<(String, T::Style)> = attachment
            .styles()
            .iter()
            .map(|style| (style.name().clone(), style.params().clone()))
            .collect();

        for (style, params) in styles {
            let key = attachment.key(&style);
            let filename = attachment.filename(&style);

            let outcome = self.write_style(params, &source, &key, &filename).await;
            self.settle(attachment, &mut report, &style, key, outcome);
        }

        let key = attachment.key(ORIGINAL_STYLE);
        let filename = attachment.filename(ORIGINAL_STYLE);
        let outcome = self.write_original(&source, &key, &filename).await;
        self.settle(attachment, &mut report, ORIGINAL_STYLE, key, outcome);

        if report.is_complete() {
            tracing::info!(written = report.written().len(), "Flushed attachment");
        } else {
            tracing::warn!(
                written = report.written().len(),
                failed = report.failed().len(),
                "Flushed attachment with failures"
            );
        }
        report
    }

    /// Delete every key in `keys`, in order.
    ///
    /// Each key is attempted regardless of earlier failures. A key with no
    /// stored blob counts as already purged; empty keys are skipped.
    #[tracing::instrument(skip(self, keys), fields(keys = keys.len()))]
    pub async fn flush_delete(&self, keys: &[StorageKey]) -> DeleteReport {
        let mut report = DeleteReport::default();

        for key in keys {
            if key.is_empty() {
                tracing::debug!("Skipping empty key");
                report.record_missing(key.clone());
                continue;
            }

            match self.store.delete(key).await {
                Ok(()) => report.record_deleted(key.clone()),
                Err(e) if e.is_not_found() => {
                    tracing::debug!(key = %key, "Blob already absent");
                    report.record_missing(key.clone());
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Failed to delete blob");
                    report.record_failed(key.clone(), e.message());
                }
            }
        }

        tracing::info!(
            deleted = report.deleted().len(),
            missing = report.missing().len(),
            failed = report.failed().len(),
            "Purged keys"
        );
        report
    }

    /// Fetch the blob stored under `key`.
    ///
    /// Returns `Ok(None)` without touching the store when `key` is absent or
    /// empty.
    ///
    /// # Errors
    ///
    /// Store failures, including `NotFound`, are returned unchanged.
    pub async fn read(&self, key: Option<&StorageKey>) -> AttachItResult<Option<Vec<u8>>> {
        match key {
            Some(key) if !key.is_empty() => self.store.get(key).await.map(Some),
            _ => Ok(None),
        }
    }

    async fn write_style(
        &self,
        params: T::Style,
        source: &Path,
        key: &StorageKey,
        filename: &str,
    ) -> AttachItResult<BlobReference> {
        let transform = Arc::clone(&self.transform);
        let source: PathBuf = source.to_path_buf();

        let data = tokio::task::spawn_blocking(move || transform.transform(&params, &source))
            .await
            .map_err(|e| TransformError::failed(format!("Transform task failed: {}", e)))??;

        self.store.put(&data, key, filename).await
    }

    async fn write_original(
        &self,
        source: &Path,
        key: &StorageKey,
        filename: &str,
    ) -> AttachItResult<BlobReference> {
        let data = tokio::fs::read(source).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                source.display(),
                e
            )))
        })?;
        self.store.put(&data, key, filename).await
    }

    fn settle<A: Attachment>(
        &self,
        attachment: &mut A,
        report: &mut FlushReport,
        style: &str,
        key: StorageKey,
        outcome: AttachItResult<BlobReference>,
    ) {
        match outcome {
            Ok(reference) => {
                tracing::debug!(style, key = %key, size = reference.size_bytes(), "Stored style");
                report.record_written(reference);
            }
            Err(e) => {
                let message = e.message();
                tracing::warn!(style, key = %key, error = %e, "Failed to store style");
                attachment.add_error(message.clone());
                report.record_failed(StyleFailure::new(style, key, message));
            }
        }
    }
}
