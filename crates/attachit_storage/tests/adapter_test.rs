//! Tests for the attachment storage adapter.

use attachit_core::{Attachment, AttachmentDescriptor, StorageKey, Styles};
use attachit_error::{AttachItResult, StorageError, StorageErrorKind, TransformError};
use attachit_storage::{BlobReference, ContentStore, MemoryStore, StorageAdapter};
use attachit_transform::FnTransform;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Store that delegates to memory but can be told to fail specific keys,
/// and counts every call it receives.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_put: Mutex<HashSet<String>>,
    fail_delete: Mutex<HashSet<String>>,
    puts: AtomicUsize,
    gets: AtomicUsize,
}

impl FlakyStore {
    fn fail_put_on(&self, key: &str) {
        self.fail_put.lock().unwrap().insert(key.to_string());
    }

    fn fail_delete_on(&self, key: &str) {
        self.fail_delete.lock().unwrap().insert(key.to_string());
    }
}

#[async_trait::async_trait]
impl ContentStore for FlakyStore {
    async fn put(
        &self,
        data: &[u8],
        key: &StorageKey,
        filename: &str,
    ) -> AttachItResult<BlobReference> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.lock().unwrap().contains(key.as_str()) {
            return Err(StorageError::new(StorageErrorKind::Unavailable("grid offline".into())).into());
        }
        self.inner.put(data, key, filename).await
    }

    async fn get(&self, key: &StorageKey) -> AttachItResult<Vec<u8>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn metadata(&self, key: &StorageKey) -> AttachItResult<BlobReference> {
        self.inner.metadata(key).await
    }

    async fn delete(&self, key: &StorageKey) -> AttachItResult<()> {
        if self.fail_delete.lock().unwrap().contains(key.as_str()) {
            return Err(StorageError::new(StorageErrorKind::Delete {
                key: key.to_string(),
                reason: "permission denied".into(),
            })
            .into());
        }
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &StorageKey) -> AttachItResult<bool> {
        self.inner.exists(key).await
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}

type StyleFn = fn(&&'static str, &Path) -> Result<Vec<u8>, TransformError>;

/// Renders a style as `"<params>:<source contents>"`, failing for params `"bad"`.
fn render(params: &&'static str, source: &Path) -> Result<Vec<u8>, TransformError> {
    if *params == "bad" {
        return Err(TransformError::failed("bad format"));
    }
    let original = std::fs::read(source).map_err(|e| TransformError::failed(e.to_string()))?;
    let mut out = format!("{}:", params).into_bytes();
    out.extend(original);
    Ok(out)
}

fn adapter(store: Arc<FlakyStore>) -> StorageAdapter<FlakyStore, FnTransform<&'static str, StyleFn>> {
    StorageAdapter::new(store, FnTransform::new(render as StyleFn))
}

fn upload(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("me.jpg");
    std::fs::write(&path, b"JPEGDATA").unwrap();
    path
}

fn avatar(path: &Path, thumb: &'static str) -> AttachmentDescriptor<&'static str> {
    AttachmentDescriptor::builder()
        .object_id("42")
        .name("avatar")
        .assigned_file(path)
        .style("thumb", thumb)
        .style("large", "p2")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_flush_writes_styles_then_original() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());
    let mut descriptor = avatar(&upload(&dir), "p1");

    let report = adapter.flush_write(&mut descriptor).await;

    assert!(descriptor.errors().is_empty());
    assert!(report.is_complete());
    assert_eq!(
        report.written_keys(),
        vec![
            StorageKey::from("42_avatar_thumb"),
            StorageKey::from("42_avatar_large"),
            StorageKey::from("42_avatar_original"),
        ]
    );

    let thumb = store.get(&"42_avatar_thumb".into()).await.unwrap();
    assert_eq!(thumb, b"p1:JPEGDATA");
    let original = store.get(&"42_avatar_original".into()).await.unwrap();
    assert_eq!(original, b"JPEGDATA");

    let meta = store.metadata(&"42_avatar_large".into()).await.unwrap();
    assert_eq!(meta.filename(), "large_me.jpg");
    let meta = store.metadata(&"42_avatar_original".into()).await.unwrap();
    assert_eq!(meta.filename(), "original_me.jpg");
}

#[tokio::test]
async fn test_failing_style_is_isolated() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());
    let mut descriptor = avatar(&upload(&dir), "bad");

    let report = adapter.flush_write(&mut descriptor).await;

    assert_eq!(descriptor.errors(), ["bad format"]);
    assert_eq!(report.failed().len(), 1);
    assert_eq!(report.failed()[0].style(), "thumb");
    assert_eq!(report.failed()[0].key().as_str(), "42_avatar_thumb");

    assert!(!store.exists(&"42_avatar_thumb".into()).await.unwrap());
    assert!(store.exists(&"42_avatar_large".into()).await.unwrap());
    assert!(store.exists(&"42_avatar_original".into()).await.unwrap());
}

#[tokio::test]
async fn test_every_write_is_attempted_despite_failures() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    store.fail_put_on("42_avatar_large");
    store.fail_put_on("42_avatar_original");
    let adapter = adapter(store.clone());
    let mut descriptor = avatar(&upload(&dir), "p1");

    let report = adapter.flush_write(&mut descriptor).await;

    // N styles + original, regardless of failures.
    assert_eq!(store.puts.load(Ordering::SeqCst), 3);
    assert_eq!(descriptor.errors().len(), 2);
    assert!(descriptor.errors()[0].contains("grid offline"));
    assert_eq!(report.written_keys(), vec![StorageKey::from("42_avatar_thumb")]);
    let failed: Vec<_> = report.failed().iter().map(|f| f.style().as_str()).collect();
    assert_eq!(failed, ["large", "original"]);
}

#[tokio::test]
async fn test_missing_original_is_recorded() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());
    let mut descriptor = avatar(&dir.path().join("vanished.jpg"), "p1");

    adapter.flush_write(&mut descriptor).await;

    // Both styles and the original read the missing file.
    assert_eq!(descriptor.errors().len(), 3);
    assert!(store.inner.is_empty().await);
}

#[tokio::test]
async fn test_no_styles_still_writes_original() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());
    let mut descriptor = AttachmentDescriptor::<&'static str>::builder()
        .object_id("7")
        .name("document")
        .assigned_file(upload(&dir))
        .build()
        .unwrap();

    let report = adapter.flush_write(&mut descriptor).await;

    assert_eq!(report.written_keys(), vec![StorageKey::from("7_document_original")]);
    assert!(descriptor.errors().is_empty());
}

#[tokio::test]
async fn test_reflush_overwrites() {
    let dir = TempDir::new().unwrap();
    let path = upload(&dir);
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());

    adapter.flush_write(&mut avatar(&path, "p1")).await;
    std::fs::write(&path, b"NEWDATA").unwrap();
    adapter.flush_write(&mut avatar(&path, "p1")).await;

    assert_eq!(store.inner.len().await, 3);
    let original = store.get(&"42_avatar_original".into()).await.unwrap();
    assert_eq!(original, b"NEWDATA");
}

#[tokio::test]
async fn test_filename_override_reaches_store() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());
    let mut descriptor = AttachmentDescriptor::builder()
        .object_id("42")
        .name("avatar")
        .assigned_file(upload(&dir))
        .style("thumb", "p1")
        .filename_fn(|style, file_name| format!("{}-{}", file_name, style))
        .build()
        .unwrap();

    adapter.flush_write(&mut descriptor).await;

    let meta = store.metadata(&"42_avatar_thumb".into()).await.unwrap();
    assert_eq!(meta.filename(), "me.jpg-thumb");
}

#[tokio::test]
async fn test_keys_for_matches_flush() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store);
    let mut descriptor = avatar(&upload(&dir), "p1");

    let expected = adapter.keys_for(&descriptor);
    let report = adapter.flush_write(&mut descriptor).await;
    assert_eq!(report.written_keys(), expected);
}

#[tokio::test]
async fn test_flush_delete_empty_is_noop() {
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store);

    let report = adapter.flush_delete(&[]).await;
    assert!(report.is_clean());
    assert!(report.deleted().is_empty());
    assert!(report.missing().is_empty());
}

#[tokio::test]
async fn test_flush_delete_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());
    let mut descriptor = avatar(&upload(&dir), "p1");
    let keys = adapter.flush_write(&mut descriptor).await.written_keys();

    let first = adapter.flush_delete(&keys).await;
    assert_eq!(first.deleted(), &keys);
    assert!(store.inner.is_empty().await);

    let second = adapter.flush_delete(&keys).await;
    assert!(second.is_clean());
    assert_eq!(second.missing(), &keys);
}

#[tokio::test]
async fn test_flush_delete_continues_past_failures() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    store.fail_delete_on("42_avatar_thumb");
    let adapter = adapter(store.clone());
    let mut descriptor = avatar(&upload(&dir), "p1");
    let keys = adapter.flush_write(&mut descriptor).await.written_keys();

    let report = adapter.flush_delete(&keys).await;

    assert!(!report.is_clean());
    assert_eq!(report.failed().len(), 1);
    assert_eq!(report.failed()[0].key().as_str(), "42_avatar_thumb");
    assert_eq!(report.deleted().len(), 2);
    assert_eq!(store.inner.keys().await, vec![StorageKey::from("42_avatar_thumb")]);
}

#[tokio::test]
async fn test_read_without_key_skips_store() {
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());

    assert_eq!(adapter.read(None).await.unwrap(), None);
    assert_eq!(adapter.read(Some(&StorageKey::from(""))).await.unwrap(), None);
    assert_eq!(store.gets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_read_returns_stored_bytes() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());
    let mut descriptor = avatar(&upload(&dir), "p1");
    adapter.flush_write(&mut descriptor).await;

    let data = adapter.read(Some(&descriptor.key("large"))).await.unwrap();
    assert_eq!(data.as_deref(), Some(&b"p2:JPEGDATA"[..]));
}

#[tokio::test]
async fn test_read_missing_key_is_not_found() {
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store);

    let err = adapter
        .read(Some(&StorageKey::from("42_avatar_nope")))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_adapter_over_trait_object() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::new());
    let adapter = StorageAdapter::new(store.clone(), FnTransform::new(render as StyleFn));
    let mut descriptor = avatar(&upload(&dir), "p1");

    adapter.flush_write(&mut descriptor).await;

    assert!(store.exists(&"42_avatar_original".into()).await.unwrap());
    assert_eq!(store.backend(), "memory");
}

/// Attachment whose styles arrive from a serialized record.
struct StoredUpload {
    styles: Styles<&'static str>,
    path: std::path::PathBuf,
    errors: Vec<String>,
}

impl Attachment for StoredUpload {
    type Style = &'static str;

    fn object_id(&self) -> &str {
        "42"
    }

    fn name(&self) -> &str {
        "avatar"
    }

    fn file_name(&self) -> &str {
        "me.jpg"
    }

    fn styles(&self) -> &Styles<&'static str> {
        &self.styles
    }

    fn assigned_file(&self) -> &Path {
        &self.path
    }

    fn add_error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }
}

#[tokio::test]
async fn test_serialized_styles_flush_each_key_once() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = adapter(store.clone());

    let styles: Styles<&'static str> = serde_json::from_str(
        r#"[{"name": "thumb", "params": "A"}, {"name": "large", "params": "L"}, {"name": "thumb", "params": "B"}]"#,
    )
    .unwrap();
    let mut record = StoredUpload {
        styles,
        path: upload(&dir),
        errors: Vec::new(),
    };

    let report = adapter.flush_write(&mut record).await;

    assert!(record.errors.is_empty());
    assert_eq!(
        report.written_keys(),
        vec![
            StorageKey::from("42_avatar_thumb"),
            StorageKey::from("42_avatar_large"),
            StorageKey::from("42_avatar_original"),
        ]
    );
    assert_eq!(store.puts.load(Ordering::SeqCst), 3);
    assert_eq!(
        store.get(&"42_avatar_thumb".into()).await.unwrap(),
        b"B:JPEGDATA"
    );
    assert_eq!(
        store.get(&"42_avatar_original".into()).await.unwrap(),
        b"JPEGDATA"
    );
}

#[test]
fn test_serialized_styles_cannot_claim_original() {
    let result: Result<Styles<&'static str>, _> = serde_json::from_str(
        r#"[{"name": "thumb", "params": "A"}, {"name": "original", "params": "X"}]"#,
    );
    assert!(result.is_err());
}

fn explode(params: &&'static str, source: &Path) -> Result<Vec<u8>, TransformError> {
    if *params == "boom" {
        panic!("decoder crashed");
    }
    render(params, source)
}

#[tokio::test]
async fn test_panicking_transform_is_recorded() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FlakyStore::default());
    let adapter = StorageAdapter::new(store.clone(), FnTransform::new(explode as StyleFn));
    let mut descriptor = avatar(&upload(&dir), "boom");

    let report = adapter.flush_write(&mut descriptor).await;

    assert_eq!(descriptor.errors().len(), 1);
    assert!(descriptor.errors()[0].starts_with("Transform task failed"));
    assert_eq!(report.failed()[0].style(), "thumb");
    assert!(store.exists(&"42_avatar_large".into()).await.unwrap());
    assert!(store.exists(&"42_avatar_original".into()).await.unwrap());
}
