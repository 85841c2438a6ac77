//! Command handlers.

use super::commands::StyleArg;
use attachit::{
    AttachItConfig, AttachItResult, AttachmentDescriptor, ORIGINAL_STYLE, StorageError,
    StorageErrorKind, StorageKey,
};
use std::io::Write;
use std::path::Path;

/// Store `file` and every style as `{object_id}_{name}_{style}`.
///
/// Command-line styles are added after the configured ones; a command-line
/// style with a configured name replaces it in place.
///
/// Returns `false` when any style or the original failed.
pub async fn handle_store(
    config: &AttachItConfig,
    object_id: &str,
    name: &str,
    file: &Path,
    extra: &[StyleArg],
) -> AttachItResult<bool> {
    let mut styles = config.styles()?;
    for arg in extra {
        styles.insert(arg.name.clone(), arg.geometry)?;
    }

    let mut attachment = AttachmentDescriptor::builder()
        .object_id(object_id)
        .name(name)
        .assigned_file(file)
        .styles(styles.iter().map(|s| (s.name().clone(), *s.params())))
        .build()?;

    let adapter = config.adapter()?;
    let report = adapter.flush_write(&mut attachment).await;

    for reference in report.written() {
        println!(
            "{}\t{}\t{} bytes",
            reference.key(),
            reference.filename(),
            reference.size_bytes()
        );
    }
    for failure in report.failed() {
        eprintln!("{}\tfailed: {}", failure.key(), failure.message());
    }

    Ok(!attachment.has_errors())
}

/// Print the blob stored under `key`, or write it to `output`.
pub async fn handle_read(
    config: &AttachItConfig,
    key: &str,
    output: Option<&Path>,
) -> AttachItResult<()> {
    let adapter = config.adapter()?;
    let key = StorageKey::from(key);

    let data = adapter
        .read(Some(&key))
        .await?
        .ok_or_else(|| StorageError::new(StorageErrorKind::InvalidKey("empty key".to_string())))?;

    match output {
        Some(path) => {
            std::fs::write(path, &data).map_err(|e| {
                StorageError::new(StorageErrorKind::Write {
                    key: key.to_string(),
                    reason: format!("{}: {}", path.display(), e),
                })
            })?;
            tracing::info!(key = %key, path = %path.display(), size = data.len(), "Wrote blob");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&data)
                .and_then(|()| stdout.flush())
                .map_err(|e| {
                    StorageError::new(StorageErrorKind::Write {
                        key: key.to_string(),
                        reason: format!("stdout: {}", e),
                    })
                })?;
        }
    }

    Ok(())
}

/// Delete `keys`. Absent keys count as purged.
///
/// Returns `false` when any key failed for a reason other than absence.
pub async fn handle_purge(config: &AttachItConfig, keys: &[String]) -> AttachItResult<bool> {
    let adapter = config.adapter()?;
    let keys: Vec<StorageKey> = keys.iter().map(|k| StorageKey::from(k.as_str())).collect();

    let report = adapter.flush_delete(&keys).await;

    for key in report.deleted() {
        println!("{}\tdeleted", key);
    }
    for key in report.missing() {
        println!("{}\tmissing", key);
    }
    for failure in report.failed() {
        eprintln!("{}\tfailed: {}", failure.key(), failure.message());
    }

    Ok(report.is_clean())
}

/// Print every key a store of `object_id`/`name` writes under the configured styles.
pub fn handle_keys(config: &AttachItConfig, object_id: &str, name: &str) -> AttachItResult<()> {
    let styles = config.styles()?;
    for style in styles.names().chain(std::iter::once(ORIGINAL_STYLE)) {
        println!("{}", StorageKey::derive(object_id, name, style));
    }
    Ok(())
}

