//! Storage key and display filename derivation.

use serde::{Deserialize, Serialize};

/// Reserved style name for the unprocessed upload.
pub const ORIGINAL_STYLE: &str = "original";

/// Deterministic identifier of one stored blob.
///
/// Derived as `"{object_id}_{name}_{style}"`. This format is the only link
/// between an attachment and its blobs, so it must never change.
///
/// # Examples
///
/// ```
/// use attachit_core::StorageKey;
///
/// let key = StorageKey::derive("42", "avatar", "thumb");
/// assert_eq!(key.as_str(), "42_avatar_thumb");
/// assert_eq!(StorageKey::original("42", "avatar").as_str(), "42_avatar_original");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct StorageKey(String);

impl StorageKey {
    /// Derive the key for one style of an attachment.
    pub fn derive(object_id: &str, name: &str, style: &str) -> Self {
        Self(format!("{}_{}_{}", object_id, name, style))
    }

    /// Derive the key of the original upload.
    pub fn original(object_id: &str, name: &str) -> Self {
        Self::derive(object_id, name, ORIGINAL_STYLE)
    }

    /// Wrap a key that was persisted earlier.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for StorageKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Default display filename for a style: `"{style}_{file_name}"`.
///
/// ```
/// assert_eq!(attachit_core::derive_filename("thumb", "me.jpg"), "thumb_me.jpg");
/// ```
pub fn derive_filename(style: &str, file_name: &str) -> String {
    format!("{}_{}", style, file_name)
}
