//! Attachment capability contract and the stock descriptor.

use crate::{StorageKey, Styles, derive_filename};
use attachit_error::{BuilderError, BuilderErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a storage adapter needs from one logical attachment.
///
/// Implementors supply identity (object id, field name, file name), the
/// ordered styles to render, the path of the uploaded original, and a sink
/// for per-style failure messages.
pub trait Attachment {
    /// Parameters consumed by the transform for each style.
    type Style;

    /// Identifier of the owning record.
    fn object_id(&self) -> &str;

    /// Attachment field name, e.g. `avatar`.
    fn name(&self) -> &str;

    /// Base name of the uploaded original.
    fn file_name(&self) -> &str;

    /// Styles to render, in order.
    fn styles(&self) -> &Styles<Self::Style>;

    /// Path of the uploaded original.
    fn assigned_file(&self) -> &Path;

    /// Display filename stored alongside a style's blob.
    fn filename(&self, style: &str) -> String {
        derive_filename(style, self.file_name())
    }

    /// Record a failure message.
    fn add_error(&mut self, message: String);

    /// Failure messages recorded so far.
    fn errors(&self) -> &[String];

    /// Storage key for a style of this attachment.
    fn key(&self, style: &str) -> StorageKey {
        StorageKey::derive(self.object_id(), self.name(), style)
    }
}

/// Override for display filenames, called with `(style, file_name)`.
pub type FilenameFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Stock [`Attachment`] implementation.
///
/// # Examples
///
/// ```
/// use attachit_core::{Attachment, AttachmentDescriptor};
///
/// let descriptor = AttachmentDescriptor::<String>::builder()
///     .object_id("42")
///     .name("avatar")
///     .assigned_file("/tmp/uploads/me.jpg")
///     .style("thumb", "64x64>".to_string())
///     .build()
///     .unwrap();
///
/// assert_eq!(descriptor.file_name(), "me.jpg");
/// assert_eq!(descriptor.key("thumb").as_str(), "42_avatar_thumb");
/// assert_eq!(descriptor.filename("thumb"), "thumb_me.jpg");
/// ```
#[derive(Clone)]
pub struct AttachmentDescriptor<S> {
    object_id: String,
    name: String,
    file_name: String,
    styles: Styles<S>,
    assigned_file: PathBuf,
    filename_fn: Option<FilenameFn>,
    errors: Vec<String>,
}

impl<S> AttachmentDescriptor<S> {
    /// Creates a new descriptor builder.
    pub fn builder() -> AttachmentDescriptorBuilder<S> {
        AttachmentDescriptorBuilder::default()
    }

    /// Whether any failure was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Forget recorded failures so the descriptor can be flushed again.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }
}

impl<S> Attachment for AttachmentDescriptor<S> {
    type Style = S;

    fn object_id(&self) -> &str {
        &self.object_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn styles(&self) -> &Styles<S> {
        &self.styles
    }

    fn assigned_file(&self) -> &Path {
        &self.assigned_file
    }

    fn filename(&self, style: &str) -> String {
        match &self.filename_fn {
            Some(f) => f(style, &self.file_name),
            None => derive_filename(style, &self.file_name),
        }
    }

    fn add_error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for AttachmentDescriptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentDescriptor")
            .field("object_id", &self.object_id)
            .field("name", &self.name)
            .field("file_name", &self.file_name)
            .field("styles", &self.styles)
            .field("assigned_file", &self.assigned_file)
            .field("filename_fn", &self.filename_fn.is_some())
            .field("errors", &self.errors)
            .finish()
    }
}

/// Builder for `AttachmentDescriptor`.
pub struct AttachmentDescriptorBuilder<S> {
    object_id: Option<String>,
    name: Option<String>,
    file_name: Option<String>,
    styles: Vec<(String, S)>,
    assigned_file: Option<PathBuf>,
    filename_fn: Option<FilenameFn>,
}

impl<S> Default for AttachmentDescriptorBuilder<S> {
    fn default() -> Self {
        Self {
            object_id: None,
            name: None,
            file_name: None,
            styles: Vec::new(),
            assigned_file: None,
            filename_fn: None,
        }
    }
}

impl<S> AttachmentDescriptorBuilder<S> {
    /// Sets the owning record's identifier.
    pub fn object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    /// Sets the attachment field name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the original's base name. Defaults to the assigned file's name.
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Sets the path of the uploaded original.
    pub fn assigned_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.assigned_file = Some(path.into());
        self
    }

    /// Appends a style.
    pub fn style(mut self, name: impl Into<String>, params: S) -> Self {
        self.styles.push((name.into(), params));
        self
    }

    /// Appends several styles in order.
    pub fn styles<N: Into<String>>(mut self, styles: impl IntoIterator<Item = (N, S)>) -> Self {
        self.styles
            .extend(styles.into_iter().map(|(name, params)| (name.into(), params)));
        self
    }

    /// Overrides display filename derivation.
    pub fn filename_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.filename_fn = Some(Arc::new(f));
        self
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the object id, name, or assigned file is missing,
    /// if no file name can be determined, or if a style name is reserved.
    pub fn build(self) -> Result<AttachmentDescriptor<S>, BuilderError> {
        let object_id = required(self.object_id, "object_id")?;
        let name = required(self.name, "name")?;
        let assigned_file = self
            .assigned_file
            .ok_or_else(|| BuilderError::new(BuilderErrorKind::MissingField("assigned_file".into())))?;

        let file_name = match self.file_name {
            Some(file_name) => file_name,
            None => assigned_file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    BuilderError::new(BuilderErrorKind::InvalidField {
                        field: "assigned_file".to_string(),
                        reason: format!("{} has no file name", assigned_file.display()),
                    })
                })?,
        };

        let styles = Styles::from_pairs(self.styles)?;

        Ok(AttachmentDescriptor {
            object_id,
            name,
            file_name,
            styles,
            assigned_file,
            filename_fn: self.filename_fn,
            errors: Vec::new(),
        })
    }
}

#[track_caller]
fn required(value: Option<String>, field: &str) -> Result<String, BuilderError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(BuilderError::new(BuilderErrorKind::MissingField(field.to_string()))),
    }
}
