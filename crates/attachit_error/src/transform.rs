//! Transform error types.

/// Kinds of transform errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TransformErrorKind {
    /// Source file could not be read
    #[display("Failed to read source {}: {}", path, reason)]
    SourceRead {
        /// Source path
        path: String,
        /// Underlying failure
        reason: String,
    },
    /// Source bytes are not a decodable image
    #[display("Failed to decode image: {}", _0)]
    Decode(String),
    /// Transformed image could not be encoded
    #[display("Failed to encode image: {}", _0)]
    Encode(String),
    /// Style geometry could not be parsed
    #[display("Invalid geometry '{}'", _0)]
    InvalidGeometry(String),
    /// Output format is not supported
    #[display("Unsupported image format: {}", _0)]
    UnsupportedFormat(String),
    /// Free-form failure reported by a custom transform
    #[display("{}", _0)]
    Failed(String),
}

/// Transform error with location tracking.
///
/// # Examples
///
/// ```
/// use attachit_error::{TransformError, TransformErrorKind};
///
/// let err = TransformError::new(TransformErrorKind::Failed("bad format".to_string()));
/// assert_eq!(err.kind().to_string(), "bad format");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transform Error: {} at line {} in {}", kind, line, file)]
pub struct TransformError {
    /// The kind of error that occurred
    pub kind: TransformErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TransformError {
    /// Create a new transform error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TransformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a free-form failure.
    #[track_caller]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(TransformErrorKind::Failed(message.into()))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TransformErrorKind {
        &self.kind
    }
}
