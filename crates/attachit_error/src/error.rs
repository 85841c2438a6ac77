//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, StorageError, TransformError};

/// The foundation error enum covering every AttachIt failure domain.
///
/// # Examples
///
/// ```
/// use attachit_error::{AttachItError, TransformError};
///
/// let err: AttachItError = TransformError::failed("bad format").into();
/// assert!(format!("{}", err).contains("Transform Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AttachItErrorKind {
    /// Content store error
    #[from(StorageError)]
    Storage(StorageError),
    /// Style transform error
    #[from(TransformError)]
    Transform(TransformError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// AttachIt error with kind discrimination.
///
/// # Examples
///
/// ```
/// use attachit_error::{AttachItResult, ConfigError};
///
/// fn might_fail() -> AttachItResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("AttachIt Error: {}", _0)]
pub struct AttachItError(Box<AttachItErrorKind>);

impl AttachItError {
    /// Create a new error from a kind.
    pub fn new(kind: AttachItErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AttachItErrorKind {
        &self.0
    }

    /// The bare failure message, without the wrapper prefix or source location.
    ///
    /// This is the text recorded into an attachment's error list.
    ///
    /// ```
    /// use attachit_error::{AttachItError, TransformError};
    ///
    /// let err: AttachItError = TransformError::failed("bad format").into();
    /// assert_eq!(err.message(), "bad format");
    /// ```
    pub fn message(&self) -> String {
        match self.kind() {
            AttachItErrorKind::Storage(e) => e.kind().to_string(),
            AttachItErrorKind::Transform(e) => e.kind().to_string(),
            AttachItErrorKind::Config(e) => e.message.clone(),
            AttachItErrorKind::Builder(e) => e.kind().to_string(),
        }
    }

    /// Whether this error reports a missing blob.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), AttachItErrorKind::Storage(e) if e.is_not_found())
    }
}

// Generic From implementation for any type that converts to AttachItErrorKind
impl<T> From<T> for AttachItError
where
    T: Into<AttachItErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for AttachIt operations.
pub type AttachItResult<T> = std::result::Result<T, AttachItError>;
