//! Errors raised while assembling attachment descriptors and style lists.

/// Why a descriptor or style list could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A descriptor field that must be set was left empty
    #[display("Missing required field: {}", _0)]
    MissingField(String),

    /// A descriptor field was set to something unusable
    #[display("Invalid field value for '{}': {}", field, reason)]
    InvalidField {
        /// The field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Style name is empty or the reserved `original`
    #[display("'{}' is not a usable style name", _0)]
    InvalidStyleName(String),
}

/// Descriptor or style-list error with the location that raised it.
///
/// # Examples
///
/// ```
/// use attachit_error::{BuilderError, BuilderErrorKind};
///
/// let err = BuilderError::new(BuilderErrorKind::InvalidStyleName("original".into()));
/// assert_eq!(err.kind().to_string(), "'original' is not a usable style name");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", kind, line, file)]
pub struct BuilderError {
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Create a new builder error at the caller's location.
    #[track_caller]
    pub fn new(kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}
