//! Style transforms for AttachIt.
//!
//! A transform turns the uploaded original into the encoded bytes of one
//! style. The storage adapter treats it as opaque: it hands over the style's
//! parameters and the source path, and stores whatever comes back.
//!
//! Two implementations ship here:
//!
//! - [`ImageTransform`] resizes images with the `image` crate using
//!   ImageMagick-style [`Geometry`] strings (`64x64>`, `300x200#`, ...)
//! - [`FnTransform`] wraps a closure, handy for custom pipelines and tests
//!
//! # Example
//!
//! ```rust,no_run
//! use attachit_transform::{Geometry, ImageTransform, Transform};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transform = ImageTransform::default();
//! let thumb: Geometry = "64x64#".parse()?;
//! let bytes = transform.transform(&thumb, Path::new("uploads/me.jpg"))?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::marker::PhantomData;
use std::path::Path;

mod geometry;
mod image_transform;

pub use attachit_error::{TransformError, TransformErrorKind};
pub use geometry::{Geometry, MAX_DIMENSION, Resize};
pub use image_transform::ImageTransform;

/// Renders one style of an uploaded original.
pub trait Transform: Send + Sync {
    /// Style parameters this transform understands.
    type Style;

    /// Produce the encoded bytes of `style` from the file at `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read, decoded, or rendered.
    fn transform(&self, style: &Self::Style, source: &Path) -> Result<Vec<u8>, TransformError>;
}

/// Transform backed by a closure.
///
/// ```
/// use attachit_transform::{FnTransform, Transform};
/// use std::path::Path;
///
/// let upper = FnTransform::new(|style: &String, _source: &Path| Ok(style.to_uppercase().into_bytes()));
/// assert_eq!(upper.transform(&"abc".to_string(), Path::new("x")).unwrap(), b"ABC");
/// ```
pub struct FnTransform<S, F> {
    f: F,
    _style: PhantomData<fn(&S)>,
}

impl<S, F> FnTransform<S, F>
where
    F: Fn(&S, &Path) -> Result<Vec<u8>, TransformError> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _style: PhantomData,
        }
    }
}

impl<S, F> Transform for FnTransform<S, F>
where
    F: Fn(&S, &Path) -> Result<Vec<u8>, TransformError> + Send + Sync,
{
    type Style = S;

    fn transform(&self, style: &S, source: &Path) -> Result<Vec<u8>, TransformError> {
        (self.f)(style, source)
    }
}
