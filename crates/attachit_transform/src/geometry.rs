//! ImageMagick-style geometry strings used as style parameters.

use attachit_error::{TransformError, TransformErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a geometry box is applied to the source image.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::EnumString,
    strum::Display,
)]
pub enum Resize {
    /// Scale to fit inside the box, keeping aspect ratio.
    #[default]
    #[strum(serialize = "")]
    Fit,
    /// Like `Fit`, but only if the source is larger than the box.
    #[strum(serialize = ">")]
    ShrinkOnly,
    /// Like `Fit`, but only if the source is smaller than the box.
    #[strum(serialize = "<")]
    EnlargeOnly,
    /// Scale to the exact box, ignoring aspect ratio.
    #[strum(serialize = "!")]
    Exact,
    /// Scale to cover the box, then crop the overflow around the center.
    #[strum(serialize = "#")]
    Crop,
}

/// Largest width or height a geometry may ask for.
pub const MAX_DIMENSION: u32 = 16_384;

/// Target box for a style, e.g. `64x64>` or `800x`.
///
/// # Examples
///
/// ```
/// use attachit_transform::{Geometry, Resize};
///
/// let thumb: Geometry = "64x64#".parse().unwrap();
/// assert_eq!(*thumb.width(), Some(64));
/// assert_eq!(*thumb.resize(), Resize::Crop);
///
/// let wide: Geometry = "800x".parse().unwrap();
/// assert_eq!(*wide.height(), None);
/// assert_eq!(wide.to_string(), "800x");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(try_from = "String", into = "String")]
pub struct Geometry {
    width: Option<u32>,
    height: Option<u32>,
    resize: Resize,
}

impl Geometry {
    /// Box of the given size applied with `resize`.
    pub fn new(width: Option<u32>, height: Option<u32>, resize: Resize) -> Self {
        Self {
            width,
            height,
            resize,
        }
    }

    /// Scaled dimensions for a `src_w` x `src_h` source fitting inside the box.
    pub(crate) fn fit(&self, src_w: u32, src_h: u32) -> (u32, u32) {
        let scale_w = self.width.map(|w| w as f64 / src_w as f64);
        let scale_h = self.height.map(|h| h as f64 / src_h as f64);
        let scale = match (scale_w, scale_h) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => 1.0,
        };
        let w = ((src_w as f64 * scale).round() as u32).clamp(1, MAX_DIMENSION);
        let h = ((src_h as f64 * scale).round() as u32).clamp(1, MAX_DIMENSION);
        (w, h)
    }

    /// Whether the source exceeds the box in any bounded dimension.
    pub(crate) fn is_exceeded_by(&self, src_w: u32, src_h: u32) -> bool {
        self.width.is_some_and(|w| src_w > w) || self.height.is_some_and(|h| src_h > h)
    }

    /// Whether the source is smaller than the box in every bounded dimension.
    pub(crate) fn contains(&self, src_w: u32, src_h: u32) -> bool {
        self.width.is_none_or(|w| src_w < w) && self.height.is_none_or(|h| src_h < h)
    }
}

impl FromStr for Geometry {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransformError::new(TransformErrorKind::InvalidGeometry(s.to_string()));
        let trimmed = s.trim();

        let (dims, resize) = match trimmed.char_indices().last() {
            Some((idx, c)) if !c.is_ascii_digit() && c != 'x' => {
                let resize = Resize::from_str(&trimmed[idx..]).map_err(|_| invalid())?;
                (&trimmed[..idx], resize)
            }
            _ => (trimmed, Resize::Fit),
        };

        let parse_dim = |d: &str| -> Result<Option<u32>, TransformError> {
            if d.is_empty() {
                return Ok(None);
            }
            match d.parse::<u32>() {
                Ok(n) if (1..=MAX_DIMENSION).contains(&n) => Ok(Some(n)),
                _ => Err(invalid()),
            }
        };

        let (width, height) = match dims.split_once('x') {
            Some((w, h)) => (parse_dim(w)?, parse_dim(h)?),
            None => (parse_dim(dims)?, None),
        };

        if width.is_none() && height.is_none() {
            return Err(invalid());
        }
        if matches!(resize, Resize::Exact | Resize::Crop) && (width.is_none() || height.is_none()) {
            return Err(invalid());
        }

        Ok(Self {
            width,
            height,
            resize,
        })
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(w) = self.width {
            write!(f, "{}", w)?;
        }
        write!(f, "x")?;
        if let Some(h) = self.height {
            write!(f, "{}", h)?;
        }
        write!(f, "{}", self.resize)
    }
}

impl TryFrom<String> for Geometry {
    type Error = TransformError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Geometry> for String {
    fn from(g: Geometry) -> Self {
        g.to_string()
    }
}
