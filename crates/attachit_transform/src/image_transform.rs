//! Image resizing transform backed by the `image` crate.

use crate::{Geometry, Resize, Transform};
use attachit_error::{TransformError, TransformErrorKind};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// Resizes the original according to a [`Geometry`] and re-encodes it.
///
/// The output keeps the source's format when it can be detected from the
/// bytes or the file extension, and falls back to `fallback_format`
/// otherwise. JPEG output drops the alpha channel.
#[derive(Debug, Clone, Copy)]
pub struct ImageTransform {
    fallback_format: ImageFormat,
    filter: FilterType,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            fallback_format: ImageFormat::Png,
            filter: FilterType::Lanczos3,
        }
    }
}

impl ImageTransform {
    /// Create a transform with the given fallback output format.
    pub fn new(fallback_format: ImageFormat) -> Self {
        Self {
            fallback_format,
            ..Self::default()
        }
    }

    /// Create a transform whose fallback format is named by file extension (`png`, `jpg`, ...).
    ///
    /// # Errors
    ///
    /// Returns an error if the extension names no known format.
    pub fn with_fallback_extension(extension: &str) -> Result<Self, TransformError> {
        let format = ImageFormat::from_extension(extension).ok_or_else(|| {
            TransformError::new(TransformErrorKind::UnsupportedFormat(extension.to_string()))
        })?;
        Ok(Self::new(format))
    }

    /// Use a different resampling filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    fn apply(&self, img: &DynamicImage, geometry: &Geometry) -> Option<DynamicImage> {
        let (src_w, src_h) = (img.width(), img.height());
        match geometry.resize() {
            Resize::Fit => Some(self.scale(img, geometry, src_w, src_h)),
            Resize::ShrinkOnly => geometry
                .is_exceeded_by(src_w, src_h)
                .then(|| self.scale(img, geometry, src_w, src_h)),
            Resize::EnlargeOnly => geometry
                .contains(src_w, src_h)
                .then(|| self.scale(img, geometry, src_w, src_h)),
            Resize::Exact => {
                let (w, h) = box_of(geometry, src_w, src_h);
                Some(img.resize_exact(w, h, self.filter))
            }
            Resize::Crop => {
                let (w, h) = box_of(geometry, src_w, src_h);
                Some(img.resize_to_fill(w, h, self.filter))
            }
        }
    }

    fn scale(&self, img: &DynamicImage, geometry: &Geometry, src_w: u32, src_h: u32) -> DynamicImage {
        let (w, h) = geometry.fit(src_w, src_h);
        img.resize_exact(w, h, self.filter)
    }

    fn output_format(&self, data: &[u8], source: &Path) -> ImageFormat {
        image::guess_format(data)
            .or_else(|_| ImageFormat::from_path(source))
            .unwrap_or(self.fallback_format)
    }
}

fn box_of(geometry: &Geometry, src_w: u32, src_h: u32) -> (u32, u32) {
    (
        geometry.width().unwrap_or(src_w),
        geometry.height().unwrap_or(src_h),
    )
}

impl Transform for ImageTransform {
    type Style = Geometry;

    #[tracing::instrument(skip(self, style, source), fields(geometry = %style, source = %source.display()))]
    fn transform(&self, style: &Geometry, source: &Path) -> Result<Vec<u8>, TransformError> {
        let data = std::fs::read(source).map_err(|e| {
            TransformError::new(TransformErrorKind::SourceRead {
                path: source.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        let img = image::load_from_memory(&data)
            .map_err(|e| TransformError::new(TransformErrorKind::Decode(e.to_string())))?;

        let format = self.output_format(&data, source);
        let rendered = match self.apply(&img, style) {
            Some(resized) => resized,
            None => {
                tracing::debug!("Source already within geometry, re-encoding unchanged");
                img
            }
        };

        let rendered = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(rendered.to_rgb8()),
            _ => rendered,
        };

        let mut buf = Cursor::new(Vec::new());
        rendered
            .write_to(&mut buf, format)
            .map_err(|e| TransformError::new(TransformErrorKind::Encode(e.to_string())))?;

        let bytes = buf.into_inner();
        tracing::debug!(
            width = rendered.width(),
            height = rendered.height(),
            format = ?format,
            size = bytes.len(),
            "Rendered style"
        );
        Ok(bytes)
    }
}
