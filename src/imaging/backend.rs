//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the codec operations a resize needs:
//! identify, decode, resample, convolve and encode. Geometry and sharpening
//! math never touch a backend, so they stay testable without pixels.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{DecodeBudget, Encoding, ResampleParams, SourceFormat};
use super::sharpen::SharpenKernel;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Dimensions and MIME type, read once from the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
}

impl ImageDescriptor {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// A backend owns its pixel representation through [`ImageBackend::Canvas`];
/// callers only move canvases between calls.
pub trait ImageBackend {
    /// Decoded pixel buffer.
    type Canvas;

    /// Read dimensions and MIME type without decoding pixels.
    ///
    /// Returns `Ok(None)` when the content is not a recognizable image.
    fn identify(&self, path: &Path) -> Result<Option<ImageDescriptor>, BackendError>;

    /// Decode the source, refusing to allocate more than `budget`.
    fn decode(
        &self,
        path: &Path,
        format: SourceFormat,
        budget: DecodeBudget,
    ) -> Result<Self::Canvas, BackendError>;

    /// Resampled copy of the crop window into a new canvas of the target size.
    fn resample(
        &self,
        source: &Self::Canvas,
        params: &ResampleParams,
    ) -> Result<Self::Canvas, BackendError>;

    /// Apply a 3×3 convolution in place.
    fn convolve(
        &self,
        canvas: &mut Self::Canvas,
        kernel: &SharpenKernel,
    ) -> Result<(), BackendError>;

    /// Encode fully in memory.
    fn encode(&self, canvas: &Self::Canvas, encoding: &Encoding) -> Result<Vec<u8>, BackendError>;
}
