//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::with_guessed_format` + `into_dimensions` |
//! | Decode (JPEG, PNG, GIF) | `image` crate decoders, capped by `image::Limits::max_alloc` |
//! | Resample | `DynamicImage::crop_imm` + `resize_exact` with `Lanczos3` |
//! | Sharpen | hand-rolled 3×3 convolution with explicit divisor/offset |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` with a 0–9 compression level |

use super::backend::{BackendError, ImageBackend, ImageDescriptor};
use super::params::{DecodeBudget, Encoding, ResampleParams, SourceFormat};
use super::sharpen::SharpenKernel;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, Limits, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::debug;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a reader with the format sniffed from content only.
///
/// `ImageReader::open` would fall back to the file extension, which lets a
/// renamed text file pass as a JPEG.
fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    let file = File::open(path)?;
    Ok(ImageReader::new(BufReader::new(file)).with_guessed_format()?)
}

/// Apply a 3×3 kernel to every color channel; alpha is left untouched.
///
/// Edge pixels reuse the nearest in-bounds neighbor.
fn convolve3x3(image: &RgbaImage, kernel: &SharpenKernel) -> RgbaImage {
    let (width, height) = image.dimensions();
    let max_x = width.saturating_sub(1) as i64;
    let max_y = height.saturating_sub(1) as i64;

    RgbaImage::from_fn(width, height, |x, y| {
        let mut acc = [0.0f32; 3];
        for (ky, row) in kernel.matrix.iter().enumerate() {
            for (kx, weight) in row.iter().enumerate() {
                let sx = (x as i64 + kx as i64 - 1).clamp(0, max_x) as u32;
                let sy = (y as i64 + ky as i64 - 1).clamp(0, max_y) as u32;
                let px = image.get_pixel(sx, sy);
                for (c, sum) in acc.iter_mut().enumerate() {
                    *sum += f32::from(px[c]) * weight;
                }
            }
        }
        let alpha = image.get_pixel(x, y)[3];
        let channel = |sum: f32| (sum / kernel.divisor + kernel.offset).round().clamp(0.0, 255.0) as u8;
        Rgba([channel(acc[0]), channel(acc[1]), channel(acc[2]), alpha])
    })
}

fn png_compression(level: u8) -> CompressionType {
    match level.min(9) {
        0 => CompressionType::Uncompressed,
        level => CompressionType::Level(level),
    }
}

impl ImageBackend for RustBackend {
    type Canvas = DynamicImage;

    fn identify(&self, path: &Path) -> Result<Option<ImageDescriptor>, BackendError> {
        let reader = open_reader(path)?;
        let Some(format) = reader.format() else {
            return Ok(None);
        };
        let (width, height) = reader.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Some(ImageDescriptor {
            width,
            height,
            mime_type: format.to_mime_type().to_string(),
        }))
    }

    fn decode(
        &self,
        path: &Path,
        format: SourceFormat,
        budget: DecodeBudget,
    ) -> Result<DynamicImage, BackendError> {
        let mut reader = open_reader(path)?;
        let mut limits = Limits::default();
        limits.max_alloc = Some(budget.bytes());
        reader.limits(limits);

        debug!(path = %path.display(), ?format, budget = budget.bytes(), "Decoding source image");
        let img = reader.decode().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })?;

        // Palette and alpha-aware sources keep transparency through the resample
        Ok(match format {
            SourceFormat::Gif | SourceFormat::Png => DynamicImage::ImageRgba8(img.to_rgba8()),
            SourceFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        })
    }

    fn resample(
        &self,
        source: &DynamicImage,
        params: &ResampleParams,
    ) -> Result<DynamicImage, BackendError> {
        let ResampleParams {
            src_x,
            src_y,
            src_width,
            src_height,
            dst_width,
            dst_height,
            preserve_alpha,
        } = *params;

        if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Degenerate resample {src_width}x{src_height} -> {dst_width}x{dst_height}"
            )));
        }
        if u64::from(src_x) + u64::from(src_width) > u64::from(source.width())
            || u64::from(src_y) + u64::from(src_height) > u64::from(source.height())
        {
            return Err(BackendError::ProcessingFailed(format!(
                "Crop window {src_width}x{src_height}+{src_x}+{src_y} outside {}x{} source",
                source.width(),
                source.height()
            )));
        }

        let cropped = source.crop_imm(src_x, src_y, src_width, src_height);
        let resized = cropped.resize_exact(dst_width, dst_height, FilterType::Lanczos3);

        Ok(if preserve_alpha {
            DynamicImage::ImageRgba8(resized.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(resized.to_rgb8())
        })
    }

    fn convolve(
        &self,
        canvas: &mut DynamicImage,
        kernel: &SharpenKernel,
    ) -> Result<(), BackendError> {
        if kernel.divisor == 0.0 {
            return Err(BackendError::ProcessingFailed(
                "Convolution divisor must be non-zero".into(),
            ));
        }
        let had_alpha = canvas.color().has_alpha();
        let sharpened = convolve3x3(&canvas.to_rgba8(), kernel);
        *canvas = if had_alpha {
            DynamicImage::ImageRgba8(sharpened)
        } else {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(sharpened).to_rgb8())
        };
        Ok(())
    }

    fn encode(&self, canvas: &DynamicImage, encoding: &Encoding) -> Result<Vec<u8>, BackendError> {
        let mut buffer = Vec::new();
        match *encoding {
            Encoding::Jpeg { quality } => {
                let rgb = canvas.to_rgb8();
                let (width, height) = rgb.dimensions();
                JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality)
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
            }
            Encoding::Png { compression } => {
                let rgba = canvas.to_rgba8();
                let (width, height) = rgba.dimensions();
                PngEncoder::new_with_quality(
                    Cursor::new(&mut buffer),
                    png_compression(compression),
                    PngFilter::Adaptive,
                )
                .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))?;
            }
        }
        Ok(buffer)
    }
}
