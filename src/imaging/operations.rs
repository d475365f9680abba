//! High-level resize operation.
//!
//! [`Resizer::resize_image`] combines the pure calculations with backend and
//! file-store calls for one image:
//!
//! ```text
//! resolve options → pre-checks → plan → budget check
//!     → decode → resample → sharpen? → encode → write → delete source?
//! ```
//!
//! Pre-checks (source exists, is an image, output writable, decode budget)
//! all run before any pixels are decoded. Resample and encode/write failures
//! come back as a non-successful [`ResizeOutcome`] rather than an error, so a
//! caller can retry with different parameters.

use super::backend::{BackendError, ImageBackend, ImageDescriptor};
use super::calculations::{CropMode, Geometry, fits_within, resolve_geometry};
use super::params::{DecodeBudget, Encoding, OutputFormat, Quality, ResampleParams, SourceFormat};
use super::rust_backend::RustBackend;
use super::sharpen::SharpenKernel;
use crate::config::ResizerConfig;
use crate::storage::{FileStore, LocalFileStore};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("File to resize must be an image: {path} is {mime}")]
    UnsupportedFormat { path: PathBuf, mime: String },
    #[error("Unable to write to output file: {0}")]
    OutputNotWritable(PathBuf),
    #[error("Decoding {width}x{height} needs {required} bytes, budget is {budget}")]
    BudgetExceeded {
        width: u32,
        height: u32,
        required: u64,
        budget: u64,
    },
    #[error("Image processing failed: {0}")]
    Backend(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for resize operations.
pub type Result<T> = std::result::Result<T, ResizeError>;

/// Per-call overrides. `None` falls back to the [`ResizerConfig`] default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResizeOptions {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub quality: Option<u32>,
    pub crop: Option<CropMode>,
    pub ignore_small_images: Option<bool>,
    pub delete_source: Option<bool>,
    /// Where to write; defaults to overwriting the source.
    pub output: Option<PathBuf>,
    pub max_decode_bytes: Option<u64>,
}

/// Options with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
    pub crop: CropMode,
    pub ignore_small_images: bool,
    pub delete_source: bool,
    pub output: PathBuf,
    pub budget: DecodeBudget,
}

impl ResolvedOptions {
    pub fn resolve(options: &ResizeOptions, config: &ResizerConfig, source: &Path) -> Self {
        let defaults = &config.resize;
        let default_crop = if defaults.crop_zoom {
            CropMode::Zoom
        } else {
            CropMode::None
        };
        Self {
            max_width: options.max_width.unwrap_or(defaults.max_width),
            max_height: options.max_height.unwrap_or(defaults.max_height),
            quality: Quality::new(options.quality.unwrap_or(defaults.quality)),
            crop: options.crop.unwrap_or(default_crop),
            ignore_small_images: options
                .ignore_small_images
                .unwrap_or(defaults.ignore_small_images),
            delete_source: options.delete_source.unwrap_or(defaults.delete_source),
            output: options
                .output
                .clone()
                .unwrap_or_else(|| source.to_path_buf()),
            budget: DecodeBudget(
                options
                    .max_decode_bytes
                    .unwrap_or(config.limits.max_decode_bytes),
            ),
        }
    }
}

/// Everything needed to produce the output, decided before decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizePlan {
    /// The image already fits; copy it verbatim.
    Copy,
    Resize(ResizeSteps),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSteps {
    pub format: SourceFormat,
    pub geometry: Geometry,
    pub resample: ResampleParams,
    pub sharpen: Option<SharpenKernel>,
    pub encoding: Encoding,
}

/// Plan a resize without executing it.
///
/// The early-exit test runs before any crop logic, so an image that already
/// fits is never cropped even when a crop mode was requested.
pub fn plan_resize(
    descriptor: &ImageDescriptor,
    format: SourceFormat,
    options: &ResolvedOptions,
) -> ResizePlan {
    let source = descriptor.dimensions();
    if options.ignore_small_images && fits_within(source, options.max_width, options.max_height) {
        return ResizePlan::Copy;
    }

    let geometry = resolve_geometry(source, options.max_width, options.max_height, &options.crop);
    let policy = format.policy();
    let sharpen = if policy.sharpen {
        SharpenKernel::for_resize(geometry.crop.width, geometry.new_width)
    } else {
        None
    };

    ResizePlan::Resize(ResizeSteps {
        format,
        geometry,
        resample: ResampleParams::from_geometry(&geometry, policy.preserve_alpha),
        sharpen,
        encoding: policy.output.encoding(options.quality),
    })
}

/// What a successful or recoverable resize did.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeOutcome {
    /// Source already fit; bytes copied unchanged.
    Copied { output: PathBuf },
    Resized(ResizeReport),
    /// The codec could not resample; nothing was written.
    ResampleFailed(String),
    /// Encoding or writing the output failed; nothing usable was written.
    WriteFailed(String),
}

impl ResizeOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Copied { .. } | Self::Resized(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeReport {
    pub output: PathBuf,
    pub source_width: u32,
    pub source_height: u32,
    pub geometry: Geometry,
    pub format: OutputFormat,
    /// `None` when sharpening was skipped.
    pub sharpen_strength: Option<f32>,
    pub bytes_written: usize,
    pub source_deleted: bool,
}

/// Resizes one image per call.
///
/// Holds only configuration and collaborators; all per-image state lives on
/// the stack of [`Resizer::resize_image`].
pub struct Resizer<B = RustBackend, F = LocalFileStore> {
    config: ResizerConfig,
    backend: B,
    files: F,
}

impl Resizer {
    /// Resizer using the `image` crate and the local file system.
    pub fn new(config: ResizerConfig) -> Self {
        Self::with_parts(config, RustBackend::new(), LocalFileStore)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new(ResizerConfig::default())
    }
}

impl<B: ImageBackend, F: FileStore> Resizer<B, F> {
    pub fn with_parts(config: ResizerConfig, backend: B, files: F) -> Self {
        Self {
            config,
            backend,
            files,
        }
    }

    pub fn config(&self) -> &ResizerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resize the image at `path` according to `options`.
    pub fn resize_image(&self, path: &Path, options: &ResizeOptions) -> Result<ResizeOutcome> {
        let options = ResolvedOptions::resolve(options, &self.config, path);

        if !self.files.exists(path) {
            return Err(ResizeError::SourceNotFound(path.to_path_buf()));
        }

        let descriptor = self.backend.identify(path)?.ok_or_else(|| {
            ResizeError::UnsupportedFormat {
                path: path.to_path_buf(),
                mime: "unrecognized content".to_string(),
            }
        })?;
        let format = SourceFormat::from_mime(&descriptor.mime_type).ok_or_else(|| {
            ResizeError::UnsupportedFormat {
                path: path.to_path_buf(),
                mime: descriptor.mime_type.clone(),
            }
        })?;

        if !self.files.output_writable(&options.output) {
            return Err(ResizeError::OutputNotWritable(options.output.clone()));
        }

        let steps = match plan_resize(&descriptor, format, &options) {
            ResizePlan::Copy => {
                info!(
                    source = %path.display(),
                    width = descriptor.width,
                    height = descriptor.height,
                    "Image already fits, copying unchanged"
                );
                self.files.copy(path, &options.output)?;
                self.finish(path, &options)?;
                return Ok(ResizeOutcome::Copied {
                    output: options.output,
                });
            }
            ResizePlan::Resize(steps) => steps,
        };

        let (width, height) = descriptor.dimensions();
        if !options.budget.allows(width, height) {
            return Err(ResizeError::BudgetExceeded {
                width,
                height,
                required: DecodeBudget::required(width, height),
                budget: options.budget.bytes(),
            });
        }

        debug!(
            source = %path.display(),
            ?format,
            crop_x = steps.geometry.crop.offset_x,
            crop_y = steps.geometry.crop.offset_y,
            crop_width = steps.geometry.crop.width,
            crop_height = steps.geometry.crop.height,
            new_width = steps.geometry.new_width,
            new_height = steps.geometry.new_height,
            "Resolved resize geometry"
        );

        let source = self.backend.decode(path, format, options.budget)?;
        let mut canvas = match self.backend.resample(&source, &steps.resample) {
            Ok(canvas) => canvas,
            Err(e) => {
                warn!(source = %path.display(), error = %e, "Resample failed");
                return Ok(ResizeOutcome::ResampleFailed(e.to_string()));
            }
        };
        drop(source);

        if let Some(kernel) = &steps.sharpen {
            debug!(strength = kernel.strength(), "Sharpening resized image");
            self.backend.convolve(&mut canvas, kernel)?;
        }

        let bytes = match self.backend.encode(&canvas, &steps.encoding) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(output = %options.output.display(), error = %e, "Encode failed");
                return Ok(ResizeOutcome::WriteFailed(e.to_string()));
            }
        };
        drop(canvas);

        if let Err(e) = self.files.write(&options.output, &bytes) {
            warn!(output = %options.output.display(), error = %e, "Write failed");
            return Ok(ResizeOutcome::WriteFailed(e.to_string()));
        }

        let source_deleted = self.finish(path, &options)?;
        info!(
            source = %path.display(),
            output = %options.output.display(),
            width = steps.geometry.new_width,
            height = steps.geometry.new_height,
            bytes = bytes.len(),
            "Resized image"
        );

        Ok(ResizeOutcome::Resized(ResizeReport {
            output: options.output,
            source_width: width,
            source_height: height,
            geometry: steps.geometry,
            format: steps.encoding.format(),
            sharpen_strength: steps.sharpen.map(|k| k.strength()),
            bytes_written: bytes.len(),
            source_deleted,
        }))
    }

    /// Remove the source when asked to and it is not also the output.
    fn finish(&self, source: &Path, options: &ResolvedOptions) -> Result<bool> {
        if !options.delete_source || self.files.same_file(source, &options.output) {
            return Ok(false);
        }
        self.files.remove(source)?;
        debug!(source = %source.display(), "Deleted source image");
        Ok(true)
    }
}
