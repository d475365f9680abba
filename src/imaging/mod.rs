//! Image processing: geometry, sharpening, and the codec boundary.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::with_guessed_format` |
//! | **Resample** | `crop_imm` + `resize_exact` (Lanczos3) |
//! | **Sharpen** | 3×3 convolution, strength from [`sharpen_strength`] |
//! | **Encode** | JPEG quality passthrough, PNG compression level 0–9 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and fit geometry (unit testable)
//! - **Sharpen**: The strength heuristic and its 3×3 kernel
//! - **Parameters**: Format dispatch and data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`Resizer`], combining calculations + backend + file store

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;
mod sharpen;

pub use backend::{BackendError, ImageBackend, ImageDescriptor};
pub use calculations::{
    CropMode, CropRatio, CropRatioError, CropWindow, Geometry, fits_within, resolve_crop,
    resolve_geometry, resolve_target,
};
pub use operations::{
    ResizeError, ResizeOptions, ResizeOutcome, ResizePlan, ResizeReport, ResizeSteps,
    ResolvedOptions, Resizer, plan_resize,
};
pub use params::{
    DecodeBudget, Encoding, FormatPolicy, OutputFormat, Quality, ResampleParams, SourceFormat,
};
pub use rust_backend::RustBackend;
pub use sharpen::{SharpenKernel, sharpen_strength};
