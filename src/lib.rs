//! # image-resizer
//!
//! Fit a raster image inside a maximum width/height box, optionally cropping
//! it to a target aspect ratio first and sharpening it afterwards.
//!
//! ```no_run
//! use image_resizer::config::ResizerConfig;
//! use image_resizer::imaging::{CropMode, ResizeOptions, Resizer};
//! use std::path::Path;
//!
//! let resizer = Resizer::new(ResizerConfig::default());
//! let outcome = resizer.resize_image(
//!     Path::new("photos/dawn.jpg"),
//!     &ResizeOptions {
//!         max_width: Some(400),
//!         max_height: Some(400),
//!         crop: Some(CropMode::Zoom),
//!         output: Some("thumbs/dawn.jpg".into()),
//!         ..Default::default()
//!     },
//! )?;
//! assert!(outcome.succeeded());
//! # Ok::<(), image_resizer::imaging::ResizeError>(())
//! ```
//!
//! # One Call, One Image
//!
//! Every resize is a single blocking sequence:
//!
//! ```text
//! identify → (copy if it already fits) → geometry → decode → resample
//!     → sharpen (JPEG only) → encode in memory → single write
//! ```
//!
//! Nothing is shared between calls except the [`config::ResizerConfig`]
//! defaults held by the [`imaging::Resizer`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Geometry and sharpening math, format dispatch, the backend trait, and [`imaging::Resizer`] |
//! | [`config`] | `image-resizer.toml` loading, validation and stock defaults |
//! | [`storage`] | File-system boundary: existence/writability checks, copy, write, remove |
//! | [`output`] | CLI output formatting of resize outcomes |
//!
//! # Design Decisions
//!
//! ## Geometry Is Pure
//!
//! Crop windows, output sizes and sharpening strength are plain functions of
//! a few numbers. They never see pixels, so they are covered by unit and
//! property tests without encoding a single image.
//!
//! ## GIF Becomes PNG
//!
//! Resampling a palette image blends colors the palette cannot represent.
//! GIF sources are decoded to RGBA and written back as PNG, keeping their
//! transparency; PNG and GIF outputs are never sharpened.
//!
//! ## No Partial Writes
//!
//! The encoded image is built fully in memory, written to a temp file beside
//! the output and renamed over it. A failed encode or write is reported as an
//! unsuccessful [`imaging::ResizeOutcome`] and leaves the previous file (often
//! the source itself) untouched. Paths are compared after canonicalizing, so
//! an output spelled differently from the source is still treated as the
//! source: it is never copied onto itself or deleted.
//!
//! ## Explicit Decode Budget
//!
//! Instead of raising a process-wide memory ceiling, each call carries a
//! decode budget. The pixel buffer size is checked against it before
//! decoding, and the same bound is handed to the decoder as an allocation
//! limit so a lying header cannot force a huge allocation.

pub mod config;
pub mod imaging;
pub mod output;
pub mod storage;
