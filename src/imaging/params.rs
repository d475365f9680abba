//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides geometry, format and quality) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock) without
//! changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Caller-facing quality (0–100, default 80). Clamped on construction.
//! - [`SourceFormat`]: The three decode paths, chosen from the source MIME type.
//! - [`FormatPolicy`]: Per-format output format and sharpening switch.
//! - [`Encoding`]: Encoder settings after the per-format quality transform.
//! - [`ResampleParams`]: Crop window plus target canvas size.
//! - [`DecodeBudget`]: Upper bound on decoded pixel-buffer size.

use super::calculations::Geometry;

/// Quality setting for output encoding (0-100).
///
/// JPEG uses it directly; PNG maps it onto a 0–9 compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// PNG compression level: `round(10 - quality / 10)`, clamped to 0–9.
    ///
    /// Quality 0 would give level 10, which is past the end of the scale and
    /// means maximum compression.
    pub fn png_compression_level(self) -> u8 {
        let level = (10.0 - f64::from(self.0) / 10.0).round();
        level.clamp(0.0, 9.0) as u8
    }

    /// JPEG encoder quality; the encoder rejects 0.
    pub fn jpeg_quality(self) -> u8 {
        self.0.clamp(1, 100) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Decode path for a source image, picked from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Gif,
    Png,
    /// Everything else, including JPEG itself.
    Jpeg,
}

impl SourceFormat {
    /// Map an `image/*` MIME type to a decode path.
    ///
    /// Returns `None` for anything that is not an image type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if !mime.starts_with("image/") {
            return None;
        }
        Some(match mime.as_str() {
            "image/gif" => Self::Gif,
            "image/png" | "image/x-png" => Self::Png,
            _ => Self::Jpeg,
        })
    }

    /// Output format, sharpening switch and alpha handling for this source.
    ///
    /// GIF is re-encoded as PNG: resampling a palette image produces blended
    /// colors the palette cannot hold, and its transparency survives in PNG.
    pub fn policy(self) -> FormatPolicy {
        match self {
            Self::Gif | Self::Png => FormatPolicy {
                output: OutputFormat::Png,
                sharpen: false,
                preserve_alpha: true,
            },
            Self::Jpeg => FormatPolicy {
                output: OutputFormat::Jpeg,
                sharpen: true,
                preserve_alpha: false,
            },
        }
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Apply this format's quality transform.
    pub fn encoding(self, quality: Quality) -> Encoding {
        match self {
            Self::Png => Encoding::Png {
                compression: quality.png_compression_level(),
            },
            Self::Jpeg => Encoding::Jpeg {
                quality: quality.jpeg_quality(),
            },
        }
    }
}

/// How a given source format is written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPolicy {
    pub output: OutputFormat,
    pub sharpen: bool,
    pub preserve_alpha: bool,
}

/// Encoder settings with the quality transform already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Jpeg { quality: u8 },
    /// `compression` is 0 (none) through 9 (best).
    Png { compression: u8 },
}

impl Encoding {
    pub fn format(self) -> OutputFormat {
        match self {
            Self::Jpeg { .. } => OutputFormat::Jpeg,
            Self::Png { .. } => OutputFormat::Png,
        }
    }
}

/// Parameters for one resampled copy: crop window → canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleParams {
    pub src_x: u32,
    pub src_y: u32,
    pub src_width: u32,
    pub src_height: u32,
    pub dst_width: u32,
    pub dst_height: u32,
    /// Keep the alpha channel through resampling (PNG/GIF sources).
    pub preserve_alpha: bool,
}

impl ResampleParams {
    pub fn from_geometry(geometry: &Geometry, preserve_alpha: bool) -> Self {
        let (src_x, src_y, src_width, src_height) = geometry.crop.to_pixels();
        Self {
            src_x,
            src_y,
            src_width,
            src_height,
            dst_width: geometry.new_width,
            dst_height: geometry.new_height,
            preserve_alpha,
        }
    }
}

/// Upper bound on the decoded pixel buffer, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeBudget(pub u64);

impl DecodeBudget {
    /// Bytes per pixel assumed for the decoded buffer (RGBA8).
    pub const BYTES_PER_PIXEL: u64 = 4;

    pub fn bytes(self) -> u64 {
        self.0
    }

    /// Bytes needed to hold a decoded `width × height` image.
    pub fn required(width: u32, height: u32) -> u64 {
        u64::from(width) * u64::from(height) * Self::BYTES_PER_PIXEL
    }

    pub fn allows(self, width: u32, height: u32) -> bool {
        Self::required(width, height) <= self.0
    }
}

impl Default for DecodeBudget {
    fn default() -> Self {
        Self(100 * 1024 * 1024)
    }
}
