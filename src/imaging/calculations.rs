//! Pure calculation functions for crop and fit geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Resolution happens in two steps:
//!
//! 1. **Crop window** ([`resolve_crop`]): optionally trim the source to a target
//!    aspect ratio, centered on the axis being trimmed.
//! 2. **Target size** ([`resolve_target`]): scale the (possibly cropped) window
//!    to fit inside `max_width × max_height`, touching at least one bound.
//!
//! A bound of `0` means "unconstrained on that axis".

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid crop ratio '{0}': expected W:H with positive numbers")]
pub struct CropRatioError(pub String);

/// Target aspect ratio for ratio-mode cropping, parsed from `"W:H"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRatio {
    pub width: f64,
    pub height: f64,
}

impl CropRatio {
    pub fn new(width: f64, height: f64) -> Result<Self, CropRatioError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(CropRatioError(format!("{width}:{height}")));
        }
        Ok(Self { width, height })
    }

    pub fn value(self) -> f64 {
        self.width / self.height
    }
}

impl FromStr for CropRatio {
    type Err = CropRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CropRatioError(s.to_string());
        let (w, h) = s.split_once(':').ok_or_else(invalid)?;
        if h.contains(':') {
            return Err(invalid());
        }
        let width: f64 = w.trim().parse().map_err(|_| invalid())?;
        let height: f64 = h.trim().parse().map_err(|_| invalid())?;
        Self::new(width, height).map_err(|_| invalid())
    }
}

impl fmt::Display for CropRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// How (and whether) to crop before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropMode {
    /// Keep the full source frame.
    #[default]
    None,
    /// Center-crop to an explicit aspect ratio.
    Ratio(CropRatio),
    /// Center-crop to the aspect ratio of the bounding box, so the result
    /// fills it completely.
    Zoom,
}

/// Rectangular region of the source selected before resampling.
///
/// Values stay fractional until the codec needs whole pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropWindow {
    /// The whole source image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    /// Truncate to whole pixels: `(x, y, width, height)`.
    pub fn to_pixels(self) -> (u32, u32, u32, u32) {
        (
            self.offset_x as u32,
            self.offset_y as u32,
            self.width as u32,
            self.height as u32,
        )
    }
}

/// Full resolved geometry for one resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub crop: CropWindow,
    pub new_width: u32,
    pub new_height: u32,
}

/// Whether an image already fits inside the bounds and needs no resize.
///
/// Both bounds zero counts as fitting. Otherwise every bounded axis must be
/// at least as large as the source.
///
/// # Examples
/// ```
/// # use image_resizer::imaging::fits_within;
/// assert!(fits_within((150, 100), 200, 200));
/// assert!(!fits_within((300, 100), 200, 200));
/// assert!(fits_within((300, 100), 0, 0));
/// ```
pub fn fits_within(source: (u32, u32), max_width: u32, max_height: u32) -> bool {
    let (width, height) = source;
    let axis_fits = |bound: u32, size: u32| bound == 0 || bound >= size;
    axis_fits(max_width, width) && axis_fits(max_height, height)
}

/// Compute the crop window for the given mode.
pub fn resolve_crop(
    source: (u32, u32),
    max_width: u32,
    max_height: u32,
    mode: &CropMode,
) -> CropWindow {
    let (width, height) = source;
    let full = CropWindow::full(width, height);

    let target_ratio = match mode {
        CropMode::None => return full,
        CropMode::Ratio(ratio) => ratio.value(),
        CropMode::Zoom => {
            if max_width == 0 || max_height == 0 {
                return full;
            }
            f64::from(max_width) / f64::from(max_height)
        }
    };

    center_crop(full, target_ratio)
}

fn center_crop(full: CropWindow, target_ratio: f64) -> CropWindow {
    let source_ratio = full.width / full.height;

    if source_ratio < target_ratio {
        // Too tall: trim top and bottom
        let height = full.width / target_ratio;
        CropWindow {
            offset_y: (full.height - height) / 2.0,
            height,
            ..full
        }
    } else if source_ratio > target_ratio {
        // Too wide: trim left and right
        let width = full.height * target_ratio;
        CropWindow {
            offset_x: (full.width - width) / 2.0,
            width,
            ..full
        }
    } else {
        full
    }
}

/// Scale a crop window to fit inside the bounding box.
///
/// Width-driven when `max_width / crop_width * crop_height` stays under
/// `max_height`, height-driven otherwise. The free axis is rounded up.
///
/// # Examples
/// ```
/// # use image_resizer::imaging::resolve_target;
/// // 800x600 into 200x200 → width-driven
/// assert_eq!(resolve_target(800.0, 600.0, 200, 200), (200, 150));
/// // 600x800 into 200x200 → height-driven
/// assert_eq!(resolve_target(600.0, 800.0, 200, 200), (150, 200));
/// ```
pub fn resolve_target(
    crop_width: f64,
    crop_height: f64,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    let max_w = f64::from(max_width);
    let max_h = f64::from(max_height);

    let (w, h) = match (max_width, max_height) {
        (0, 0) => (crop_width.ceil(), crop_height.ceil()),
        (0, _) => ((max_h / crop_height * crop_width).ceil(), max_h),
        (_, 0) => (max_w, (max_w / crop_width * crop_height).ceil()),
        _ => {
            let x_ratio = max_w / crop_width;
            let y_ratio = max_h / crop_height;
            if x_ratio * crop_height < max_h {
                (max_w, (x_ratio * crop_height).ceil())
            } else {
                ((y_ratio * crop_width).ceil(), max_h)
            }
        }
    };

    (clamp_axis(w, max_width), clamp_axis(h, max_height))
}

/// Keep a computed size within its bound (float noise can push a ceil one
/// past it) and never below one pixel.
fn clamp_axis(value: f64, bound: u32) -> u32 {
    let value = value.max(1.0) as u32;
    if bound == 0 { value } else { value.min(bound) }
}

/// Resolve crop window and output size together.
pub fn resolve_geometry(
    source: (u32, u32),
    max_width: u32,
    max_height: u32,
    mode: &CropMode,
) -> Geometry {
    let crop = resolve_crop(source, max_width, max_height, mode);
    let (new_width, new_height) = resolve_target(crop.width, crop.height, max_width, max_height);
    Geometry {
        crop,
        new_width,
        new_height,
    }
}
