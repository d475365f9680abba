//! Post-resample sharpening heuristic.
//!
//! Strength comes from an empirically fitted quadratic over the final width,
//! normalized to a 750px-wide reference frame. Downscaled images get a 3×3
//! high-pass kernel whose center weight grows with that strength.
//!
//! The convolution divisor is the strength. The eight outer weights sum to
//! `-12`, so the divisor also equals the kernel's total weight and flat
//! regions keep their brightness. The constants must stay bit-for-bit
//! identical to keep output stable across versions.

/// Reference width the final size is normalized against.
const REFERENCE_WIDTH: f64 = 750.0;

const A: f64 = 52.0;
const B: f64 = -0.27810650887573124;
const C: f64 = 0.00047337278106508946;

/// Sharpening strength for a resize from `original_width` to `final_width`.
///
/// Rounded half away from zero and never negative.
pub fn sharpen_strength(original_width: f64, final_width: f64) -> f64 {
    let f = final_width * (REFERENCE_WIDTH / original_width);
    let result = A + B * f + C * f * f;
    result.round().max(0.0)
}

/// 3×3 convolution kernel with its divisor and offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpenKernel {
    pub matrix: [[f32; 3]; 3],
    pub divisor: f32,
    pub offset: f32,
}

impl SharpenKernel {
    /// Build the kernel for a given strength.
    ///
    /// Returns `None` when `strength <= 0`: the divisor would be zero, so the
    /// convolution is skipped.
    pub fn with_strength(strength: f64) -> Option<Self> {
        if strength <= 0.0 {
            return None;
        }
        let s = strength as f32;
        Some(Self {
            matrix: [
                [-1.0, -2.0, -1.0],
                [-2.0, s + 12.0, -2.0],
                [-1.0, -2.0, -1.0],
            ],
            divisor: s,
            offset: 0.0,
        })
    }

    /// Kernel for a resize from `original_width` to `final_width`.
    pub fn for_resize(original_width: f64, final_width: u32) -> Option<Self> {
        Self::with_strength(sharpen_strength(original_width, f64::from(final_width)))
    }

    pub fn strength(&self) -> f32 {
        self.divisor
    }
}
