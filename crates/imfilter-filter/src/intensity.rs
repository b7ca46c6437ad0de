//! Luminance-like intensity of a color vector

use imfilter_core::color::{BLUE, GREEN, RED};

/// Channel weights applied by [`intensity`] (R, G, B). They sum to 1.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2125, 0.7154, 0.0721];

/// Weighted sum `0.2125 R + 0.7154 G + 0.0721 B`.
///
/// Accepts any real components, so it is also applied to the difference
/// of two normalized colors to get a signed brightness difference.
#[inline]
pub fn intensity(rgb: &[f64; 3]) -> f64 {
    LUMA_WEIGHTS[RED] * rgb[RED] + LUMA_WEIGHTS[GREEN] * rgb[GREEN] + LUMA_WEIGHTS[BLUE] * rgb[BLUE]
}
