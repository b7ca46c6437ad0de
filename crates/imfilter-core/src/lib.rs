//! imfilter core - Basic data structures for image filtering
//!
//! This crate provides the data structures shared by the other imfilter
//! crates:
//!
//! - [`Pix`] / [`PixMut`] - The RGB image container (immutable / mutable)
//! - [`ImageFormat`] - File formats understood by the image source and sink
//! - [`color`] - Sample normalization helpers

pub mod error;
pub mod pix;

pub use error::{Error, Result};
pub use pix::compare::PixelDiffResult;
pub use pix::{ImageFormat, Pix, PixMut, SAMPLES_PER_PIXEL};

/// Color channel indices and sample conversion helpers.
pub mod color {
    /// Red channel
    pub const RED: usize = 0;
    /// Green channel
    pub const GREEN: usize = 1;
    /// Blue channel
    pub const BLUE: usize = 2;

    /// Largest 8-bit sample value, as a float.
    pub const MAX_SAMPLE: f64 = 255.0;

    /// Map an 8-bit sample to [0, 1].
    #[inline]
    pub fn to_unit(sample: u8) -> f64 {
        f64::from(sample) / MAX_SAMPLE
    }

    /// Map an RGB triple to normalized [0, 1] components.
    #[inline]
    pub fn normalize_rgb(rgb: [u8; 3]) -> [f64; 3] {
        [to_unit(rgb[RED]), to_unit(rgb[GREEN]), to_unit(rgb[BLUE])]
    }

    /// Replicate a gray value into all three channels.
    #[inline]
    pub fn gray_to_rgb(gray: u8) -> [u8; 3] {
        [gray, gray, gray]
    }

}
