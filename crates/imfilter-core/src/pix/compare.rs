//! Image comparison operations
//!
//! - Pixel equality checks
//! - Pixel difference counting with per-sample maximum difference
//! - Mean absolute sample difference

use super::{Pix, SAMPLES_PER_PIXEL};
use crate::error::Result;

/// Result of counting pixel differences between two images
#[derive(Debug, Clone, PartialEq)]
pub struct PixelDiffResult {
    /// Number of pixels with at least one differing channel
    pub n_diff: u64,
    /// Fraction of pixels that differ (0.0 to 1.0)
    pub fract_diff: f64,
    /// Largest absolute difference of any single sample
    pub max_diff: u8,
    /// Mean absolute difference over all samples
    pub mean_abs_diff: f64,
}

impl Pix {
    /// Count the number of pixels that differ between two images.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// if the images have different sizes.
    pub fn count_pixel_diffs(&self, other: &Pix) -> Result<PixelDiffResult> {
        self.check_same_size(other)?;

        let mut n_diff = 0u64;
        let mut max_diff = 0u8;
        let mut abs_sum = 0u64;

        for (a, b) in self
            .data()
            .chunks_exact(SAMPLES_PER_PIXEL)
            .zip(other.data().chunks_exact(SAMPLES_PER_PIXEL))
        {
            if a != b {
                n_diff += 1;
            }
            for (&sa, &sb) in a.iter().zip(b) {
                let d = sa.abs_diff(sb);
                max_diff = max_diff.max(d);
                abs_sum += u64::from(d);
            }
        }

        let npix = u64::from(self.width()) * u64::from(self.height());
        Ok(PixelDiffResult {
            n_diff,
            fract_diff: n_diff as f64 / npix as f64,
            max_diff,
            mean_abs_diff: abs_sum as f64 / (npix as f64 * SAMPLES_PER_PIXEL as f64),
        })
    }

    /// Check if two images have the same size and identical samples.
    pub fn equals(&self, other: &Pix) -> bool {
        self.sizes_equal(other) && self.data() == other.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals() {
        let a = Pix::new_filled(3, 3, [5, 6, 7]).unwrap();
        let b = a.deep_clone();
        assert!(a.equals(&b));

        let c = Pix::new_filled(3, 3, [5, 6, 8]).unwrap();
        assert!(!a.equals(&c));

        let d = Pix::new_filled(9, 1, [5, 6, 7]).unwrap();
        assert!(!a.equals(&d));
    }

    #[test]
    fn test_count_pixel_diffs() {
        let a = Pix::new(2, 2).unwrap();
        let mut bm = a.to_mut();
        bm.set_rgb(1, 1, [0, 12, 3]).unwrap();
        let b: Pix = bm.into();

        let r = a.count_pixel_diffs(&b).unwrap();
        assert_eq!(r.n_diff, 1);
        assert!((r.fract_diff - 0.25).abs() < 1e-12);
        assert_eq!(r.max_diff, 12);
        assert!((r.mean_abs_diff - 15.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_count_pixel_diffs_size_mismatch() {
        let a = Pix::new(2, 2).unwrap();
        let b = Pix::new(2, 3).unwrap();
        assert!(a.count_pixel_diffs(&b).is_err());
    }
}
