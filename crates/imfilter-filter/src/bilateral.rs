//! Bilateral filtering of a single pixel
//!
//! Each output pixel is a weighted average of the pixels in a clipped
//! square window around it. The weight of a neighbor decays with its
//! squared distance (spatial term) and with the squared intensity of its
//! color difference from the target (brightness term):
//!
//! ```text
//! w = exp(-((dx^2 + dy^2) / (2 s^2)) - (intensity(I1 - I2)^2 / (2 b^2)))
//! ```
//!
//! A sigma of zero switches its term off instead of dividing by zero.
//! The window half-width is `floor(3 s)`, so `s = 0` leaves only the
//! target pixel in the window.
//!
//! # Example
//!
//! ```
//! use imfilter_core::Pix;
//! use imfilter_filter::bilateral_pixel;
//!
//! let pix = Pix::new_filled(4, 4, [255, 255, 255]).unwrap();
//! assert_eq!(bilateral_pixel(&pix, 0, 0, 1.0, 1.0).unwrap(), [255, 255, 255]);
//! ```

use crate::intensity::intensity;
use crate::params::check_sigma;
use crate::window::{Window, support};
use crate::{FilterError, FilterResult};
use imfilter_core::color::{MAX_SAMPLE, normalize_rgb};
use imfilter_core::{Error, Pix};

/// Added before flooring so results that are mathematically integers are
/// not truncated one level down by accumulated rounding error.
const QUANTIZE_EPSILON: f64 = 1e-9;

/// Precomputed per-run constants of the bilateral weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilateralKernel {
    spatial_sigma: f64,
    range_sigma: f64,
    support: u32,
    /// `2 s^2`, or 0 when the spatial term is off
    spatial_denom: f64,
    /// `2 b^2`, or 0 when the brightness term is off
    range_denom: f64,
}

impl BilateralKernel {
    /// Build the kernel for spatial sigma `s` and brightness sigma `b`.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameters`] if either sigma is negative or
    /// not finite.
    pub fn new(spatial_sigma: f64, range_sigma: f64) -> FilterResult<Self> {
        check_sigma("spatial sigma", spatial_sigma)?;
        check_sigma("brightness sigma", range_sigma)?;
        Ok(Self {
            spatial_sigma,
            range_sigma,
            support: support(spatial_sigma),
            spatial_denom: 2.0 * spatial_sigma * spatial_sigma,
            range_denom: 2.0 * range_sigma * range_sigma,
        })
    }

    pub fn spatial_sigma(&self) -> f64 {
        self.spatial_sigma
    }

    pub fn range_sigma(&self) -> f64 {
        self.range_sigma
    }

    /// Window half-width.
    pub fn support(&self) -> u32 {
        self.support
    }

    /// Window used for target `(x, y)` in a `width` x `height` image.
    pub fn window(&self, x: u32, y: u32, width: u32, height: u32) -> Window {
        Window::around(x, y, self.support, width, height)
    }

    /// Weight of a neighbor at offset `(dx, dy)` whose color differs from
    /// the target by `diff` (normalized units).
    #[inline]
    pub fn weight(&self, dx: f64, dy: f64, diff: &[f64; 3]) -> f64 {
        let d1 = if self.spatial_sigma > 0.0 {
            (dx * dx + dy * dy) / self.spatial_denom
        } else {
            0.0
        };
        let d2 = if self.range_sigma > 0.0 {
            let diff_i = intensity(diff);
            diff_i * diff_i / self.range_denom
        } else {
            0.0
        };
        (-d1 - d2).exp()
    }

    /// Compute the filtered color of pixel `(x, y)` of `pix`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `(x, y)` is outside the image, and
    /// [`FilterError::InvariantViolation`] if the weight sum is not positive.
    pub fn apply(&self, pix: &Pix, x: u32, y: u32) -> FilterResult<[u8; 3]> {
        let (width, height) = pix.dimensions();
        if x >= width || y >= height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width,
                height,
            }
            .into());
        }

        let i1 = normalize_rgb(pix.get_rgb_unchecked(x, y));
        let mut acc = [0.0f64; 3];
        let mut weight_sum = 0.0f64;

        for (xs, ys) in self.window(x, y, width, height).iter() {
            let i2 = normalize_rgb(pix.get_rgb_unchecked(xs, ys));
            let diff = [i1[0] - i2[0], i1[1] - i2[1], i1[2] - i2[2]];
            let w = self.weight(
                f64::from(xs) - f64::from(x),
                f64::from(ys) - f64::from(y),
                &diff,
            );
            for (a, v) in acc.iter_mut().zip(i2) {
                *a += w * v;
            }
            weight_sum += w;
        }

        quantize(&acc, weight_sum)
    }
}

/// Turn weighted normalized sums into 8-bit samples:
/// `floor(255 * acc / weight_sum)`.
fn quantize(acc: &[f64; 3], weight_sum: f64) -> FilterResult<[u8; 3]> {
    if !weight_sum.is_finite() || weight_sum <= 0.0 {
        return Err(FilterError::InvariantViolation(format!(
            "window weight sum is {}",
            weight_sum
        )));
    }
    let mut out = [0u8; 3];
    for (o, a) in out.iter_mut().zip(acc) {
        let v = (MAX_SAMPLE * a / weight_sum + QUANTIZE_EPSILON).floor();
        *o = v.clamp(0.0, MAX_SAMPLE) as u8;
    }
    Ok(out)
}

/// Bilateral-filter one pixel with spatial sigma `s` and brightness
/// sigma `b`.
///
/// Convenience wrapper around [`BilateralKernel`]; use the kernel directly
/// when filtering many pixels with the same sigmas.
pub fn bilateral_pixel(pix: &Pix, x: u32, y: u32, s: f64, b: f64) -> FilterResult<[u8; 3]> {
    BilateralKernel::new(s, b)?.apply(pix, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use imfilter_core::PixMut;

    fn outlier_image(size: u32, field: u8, outlier: u8) -> Pix {
        let mut pm: PixMut = Pix::new_filled(size, size, [field; 3]).unwrap().to_mut();
        let c = size / 2;
        pm.set_rgb(c, c, [outlier; 3]).unwrap();
        pm.into()
    }

    #[test]
    fn test_kernel_rejects_bad_sigmas() {
        assert!(BilateralKernel::new(-0.1, 1.0).is_err());
        assert!(BilateralKernel::new(1.0, f64::NAN).is_err());
        assert!(BilateralKernel::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_weight_terms() {
        let k = BilateralKernel::new(1.0, 0.5).unwrap();
        // Same color at the target: weight 1
        assert_eq!(k.weight(0.0, 0.0, &[0.0; 3]), 1.0);
        // Spatial term only: exp(-(1 + 1) / 2)
        assert_abs_diff_eq!(k.weight(1.0, 1.0, &[0.0; 3]), (-1.0f64).exp(), epsilon = 1e-12);
        // Brightness term only: diff intensity 1 -> exp(-1 / 0.5)
        assert_abs_diff_eq!(k.weight(0.0, 0.0, &[1.0; 3]), (-2.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_sigmas_switch_terms_off() {
        let k = BilateralKernel::new(0.0, 0.0).unwrap();
        assert_eq!(k.weight(5.0, 7.0, &[1.0, -1.0, 0.5]), 1.0);
        assert_eq!(k.support(), 0);
    }

    #[test]
    fn test_single_pixel_image_is_identity() {
        for rgb in [[0, 0, 0], [1, 2, 3], [17, 128, 254], [255, 255, 255]] {
            let pix = Pix::new_filled(1, 1, rgb).unwrap();
            for (s, b) in [(0.0, 0.0), (1.0, 1.0), (10.0, 0.01)] {
                assert_eq!(bilateral_pixel(&pix, 0, 0, s, b).unwrap(), rgb);
            }
        }
    }

    #[test]
    fn test_zero_sigmas_average_over_single_pixel_window() {
        // s = 0 -> support 0 -> the window holds only the target, so the
        // unweighted average degenerates to the pixel itself
        let pix = outlier_image(5, 40, 200);
        for y in 0..5 {
            for x in 0..5 {
                let expected = pix.get_rgb(x, y).unwrap();
                assert_eq!(bilateral_pixel(&pix, x, y, 0.0, 0.0).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_zero_brightness_sigma_is_gaussian_average() {
        // s = 0.5 -> support 1, weights 1 (center), e^-2 (edge), e^-4 (corner)
        let pix = outlier_image(3, 255, 0);
        let edge = (-2.0f64).exp();
        let corner = (-4.0f64).exp();
        let expected = (255.0 * (4.0 * edge + 4.0 * corner) / (1.0 + 4.0 * edge + 4.0 * corner))
            .floor() as i32;

        let out = bilateral_pixel(&pix, 1, 1, 0.5, 0.0).unwrap();
        for v in out {
            assert!((v as i32 - expected).abs() <= 1, "{} vs {}", v, expected);
        }
    }

    #[test]
    fn test_uniform_image_is_fixed_point() {
        for rgb in [[255, 255, 255], [0, 0, 0], [128, 64, 7]] {
            let pix = Pix::new_filled(6, 5, rgb).unwrap();
            for (s, b) in [(1.0, 1.0), (0.7, 0.0), (2.0, 0.05)] {
                for (x, y) in [(0, 0), (3, 2), (5, 4)] {
                    assert_eq!(bilateral_pixel(&pix, x, y, s, b).unwrap(), rgb);
                }
            }
        }
    }

    #[test]
    fn test_small_brightness_sigma_preserves_outlier() {
        let pix = outlier_image(7, 0, 255);
        // The outlier differs from every neighbor by intensity 1
        assert_eq!(bilateral_pixel(&pix, 3, 3, 1.0, 0.01).unwrap(), [255; 3]);
        assert_eq!(bilateral_pixel(&pix, 4, 3, 1.0, 0.01).unwrap(), [0; 3]);
    }

    #[test]
    fn test_outlier_influence_grows_with_brightness_sigma() {
        let pix = outlier_image(7, 0, 255);
        let mut last = 0u8;
        for b in [0.01, 0.1, 0.3, 1.0, 1e6] {
            let v = bilateral_pixel(&pix, 4, 3, 1.0, b).unwrap()[0];
            assert!(v >= last, "b = {}: {} < {}", b, v, last);
            last = v;
        }
        assert!(last > 0);
    }

    #[test]
    fn test_larger_spatial_sigma_widens_support() {
        let pix = outlier_image(13, 0, 255);
        // Distance 3 from the outlier: outside support 1, inside support 6
        assert_eq!(bilateral_pixel(&pix, 9, 6, 0.5, 1e6).unwrap(), [0; 3]);
        assert!(bilateral_pixel(&pix, 9, 6, 2.0, 1e6).unwrap()[0] > 0);
    }

    #[test]
    fn test_corner_window_is_clipped() {
        // Bright pixel in the far corner only reaches (0, 0) through a
        // clipped window; no out-of-bounds reads happen on the way
        let mut pm = Pix::new(3, 3).unwrap().to_mut();
        pm.set_rgb(2, 2, [255, 255, 255]).unwrap();
        let pix: Pix = pm.into();

        let k = BilateralKernel::new(5.0, 0.0).unwrap();
        let window = k.window(0, 0, 3, 3);
        assert_eq!(window.area(), 9);

        let d = (-8.0f64 / 50.0).exp();
        let mut total = 0.0;
        for (xs, ys) in window.iter() {
            total += (-((xs * xs + ys * ys) as f64) / 50.0).exp();
        }
        let expected = (255.0 * d / total).floor() as i32;
        let out = k.apply(&pix, 0, 0).unwrap();
        assert!((out[0] as i32 - expected).abs() <= 1);
    }

    #[test]
    fn test_out_of_bounds_target() {
        let pix = Pix::new(2, 2).unwrap();
        assert!(matches!(
            bilateral_pixel(&pix, 2, 0, 1.0, 1.0),
            Err(FilterError::Core(Error::IndexOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_quantize_rejects_zero_weight() {
        assert!(matches!(
            quantize(&[0.0; 3], 0.0),
            Err(FilterError::InvariantViolation(_))
        ));
        assert!(quantize(&[0.5; 3], f64::NAN).is_err());
    }

    #[test]
    fn test_quantize_floors() {
        assert_eq!(quantize(&[1.0, 0.5, 0.0], 1.0).unwrap(), [255, 127, 0]);
    }

    #[test]
    fn test_quantize_guard_only_absorbs_rounding_noise() {
        // 255 * 0.4999 = 127.47: plain floor
        assert_eq!(quantize(&[0.4999; 3], 1.0).unwrap(), [127; 3]);
        // 1e-6 below 128 is a real fraction and still rounds down
        let below = (128.0 - 1e-6) / 255.0;
        assert_eq!(quantize(&[below; 3], 1.0).unwrap(), [127; 3]);
        // 1e-12 below 128 is accumulation error and lands on 128
        let noisy = (128.0 - 1e-12) / 255.0;
        assert_eq!(quantize(&[noisy; 3], 1.0).unwrap(), [128; 3]);
    }
}
