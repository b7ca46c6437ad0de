//! imfilter-filter - Edge-preserving bilateral smoothing
//!
//! Each output pixel is a weighted average of its clipped square
//! neighborhood, with weights that fall off with spatial distance
//! (sigma `s`) and with brightness difference (sigma `b`). Small `b`
//! keeps edges sharp; large `b` approaches a plain Gaussian blur.
//!
//! # Components
//!
//! - [`intensity()`]: weighted channel sum used for brightness differences
//! - [`bilateral_pixel`] / [`BilateralKernel`]: filter a single pixel
//! - [`bilateral_pass`]: filter a whole image once, serially or on rayon
//! - [`bilateral_filter`] / [`bilateral_filter_with`]: repeated passes with
//!   access to intermediate results
//!
//! # Example
//!
//! ```
//! use imfilter_core::Pix;
//! use imfilter_filter::{FilterParams, bilateral_filter};
//!
//! let pix = Pix::new_filled(16, 16, [40, 90, 200]).unwrap();
//! let params = FilterParams::new(2.0, 0.1).with_reps(2).with_workers(0);
//! let out = bilateral_filter(&pix, params).unwrap();
//! assert_eq!(out.dimensions(), (16, 16));
//! ```

pub mod bilateral;
pub mod driver;
mod error;
pub mod intensity;
pub mod params;
pub mod window;

pub use bilateral::{BilateralKernel, bilateral_pixel};
pub use driver::{Executor, bilateral_filter, bilateral_filter_with, bilateral_pass};
pub use error::{FilterError, FilterResult};
pub use intensity::{LUMA_WEIGHTS, intensity};
pub use params::FilterParams;
pub use window::{Window, support};
