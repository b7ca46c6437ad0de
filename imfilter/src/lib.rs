//! imfilter - Edge-preserving bilateral image smoothing
//!
//! # Overview
//!
//! - Image container with 8-bit RGB samples ([`Pix`], [`PixMut`])
//! - Image I/O (PNG, JPEG, binary PNM) in [`io`]
//! - Bilateral filtering, single pixel to repeated whole-image passes,
//!   in [`filter`]
//!
//! # Example
//!
//! ```
//! use imfilter::Pix;
//! use imfilter::filter::{FilterParams, bilateral_filter};
//!
//! let pix = Pix::new_filled(32, 32, [200, 100, 50]).unwrap();
//! let out = bilateral_filter(&pix, FilterParams::new(1.5, 0.1)).unwrap();
//! assert!(out.equals(&pix));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use imfilter_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use imfilter_filter as filter;
pub use imfilter_io as io;
