//! Pixel access functions
//!
//! Low-level functions for getting and setting individual RGB pixels.
//! The checked variants return `None` / an error for coordinates outside
//! the image; the `_unchecked` variants panic instead.

use super::{Pix, PixMut, SAMPLES_PER_PIXEL};
use crate::error::{Error, Result};

#[inline]
fn offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * SAMPLES_PER_PIXEL
}

#[inline]
fn read_rgb(data: &[u8], idx: usize) -> [u8; 3] {
    [data[idx], data[idx + 1], data[idx + 2]]
}

impl Pix {
    /// Get the RGB value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_rgb_unchecked(x, y))
    }

    /// Get the RGB value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the sample buffer.
    #[inline]
    pub fn get_rgb_unchecked(&self, x: u32, y: u32) -> [u8; 3] {
        read_rgb(self.data(), offset(self.width(), x, y))
    }
}

impl PixMut {
    /// Get the RGB value at (x, y).
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(read_rgb(self.data(), offset(self.width(), x, y)))
    }

    /// Set the RGB value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) -> Result<()> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        self.set_rgb_unchecked(x, y, rgb);
        Ok(())
    }

    /// Set the RGB value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the sample buffer.
    #[inline]
    pub fn set_rgb_unchecked(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = offset(self.width(), x, y);
        self.data_mut()[idx..idx + SAMPLES_PER_PIXEL].copy_from_slice(&rgb);
    }
}
