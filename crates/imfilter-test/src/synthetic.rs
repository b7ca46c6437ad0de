//! Synthetic test images
//!
//! Small deterministic images used in place of image files on disk.

use crate::TestResult;
use imfilter_core::Pix;

/// Uniform image with every pixel set to `rgb`.
pub fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> TestResult<Pix> {
    Ok(Pix::new_filled(width, height, rgb)?)
}

/// Uniform field with a single different pixel at `(x, y)`.
pub fn with_outlier(
    width: u32,
    height: u32,
    field: [u8; 3],
    outlier: [u8; 3],
    x: u32,
    y: u32,
) -> TestResult<Pix> {
    let mut pm = Pix::new_filled(width, height, field)?.to_mut();
    pm.set_rgb(x, y, outlier)?;
    Ok(pm.into())
}

/// Vertical step edge: columns `< edge_x` are `left`, the rest `right`.
pub fn step_edge(
    width: u32,
    height: u32,
    edge_x: u32,
    left: [u8; 3],
    right: [u8; 3],
) -> TestResult<Pix> {
    let mut pm = Pix::new(width, height)?.to_mut();
    for y in 0..height {
        for x in 0..width {
            let rgb = if x < edge_x { left } else { right };
            pm.set_rgb_unchecked(x, y, rgb);
        }
    }
    Ok(pm.into())
}

/// High-contrast checkerboard with square cells of side `cell`.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> TestResult<Pix> {
    let cell = cell.max(1);
    let mut pm = Pix::new(width, height)?.to_mut();
    for y in 0..height {
        for x in 0..width {
            let val = if ((x / cell) + (y / cell)) & 1 == 0 {
                32
            } else {
                220
            };
            pm.set_rgb_unchecked(x, y, [val, val, val]);
        }
    }
    Ok(pm.into())
}

/// Smooth color ramp: red grows with x, green with y, blue is constant.
pub fn ramp(width: u32, height: u32) -> TestResult<Pix> {
    let mut pm = Pix::new(width, height)?.to_mut();
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(2).saturating_sub(1).max(1)).min(255) as u8;
            let g = (y * 255 / height.max(2).saturating_sub(1).max(1)).min(255) as u8;
            pm.set_rgb_unchecked(x, y, [r, g, 128]);
        }
    }
    Ok(pm.into())
}

/// Build an image from explicit per-pixel colors, rows top to bottom.
pub fn from_rows(rows: &[&[[u8; 3]]]) -> TestResult<Pix> {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for row in rows {
        for rgb in row.iter() {
            data.extend_from_slice(rgb);
        }
    }
    Ok(Pix::from_raw(width, height, data)?)
}
