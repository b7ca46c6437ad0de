//! Clipped square neighborhood around a target pixel

/// Inclusive pixel rectangle `[x0, x1] x [y0, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

/// Half-width of the window for spatial sigma `s`: `floor(3 s)`.
///
/// `s` must be finite and non-negative. Values beyond `u32::MAX`
/// saturate, which is harmless since the window is clipped anyway.
#[inline]
pub fn support(s: f64) -> u32 {
    (3.0 * s).floor() as u32
}

impl Window {
    /// Square of half-width `support` centered on `(x, y)`, clipped to a
    /// `width` x `height` image. `(x, y)` must lie inside the image.
    pub fn around(x: u32, y: u32, support: u32, width: u32, height: u32) -> Self {
        Window {
            x0: x.saturating_sub(support),
            x1: x.saturating_add(support).min(width - 1),
            y0: y.saturating_sub(support),
            y1: y.saturating_add(support).min(height - 1),
        }
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        u64::from(self.x1 - self.x0 + 1) * u64::from(self.y1 - self.y0 + 1)
    }

    /// Check whether `(x, y)` lies inside the window.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x0..=self.x1).contains(&x) && (self.y0..=self.y1).contains(&y)
    }

    /// Iterate covered coordinates, x increasing in the outer loop and
    /// y increasing in the inner loop.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.x0..=self.x1).flat_map(move |xs| (self.y0..=self.y1).map(move |ys| (xs, ys)))
    }
}
