use crate::foundation::core::{Point, Size};
use crate::foundation::error::{SnapshotError, SnapshotResult};

/// Device pixel grid used to snap layout values so edges land on whole pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelGrid {
    scale: f64,
}

impl PixelGrid {
    /// Grid for `scale` device pixels per point.
    pub fn new(scale: f64) -> SnapshotResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SnapshotError::validation("pixel scale must be finite and > 0"));
        }
        Ok(Self { scale })
    }

    /// Device pixels per point.
    pub fn scale(self) -> f64 {
        self.scale
    }

    /// Smallest grid value `>= v`.
    pub fn ceil(self, v: f64) -> f64 {
        (v * self.scale - EPSILON).ceil() / self.scale
    }

    /// Largest grid value `<= v`.
    pub fn floor(self, v: f64) -> f64 {
        (v * self.scale + EPSILON).floor() / self.scale
    }

    /// Size rounded outward on both axes.
    pub fn ceil_size(self, size: Size) -> Size {
        Size::new(self.ceil(size.width), self.ceil(size.height))
    }

    /// Point rounded down on both axes.
    pub fn floor_point(self, p: Point) -> Point {
        Point::new(self.floor(p.x), self.floor(p.y))
    }

    /// Number of whole device pixels needed to cover `points`.
    pub fn pixels(self, points: f64) -> u32 {
        (points * self.scale - EPSILON).ceil().max(0.0) as u32
    }
}

// Absorbs float noise from `points * scale` so exact grid values stay put.
const EPSILON: f64 = 1e-9;

#[cfg(test)]
#[path = "../../tests/unit/foundation/pixel.rs"]
mod tests;
