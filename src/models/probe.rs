use serde::{Deserialize, Serialize};

/// Rectangle in canonical-bitmap coordinates
///
/// The origin may be negative and the extent may run past the bitmap; only the
/// part that intersects the bitmap is ever sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRegion {
    /// Left edge (inclusive)
    pub x: i32,
    /// Top edge (inclusive)
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ProbeRegion {
    /// Create a probe from its top-left corner and size
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a probe of `width` x `height` centered on (`cx`, `cy`)
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        let width = width.round().max(1.0);
        let height = height.round().max(1.0);
        Self {
            x: (cx - width / 2.0).round() as i32,
            y: (cy - height / 2.0).round() as i32,
            width: width as u32,
            height: height as u32,
        }
    }

    /// Number of pixels covered, ignoring bitmap bounds
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Grow the rectangle by `margin` pixels on every side
    pub fn inflate(&self, margin: u32) -> Self {
        Self {
            x: self.x - margin as i32,
            y: self.y - margin as i32,
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }

    /// Intersect with a `width` x `height` bitmap.
    ///
    /// Returns half-open pixel ranges `(x0, y0, x1, y1)`, or `None` when no
    /// pixel of the probe lies inside the bitmap.
    pub fn clip(&self, width: usize, height: usize) -> Option<(usize, usize, usize, usize)> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = (self.x as i64 + self.width as i64).min(width as i64);
        let y1 = (self.y as i64 + self.height as i64).min(height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}
