use super::ProbeRegion;
use image::GrayImage;

/// Fixed-size binarized bitmap used as the coordinate space for every probe
///
/// Every stored value is exactly [`CanonicalBitmap::OFF`] or
/// [`CanonicalBitmap::ON`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalBitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl CanonicalBitmap {
    /// Value of a lit (white) pixel
    pub const ON: u8 = 255;
    /// Value of an unlit (black) pixel
    pub const OFF: u8 = 0;

    /// Create an all-off bitmap with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Self::OFF; width * height],
        }
    }

    /// Wrap row-major pixel values.
    ///
    /// Returns `None` if the buffer length does not match the dimensions or
    /// any value is not 0 or 255.
    pub fn from_values(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        if data.iter().any(|&v| v != Self::ON && v != Self::OFF) {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap a buffer produced inside the crate that already holds only 0/255
    /// values and matches the dimensions.
    pub(crate) fn from_binary_parts(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        debug_assert!(data.iter().all(|&v| v == Self::ON || v == Self::OFF));
        Self {
            width,
            height,
            data,
        }
    }

    /// Get bitmap width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get bitmap height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get pixel value at (x, y), `None` outside the bitmap
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Whether the pixel at (x, y) is lit; out-of-range pixels are unlit
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(Self::ON)
    }

    /// Set every pixel of `region` that lies inside the bitmap
    pub fn fill_region(&mut self, region: &ProbeRegion, on: bool) {
        let Some((x0, y0, x1, y1)) = region.clip(self.width, self.height) else {
            return;
        };
        let value = if on { Self::ON } else { Self::OFF };
        for y in y0..y1 {
            let row = y * self.width;
            self.data[row + x0..row + x1].fill(value);
        }
    }

    /// Number of lit pixels
    pub fn lit_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == Self::ON).count()
    }

    /// Ratio of lit pixels to total pixels
    pub fn lit_ratio(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.lit_count() as f64 / self.data.len() as f64
    }

    /// Get raw row-major values
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copy into an 8-bit grayscale image (for dumps and fixtures)
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            image::Luma([self.data[y as usize * self.width + x as usize]])
        })
    }
}
