use crate::config::CropRect;
use thiserror::Error;

/// Failures that abort a whole decode
///
/// Per-digit read problems are not errors; they are reported in
/// [`crate::DigitResult`].
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Input bytes are not a decodable raster image
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Configured crop rectangle extends past the source image
    #[error("Crop rectangle {rect:?} does not fit inside {image_width}x{image_height} image")]
    OutOfBounds {
        /// Configured rectangle
        rect: CropRect,
        /// Source image width
        image_width: u32,
        /// Source image height
        image_height: u32,
    },

    /// Bitmap handed to the decoder is not the configured canonical size
    #[error("Bitmap is {width}x{height}, configuration expects {expected_width}x{expected_height}")]
    BitmapSize {
        /// Bitmap width
        width: usize,
        /// Bitmap height
        height: usize,
        /// Configured canonical width
        expected_width: u32,
        /// Configured canonical height
        expected_height: u32,
    },

    /// Configuration values are inconsistent
    #[error("Invalid decoder configuration: {0}")]
    InvalidConfig(String),

    /// Calibration file is not valid JSON for [`crate::DecoderConfig`]
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Calibration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, DecodeError>;
