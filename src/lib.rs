//! scale_ocr - weight readings from seven-segment scale photos
//!
//! Decodes the number shown on a digital scale's seven-segment display by
//! sampling fixed probe rectangles, without any external OCR service.
//!
//! Pipeline: crop the display area, resize it to a canonical bitmap,
//! binarize, probe the seven segments of every digit slot plus the decimal
//! point, then map each segment pattern to a digit and assemble the text.
//!
//! ```
//! use scale_ocr::{DecoderConfig, decode_bitmap};
//! use scale_ocr::tools::render_reading;
//!
//! let config = DecoderConfig::default();
//! let bitmap = render_reading(&config, "72.5").unwrap();
//! let reading = decode_bitmap(&bitmap, &config).unwrap();
//! assert_eq!(reading.text, "72.5");
//! assert_eq!(reading.confidence, 100);
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Calibration values (crop, canonical size, thresholds, probe geometry)
pub mod config;
/// Segment pattern decoding and weight assembly
pub mod decoder;
/// Cropping, canonicalization and segment probing
pub mod detector;
/// Error types
pub mod error;
/// `tracing` subscriber setup for binaries
pub mod logger;
/// Core data structures (CanonicalBitmap, ProbeRegion, WeightReading, etc.)
pub mod models;
/// Top-level decode entry points
pub mod pipeline;
/// Fixture rendering, dataset and statistics helpers
pub mod tools;
/// Utility functions (grayscale, binarization)
pub mod utils;

pub use config::{
    CanonicalSize, CropRect, DecimalProbe, DecoderConfig, DigitSlot, Resample, SegmentCenter,
    SegmentGeometry,
};
pub use error::{DecodeError, Result};
pub use models::{
    CanonicalBitmap, DigitResult, ProbeRegion, ReadingOutput, Segment, SegmentPattern,
    WeightReading,
};
pub use pipeline::{WeightReader, decode, decode_batch, decode_bitmap, decode_image};
