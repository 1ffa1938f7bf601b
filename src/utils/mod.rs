//! Utility functions for image processing
//!
//! This module provides the pixel-level helpers used by canonicalization:
//! - Grayscale conversion (RGB to luminance)
//! - Binarization (fixed threshold, plus Otsu for calibration hints)

/// Fixed threshold and Otsu binarization
pub mod binarization;
/// RGB to luminance conversion
pub mod grayscale;
