//! Display localization and segment probing
//!
//! This module turns a photo into per-slot segment measurements:
//! - Region extraction (crop to the display rectangle)
//! - Canonicalization (resize, luminance, binarize)
//! - Digit slot and decimal-point probe placement
//! - Segment sampling (mean brightness per probe)

/// Resize, grayscale and binarize to the canonical bitmap
pub mod canonical;
/// Crop the source photo to the configured display rectangle
pub mod region;
/// Seven-segment probe placement and sampling
pub mod sampler;
/// Digit slot and decimal-point probe geometry
pub mod slots;
