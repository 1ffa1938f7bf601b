//! Segment pattern decoding
//!
//! This module turns sampled segment states into text:
//! - Seven-segment lookup table
//! - Pattern to digit mapping (blank and ambiguous slots kept apart)
//! - Weight assembly with the decimal point

/// Slot decoding and weight text assembly
pub mod assembler;
/// Pattern to digit mapping
pub mod segment;
/// Seven-segment digit encodings
pub mod tables;
