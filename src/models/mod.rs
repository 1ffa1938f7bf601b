/// Canonical binarized bitmap
pub mod bitmap;
/// Probe rectangles
pub mod probe;
/// Segment patterns, per-slot results and the final reading
pub mod reading;

pub use bitmap::CanonicalBitmap;
pub use probe::ProbeRegion;
pub use reading::{
    AMBIGUOUS_MARKER, DigitResult, PIPELINE_CONFIDENCE, PatternParseError, ReadingOutput, Segment,
    SegmentPattern, WeightReading,
};
