//! Calibration values for one scale model and camera setup
//!
//! Every geometric constant the pipeline uses lives in [`DecoderConfig`]. The
//! defaults match a three-digit display (`NN.N`) photographed so that the
//! display fills the configured crop rectangle. Calibration files are plain
//! JSON produced by `scaletool dump-config` and edited by hand.

use crate::error::{DecodeError, Result};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Environment variable overriding [`DecoderConfig::binarize_threshold`]
pub const ENV_BINARIZE_THRESHOLD: &str = "SCALE_BINARIZE_THRESHOLD";
/// Environment variable overriding [`DecoderConfig::activation_threshold`]
pub const ENV_ACTIVATION_THRESHOLD: &str = "SCALE_ACTIVATION_THRESHOLD";

/// Largest canonical width or height accepted by [`DecoderConfig::validate`]
pub const MAX_CANONICAL_SIDE: u32 = 4096;

/// Rectangle in source-image pixels expected to contain the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge
    pub left: u32,
    /// Top edge
    pub top: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Size of the canonical bitmap all probe geometry is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Horizontal extent of one digit position in canonical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitSlot {
    /// Left edge
    pub x: u32,
    /// Width in pixels
    pub width: u32,
}

/// Nominal segment position as fractions of slot width and canonical height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentCenter {
    /// Horizontal center, 0.0 = slot left edge, 1.0 = slot right edge
    pub cx: f32,
    /// Vertical center, 0.0 = top, 1.0 = bottom
    pub cy: f32,
}

/// Probe placement for the seven segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentGeometry {
    /// Centers in order A..G
    pub centers: [SegmentCenter; 7],
    /// Probe width as a fraction of slot width
    pub probe_width: f32,
    /// Probe height as a fraction of canonical height
    pub probe_height: f32,
}

impl Default for SegmentGeometry {
    fn default() -> Self {
        let c = |cx, cy| SegmentCenter { cx, cy };
        Self {
            centers: [
                c(0.5, 0.1), // A
                c(0.85, 0.3), // B
                c(0.85, 0.7), // C
                c(0.5, 0.9), // D
                c(0.15, 0.7), // E
                c(0.15, 0.3), // F
                c(0.5, 0.5), // G
            ],
            probe_width: 0.2,
            probe_height: 0.1,
        }
    }
}

/// Decimal-point probe anchored to the right edge of one digit slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecimalProbe {
    /// Slot after which the decimal point is printed
    pub anchor_slot: usize,
    /// Horizontal offset of the probe center from the anchor slot's right edge
    pub offset_x: i32,
    /// Vertical center as a fraction of canonical height
    pub center_y: f32,
    /// Probe width in pixels
    pub width: u32,
    /// Probe height in pixels
    pub height: u32,
}

impl Default for DecimalProbe {
    fn default() -> Self {
        Self {
            anchor_slot: 1,
            offset_x: 0,
            center_y: 0.9,
            width: 16,
            height: 16,
        }
    }
}

/// Resampling filter used when scaling the crop to canonical size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resample {
    /// Nearest neighbor
    Nearest,
    /// Linear (triangle) filter
    #[default]
    Triangle,
    /// Cubic filter
    CatmullRom,
    /// Gaussian filter
    Gaussian,
    /// Lanczos with window 3
    Lanczos3,
}

impl Resample {
    /// Matching `image` filter
    pub fn filter(self) -> FilterType {
        match self {
            Resample::Nearest => FilterType::Nearest,
            Resample::Triangle => FilterType::Triangle,
            Resample::CatmullRom => FilterType::CatmullRom,
            Resample::Gaussian => FilterType::Gaussian,
            Resample::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Complete, immutable decoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Display area in source-image pixels
    pub crop: CropRect,
    /// Canonical bitmap size
    pub canonical: CanonicalSize,
    /// Luminance at or above this value becomes a lit pixel
    pub binarize_threshold: u8,
    /// A probe is lit when its mean brightness ratio is strictly above this
    pub activation_threshold: f64,
    /// Digit positions, left to right
    pub slots: Vec<DigitSlot>,
    /// Per-segment probe geometry
    #[serde(default)]
    pub segments: SegmentGeometry,
    /// Decimal-point probe
    #[serde(default)]
    pub decimal: DecimalProbe,
    /// Resampling filter for canonicalization
    #[serde(default)]
    pub resample: Resample,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            crop: CropRect {
                left: 100,
                top: 150,
                width: 400,
                height: 120,
            },
            canonical: CanonicalSize {
                width: 600,
                height: 180,
            },
            binarize_threshold: 128,
            activation_threshold: 0.75,
            slots: vec![
                DigitSlot { x: 0, width: 200 },
                DigitSlot { x: 200, width: 200 },
                DigitSlot { x: 400, width: 200 },
            ],
            segments: SegmentGeometry::default(),
            decimal: DecimalProbe::default(),
            resample: Resample::default(),
        }
    }
}

impl DecoderConfig {
    /// Parse a JSON calibration and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DecoderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON calibration file and validate it
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply `SCALE_BINARIZE_THRESHOLD` / `SCALE_ACTIVATION_THRESHOLD` overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply threshold overrides from `lookup`; unparsable values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override::<u8, _>(&lookup, ENV_BINARIZE_THRESHOLD) {
            self.binarize_threshold = v;
        }
        if let Some(v) = parse_override::<f64, _>(&lookup, ENV_ACTIVATION_THRESHOLD) {
            self.activation_threshold = v;
        }
        self
    }

    /// Check internal consistency before any pixel work
    pub fn validate(&self) -> Result<()> {
        if self.crop.width == 0 || self.crop.height == 0 {
            return Err(invalid("crop rectangle has zero area"));
        }
        if self.canonical.width == 0 || self.canonical.height == 0 {
            return Err(invalid("canonical size has zero area"));
        }
        if self.canonical.width > MAX_CANONICAL_SIDE || self.canonical.height > MAX_CANONICAL_SIDE {
            return Err(invalid(format!(
                "canonical size {}x{} exceeds {} pixels per side",
                self.canonical.width, self.canonical.height, MAX_CANONICAL_SIDE
            )));
        }
        if !(0.0..1.0).contains(&self.activation_threshold) {
            return Err(invalid(format!(
                "activation threshold {} outside [0, 1)",
                self.activation_threshold
            )));
        }
        if self.slots.is_empty() {
            return Err(invalid("no digit slots configured"));
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.width == 0 {
                return Err(invalid(format!("digit slot {} has zero width", i)));
            }
            if slot.x as u64 + slot.width as u64 > self.canonical.width as u64 {
                return Err(invalid(format!(
                    "digit slot {} ends at {} past canonical width {}",
                    i,
                    slot.x as u64 + slot.width as u64,
                    self.canonical.width
                )));
            }
        }
        if self.decimal.anchor_slot >= self.slots.len() {
            return Err(invalid(format!(
                "decimal anchor slot {} out of range for {} slots",
                self.decimal.anchor_slot,
                self.slots.len()
            )));
        }
        let seg = &self.segments;
        if seg.probe_width <= 0.0 || seg.probe_height <= 0.0 {
            return Err(invalid("segment probe size must be positive"));
        }
        if self.decimal.width == 0 || self.decimal.height == 0 {
            return Err(invalid("decimal probe has zero area"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> DecodeError {
    DecodeError::InvalidConfig(msg.into())
}

fn parse_override<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DecoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.slots.len(), 3);
        assert_eq!(config.activation_threshold, 0.75);
    }

    #[test]
    fn test_json_round_trip() {
        let config = DecoderConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"resample\": \"triangle\""));
        let parsed = DecoderConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_defaults_optional_sections() {
        let json = r#"{
            "crop": {"left": 0, "top": 0, "width": 300, "height": 90},
            "canonical": {"width": 300, "height": 90},
            "binarize_threshold": 100,
            "activation_threshold": 0.6,
            "slots": [{"x": 0, "width": 150}, {"x": 150, "width": 150}],
            "decimal": {"anchor_slot": 0, "offset_x": 2, "center_y": 0.9, "width": 8, "height": 8}
        }"#;
        let config = DecoderConfig::from_json_str(json).unwrap();
        assert_eq!(config.slots.len(), 2);
        assert_eq!(config.segments, SegmentGeometry::default());
        assert_eq!(config.resample, Resample::Triangle);
        assert_eq!(config.decimal.offset_x, 2);
    }

    #[test]
    fn test_invalid_json() {
        let err = DecoderConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DecodeError::ConfigParse(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DecoderConfig::default();
        config.activation_threshold = 1.0;
        assert!(matches!(config.validate(), Err(DecodeError::InvalidConfig(_))));

        let mut config = DecoderConfig::default();
        config.slots.clear();
        assert!(matches!(config.validate(), Err(DecodeError::InvalidConfig(_))));

        let mut config = DecoderConfig::default();
        config.slots[2].width = 250;
        assert!(matches!(config.validate(), Err(DecodeError::InvalidConfig(_))));

        let mut config = DecoderConfig::default();
        config.decimal.anchor_slot = 3;
        assert!(matches!(config.validate(), Err(DecodeError::InvalidConfig(_))));

        let mut config = DecoderConfig::default();
        config.crop.width = 0;
        assert!(matches!(config.validate(), Err(DecodeError::InvalidConfig(_))));

        let mut config = DecoderConfig::default();
        config.canonical.width = 100_000;
        config.canonical.height = 100_000;
        assert!(matches!(config.validate(), Err(DecodeError::InvalidConfig(_))));

        let mut config = DecoderConfig::default();
        config.canonical.height = MAX_CANONICAL_SIDE + 1;
        assert!(matches!(config.validate(), Err(DecodeError::InvalidConfig(_))));

        let mut config = DecoderConfig::default();
        config.canonical.width = MAX_CANONICAL_SIDE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = DecoderConfig::default().with_overrides(|name| match name {
            ENV_BINARIZE_THRESHOLD => Some(" 90 ".to_string()),
            ENV_ACTIVATION_THRESHOLD => Some("0.5".to_string()),
            _ => None,
        });
        assert_eq!(config.binarize_threshold, 90);
        assert_eq!(config.activation_threshold, 0.5);
    }

    #[test]
    fn test_overrides_ignore_garbage() {
        let config = DecoderConfig::default().with_overrides(|name| match name {
            ENV_BINARIZE_THRESHOLD => Some("300".to_string()),
            ENV_ACTIVATION_THRESHOLD => Some("high".to_string()),
            _ => None,
        });
        assert_eq!(config.binarize_threshold, 128);
        assert_eq!(config.activation_threshold, 0.75);
    }

    #[test]
    fn test_resample_filter() {
        assert_eq!(Resample::Nearest.filter(), FilterType::Nearest);
        assert_eq!(Resample::default().filter(), FilterType::Triangle);
    }
}
