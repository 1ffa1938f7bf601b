use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Placeholder written into the assembled text for an unreadable slot
pub const AMBIGUOUS_MARKER: char = 'X';

/// Confidence reported for every completed decode.
///
/// It signals that the pipeline ran to completion, not that the value is
/// plausible; see [`WeightReading::gap_count`] for a per-slot signal.
pub const PIPELINE_CONFIDENCE: u8 = 100;

/// One stroke of a seven-segment glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Top horizontal
    A,
    /// Upper-right vertical
    B,
    /// Lower-right vertical
    C,
    /// Bottom horizontal
    D,
    /// Lower-left vertical
    E,
    /// Upper-left vertical
    F,
    /// Middle horizontal
    G,
}

impl Segment {
    /// All segments in pattern order
    pub const ALL: [Segment; 7] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
    ];

    /// Position in pattern order (A = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    fn mask(self) -> u8 {
        1 << (6 - self.index())
    }
}

/// On/off state of the seven segments of one digit slot, in order A..G
///
/// Renders as exactly seven `'0'`/`'1'` characters. The all-off pattern means
/// the slot shows nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentPattern(u8);

impl SegmentPattern {
    /// Pattern with every segment off
    pub const BLANK: SegmentPattern = SegmentPattern(0);

    /// Build from raw bits, segment A in bit 6 down to G in bit 0.
    ///
    /// Returns `None` if any bit above bit 6 is set.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & 0x80 != 0 {
            return None;
        }
        Some(Self(bits))
    }

    /// Build from per-segment states in order A..G
    pub fn from_states(states: [bool; 7]) -> Self {
        let bits = Segment::ALL
            .iter()
            .zip(states)
            .filter(|(_, on)| *on)
            .fold(0u8, |acc, (seg, _)| acc | seg.mask());
        Self(bits)
    }

    /// Raw bits, segment A in bit 6
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether `segment` is lit
    pub fn is_on(self, segment: Segment) -> bool {
        self.0 & segment.mask() != 0
    }

    /// Whether every segment is off
    pub fn is_blank(self) -> bool {
        self.0 == 0
    }

    /// Lit segments in order A..G
    pub fn lit_segments(self) -> impl Iterator<Item = Segment> {
        Segment::ALL.into_iter().filter(move |s| self.is_on(*s))
    }
}

impl fmt::Display for SegmentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in Segment::ALL {
            f.write_str(if self.is_on(seg) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Error parsing a [`SegmentPattern`] from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternParseError {
    /// Input was not exactly seven characters
    #[error("segment pattern must have 7 characters, got {0}")]
    Length(usize),
    /// Input contained something other than '0' or '1'
    #[error("invalid segment character {0:?}")]
    Char(char),
}

impl FromStr for SegmentPattern {
    type Err = PatternParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.chars().count();
        if count != 7 {
            return Err(PatternParseError::Length(count));
        }
        let mut states = [false; 7];
        for (state, c) in states.iter_mut().zip(s.chars()) {
            *state = match c {
                '0' => false,
                '1' => true,
                other => return Err(PatternParseError::Char(other)),
            };
        }
        Ok(Self::from_states(states))
    }
}

/// Decode outcome for one digit slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitResult {
    /// A recognized digit `'0'..='9'`
    Digit(char),
    /// Every segment off
    Blank,
    /// Lit segments that match no known digit
    Ambiguous(SegmentPattern),
}

impl DigitResult {
    /// Text this slot contributes to the assembled reading
    pub fn as_text(&self) -> Option<char> {
        match self {
            DigitResult::Digit(c) => Some(*c),
            DigitResult::Blank => None,
            DigitResult::Ambiguous(_) => Some(AMBIGUOUS_MARKER),
        }
    }

    /// Whether the slot decoded to a digit
    pub fn is_digit(&self) -> bool {
        matches!(self, DigitResult::Digit(_))
    }
}

/// Final output of one decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightReading {
    /// Assembled weight text, e.g. `"72.5"`
    pub text: String,
    /// Constant [`PIPELINE_CONFIDENCE`]
    pub confidence: u8,
    /// Per-slot results, left to right
    pub digits: Vec<DigitResult>,
    /// Whether the decimal-point probe was lit
    pub decimal_point: bool,
}

impl WeightReading {
    /// Number of slots that did not decode to a digit (blank or ambiguous)
    pub fn gap_count(&self) -> usize {
        self.digits.iter().filter(|d| !d.is_digit()).count()
    }

    /// Number of slots with lit segments that matched no digit
    pub fn ambiguous_count(&self) -> usize {
        self.digits
            .iter()
            .filter(|d| matches!(d, DigitResult::Ambiguous(_)))
            .count()
    }

    /// Whether every slot decoded to a digit
    pub fn is_complete(&self) -> bool {
        self.gap_count() == 0
    }

    /// Numeric value of the text, if it contains no placeholder and parses
    pub fn value(&self) -> Option<f64> {
        if self.ambiguous_count() > 0 || self.text.is_empty() {
            return None;
        }
        self.text.parse::<f64>().ok()
    }

    /// Whether the numeric value lies within `[min, max]`
    pub fn within(&self, min: f64, max: f64) -> bool {
        self.value().is_some_and(|v| (min..=max).contains(&v))
    }

    /// External `{ text, confidence }` view
    pub fn output(&self) -> ReadingOutput {
        ReadingOutput {
            text: self.text.clone(),
            confidence: self.confidence,
        }
    }
}

/// Serialized result handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingOutput {
    /// Assembled weight text
    pub text: String,
    /// Pipeline confidence
    pub confidence: u8,
}
