use super::segment::decode_pattern;
use crate::config::DecoderConfig;
use crate::detector::sampler::{is_active, sample_decimal, sample_slot};
use crate::detector::slots::digit_slots;
use crate::models::{CanonicalBitmap, DigitResult, PIPELINE_CONFIDENCE, WeightReading};
use tracing::{trace, warn};

/// Concatenate slot results left to right, inserting `'.'` right after slot
/// `anchor_slot` when the decimal point is lit.
///
/// Blank slots contribute nothing; ambiguous slots contribute the placeholder
/// marker. The numeric range is not checked here.
pub fn assemble(digits: Vec<DigitResult>, decimal_point: bool, anchor_slot: usize) -> WeightReading {
    let mut text = String::with_capacity(digits.len() + 1);
    for (i, digit) in digits.iter().enumerate() {
        if let Some(c) = digit.as_text() {
            text.push(c);
        }
        if decimal_point && i == anchor_slot {
            text.push('.');
        }
    }

    WeightReading {
        text,
        confidence: PIPELINE_CONFIDENCE,
        digits,
        decimal_point,
    }
}

/// Decode every slot and the decimal point of a canonical bitmap.
///
/// Assumes `config` has been validated and `bitmap` has its canonical size.
pub(crate) fn read_bitmap(bitmap: &CanonicalBitmap, config: &DecoderConfig) -> WeightReading {
    let digits: Vec<DigitResult> = digit_slots(config)
        .iter()
        .enumerate()
        .map(|(i, &slot)| {
            let sample = sample_slot(bitmap, slot, config);
            let digit = decode_pattern(sample.pattern);
            trace!(slot = i, pattern = %sample.pattern, means = ?sample.means, "sampled slot");
            if let DigitResult::Ambiguous(pattern) = digit {
                warn!(slot = i, pattern = %pattern, "segment pattern matches no digit");
            }
            digit
        })
        .collect();

    let decimal_mean = sample_decimal(bitmap, config);
    let decimal_point = decimal_mean.is_some_and(|m| is_active(m, config.activation_threshold));
    trace!(mean = ?decimal_mean, lit = decimal_point, "sampled decimal point");

    assemble(digits, decimal_point, config.decimal.anchor_slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SegmentPattern;

    #[test]
    fn test_assemble_with_decimal() {
        let digits = vec![
            DigitResult::Digit('7'),
            DigitResult::Digit('2'),
            DigitResult::Digit('5'),
        ];
        let reading = assemble(digits, true, 1);
        assert_eq!(reading.text, "72.5");
        assert_eq!(reading.confidence, 100);
        assert!(reading.decimal_point);
    }

    #[test]
    fn test_assemble_without_decimal() {
        let digits = vec![
            DigitResult::Digit('1'),
            DigitResult::Digit('0'),
            DigitResult::Digit('4'),
        ];
        assert_eq!(assemble(digits, false, 1).text, "104");
    }

    #[test]
    fn test_assemble_gaps() {
        let noise = SegmentPattern::from_bits(0b000_0001).unwrap();
        let digits = vec![
            DigitResult::Blank,
            DigitResult::Ambiguous(noise),
            DigitResult::Digit('5'),
        ];
        let reading = assemble(digits, true, 1);
        assert_eq!(reading.text, "X.5");
        assert_eq!(reading.gap_count(), 2);
        // Confidence stays constant even with gaps
        assert_eq!(reading.confidence, 100);
    }

    #[test]
    fn test_read_blank_bitmap() {
        let config = DecoderConfig::default();
        let bitmap = CanonicalBitmap::new(600, 180);
        let reading = read_bitmap(&bitmap, &config);
        assert_eq!(reading.text, "");
        assert_eq!(reading.digits, vec![DigitResult::Blank; 3]);
        assert!(!reading.decimal_point);
    }
}
