use super::tables::{bits_for_digit, digit_for_bits};
use crate::models::{DigitResult, SegmentPattern};

/// Map a slot's segment pattern to a digit.
///
/// All-off is [`DigitResult::Blank`]; any other pattern outside the ten digit
/// encodings is [`DigitResult::Ambiguous`].
pub fn decode_pattern(pattern: SegmentPattern) -> DigitResult {
    if pattern.is_blank() {
        return DigitResult::Blank;
    }
    match digit_for_bits(pattern.bits()) {
        Some(c) => DigitResult::Digit(c),
        None => DigitResult::Ambiguous(pattern),
    }
}

/// Segment pattern that displays `digit`
pub fn pattern_for_digit(digit: char) -> Option<SegmentPattern> {
    bits_for_digit(digit).and_then(SegmentPattern::from_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_patterns() {
        let cases = [
            ("1111110", '0'),
            ("0110000", '1'),
            ("1101101", '2'),
            ("1111001", '3'),
            ("0110011", '4'),
            ("1011011", '5'),
            ("1011111", '6'),
            ("1110000", '7'),
            ("1111111", '8'),
            ("1111011", '9'),
        ];
        for (text, digit) in cases {
            let pattern: SegmentPattern = text.parse().unwrap();
            assert_eq!(decode_pattern(pattern), DigitResult::Digit(digit), "{}", text);
        }
    }

    #[test]
    fn test_blank_is_not_zero() {
        assert_eq!(decode_pattern(SegmentPattern::BLANK), DigitResult::Blank);
    }

    #[test]
    fn test_unknown_pattern_is_ambiguous() {
        // Only the middle bar
        let pattern: SegmentPattern = "0000001".parse().unwrap();
        assert_eq!(decode_pattern(pattern), DigitResult::Ambiguous(pattern));

        // 7 drawn with the upper-left bar is not in the table
        let pattern: SegmentPattern = "1110010".parse().unwrap();
        assert_eq!(decode_pattern(pattern), DigitResult::Ambiguous(pattern));
    }

    #[test]
    fn test_pattern_for_digit() {
        assert_eq!(pattern_for_digit('8').unwrap().to_string(), "1111111");
        assert_eq!(pattern_for_digit('.'), None);
    }
}
