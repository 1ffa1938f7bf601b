// Seven-segment encodings, segment A in bit 6 down to G in bit 0.
// Index: digit value
pub(crate) const DIGIT_SEGMENTS: [u8; 10] = [
    0b111_1110, // 0: A B C D E F
    0b011_0000, // 1: B C
    0b110_1101, // 2: A B D E G
    0b111_1001, // 3: A B C D G
    0b011_0011, // 4: B C F G
    0b101_1011, // 5: A C D F G
    0b101_1111, // 6: A C D E F G
    0b111_0000, // 7: A B C
    0b111_1111, // 8: all
    0b111_1011, // 9: A B C D F G
];

/// Digit character for a 7-bit segment encoding, if it is one of the ten
pub fn digit_for_bits(bits: u8) -> Option<char> {
    DIGIT_SEGMENTS
        .iter()
        .position(|&b| b == bits)
        .and_then(|d| char::from_digit(d as u32, 10))
}

/// Segment encoding of `digit` (`'0'..='9'`)
pub fn bits_for_digit(digit: char) -> Option<u8> {
    let d = digit.to_digit(10)?;
    DIGIT_SEGMENTS.get(d as usize).copied()
}
