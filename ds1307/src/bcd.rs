//! Packed binary-coded decimal helpers
//!
//! Both functions are total over `u8` and do no range checking. Callers that
//! encode must keep the value at or below 99, larger values wrap the tens
//! nibble.

/// Decode a packed BCD byte: tens digit in the high nibble, ones in the low.
pub const fn decode(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Encode a decimal value (0..=99) as packed BCD.
pub const fn encode(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_values() {
        assert_eq!(decode(0x00), 0);
        assert_eq!(decode(0x09), 9);
        assert_eq!(decode(0x10), 10);
        assert_eq!(decode(0x59), 59);
        assert_eq!(decode(0x99), 99);
    }

    #[test]
    fn encodes_known_values() {
        assert_eq!(encode(0), 0x00);
        assert_eq!(encode(7), 0x07);
        assert_eq!(encode(23), 0x23);
        assert_eq!(encode(99), 0x99);
    }

    #[test]
    fn decode_inverts_encode_for_two_digits() {
        for d in 0..=99u8 {
            assert_eq!(decode(encode(d)), d);
        }
    }

    #[test]
    fn encode_inverts_decode_for_valid_nibbles() {
        for tens in 0..=9u8 {
            for ones in 0..=9u8 {
                let b = (tens << 4) | ones;
                assert_eq!(encode(decode(b)), b);
            }
        }
    }

    #[test]
    fn large_values_wrap_tens_nibble() {
        // 123 -> tens 12 does not fit a nibble; the overflow is shifted out.
        assert_eq!(encode(123), (12u8 << 4) | 3);
    }
}
