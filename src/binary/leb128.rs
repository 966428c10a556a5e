//! ULEB128/SLEB128 decoding parameterised by target bit width.
//!
//! Encodings may use up to `ceil(bits/7)` bytes. A terminal group whose value
//! does not fit the target width is rejected at the offending byte, as is a
//! continuation bit on the last permitted byte. Non-minimal encodings are
//! accepted as long as the value fits.

use super::{cursor::Cursor, DecodeError, Result};

/// Decode an unsigned LEB128 value constrained to `bits` (1..=64).
pub fn read_unsigned(cur: &mut Cursor, bits: u32) -> Result<u64> {
    debug_assert!((1..=64).contains(&bits));
    let max_bytes = (bits + 6) / 7;
    let mut result: u128 = 0;
    let mut shift: u32 = 0;
    for i in 0..max_bytes {
        let offset = cur.offset();
        let byte = cur.read_u8()?;
        result |= ((byte & 0x7f) as u128) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            if result >> bits != 0 {
                return Err(DecodeError::Unexpected {
                    found: byte,
                    expected: "LEB128 group within the target bit width",
                    offset,
                });
            }
            return Ok(result as u64);
        }
        if i + 1 == max_bytes {
            return Err(DecodeError::Unexpected {
                found: byte,
                expected: "terminal LEB128 byte",
                offset,
            });
        }
    }
    unreachable!("loop exits via terminal byte or error")
}

/// Decode a signed LEB128 value constrained to `bits` (1..=64). The high bit
/// of the terminal 7-bit group sign-extends the result.
pub fn read_signed(cur: &mut Cursor, bits: u32) -> Result<i64> {
    debug_assert!((1..=64).contains(&bits));
    let max_bytes = (bits + 6) / 7;
    let mut result: i128 = 0;
    let mut shift: u32 = 0;
    for i in 0..max_bytes {
        let offset = cur.offset();
        let byte = cur.read_u8()?;
        result |= ((byte & 0x7f) as i128) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            if byte & 0x40 != 0 {
                result |= -1i128 << shift;
            }
            let min = -(1i128 << (bits - 1));
            let max = (1i128 << (bits - 1)) - 1;
            if result < min || result > max {
                return Err(DecodeError::Unexpected {
                    found: byte,
                    expected: "SLEB128 group within the target bit width",
                    offset,
                });
            }
            return Ok(result as i64);
        }
        if i + 1 == max_bytes {
            return Err(DecodeError::Unexpected {
                found: byte,
                expected: "terminal SLEB128 byte",
                offset,
            });
        }
    }
    unreachable!("loop exits via terminal byte or error")
}

/// Decode an unsigned LEB128 as u32 (max 5 bytes).
pub fn read_uleb_u32(cur: &mut Cursor) -> Result<u32> {
    read_unsigned(cur, 32).map(|v| v as u32)
}

/// Decode an unsigned LEB128 as u64 (max 10 bytes).
pub fn read_uleb_u64(cur: &mut Cursor) -> Result<u64> {
    read_unsigned(cur, 64)
}

/// Decode a signed LEB128 as two's-complement i32 (max 5 bytes).
pub fn read_sleb_i32(cur: &mut Cursor) -> Result<i32> {
    read_signed(cur, 32).map(|v| v as i32)
}

/// Decode a signed LEB128 as two's-complement i64 (max 10 bytes).
pub fn read_sleb_i64(cur: &mut Cursor) -> Result<i64> {
    read_signed(cur, 64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uns(bytes: &[u8], bits: u32) -> Result<u64> {
        read_unsigned(&mut Cursor::new(bytes), bits)
    }

    fn sig(bytes: &[u8], bits: u32) -> Result<i64> {
        read_signed(&mut Cursor::new(bytes), bits)
    }

    #[test]
    fn uleb_basic() {
        assert_eq!(uns(&[0xE5, 0x8E, 0x26], 32).unwrap(), 624_485);
        assert_eq!(uns(&[0x7F], 8).unwrap(), 127);
        assert_eq!(uns(&[0x82, 0x01], 8).unwrap(), 130);
    }

    #[test]
    fn uleb_truncated_is_unexpected_end() {
        assert_eq!(
            uns(&[0x80], 8).unwrap_err(),
            DecodeError::UnexpectedEnd { offset: 1 }
        );
    }

    #[test]
    fn uleb_boundary_laws() {
        for bits in [1u32, 7, 8, 32, 64] {
            assert_eq!(uns(&[0x00], bits).unwrap(), 0);
            let max = if bits == 64 { u64::MAX } else { (1 << bits) - 1 };
            let encoded = encode_unsigned(max);
            assert_eq!(uns(&encoded, bits).unwrap(), max);
            // One past the top of the width must be rejected.
            if bits < 64 {
                let over = encode_unsigned(max + 1);
                assert!(matches!(
                    uns(&over, bits).unwrap_err(),
                    DecodeError::Unexpected { .. }
                ));
            }
        }
        // First byte payload >= 2^bits fails for sub-7-bit widths.
        assert!(uns(&[0x02], 1).is_err());
        assert!(uns(&[0x01], 1).is_ok());
    }

    #[test]
    fn uleb_padded_zero_continuation_fits() {
        // Non-minimal but in-range: 128 as two bytes at bits=8.
        assert_eq!(uns(&[0x80, 0x01], 8).unwrap(), 128);
        // Same framing overflowing the width: 256 at bits=8.
        assert!(uns(&[0x80, 0x02], 8).is_err());
    }

    #[test]
    fn uleb_too_many_bytes() {
        assert!(matches!(
            uns(&[0xFF; 6], 32).unwrap_err(),
            DecodeError::Unexpected { .. }
        ));
    }

    #[test]
    fn sleb_basic() {
        assert_eq!(sig(&[0x9B, 0xF1, 0x59], 32).unwrap(), -624_485);
        assert_eq!(sig(&[0x41], 8).unwrap(), -63);
        assert_eq!(sig(&[0x80, 0x7F], 8).unwrap(), -128);
        assert_eq!(sig(&[0x7F], 8).unwrap(), -1);
    }

    #[test]
    fn sleb_width_extremes() {
        for bits in [8u32, 32, 64] {
            let min = if bits == 64 {
                i64::MIN
            } else {
                -(1i64 << (bits - 1))
            };
            let max = if bits == 64 {
                i64::MAX
            } else {
                (1i64 << (bits - 1)) - 1
            };
            for v in [-1i64, -2, min, max] {
                let encoded = encode_signed(v);
                assert_eq!(sig(&encoded, bits).unwrap(), v, "bits={bits} v={v}");
            }
        }
    }

    #[test]
    fn sleb_out_of_range_terminal_group() {
        // 128 is representable in the framing but not in i8.
        let encoded = encode_signed(128);
        assert!(matches!(
            sig(&encoded, 8).unwrap_err(),
            DecodeError::Unexpected { .. }
        ));
    }

    // Minimal reference encoders for test inputs.
    fn encode_unsigned(mut v: u64) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                out.push(byte);
                return out;
            }
            out.push(byte | 0x80);
        }
    }

    fn encode_signed(mut v: i64) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            let done = (v == 0 && byte & 0x40 == 0) || (v == -1 && byte & 0x40 != 0);
            if done {
                out.push(byte);
                return out;
            }
            out.push(byte | 0x80);
        }
    }
}
