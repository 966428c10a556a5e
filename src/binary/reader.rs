//! Primitive readers layered over the cursor: bounded vectors, UTF-8 names,
//! and IEEE-754 bit patterns.

use super::{cursor::Cursor, leb128, DecodeError, Result};

/// Read 4 little-endian bytes and return the IEEE-754 binary32 bit pattern.
pub fn read_f32_bits(cur: &mut Cursor) -> Result<u32> {
    let b = cur.read_bytes(4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Read 8 little-endian bytes and return the IEEE-754 binary64 bit pattern.
pub fn read_f64_bits(cur: &mut Cursor) -> Result<u64> {
    let b = cur.read_bytes(8)?;
    Ok(u64::from_le_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ]))
}

/// Read a length-prefixed run of raw bytes (u32 length via ULEB128).
pub fn read_len_prefixed_bytes(cur: &mut Cursor) -> Result<Vec<u8>> {
    let len = leb128::read_uleb_u32(cur)? as usize;
    Ok(cur.read_bytes(len)?.to_vec())
}

/// Read a UTF-8 name (length-prefixed bytes).
pub fn read_name(cur: &mut Cursor) -> Result<String> {
    let bytes = read_len_prefixed_bytes(cur)?;
    let offset = cur.offset();
    String::from_utf8(bytes)
        .map_err(|e| DecodeError::InvalidUnicode {
            bytes: e.into_bytes(),
            offset,
        })
}

/// Read a vector of T using the provided element reader. Length is a ULEB128
/// u32; a declared length that cannot possibly be satisfied by the remaining
/// bytes (each element consumes at least one) is rejected up front.
pub fn read_vec<T, F>(cur: &mut Cursor, mut elem: F) -> Result<Vec<T>>
where
    F: FnMut(&mut Cursor) -> Result<T>,
{
    let position = cur.offset();
    let len = leb128::read_uleb_u32(cur)? as usize;
    if len > cur.remaining() {
        return Err(DecodeError::InvalidVectorLength { position });
    }
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        out.push(elem(cur)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_name_ok() {
        let data = [0x03, b'f', b'o', b'o'];
        let mut c = Cursor::new(&data);
        assert_eq!(read_name(&mut c).unwrap(), "foo");
    }

    #[test]
    fn read_name_multibyte_utf8() {
        // "é" (2-byte), "€" (3-byte), "𐍈" (4-byte)
        let payload = "é€𐍈".as_bytes();
        let mut data = vec![payload.len() as u8];
        data.extend_from_slice(payload);
        let mut c = Cursor::new(&data);
        assert_eq!(read_name(&mut c).unwrap(), "é€𐍈");
    }

    #[test]
    fn read_name_invalid_utf8() {
        let data = [0x02, 0xFF, 0xFE];
        let mut c = Cursor::new(&data);
        match read_name(&mut c).unwrap_err() {
            DecodeError::InvalidUnicode { bytes, .. } => assert_eq!(bytes, vec![0xFF, 0xFE]),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn read_name_truncated() {
        let data = [0x05, b'a'];
        let mut c = Cursor::new(&data);
        assert!(matches!(
            read_name(&mut c).unwrap_err(),
            DecodeError::UnexpectedEnd { .. } | DecodeError::InvalidVectorLength { .. }
        ));
    }

    #[test]
    fn read_vec_of_expected_bytes() {
        // len=2, two elements each required to be 0x01
        let data = [0x02, 0x01, 0x01];
        let mut c = Cursor::new(&data);
        let v = read_vec(&mut c, |c| {
            c.expect_u8(0x01, "0x01")?;
            Ok(0x01u8)
        })
        .unwrap();
        assert_eq!(v, vec![0x01, 0x01]);

        let mut c = Cursor::new(&[0x00]);
        let v = read_vec(&mut c, |c| c.read_u8()).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn read_vec_length_exceeding_input() {
        let data = [0x05, 0xAA];
        let mut c = Cursor::new(&data);
        assert_eq!(
            read_vec(&mut c, |c| c.read_u8()).unwrap_err(),
            DecodeError::InvalidVectorLength { position: 0 }
        );
    }

    #[test]
    fn f32_f64_bit_patterns() {
        let mut c = Cursor::new(&[0x00, 0x00, 0x80, 0x3F]);
        let bits = read_f32_bits(&mut c).unwrap();
        assert_eq!(f32::from_bits(bits), 1.0);

        let mut c = Cursor::new(&[0xDA, 0x0F, 0x49, 0x40]);
        assert_eq!(read_f32_bits(&mut c).unwrap(), 0x40490FDA); // pi, binary32

        // NaN payload survives bit-exactly.
        let mut c = Cursor::new(&[0x01, 0x00, 0xC0, 0x7F]);
        assert_eq!(read_f32_bits(&mut c).unwrap(), 0x7FC00001);

        let mut c = Cursor::new(&[0, 0, 0, 0, 0, 0, 0xF0, 0x3F]);
        let bits = read_f64_bits(&mut c).unwrap();
        assert_eq!(f64::from_bits(bits), 1.0);
    }
}
