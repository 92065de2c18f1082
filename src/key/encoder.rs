//! Order-preserving key encoding.
//!
//! Encoded bytes compare under memcmp exactly as the logical values
//! compare: integers have their sign bit flipped and are written big
//! endian; variable-width columns are written raw when they terminate a
//! composite, and otherwise have `0x00` escaped as `0x00 0x01` and are
//! terminated by `0x00 0x00`.

use crate::value::{ColumnType, ColumnValue};

/// Appends the encoding of one column value.
///
/// `is_last` marks the final column of a composite key; it only affects
/// variable-width columns, which are separator-terminated everywhere else.
pub fn encode_column_value(value: &ColumnValue, is_last: bool, buf: &mut Vec<u8>) {
    match value {
        ColumnValue::Int8(v) => buf.push((*v as u8) ^ 0x80),
        ColumnValue::Int16(v) => buf.extend_from_slice(&((*v as u16) ^ 0x8000).to_be_bytes()),
        ColumnValue::Int32(v) => {
            buf.extend_from_slice(&((*v as u32) ^ 0x8000_0000).to_be_bytes())
        }
        ColumnValue::Int64(v) => {
            buf.extend_from_slice(&((*v as u64) ^ 0x8000_0000_0000_0000).to_be_bytes())
        }
        ColumnValue::String(s) => encode_binary(s.as_bytes(), is_last, buf),
        ColumnValue::Binary(b) => encode_binary(b, is_last, buf),
    }
}

/// Encodes a composite key, marking the final column.
pub fn encode_key_values(values: &[ColumnValue]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (idx, value) in values.iter().enumerate() {
        encode_column_value(value, idx + 1 == values.len(), &mut buf);
    }
    buf
}

fn encode_binary(bytes: &[u8], is_last: bool, buf: &mut Vec<u8>) {
    if is_last {
        buf.extend_from_slice(bytes);
        return;
    }
    for &byte in bytes {
        if byte == 0x00 {
            buf.extend_from_slice(&[0x00, 0x01]);
        } else {
            buf.push(byte);
        }
    }
    buf.extend_from_slice(&[0x00, 0x00]);
}

/// Decodes one column value from the front of `bytes`, returning the value
/// and the remaining bytes. Used only for debug rendering; `None` means the
/// bytes are truncated or malformed.
pub(crate) fn decode_column_value(
    column_type: ColumnType,
    is_last: bool,
    bytes: &[u8],
) -> Option<(ColumnValue, &[u8])> {
    match column_type {
        ColumnType::Int8 => {
            let (&byte, rest) = bytes.split_first()?;
            Some((ColumnValue::Int8((byte ^ 0x80) as i8), rest))
        }
        ColumnType::Int16 => {
            let (head, rest) = bytes.split_first_chunk::<2>()?;
            Some((
                ColumnValue::Int16((u16::from_be_bytes(*head) ^ 0x8000) as i16),
                rest,
            ))
        }
        ColumnType::Int32 => {
            let (head, rest) = bytes.split_first_chunk::<4>()?;
            Some((
                ColumnValue::Int32((u32::from_be_bytes(*head) ^ 0x8000_0000) as i32),
                rest,
            ))
        }
        ColumnType::Int64 => {
            let (head, rest) = bytes.split_first_chunk::<8>()?;
            Some((
                ColumnValue::Int64((u64::from_be_bytes(*head) ^ 0x8000_0000_0000_0000) as i64),
                rest,
            ))
        }
        ColumnType::String => {
            let (decoded, rest) = decode_binary(bytes, is_last)?;
            Some((ColumnValue::String(String::from_utf8(decoded).ok()?), rest))
        }
        ColumnType::Binary => {
            let (decoded, rest) = decode_binary(bytes, is_last)?;
            Some((ColumnValue::Binary(decoded), rest))
        }
    }
}

fn decode_binary(bytes: &[u8], is_last: bool) -> Option<(Vec<u8>, &[u8])> {
    if is_last {
        return Some((bytes.to_vec(), &[]));
    }
    let mut decoded = Vec::new();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == 0x00 {
            match bytes.get(idx + 1) {
                Some(0x00) => return Some((decoded, &bytes[idx + 2..])),
                Some(0x01) => {
                    decoded.push(0x00);
                    idx += 2;
                }
                _ => return None,
            }
        } else {
            decoded.push(bytes[idx]);
            idx += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: ColumnValue, is_last: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_column_value(&value, is_last, &mut buf);
        buf
    }

    #[test]
    fn integer_encoding_preserves_order() {
        let values = [i32::MIN, -5, -1, 0, 1, 42, i32::MAX];
        let mut previous: Option<Vec<u8>> = None;
        for value in values {
            let bytes = encoded(ColumnValue::Int32(value), true);
            if let Some(previous) = &previous {
                assert!(previous < &bytes, "order broken at {value}");
            }
            previous = Some(bytes);
        }
    }

    #[test]
    fn integer_encoding_flips_sign_bit() {
        assert_eq!(encoded(ColumnValue::Int32(0), true), vec![0x80, 0, 0, 0]);
        assert_eq!(
            encoded(ColumnValue::Int32(i32::MIN), true),
            vec![0, 0, 0, 0]
        );
        assert_eq!(encoded(ColumnValue::Int8(-1), true), vec![0x7f]);
    }

    #[test]
    fn non_final_binary_escapes_and_terminates() {
        let bytes = encoded(ColumnValue::Binary(vec![0x61, 0x00, 0x62]), false);
        assert_eq!(bytes, vec![0x61, 0x00, 0x01, 0x62, 0x00, 0x00]);

        let bytes = encoded(ColumnValue::Binary(vec![0x61, 0x00, 0x62]), true);
        assert_eq!(bytes, vec![0x61, 0x00, 0x62]);
    }

    #[test]
    fn composite_marks_only_the_final_column() {
        let key = encode_key_values(&[
            ColumnValue::String("a".to_string()),
            ColumnValue::String("b".to_string()),
        ]);
        assert_eq!(key, vec![0x61, 0x00, 0x00, 0x62]);
    }

    #[test]
    fn decode_inverts_non_final_escaping() {
        let mut buf = Vec::new();
        encode_column_value(&ColumnValue::Binary(vec![0x00, 0xff]), false, &mut buf);
        buf.extend_from_slice(&[0xaa, 0xbb]);
        let (value, rest) = decode_column_value(ColumnType::Binary, false, &buf).unwrap();
        assert_eq!(value, ColumnValue::Binary(vec![0x00, 0xff]));
        assert_eq!(rest, &[0xaa, 0xbb]);
    }
}
