use crate::core::error::{Error, ErrorKind, Result};

/// Variable-byte integer codec, terminator-on-last-byte convention (§4.5).
///
/// Each value is emitted as 7-bit groups, least-significant group first.
/// Continuation bytes have the high bit clear; the final byte has the high
/// bit set. This is the opposite convention from "high bit marks
/// continuation" — terminator-on-last is required to interoperate with
/// files this crate produces.
pub struct VarByte;

impl VarByte {
    /// Appends the varbyte encoding of `value` to `out`.
    pub fn encode_u32(out: &mut Vec<u8>, mut value: u32) {
        loop {
            let group = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                out.push(group | 0x80);
                break;
            }
            out.push(group);
        }
    }

    /// Encodes a whole slice, one varbyte run per value, concatenated.
    pub fn encode_u32_list(values: &[u32]) -> Vec<u8> {
        let mut out = Vec::new();
        for &v in values {
            Self::encode_u32(&mut out, v);
        }
        out
    }

    /// Decodes one value starting at `input[0]`, returning `(value, bytes_consumed)`.
    ///
    /// Streaming-safe: if `input` runs out before a terminal byte is seen,
    /// returns a `Format` error rather than panicking, so callers reading
    /// across buffer boundaries can distinguish "need more bytes" from a
    /// genuinely malformed stream by refilling and retrying.
    pub fn decode_u32(input: &[u8]) -> Result<(u32, usize)> {
        let mut value: u32 = 0;
        let mut shift: u32 = 0;

        for (consumed, &byte) in input.iter().enumerate() {
            if shift >= 32 {
                return Err(Error::new(ErrorKind::Format, "varbyte integer overflow"));
            }
            let group = (byte & 0x7F) as u32;
            value |= group << shift;

            if byte & 0x80 != 0 {
                return Ok((value, consumed + 1));
            }

            shift += 7;
        }

        Err(Error::new(
            ErrorKind::Format,
            "varbyte stream exhausted mid-integer",
        ))
    }

    /// Decodes `count` consecutive values starting at `input[0]`.
    pub fn decode_u32_list(input: &[u8], count: usize) -> Result<Vec<u32>> {
        let mut values = Vec::with_capacity(count);
        let mut pos = 0;
        for _ in 0..count {
            let (value, consumed) = Self::decode_u32(&input[pos..])?;
            values.push(value);
            pos += consumed;
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_values_match_spec_bytes() {
        // S2: 0, 127, 128, 16383, 16384, 2097151, 2097152
        let values = [0u32, 127, 128, 16383, 16384, 2_097_151, 2_097_152];
        let encoded = VarByte::encode_u32_list(&values);
        let expected: Vec<u8> = vec![
            0x80, 0xFF, 0x00, 0x81, 0x7F, 0xFF, 0x00, 0x00, 0x81, 0x7F, 0x7F, 0xFF, 0x00, 0x00,
            0x00, 0x81,
        ];
        assert_eq!(encoded, expected);

        let decoded = VarByte::decode_u32_list(&encoded, values.len()).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn exhausted_stream_is_a_format_error() {
        // 128 requires two bytes; supply only the first (non-terminal) one.
        let mut encoded = Vec::new();
        VarByte::encode_u32(&mut encoded, 128);
        let truncated = &encoded[..1];
        let err = VarByte::decode_u32(truncated).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
    }

    proptest! {
        // Invariant 2 (§8): round-trip for arbitrary u32 sequences.
        #[test]
        fn roundtrip(values in prop::collection::vec(any::<u32>(), 0..200)) {
            let encoded = VarByte::encode_u32_list(&values);
            let decoded = VarByte::decode_u32_list(&encoded, values.len()).unwrap();
            prop_assert_eq!(decoded, values);
        }

        #[test]
        fn streaming_across_arbitrary_split_points(
            values in prop::collection::vec(any::<u32>(), 1..50),
            split_ratio in 0.0f64..1.0f64,
        ) {
            let encoded = VarByte::encode_u32_list(&values);
            let split = ((encoded.len() as f64) * split_ratio) as usize;
            // Decoding must succeed identically whether done in one pass
            // or by reassembling two slices first (simulates a reader
            // refilling its buffer mid-list).
            let mut reassembled = Vec::with_capacity(encoded.len());
            reassembled.extend_from_slice(&encoded[..split]);
            reassembled.extend_from_slice(&encoded[split..]);
            let decoded = VarByte::decode_u32_list(&reassembled, values.len()).unwrap();
            prop_assert_eq!(decoded, values);
        }
    }
}