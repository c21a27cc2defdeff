use crate::core::error::{Error, ErrorKind, Result};

/// Fixed-width alternative to [`super::vbyte::VarByte`] (§4.5 "binary
/// alternative"): every integer is 4 little-endian bytes, doc IDs are
/// stored raw (no gap coding — there is no saving to gap-code fixed-width
/// integers), and a posting list is prefixed by its own 4-byte count so a
/// reader never has to consult the lexicon to know how many entries follow.
pub struct FixedBinary;

const WIDTH: usize = 4;

impl FixedBinary {
    pub fn encode_u32_list(values: &[u32]) -> Vec<u8> {
        let mut out = Vec::with_capacity(WIDTH * (values.len() + 1));
        out.extend_from_slice(&(values.len() as u32).to_le_bytes());
        for &v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    /// Decodes a count-prefixed list, returning `(values, bytes_consumed)`.
    pub fn decode_u32_list(input: &[u8]) -> Result<(Vec<u32>, usize)> {
        if input.len() < WIDTH {
            return Err(Error::new(
                ErrorKind::Format,
                "binary stream too short for a count prefix",
            ));
        }
        let count = u32::from_le_bytes(input[..WIDTH].try_into().unwrap()) as usize;
        let needed = WIDTH + count * WIDTH;
        if input.len() < needed {
            return Err(Error::new(
                ErrorKind::Format,
                "binary stream truncated before its declared count",
            ));
        }
        let mut values = Vec::with_capacity(count);
        let mut pos = WIDTH;
        for _ in 0..count {
            values.push(u32::from_le_bytes(input[pos..pos + WIDTH].try_into().unwrap()));
            pos += WIDTH;
        }
        Ok((values, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn roundtrips_simple_run() {
        let values = vec![2u32, 5, 70000, 9];
        let encoded = FixedBinary::encode_u32_list(&values);
        let (decoded, consumed) = FixedBinary::decode_u32_list(&encoded).unwrap();
        assert_eq!(decoded, values);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn truncated_count_prefix_is_a_format_error() {
        let err = FixedBinary::decode_u32_list(&[0u8, 1]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
    }

    #[test]
    fn truncated_body_is_a_format_error() {
        let encoded = FixedBinary::encode_u32_list(&[1, 2, 3]);
        let truncated = &encoded[..encoded.len() - 1];
        let err = FixedBinary::decode_u32_list(truncated).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
    }

    proptest! {
        #[test]
        fn roundtrip(values in prop::collection::vec(any::<u32>(), 0..200)) {
            let encoded = FixedBinary::encode_u32_list(&values);
            let (decoded, consumed) = FixedBinary::decode_u32_list(&encoded).unwrap();
            prop_assert_eq!(decoded, values);
            prop_assert_eq!(consumed, encoded.len());
        }
    }
}
