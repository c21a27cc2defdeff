use crate::compression::vbyte::VarByte;
use crate::core::error::Result;

/// Gap (delta) coding over a strictly-ascending `u32` sequence (§4.5).
///
/// Doc IDs are monotone within one posting list, so they compress far
/// better as `d0, d1-d0, d2-d1, ...` than as raw values. Frequencies are
/// never gap-coded — only this module's functions apply gaps, callers
/// must not reach for it when encoding term frequencies.
pub struct GapVarByte;

impl GapVarByte {
    /// Encodes `doc_ids` (assumed strictly ascending) as gaps, varbyte-coded.
    pub fn encode(doc_ids: &[u32]) -> Vec<u8> {
        let mut gaps = Vec::with_capacity(doc_ids.len());
        let mut prev = 0u32;
        for &id in doc_ids {
            gaps.push(id - prev);
            prev = id;
        }
        VarByte::encode_u32_list(&gaps)
    }

    /// Decodes `count` gap-coded doc IDs, running the sum from 0.
    pub fn decode(input: &[u8], count: usize) -> Result<Vec<u32>> {
        let gaps = VarByte::decode_u32_list(input, count)?;
        let mut doc_ids = Vec::with_capacity(count);
        let mut running = 0u32;
        for gap in gaps {
            running += gap;
            doc_ids.push(running);
        }
        Ok(doc_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn roundtrips_simple_run() {
        let ids = vec![2u32, 5, 7, 9];
        let encoded = GapVarByte::encode(&ids);
        let decoded = GapVarByte::decode(&encoded, ids.len()).unwrap();
        assert_eq!(decoded, ids);
    }

    #[test]
    fn empty_list_roundtrips() {
        let encoded = GapVarByte::encode(&[]);
        assert!(encoded.is_empty());
        let decoded = GapVarByte::decode(&encoded, 0).unwrap();
        assert!(decoded.is_empty());
    }

    fn ascending(seed: Vec<u32>) -> Vec<u32> {
        let mut sorted = seed;
        sorted.sort_unstable();
        sorted.dedup();
        sorted
    }

    proptest! {
        // Invariant 2 (§8): gap-coded round-trip for strictly-ascending sequences.
        #[test]
        fn roundtrip_ascending(seed in prop::collection::vec(0u32..1_000_000, 0..200)) {
            let ids = ascending(seed);
            let encoded = GapVarByte::encode(&ids);
            let decoded = GapVarByte::decode(&encoded, ids.len()).unwrap();
            prop_assert_eq!(decoded, ids);
        }
    }
}
