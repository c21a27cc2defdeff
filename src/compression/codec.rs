use crate::compression::binary::FixedBinary;
use crate::compression::gap::GapVarByte;
use crate::compression::vbyte::VarByte;
use crate::core::config::PostingCodec;
use crate::core::error::{Error, ErrorKind, Result};

/// Dispatches doc-ID and frequency (de)serialization to whichever wire
/// format a build was configured with (§4.5). The merger writes with this,
/// the query engine reads with this — both driven by the same
/// [`PostingCodec`] value so a build's files are self-consistent.
pub fn encode_doc_ids(codec: PostingCodec, doc_ids: &[u32]) -> Vec<u8> {
    match codec {
        PostingCodec::Varbyte => GapVarByte::encode(doc_ids),
        PostingCodec::Binary => FixedBinary::encode_u32_list(doc_ids),
    }
}

/// Frequencies are never gap-coded: they are not monotone, so gapping them
/// would not shrink the encoding and would only add decode complexity.
pub fn encode_freqs(codec: PostingCodec, freqs: &[u32]) -> Vec<u8> {
    match codec {
        PostingCodec::Varbyte => VarByte::encode_u32_list(freqs),
        PostingCodec::Binary => FixedBinary::encode_u32_list(freqs),
    }
}

/// Chunk-level encoding for the Builder's spills (§4.3): doc IDs are
/// written raw, never gap-coded — gapping is the Merger's job, applied once
/// per term's *final* run rather than once per chunk fragment.
pub fn encode_doc_ids_raw(codec: PostingCodec, doc_ids: &[u32]) -> Vec<u8> {
    match codec {
        PostingCodec::Varbyte => VarByte::encode_u32_list(doc_ids),
        PostingCodec::Binary => FixedBinary::encode_u32_list(doc_ids),
    }
}

pub fn decode_doc_ids_raw(codec: PostingCodec, input: &[u8], count: usize) -> Result<Vec<u32>> {
    match codec {
        PostingCodec::Varbyte => VarByte::decode_u32_list(input, count),
        PostingCodec::Binary => {
            let (values, _consumed) = FixedBinary::decode_u32_list(input)?;
            if values.len() != count {
                return Err(Error::new(
                    ErrorKind::Format,
                    "binary posting list length disagrees with its chunk record",
                ));
            }
            Ok(values)
        }
    }
}

pub fn decode_doc_ids(codec: PostingCodec, input: &[u8], count: usize) -> Result<Vec<u32>> {
    match codec {
        PostingCodec::Varbyte => GapVarByte::decode(input, count),
        PostingCodec::Binary => {
            let (values, _consumed) = FixedBinary::decode_u32_list(input)?;
            if values.len() != count {
                return Err(Error::new(
                    ErrorKind::Format,
                    "binary posting list length disagrees with the lexicon's doc count",
                ));
            }
            Ok(values)
        }
    }
}

pub fn decode_freqs(codec: PostingCodec, input: &[u8], count: usize) -> Result<Vec<u32>> {
    match codec {
        PostingCodec::Varbyte => VarByte::decode_u32_list(input, count),
        PostingCodec::Binary => {
            let (values, _consumed) = FixedBinary::decode_u32_list(input)?;
            if values.len() != count {
                return Err(Error::new(
                    ErrorKind::Format,
                    "binary frequency list length disagrees with the lexicon's doc count",
                ));
            }
            Ok(values)
        }
    }
}
