use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::compression::codec;
use crate::core::config::{Config, PostingCodec};
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::lexicon::{Lexicon, LexiconEntry};

fn file_extension(codec: PostingCodec) -> &'static str {
    match codec {
        PostingCodec::Varbyte => "vbyte",
        PostingCodec::Binary => "bin",
    }
}

fn lexicon_name(codec: PostingCodec) -> &'static str {
    match codec {
        PostingCodec::Varbyte => "storage_vbyte.txt",
        PostingCodec::Binary => "storage_bin.txt",
    }
}

pub struct MergeOutput {
    pub index_path: PathBuf,
    pub freqs_path: PathBuf,
    pub lexicon_path: PathBuf,
    pub term_count: usize,
}

type ChunkRecord = (String, Vec<u32>, Vec<u32>);

/// Reads one chunk's `(ids_path, freqs_path)` pair written by the Builder,
/// buffering `refill_size` term records at a time (§4.4).
struct ChunkReader {
    ids: BufReader<File>,
    freqs: BufReader<File>,
    codec: PostingCodec,
    refill_size: usize,
    buffer: std::collections::VecDeque<ChunkRecord>,
    eof: bool,
}

impl ChunkReader {
    fn open(ids_path: &Path, freqs_path: &Path, codec: PostingCodec, refill_size: usize) -> Result<Self> {
        Ok(ChunkReader {
            ids: BufReader::new(File::open(ids_path)?),
            freqs: BufReader::new(File::open(freqs_path)?),
            codec,
            refill_size,
            buffer: std::collections::VecDeque::new(),
            eof: false,
        })
    }

    fn refill(&mut self) -> Result<()> {
        if self.eof {
            return Ok(());
        }
        for _ in 0..self.refill_size {
            let mut term_bytes = Vec::new();
            let mut byte = [0u8; 1];
            loop {
                match self.ids.read(&mut byte)? {
                    0 => {
                        self.eof = true;
                        return Ok(());
                    }
                    _ => {
                        if byte[0] == 0 {
                            break;
                        }
                        term_bytes.push(byte[0]);
                    }
                }
            }
            let term = String::from_utf8(term_bytes)?;

            let doc_count = read_u32(&mut self.ids)?;
            let ids_blob_len = read_u32(&mut self.ids)? as usize;
            let mut ids_blob = vec![0u8; ids_blob_len];
            self.ids.read_exact(&mut ids_blob)?;
            let doc_ids = codec::decode_doc_ids_raw(self.codec, &ids_blob, doc_count as usize)?;

            let freqs_blob_len = read_u32(&mut self.freqs)? as usize;
            let mut freqs_blob = vec![0u8; freqs_blob_len];
            self.freqs.read_exact(&mut freqs_blob)?;
            let freqs = codec::decode_freqs(self.codec, &freqs_blob, doc_count as usize)?;

            self.buffer.push_back((term, doc_ids, freqs));
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<&ChunkRecord>> {
        if self.buffer.is_empty() {
            self.refill()?;
        }
        Ok(self.buffer.front())
    }

    fn pop(&mut self) -> Result<Option<ChunkRecord>> {
        if self.buffer.is_empty() {
            self.refill()?;
        }
        Ok(self.buffer.pop_front())
    }
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

#[derive(Eq, PartialEq)]
struct HeapKey {
    term: String,
    first_doc_id: u32,
    chunk_idx: usize,
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.term
            .cmp(&other.term)
            .then(self.first_doc_id.cmp(&other.first_doc_id))
            .then(self.chunk_idx.cmp(&other.chunk_idx))
    }
}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// K-way merges the chunk files produced by [`crate::index::builder::PartialIndexBuilder`]
/// into one gap+varbyte-coded index, a parallel freqs file, and a lexicon
/// (§4.4, C4). Chunks are consumed by a min-heap keyed by `(term, first
/// doc_id)`; completed terms are written out immediately rather than batched,
/// which keeps merger memory at O(number of open chunks) regardless of
/// `output_entry_size` while producing byte-identical final files.
pub fn merge(config: &Config, chunk_paths: &[(PathBuf, PathBuf)]) -> Result<MergeOutput> {
    let codec = config.codec;
    let ext = file_extension(codec);

    let mut readers: Vec<ChunkReader> = chunk_paths
        .iter()
        .map(|(ids, freqs)| ChunkReader::open(ids, freqs, codec, config.input_index_chunk_size))
        .collect::<Result<_>>()?;

    let mut heap = BinaryHeap::new();
    for (idx, reader) in readers.iter_mut().enumerate() {
        if let Some((term, doc_ids, _)) = reader.peek()? {
            heap.push(Reverse(HeapKey { term: term.clone(), first_doc_id: doc_ids[0], chunk_idx: idx }));
        }
    }

    let index_path = config.storage_path.join(format!("merged_index.{ext}"));
    let freqs_path = config.storage_path.join(format!("freqs.{ext}"));
    let lexicon_path = config.storage_path.join(lexicon_name(codec));

    let mut ids_out = BufWriter::new(File::create(&index_path)?);
    let mut freqs_out = BufWriter::new(File::create(&freqs_path)?);
    let mut lexicon = Lexicon::new();

    let mut ids_offset: u64 = 0;
    let mut freqs_offset: u64 = 0;

    let mut current: Option<(String, Vec<u32>, Vec<u32>)> = None;

    while let Some(Reverse(key)) = heap.pop() {
        let (term, doc_ids, freqs) = readers[key.chunk_idx]
            .pop()?
            .ok_or_else(|| Error::new(ErrorKind::Format, "heap referenced an exhausted chunk reader"))?;

        match &mut current {
            Some((current_term, current_ids, current_freqs)) if *current_term == term => {
                current_ids.extend_from_slice(&doc_ids);
                current_freqs.extend_from_slice(&freqs);
            }
            _ => {
                if let Some((t, ids, fs)) = current.take() {
                    flush_entry(&mut lexicon, &mut ids_out, &mut freqs_out, &mut ids_offset, &mut freqs_offset, codec, t, &ids, &fs)?;
                }
                current = Some((term, doc_ids, freqs));
            }
        }

        if let Some((next_term, next_ids, _)) = readers[key.chunk_idx].peek()? {
            heap.push(Reverse(HeapKey { term: next_term.clone(), first_doc_id: next_ids[0], chunk_idx: key.chunk_idx }));
        }
    }

    if let Some((t, ids, fs)) = current.take() {
        flush_entry(&mut lexicon, &mut ids_out, &mut freqs_out, &mut ids_offset, &mut freqs_offset, codec, t, &ids, &fs)?;
    }

    ids_out.flush()?;
    freqs_out.flush()?;
    lexicon.save(&lexicon_path)?;

    info!(terms = lexicon.len(), chunks = chunk_paths.len(), "merge complete");

    Ok(MergeOutput { index_path, freqs_path, lexicon_path, term_count: lexicon.len() })
}

fn flush_entry(
    lexicon: &mut Lexicon,
    ids_out: &mut impl Write,
    freqs_out: &mut impl Write,
    ids_offset: &mut u64,
    freqs_offset: &mut u64,
    codec: PostingCodec,
    term: String,
    doc_ids: &[u32],
    freqs: &[u32],
) -> Result<()> {
    let ids_bytes = codec::encode_doc_ids(codec, doc_ids);
    let freqs_bytes = codec::encode_freqs(codec, freqs);

    ids_out.write_all(&ids_bytes)?;
    freqs_out.write_all(&freqs_bytes)?;

    lexicon.insert(
        term,
        LexiconEntry { ids_offset: *ids_offset, freqs_offset: *freqs_offset, doc_count: doc_ids.len() as u32 },
    );

    *ids_offset += ids_bytes.len() as u64;
    *freqs_offset += freqs_bytes.len() as u64;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::tokenize;
    use crate::core::types::{DocId, RawDocument};
    use crate::index::builder::PartialIndexBuilder;
    use tempfile::tempdir;

    fn doc(id: u32, body: &str) -> (RawDocument, Vec<crate::analysis::token::Token>) {
        let tokens = tokenize(body);
        (
            RawDocument {
                doc_id: DocId::new(id),
                docno: format!("D{id}"),
                url: format!("http://example/{id}"),
                body: body.as_bytes().to_vec(),
                begin_offset: 0,
                end_offset: body.len() as u64,
            },
            tokens,
        )
    }

    #[test]
    fn merges_two_chunks_into_one_lexicon() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.storage_path = dir.path().to_path_buf();
        config.output_entry_size = 1; // force a spill after every document

        let mut builder = PartialIndexBuilder::new(&config);
        let (d0, t0) = doc(0, "alpha beta alpha");
        let (d1, t1) = doc(1, "beta gamma");
        builder.add_document(&d0, &t0).unwrap();
        builder.add_document(&d1, &t1).unwrap();
        let output = builder.finish().unwrap();
        assert_eq!(output.chunk_paths.len(), 2);

        let merged = merge(&config, &output.chunk_paths).unwrap();
        assert_eq!(merged.term_count, 3);

        let lexicon = Lexicon::load(&merged.lexicon_path).unwrap();
        assert_eq!(lexicon.get("alpha").unwrap().doc_count, 1);
        assert_eq!(lexicon.get("beta").unwrap().doc_count, 2);
        assert_eq!(lexicon.get("gamma").unwrap().doc_count, 1);

        let beta = lexicon.get("beta").unwrap();
        use std::io::{Seek, SeekFrom};
        let mut ids_file = File::open(&merged.index_path).unwrap();
        ids_file.seek(SeekFrom::Start(beta.ids_offset)).unwrap();
        let mut buf = Vec::new();
        ids_file.read_to_end(&mut buf).unwrap();
        let doc_ids = codec::decode_doc_ids(PostingCodec::Varbyte, &buf, beta.doc_count as usize).unwrap();
        assert_eq!(doc_ids, vec![0, 1]);
    }
}
