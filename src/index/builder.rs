use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::analysis::token::Token;
use crate::compression::codec;
use crate::core::config::{Config, PostingCodec};
use crate::core::error::Result;
use crate::core::types::{PageTableEntry, RawDocument};
use crate::index::page_table::PageTable;

fn chunk_extension(codec: PostingCodec) -> &'static str {
    match codec {
        PostingCodec::Varbyte => "vbyte",
        PostingCodec::Binary => "bin",
    }
}

#[derive(Default)]
struct TermEntry {
    doc_ids: Vec<u32>,
    freqs: Vec<u32>,
}

/// Result of a finished build: the chunk files C4 must merge, and the path
/// to the page table C6 loads directly (§4.3).
pub struct BuilderOutput {
    pub chunk_paths: Vec<(PathBuf, PathBuf)>,
    pub page_table_path: PathBuf,
    pub doc_count: usize,
}

/// Accumulates `term -> (doc_ids, freqs)` in memory and spills sorted
/// chunks to disk once the distinct-term count crosses `output_entry_size`
/// (§4.3, C3).
pub struct PartialIndexBuilder {
    storage_path: PathBuf,
    codec: PostingCodec,
    output_entry_size: usize,
    terms: BTreeMap<String, TermEntry>,
    page_table: PageTable,
    flushed_pages: usize,
    next_chunk: u32,
    chunk_paths: Vec<(PathBuf, PathBuf)>,
    page_table_path: PathBuf,
}

impl PartialIndexBuilder {
    pub fn new(config: &Config) -> Self {
        PartialIndexBuilder {
            storage_path: config.storage_path.clone(),
            codec: config.codec,
            output_entry_size: config.output_entry_size,
            terms: BTreeMap::new(),
            page_table: PageTable::new(),
            flushed_pages: 0,
            next_chunk: 0,
            chunk_paths: Vec::new(),
            page_table_path: config.storage_path.join("docs.txt"),
        }
    }

    /// Folds one document's tokens into the in-memory term map and records
    /// its page-table row (§4.3). Per token `w`: the first time `w` is seen
    /// in this document, `doc_id` is appended to `doc_ids[w]`; the final
    /// per-document count is appended to `freqs[w]` exactly once, after all
    /// of the document's tokens have been tallied — this ordering is what
    /// keeps `len(doc_ids) == len(freqs)` at every document boundary (§9).
    pub fn add_document(&mut self, doc: &RawDocument, tokens: &[Token]) -> Result<()> {
        let doc_id = doc.doc_id.value();
        let mut per_doc_tf: BTreeMap<&str, u32> = BTreeMap::new();
        for token in tokens {
            *per_doc_tf.entry(token.text.as_str()).or_insert(0) += 1;
        }

        for (term, count) in per_doc_tf {
            let entry = self.terms.entry(term.to_string()).or_default();
            if entry.doc_ids.last().copied() != Some(doc_id) {
                entry.doc_ids.push(doc_id);
            }
            entry.freqs.push(count);
        }

        self.page_table.push(PageTableEntry {
            docno: doc.docno.clone(),
            url: doc.url.clone(),
            term_count: tokens.len() as u32,
            begin_offset: doc.begin_offset,
            end_offset: doc.end_offset,
        });

        if self.terms.len() >= self.output_entry_size {
            self.spill()?;
        }
        Ok(())
    }

    /// Sorts the resident terms lexicographically and writes them as one
    /// `NNN.{ext}` / `NNN_freqs.{ext}` chunk pair, then clears the in-memory
    /// maps and flushes the page-table rows gathered since the last spill.
    fn spill(&mut self) -> Result<()> {
        if self.terms.is_empty() {
            return Ok(());
        }
        let ext = chunk_extension(self.codec);
        let ids_path = self.storage_path.join(format!("{:03}.{ext}", self.next_chunk));
        let freqs_path = self.storage_path.join(format!("{:03}_freqs.{ext}", self.next_chunk));

        let mut ids_out = File::create(&ids_path)?;
        let mut freqs_out = File::create(&freqs_path)?;

        for (term, entry) in &self.terms {
            write_chunk_record(&mut ids_out, term, entry.doc_ids.len() as u32, &codec::encode_doc_ids_raw(self.codec, &entry.doc_ids))?;
            write_blob(&mut freqs_out, &codec::encode_freqs(self.codec, &entry.freqs))?;
        }

        info!(chunk = self.next_chunk, terms = self.terms.len(), "spilled partial index chunk");

        self.chunk_paths.push((ids_path, freqs_path));
        self.next_chunk += 1;
        self.terms.clear();

        self.page_table.append_from(&self.page_table_path, self.flushed_pages)?;
        self.flushed_pages = self.page_table.len();

        Ok(())
    }

    /// Flushes any resident terms and returns the chunk/page-table paths
    /// C4 needs.
    pub fn finish(mut self) -> Result<BuilderOutput> {
        self.spill()?;
        Ok(BuilderOutput {
            chunk_paths: self.chunk_paths,
            page_table_path: self.page_table_path,
            doc_count: self.flushed_pages,
        })
    }
}

/// `term NUL` + `doc_count: u32 LE` + `blob_len: u32 LE` + blob. The term is
/// kept as plain UTF-8 for readability when a chunk is inspected by hand;
/// everything after it is length-framed so the varbyte payload's own bytes
/// (which may coincidentally look like ASCII) can never be misread as a
/// delimiter.
fn write_chunk_record(out: &mut File, term: &str, doc_count: u32, ids_blob: &[u8]) -> Result<()> {
    out.write_all(term.as_bytes())?;
    out.write_all(&[0u8])?;
    out.write_all(&doc_count.to_le_bytes())?;
    out.write_all(&(ids_blob.len() as u32).to_le_bytes())?;
    out.write_all(ids_blob)?;
    Ok(())
}

fn write_blob(out: &mut File, blob: &[u8]) -> Result<()> {
    out.write_all(&(blob.len() as u32).to_le_bytes())?;
    out.write_all(blob)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::tokenize;
    use crate::core::types::DocId;
    use tempfile::tempdir;

    fn doc(id: u32, docno: &str, body: &str) -> (RawDocument, Vec<Token>) {
        let tokens = tokenize(body);
        (
            RawDocument {
                doc_id: DocId::new(id),
                docno: docno.to_string(),
                url: format!("http://example/{docno}"),
                body: body.as_bytes().to_vec(),
                begin_offset: 0,
                end_offset: body.len() as u64,
            },
            tokens,
        )
    }

    #[test]
    fn doc_ids_and_freqs_stay_parallel_and_ascending() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.storage_path = dir.path().to_path_buf();
        config.output_entry_size = 1_000_000;

        let mut builder = PartialIndexBuilder::new(&config);
        let (d0, t0) = doc(0, "D0", "alpha beta alpha");
        let (d1, t1) = doc(1, "D1", "beta gamma");
        builder.add_document(&d0, &t0).unwrap();
        builder.add_document(&d1, &t1).unwrap();

        assert_eq!(builder.terms["alpha"].doc_ids, vec![0]);
        assert_eq!(builder.terms["alpha"].freqs, vec![2]);
        assert_eq!(builder.terms["beta"].doc_ids, vec![0, 1]);
        assert_eq!(builder.terms["beta"].freqs, vec![1, 1]);
        assert_eq!(builder.terms["gamma"].doc_ids, vec![1]);
        assert_eq!(builder.terms["gamma"].freqs, vec![1]);
    }

    #[test]
    fn spill_threshold_produces_a_chunk_and_clears_memory() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.storage_path = dir.path().to_path_buf();
        config.output_entry_size = 2;

        let mut builder = PartialIndexBuilder::new(&config);
        let (d0, t0) = doc(0, "D0", "alpha beta alpha");
        builder.add_document(&d0, &t0).unwrap();
        assert!(builder.terms.is_empty() == false);

        let output = builder.finish().unwrap();
        assert_eq!(output.chunk_paths.len(), 1);
        assert!(output.chunk_paths[0].0.exists());
        assert!(output.chunk_paths[0].1.exists());
        assert!(output.page_table_path.exists());
        assert_eq!(output.doc_count, 1);
    }
}
