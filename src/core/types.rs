/// Dense, zero-based document identifier assigned in corpus-reader order (§3).
///
/// Doc IDs are encoded as `u32` on disk (§4.5's varbyte examples are over
/// `u32`), which bounds a single index build to ~4 billion documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(pub u32);

impl DocId {
    pub fn new(id: u32) -> Self {
        DocId(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

/// One page-table row: everything the online side needs about a document
/// without touching the inverted index (§3 "Page Table").
#[derive(Debug, Clone, PartialEq)]
pub struct PageTableEntry {
    pub docno: String,
    pub url: String,
    pub term_count: u32,
    pub begin_offset: u64,
    pub end_offset: u64,
}

/// A document as produced by the Corpus Reader, before tokenization.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub doc_id: DocId,
    pub docno: String,
    pub url: String,
    pub body: Vec<u8>,
    pub begin_offset: u64,
    pub end_offset: u64,
}
