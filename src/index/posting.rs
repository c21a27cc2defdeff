/// A decoded posting list for one term: parallel `doc_ids`/`freqs`, both
/// indexed identically and `doc_ids` strictly ascending (§3 "Posting List").
///
/// This is the shape the query engine's LRU cache stores — already decoded,
/// so a cache hit costs no codec work, only the lock.
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    pub doc_ids: Vec<u32>,
    pub freqs: Vec<u32>,
}

impl PostingList {
    pub fn new(doc_ids: Vec<u32>, freqs: Vec<u32>) -> Self {
        debug_assert_eq!(doc_ids.len(), freqs.len());
        PostingList { doc_ids, freqs }
    }

    pub fn doc_count(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    /// Binary-searches for `doc_id`, returning its term frequency if present.
    pub fn freq_of(&self, doc_id: u32) -> Option<u32> {
        self.doc_ids
            .binary_search(&doc_id)
            .ok()
            .map(|idx| self.freqs[idx])
    }
}
