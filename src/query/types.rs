/// How a multi-term query combines per-term posting lists (§4.6, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Intersection: a document must contain every resolved term.
    Conjunctive,
    /// Union: a document need only contain one resolved term.
    Disjunctive,
}

/// One ranked result: a document ID and its accumulated BM25 score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDocument {
    pub doc_id: u32,
    pub score: f64,
}

/// Orders descending by score, ties broken ascending by `doc_id` (§4.6).
pub fn rank_order(a: &ScoredDocument, b: &ScoredDocument) -> std::cmp::Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then(a.doc_id.cmp(&b.doc_id))
}
