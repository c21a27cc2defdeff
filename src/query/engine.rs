use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compression::codec;
use crate::core::config::{Config, PostingCodec};
use crate::core::error::Result;
use crate::index::lexicon::Lexicon;
use crate::index::page_table::PageTable;
use crate::index::posting::PostingList;
use crate::query::cache::PostingCache;
use crate::query::clean;
use crate::query::scorer::Bm25;
use crate::query::types::{rank_order, QueryMode, ScoredDocument};

/// Resolves queries against a loaded lexicon/page-table pair, ranking with
/// BM25 over gap+varbyte (or binary) postings fetched through a shared LRU
/// cache (§4.6, C6). Cheap to clone: the lexicon, page table, and cache are
/// all `Arc`-shared, so each evaluator worker can own its own `QueryEngine`
/// value while still sharing the one cross-thread cache (§4.7).
#[derive(Clone)]
pub struct QueryEngine {
    lexicon: Arc<Lexicon>,
    page_table: Arc<PageTable>,
    cache: Arc<PostingCache>,
    codec: PostingCodec,
    index_path: PathBuf,
    freqs_path: PathBuf,
    bm25: Bm25,
    n_results: usize,
    avgdl: f64,
}

impl QueryEngine {
    pub fn new(
        config: &Config,
        lexicon: Arc<Lexicon>,
        page_table: Arc<PageTable>,
        cache: Arc<PostingCache>,
        index_path: PathBuf,
        freqs_path: PathBuf,
    ) -> Self {
        let avgdl = if page_table.is_empty() {
            1.0
        } else {
            let total: u64 = (0..page_table.len() as u32)
                .filter_map(|id| page_table.get(id))
                .map(|e| e.term_count as u64)
                .sum();
            total as f64 / page_table.len() as f64
        };
        QueryEngine {
            lexicon,
            page_table,
            cache,
            codec: config.codec,
            index_path,
            freqs_path,
            bm25: Bm25::new(config.bm25_k, config.bm25_b),
            n_results: config.n_results,
            avgdl,
        }
    }

    /// Loads the lexicon and page table produced by [`crate::index::merger::merge`]
    /// from `storage_path`, with a fresh posting cache.
    pub fn open(config: &Config) -> Result<Self> {
        let ext = match config.codec {
            PostingCodec::Varbyte => "vbyte",
            PostingCodec::Binary => "bin",
        };
        let lexicon_name = match config.codec {
            PostingCodec::Varbyte => "storage_vbyte.txt",
            PostingCodec::Binary => "storage_bin.txt",
        };
        let lexicon = Lexicon::load(&config.storage_path.join(lexicon_name))?;
        let page_table = PageTable::load(&config.storage_path.join("docs.txt"))?;
        let cache = PostingCache::new(config.cache_capacity);
        Ok(Self::new(
            config,
            Arc::new(lexicon),
            Arc::new(page_table),
            Arc::new(cache),
            config.storage_path.join(format!("merged_index.{ext}")),
            config.storage_path.join(format!("freqs.{ext}")),
        ))
    }

    pub fn cache_stats(&self) -> crate::query::cache::CacheStats {
        self.cache.stats()
    }

    /// Cleans `query`, resolves it against the lexicon (unknown terms are
    /// silently dropped), ranks in `mode`, and returns the top `n_results`.
    /// An unresolvable query is not an error — it returns an empty vector.
    pub fn search(&self, query: &str, mode: QueryMode) -> Result<Vec<ScoredDocument>> {
        let terms = clean::clean(query);
        let mut resolved = Vec::with_capacity(terms.len());
        for term in terms {
            if let Some(postings) = self.resolve_term(&term)? {
                resolved.push((term, postings));
            }
        }
        if resolved.is_empty() {
            return Ok(Vec::new());
        }

        let n = self.page_table.len() as u64;
        let mut scored = match mode {
            QueryMode::Conjunctive => self.score_conjunctive(&resolved, n),
            QueryMode::Disjunctive => self.score_disjunctive(&resolved, n),
        };
        scored.sort_by(rank_order);
        scored.truncate(self.n_results);
        Ok(scored)
    }

    fn resolve_term(&self, term: &str) -> Result<Option<PostingList>> {
        let Some(entry) = self.lexicon.get(term) else {
            return Ok(None);
        };
        if let Some(cached) = self.cache.get(term) {
            return Ok(Some(cached));
        }
        let postings = self.decode_postings(entry.ids_offset, entry.freqs_offset, entry.doc_count)?;
        self.cache.put(term.to_string(), postings.clone());
        Ok(Some(postings))
    }

    fn decode_postings(&self, ids_offset: u64, freqs_offset: u64, doc_count: u32) -> Result<PostingList> {
        let ids_bytes = read_from(&self.index_path, ids_offset)?;
        let doc_ids = codec::decode_doc_ids(self.codec, &ids_bytes, doc_count as usize)?;

        let freqs_bytes = read_from(&self.freqs_path, freqs_offset)?;
        let freqs = codec::decode_freqs(self.codec, &freqs_bytes, doc_count as usize)?;

        Ok(PostingList::new(doc_ids, freqs))
    }

    fn doc_len(&self, doc_id: u32) -> u32 {
        self.page_table.get(doc_id).map(|e| e.term_count).unwrap_or(1)
    }

    /// Iterative intersection with swap (§4.6): the first list seeds the
    /// accumulator, each subsequent list narrows it; an empty accumulator
    /// short-circuits the remaining lists.
    fn score_conjunctive(&self, resolved: &[(String, PostingList)], n: u64) -> Vec<ScoredDocument> {
        let mut candidates = resolved[0].1.doc_ids.clone();
        for (_, postings) in &resolved[1..] {
            if candidates.is_empty() {
                break;
            }
            candidates.retain(|id| postings.doc_ids.binary_search(id).is_ok());
        }

        candidates
            .into_iter()
            .map(|doc_id| ScoredDocument { doc_id, score: self.score_document(doc_id, resolved, n) })
            .collect()
    }

    fn score_document(&self, doc_id: u32, resolved: &[(String, PostingList)], n: u64) -> f64 {
        let dl = self.doc_len(doc_id);
        resolved
            .iter()
            .filter_map(|(term, postings)| {
                let freq = postings.freq_of(doc_id)?;
                let df = self.lexicon.get(term)?.doc_count;
                Some(self.bm25.score(n, df, dl, self.avgdl, freq))
            })
            .sum()
    }

    /// Walks every resolved term's postings once, accumulating BM25
    /// contributions into a map keyed by `doc_id` (§4.6).
    fn score_disjunctive(&self, resolved: &[(String, PostingList)], n: u64) -> Vec<ScoredDocument> {
        let mut acc: HashMap<u32, f64> = HashMap::new();
        for (term, postings) in resolved {
            let df = match self.lexicon.get(term) {
                Some(entry) => entry.doc_count,
                None => continue,
            };
            for (idx, &doc_id) in postings.doc_ids.iter().enumerate() {
                let freq = postings.freqs[idx];
                let dl = self.doc_len(doc_id);
                let score = self.bm25.score(n, df, dl, self.avgdl, freq);
                *acc.entry(doc_id).or_insert(0.0) += score;
            }
        }
        acc.into_iter().map(|(doc_id, score)| ScoredDocument { doc_id, score }).collect()
    }
}

fn read_from(path: &Path, offset: u64) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::tokenize;
    use crate::core::types::{DocId, RawDocument};
    use crate::index::builder::PartialIndexBuilder;
    use crate::index::merger;
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

    fn build_tiny_corpus(storage: &Path) -> Config {
        let mut config = Config::default();
        config.storage_path = storage.to_path_buf();
        let mut builder = PartialIndexBuilder::new(&config);
        let (d0, t0) = doc(0, "alpha beta alpha");
        let (d1, t1) = doc(1, "beta gamma");
        builder.add_document(&d0, &t0).unwrap();
        builder.add_document(&d1, &t1).unwrap();
        let output = builder.finish().unwrap();
        merger::merge(&config, &output.chunk_paths).unwrap();
        config
    }

    #[test]
    fn s1_conjunctive_and_disjunctive_tiny_corpus() {
        let dir = tempdir().unwrap();
        let config = build_tiny_corpus(dir.path());
        let engine = QueryEngine::open(&config).unwrap();

        let beta = engine.search("beta", QueryMode::Conjunctive).unwrap();
        assert_eq!(beta.len(), 2);
        assert_eq!(beta[0].doc_id, 0); // shorter doc ranks first

        let and_empty = engine.search("alpha gamma", QueryMode::Conjunctive).unwrap();
        assert!(and_empty.is_empty());

        let or_both = engine.search("alpha gamma", QueryMode::Disjunctive).unwrap();
        assert_eq!(or_both.len(), 2);
    }

    #[test]
    fn unresolvable_query_is_empty_not_an_error() {
        let dir = tempdir().unwrap();
        let config = build_tiny_corpus(dir.path());
        let engine = QueryEngine::open(&config).unwrap();
        let results = engine.search("nonexistent", QueryMode::Conjunctive).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn disjunctive_score_dominates_constituent_conjunctive_scores() {
        // Invariant 5 (§8): a disjunctive score is >= each single-term
        // conjunctive contribution on the same doc ID.
        let dir = tempdir().unwrap();
        let config = build_tiny_corpus(dir.path());
        let engine = QueryEngine::open(&config).unwrap();

        let or_results = engine.search("alpha beta", QueryMode::Disjunctive).unwrap();
        let alpha_only = engine.search("alpha", QueryMode::Conjunctive).unwrap();
        let doc0_alpha_score = alpha_only.iter().find(|d| d.doc_id == 0).unwrap().score;
        let doc0_or_score = or_results.iter().find(|d| d.doc_id == 0).unwrap().score;
        assert!(doc0_or_score >= doc0_alpha_score - 1e-9);
    }
}
