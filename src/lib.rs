pub mod core;
pub mod corpus;
pub mod analysis;
pub mod compression;
pub mod index;
pub mod query;
pub mod eval;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, ErrorKind, Result};

/*
┌────────────────────────────────────────────────────────────────────────────────────────────┐
│                              MARCODEX PIPELINE ARCHITECTURE                                  │
└────────────────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────────────── OFFLINE (INDEX) ─────────────────────────────────────┐
│                                                                                              │
│  corpus::Reader ──yields──> (docno, url, body, span) ──tokenize──> analysis::Tokenizer      │
│         │                                                                  │                │
│         │                                                                  v                │
│         │                                          index::PartialIndexBuilder (in memory)   │
│         │                                                  │ spill at output_entry_size      │
│         v                                                  v                                 │
│   index::PageTable (docs.txt)                   NNN.vbyte / NNN_freqs.vbyte chunks           │
│                                                              │                                │
│                                                              v                                │
│                                              index::Merger (k-way, min-heap)                  │
│                                                              │ uses compression::codec         │
│                                                              v                                │
│                                   merged_index.vbyte + freqs.vbyte + lexicon (storage.txt)     │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────────────── ONLINE (QUERY) ──────────────────────────────────────┐
│                                                                                              │
│   query::clean (tokenize, dedup, sort) ──> lexicon lookup ──> query::PostingCache (LRU)      │
│                                                   │                    │                      │
│                                                   v                    v                      │
│                                        query::Engine (AND / OR) ──> query::scorer::Bm25       │
│                                                   │                                           │
│                                                   v                                           │
│                                          ranked Vec<ScoredDoc>                                │
│                                                   │                                           │
│                                                   v                                           │
│                               eval::Pool (W workers, crossbeam channel) ──> MRR@n             │
└──────────────────────────────────────────────────────────────────────────────────────────────┘
*/
