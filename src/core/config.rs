use std::path::PathBuf;

/// Which on-disk representation a build uses for posting-list integers.
///
/// Fixed for the lifetime of one build: readers must know which codec
/// produced the files they are opening (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingCodec {
    /// 7-bits-per-byte varbyte, high bit on the terminal byte, gap-coded doc IDs.
    Varbyte,
    /// 4-byte little-endian integers prefixed by a 4-byte count.
    Binary,
}

impl Default for PostingCodec {
    fn default() -> Self {
        PostingCodec::Varbyte
    }
}

/// Tunables for every pipeline stage, with their documented defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding the corpus, chunk spills, and the final index.
    pub storage_path: PathBuf,

    /// C1: size of the Reader's refill buffer (§4.1). Default 256 MiB.
    pub reader_buffer_size: usize,

    /// C3: distinct-term threshold that triggers a spill (§4.3). Default 1,000,000.
    pub output_entry_size: usize,

    /// C4: number of entries read from one chunk file per refill (§4.4). Default 8,192.
    pub input_index_chunk_size: usize,

    /// Which wire format the builder writes and the merger/query engine read.
    pub codec: PostingCodec,

    /// C6: capacity of the shared posting-list LRU cache. Default 131,072.
    pub cache_capacity: usize,

    /// BM25 term-frequency saturation parameter. Default 0.9.
    pub bm25_k: f32,

    /// BM25 length-normalization parameter. Default 0.4.
    pub bm25_b: f32,

    /// Default number of ranked results returned by one query.
    pub n_results: usize,

    /// C7: evaluator pool worker count. Defaults to the host's logical core count.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: PathBuf::from("./data"),
            reader_buffer_size: 256 * 1024 * 1024,
            output_entry_size: 1_000_000,
            input_index_chunk_size: 8_192,
            codec: PostingCodec::Varbyte,
            cache_capacity: 131_072,
            bm25_k: 0.9,
            bm25_b: 0.4,
            n_results: 10,
            workers: num_cpus::get(),
        }
    }
}
