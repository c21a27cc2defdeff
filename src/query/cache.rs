use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

use crate::index::posting::PostingList;

/// Thread-safe LRU of decoded posting lists, keyed by term rather than by
/// whole query (§4.6). Every operation is serialized under one mutex, but
/// the mutex never guards file I/O: a miss here just returns `None` and
/// leaves the seek+decode to the caller, who re-acquires only to insert
/// (§5) — so two concurrent misses on the same term both hit disk and
/// both calls to `put` succeed, last writer wins.
pub struct PostingCache {
    cache: Mutex<LruCache<String, PostingList>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl PostingCache {
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap();
        PostingCache {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Moves `term` to the most-recently-used position on a hit.
    pub fn get(&self, term: &str) -> Option<PostingList> {
        let mut cache = self.cache.lock();
        if let Some(postings) = cache.get(term) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            Some(postings.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Inserts decoded postings for `term`, evicting the least-recently-used
    /// entry if the cache is already at capacity.
    pub fn put(&self, term: String, postings: PostingList) {
        let mut cache = self.cache.lock();
        cache.put(term, postings);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            resident: self.cache.lock().len(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub resident: usize,
}
