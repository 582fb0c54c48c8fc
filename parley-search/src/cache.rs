//! In-memory TTL cache for search results.
//!
//! Keyed by the normalised query plus the request options that change the
//! result set. Backed by [`moka`] so lookups never block the runtime.

use std::time::Duration;

use moka::future::Cache;

use crate::types::SearchResult;

/// Maximum number of cached result sets.
const MAX_CACHE_ENTRIES: u64 = 100;

/// Cache key: lowercased, trimmed query and the options that affect results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    max_results: usize,
    safe_search: bool,
}

impl CacheKey {
    /// Build a key. Case and surrounding whitespace of `query` are ignored.
    pub fn new(query: &str, max_results: usize, safe_search: bool) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            max_results,
            safe_search,
        }
    }
}

/// Result cache owned by a [`crate::SearchClient`].
#[derive(Clone)]
pub struct ResultCache {
    inner: Cache<CacheKey, Vec<SearchResult>>,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

impl ResultCache {
    /// Create a cache whose entries expire after `ttl_seconds`.
    pub fn new(ttl_seconds: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build();
        Self { inner }
    }

    /// Cached results for `key`, if present and not expired.
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<SearchResult>> {
        self.inner.get(key).await
    }

    /// Store results for `key`.
    pub async fn insert(&self, key: CacheKey, results: Vec<SearchResult>) {
        self.inner.insert(key, results).await;
    }
}
