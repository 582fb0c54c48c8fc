//! # parley-search
//!
//! Embedded web search for Parley's question fallback.
//!
//! Scrapes DuckDuckGo's HTML results page directly: no API keys and no
//! external services to configure. A [`SearchClient`] owns one HTTP client
//! and an optional TTL cache, and bounds every call with the configured
//! timeout so a hanging endpoint can never stall a chat turn.
//!
//! Queries are logged only at trace level.

pub mod cache;
pub mod config;
pub mod duckduckgo;
pub mod error;
pub mod http;
pub mod types;

use std::time::Duration;

pub use cache::{CacheKey, ResultCache};
pub use config::SearchConfig;
pub use duckduckgo::parse_results as parse_page;
pub use error::{Result, SearchError};
pub use types::SearchResult;

/// Reusable search client.
///
/// Cheap to share behind `&`; all methods take `&self`.
#[derive(Debug)]
pub struct SearchClient {
    config: SearchConfig,
    http: reqwest::Client,
    cache: Option<ResultCache>,
}

impl SearchClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let http = http::build_client(&config)?;
        let cache = (config.cache_ttl_seconds > 0)
            .then(|| ResultCache::new(config.cache_ttl_seconds));
        Ok(Self {
            config,
            http,
            cache,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search the web for `query`, returning at most `max_results` hits.
    ///
    /// Non-empty result sets are cached; empty ones are not, so a transient
    /// blank page is retried on the next call.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for a blank query,
    /// [`SearchError::Timeout`] when the call exceeds `timeout_seconds`, and
    /// any transport or parse error from the backend.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::Config("query must not be empty".into()));
        }

        let key = CacheKey::new(query, self.config.max_results, self.config.safe_search);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::debug!(count = hit.len(), "search cache hit");
                return Ok(hit);
            }
        }

        let limit = Duration::from_secs(self.config.timeout_seconds);
        let results = tokio::time::timeout(
            limit,
            duckduckgo::search(&self.http, query, &self.config),
        )
        .await
        .map_err(|_| {
            SearchError::Timeout(format!("exceeded {}s limit", self.config.timeout_seconds))
        })??;

        if let Some(cache) = &self.cache {
            if !results.is_empty() {
                cache.insert(key, results.clone()).await;
            }
        }

        Ok(results)
    }
}

/// One-shot search with a throwaway client.
///
/// # Errors
///
/// Same as [`SearchClient::new`] and [`SearchClient::search`].
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<SearchResult>> {
    SearchClient::new(config.clone())?.search(query).await
}
