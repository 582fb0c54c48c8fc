//! Client settings. The defaults suit a chat fallback: few results, a
//! short timeout, safe search on.

use std::time::Duration;

use crate::error::SearchError;

/// DuckDuckGo's JavaScript-free results endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Settings for a [`crate::SearchClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Results kept per query.
    pub max_results: usize,
    /// Per-request and per-search time limit, in seconds.
    pub timeout_seconds: u64,
    /// Send `kp=1` (strict filtering).
    pub safe_search: bool,
    /// Result cache lifetime in seconds; 0 turns the cache off.
    pub cache_ttl_seconds: u64,
    /// Fixed User-Agent; a browser string is chosen when unset.
    pub user_agent: Option<String>,
    /// Where queries are posted.
    pub endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 3,
            timeout_seconds: 8,
            safe_search: true,
            cache_ttl_seconds: 600,
            user_agent: None,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }
}

impl SearchConfig {
    /// The time limit as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Reject settings the client cannot run with.
    ///
    /// # Errors
    ///
    /// [`SearchError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SearchError> {
        let problem = if self.max_results == 0 {
            Some("max_results must be at least 1".to_owned())
        } else if self.timeout_seconds == 0 {
            Some("timeout_seconds must be at least 1".to_owned())
        } else if !is_http_url(&self.endpoint) {
            Some(format!("endpoint {:?} is not an http(s) URL", self.endpoint))
        } else {
            None
        };
        problem.map_or(Ok(()), |msg| Err(SearchError::Config(msg)))
    }
}

fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}
