//! Web search fallback for question-like messages.
//!
//! Triggered when the lowercased message contains an interrogative word
//! anywhere (substring, not whole-word). Results are rendered as a short
//! markdown list. Every provider failure, including a timeout, becomes
//! "no result".

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::WebSearchConfig;
use crate::error::Result;

pub use parley_search::SearchResult;

/// Words whose presence marks a message as a question.
pub const QUESTION_WORDS: [&str; 6] = ["what", "when", "where", "how", "why", "who"];

/// First line of every search reply.
pub const REPLY_HEADER: &str = "🔍 Here's what I found:";

/// Default number of body characters kept per result.
pub const DEFAULT_SNIPPET_CHARS: usize = 100;

/// Marker appended after each truncated body.
pub const ELLIPSIS: &str = "...";

/// A source of web search results.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return up to `max_results` results for `query`.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

#[async_trait]
impl SearchProvider for parley_search::SearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let mut results = parley_search::SearchClient::search(self, query).await?;
        results.truncate(max_results);
        Ok(results)
    }
}

/// Whether `message` contains any of [`QUESTION_WORDS`].
pub fn is_question(message: &str) -> bool {
    let lowered = message.to_lowercase();
    QUESTION_WORDS.iter().any(|w| lowered.contains(w))
}

/// Render results as the reply text.
///
/// Each result becomes `"{n}. [{title}]({href})"` followed by at most
/// `snippet_chars` characters of its body, an ellipsis and a blank line.
pub fn format_results(results: &[SearchResult], snippet_chars: usize) -> String {
    let mut reply = format!("{REPLY_HEADER}\n\n");
    for (i, r) in results.iter().enumerate() {
        let snippet: String = r.body.chars().take(snippet_chars).collect();
        reply.push_str(&format!(
            "{}. [{}]({})\n{snippet}{ELLIPSIS}\n\n",
            i + 1,
            r.title,
            r.href
        ));
    }
    reply
}

/// The web search stage of the responder.
pub struct WebSearchFallback {
    provider: Box<dyn SearchProvider>,
    max_results: usize,
    snippet_chars: usize,
    timeout: Duration,
}

impl std::fmt::Debug for WebSearchFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSearchFallback")
            .field("max_results", &self.max_results)
            .field("snippet_chars", &self.snippet_chars)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl WebSearchFallback {
    /// Wrap `provider` with the stock limits: 3 results, 100-character
    /// snippets, 8 second timeout.
    pub fn new(provider: Box<dyn SearchProvider>) -> Self {
        Self {
            provider,
            max_results: 3,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            timeout: Duration::from_secs(8),
        }
    }

    /// Build a DuckDuckGo-backed fallback from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the search client cannot be constructed.
    pub fn from_config(config: &WebSearchConfig) -> Result<Self> {
        let client = parley_search::SearchClient::new(config.to_client_config())?;
        Ok(Self::new(Box::new(client))
            .with_max_results(config.max_results)
            .with_snippet_chars(config.snippet_chars)
            .with_timeout(Duration::from_secs(config.timeout_seconds)))
    }

    /// Set the maximum number of results shown.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set how many body characters each result keeps.
    pub fn with_snippet_chars(mut self, snippet_chars: usize) -> Self {
        self.snippet_chars = snippet_chars;
        self
    }

    /// Set the upper bound on one provider call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search the web for a question-like `message`.
    ///
    /// Returns `None` without calling the provider when `message` is not a
    /// question, and `None` on provider failure, timeout, or zero results.
    pub async fn search(&self, message: &str) -> Option<String> {
        if !is_question(message) {
            return None;
        }

        let call = self.provider.search(message, self.max_results);
        let results = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(results)) => results,
            Ok(Err(error)) => {
                warn!(%error, "web search failed");
                return None;
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "web search timed out");
                return None;
            }
        };

        if results.is_empty() {
            debug!("web search returned no results");
            return None;
        }

        let shown = &results[..results.len().min(self.max_results)];
        Some(format_results(shown, self.snippet_chars))
    }
}
