//! Search result record.

use serde::{Deserialize, Serialize};

/// A single web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title as shown by the search engine.
    pub title: String,
    /// Destination URL, with engine redirect wrappers removed.
    pub href: String,
    /// Text snippet summarising the page.
    pub body: String,
}

impl SearchResult {
    /// Build a result from its three fields.
    pub fn new(
        title: impl Into<String>,
        href: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            body: body.into(),
        }
    }
}
