//! Search failures. Messages never include the query text.

/// Why a search produced no results.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The time limit elapsed.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// Transport failure or non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The results page could not be understood.
    #[error("parse error: {0}")]
    Parse(String),

    /// Bad settings or an unusable query.
    #[error("config error: {0}")]
    Config(String),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, SearchError>;
