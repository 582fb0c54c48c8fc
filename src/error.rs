//! Error types for the parley assistant.
//!
//! These errors live inside the pipeline stages. The public stage
//! boundaries log them and degrade to "no result", so none of them ever
//! reaches the person chatting.

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// The conversation dataset could not be read or parsed.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Knowledge base construction error.
    #[error("knowledge error: {0}")]
    Knowledge(String),

    /// Web search provider failure.
    #[error("search error: {0}")]
    Search(String),

    /// Text-to-speech provider failure.
    #[error("TTS error: {0}")]
    Tts(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Conversation surface (terminal I/O) error.
    #[error("surface error: {0}")]
    Surface(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<parley_search::SearchError> for AssistantError {
    fn from(err: parley_search::SearchError) -> Self {
        Self::Search(err.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AssistantError>;
