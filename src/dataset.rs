//! Question/answer dataset loading.
//!
//! The dataset is a JSON array of `{"question": ..., "answer": ...}`
//! records. Questions are lowercased on load; answers are kept verbatim.
//! A missing or malformed file yields an empty dataset, which callers
//! treat as "no dataset available".

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{AssistantError, Result};

/// One stored question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationPair {
    /// Lowercased question text.
    pub question: String,
    /// Answer returned when the question matches.
    pub answer: String,
}

impl ConversationPair {
    /// Build a pair, lowercasing the question.
    pub fn new(question: &str, answer: impl Into<String>) -> Self {
        Self {
            question: question.to_lowercase(),
            answer: answer.into(),
        }
    }
}

/// Immutable, index-aligned collection of [`ConversationPair`]s.
///
/// Duplicate questions are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pairs: Vec<ConversationPair>,
}

impl Dataset {
    /// Load the dataset at `path`.
    ///
    /// Never fails: any read or parse problem is logged and an empty
    /// dataset is returned.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(dataset) => {
                info!(pairs = dataset.len(), path = %path.display(), "dataset loaded");
                dataset
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "dataset unavailable, continuing without it");
                Self::default()
            }
        }
    }

    /// Load the dataset at `path`, reporting why it is unusable.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Io`] if the file cannot be read and
    /// [`AssistantError::Dataset`] if it is not an array of records with
    /// string `question` and `answer` fields.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a dataset from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Dataset`] on malformed structure or
    /// missing fields. One bad record rejects the whole file.
    pub fn from_json(content: &str) -> Result<Self> {
        let records: Vec<ConversationPair> =
            serde_json::from_str(content).map_err(|e| AssistantError::Dataset(e.to_string()))?;
        Ok(Self::from_pairs(records))
    }

    /// Build a dataset from pairs, lowercasing each question.
    pub fn from_pairs(pairs: impl IntoIterator<Item = ConversationPair>) -> Self {
        let pairs = pairs
            .into_iter()
            .map(|p| ConversationPair {
                question: p.question.to_lowercase(),
                answer: p.answer,
            })
            .collect();
        Self { pairs }
    }

    /// All pairs in file order.
    pub fn pairs(&self) -> &[ConversationPair] {
        &self.pairs
    }

    /// Questions in file order.
    pub fn questions(&self) -> Vec<&str> {
        self.pairs.iter().map(|p| p.question.as_str()).collect()
    }

    /// Answers in file order, aligned with [`questions`](Self::questions).
    pub fn answers(&self) -> Vec<&str> {
        self.pairs.iter().map(|p| p.answer.as_str()).collect()
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pairs are available.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
