//! Static topic knowledge base.
//!
//! Each topic key is matched as a whole word in the lowercased message;
//! the first declared topic that matches wins, and one of its replies is
//! picked at random.

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{AssistantError, Result};

/// Built-in topics, in match order.
pub const DEFAULT_TOPICS: &[(&str, &[&str])] = &[
    (
        "bikes",
        &[
            "🚲 Bikes are awesome! I know about:\n- Road bikes\n- Mountain bikes\n- Electric bikes",
            "Cycling fan here! Ask me about bike maintenance or types!",
        ],
    ),
    (
        "python",
        &["🐍 Python is my favorite! Try:\n- [Python Docs](https://docs.python.org)\n- [Real Python](https://realpython.com)"],
    ),
];

/// A topic key and its non-empty reply set.
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    topic: String,
    replies: Vec<String>,
    pattern: Regex,
}

impl KnowledgeEntry {
    /// Build an entry.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Knowledge`] if `replies` is empty or the
    /// topic is blank.
    pub fn new(topic: &str, replies: Vec<String>) -> Result<Self> {
        let topic = topic.trim().to_lowercase();
        if topic.is_empty() {
            return Err(AssistantError::Knowledge("topic must not be empty".into()));
        }
        if replies.is_empty() {
            return Err(AssistantError::Knowledge(format!(
                "topic {topic:?} has no replies"
            )));
        }
        if replies.iter().any(|r| r.trim().is_empty()) {
            return Err(AssistantError::Knowledge(format!(
                "topic {topic:?} has a blank reply"
            )));
        }
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&topic)))
            .map_err(|e| AssistantError::Knowledge(format!("topic {topic:?}: {e}")))?;
        Ok(Self {
            topic,
            replies,
            pattern,
        })
    }

    /// Lowercased topic key.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Candidate replies.
    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    /// Whether the lowercased `message` mentions this topic as a whole word.
    pub fn matches(&self, lowered_message: &str) -> bool {
        self.pattern.is_match(lowered_message)
    }
}

/// Ordered collection of [`KnowledgeEntry`]s.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Build from explicit entries, keeping their order.
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Entries in match order.
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// First entry whose topic appears in `message`.
    pub fn find_topic(&self, message: &str) -> Option<&KnowledgeEntry> {
        let lowered = message.to_lowercase();
        self.entries.iter().find(|e| e.matches(&lowered))
    }

    /// A random reply from the first matching topic.
    pub fn lookup<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> Option<&str> {
        let entry = self.find_topic(message)?;
        debug!(topic = entry.topic(), "knowledge topic matched");
        entry.replies.choose(rng).map(String::as_str)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        let entries = DEFAULT_TOPICS
            .iter()
            .filter_map(|(topic, replies)| {
                let replies = replies.iter().map(|r| (*r).to_owned()).collect();
                match KnowledgeEntry::new(topic, replies) {
                    Ok(entry) => Some(entry),
                    Err(error) => {
                        warn!(topic, %error, "skipping built-in knowledge topic");
                        None
                    }
                }
            })
            .collect();
        Self { entries }
    }
}
