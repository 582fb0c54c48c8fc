//! Response resolution: the ordered fallback cascade.
//!
//! Stages run in strict order and the first one with an answer wins:
//!
//! 1. **Dataset**: TF-IDF match against stored questions (only when a
//!    dataset is loaded)
//! 2. **Knowledge**: whole-word topic lookup
//! 3. **Web search**: only for question-like messages
//! 4. **Fallback**: a random generic reply
//!
//! Every stage reports absence instead of failing, so
//! [`Responder::resolve`] is total and always yields non-empty text.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::corpus::Corpus;
use crate::error::{AssistantError, Result};
use crate::knowledge::KnowledgeBase;
use crate::web::WebSearchFallback;

/// Generic replies used when nothing else answers.
pub const FALLBACK_REPLIES: [&str; 3] = [
    "Interesting question! Could you rephrase that?",
    "I'm still learning about that topic.",
    "Hmm, I'm not sure. Try asking about Python or bikes.",
];

/// Which stage produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// A stored dataset answer.
    Dataset,
    /// A knowledge base topic reply.
    Knowledge,
    /// Formatted web search results.
    WebSearch,
    /// The generic fallback pool.
    Fallback,
}

/// A resolved reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Reply text; never empty.
    pub text: String,
    /// Stage that answered.
    pub source: ReplySource,
    /// Similarity score, for dataset answers.
    pub score: Option<f64>,
}

impl Reply {
    fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
            score: None,
        }
    }
}

/// Runs the cascade for each message.
#[derive(Debug)]
pub struct Responder {
    corpus: Arc<Corpus>,
    knowledge: KnowledgeBase,
    web: Option<WebSearchFallback>,
    fallback: Vec<String>,
}

impl Responder {
    /// A responder with the built-in knowledge base and fallback pool and
    /// no web search.
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self {
            corpus,
            knowledge: KnowledgeBase::default(),
            web: None,
            fallback: FALLBACK_REPLIES.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Replace the knowledge base.
    pub fn with_knowledge(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = knowledge;
        self
    }

    /// Enable the web search stage.
    pub fn with_web_search(mut self, web: WebSearchFallback) -> Self {
        self.web = Some(web);
        self
    }

    /// Replace the fallback pool.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Config`] if `replies` is empty or holds a
    /// blank reply.
    pub fn with_fallback_replies(mut self, replies: Vec<String>) -> Result<Self> {
        if replies.is_empty() || replies.iter().any(|r| r.trim().is_empty()) {
            return Err(AssistantError::Config(
                "fallback replies must be non-empty and not blank".into(),
            ));
        }
        self.fallback = replies;
        Ok(self)
    }

    /// The corpus consulted by the dataset stage.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// The fallback pool.
    pub fn fallback_replies(&self) -> &[String] {
        &self.fallback
    }

    /// Resolve `message` to reply text.
    pub async fn resolve(&self, message: &str) -> String {
        self.resolve_reply(message).await.text
    }

    /// Resolve `message`, reporting which stage answered.
    pub async fn resolve_reply(&self, message: &str) -> Reply {
        let mut rng = StdRng::from_entropy();
        self.resolve_with_rng(message, &mut rng).await
    }

    /// Resolve `message` using `rng` for every random choice.
    pub async fn resolve_with_rng<R: Rng + Send>(&self, message: &str, rng: &mut R) -> Reply {
        trace!(message, "resolving");

        if let Some(hit) = self.corpus.best_match(message) {
            if !hit.answer.trim().is_empty() {
                debug!(index = hit.index, score = hit.score, "answered from dataset");
                return Reply {
                    text: hit.answer.to_owned(),
                    source: ReplySource::Dataset,
                    score: Some(hit.score),
                };
            }
        }

        if let Some(reply) = self.knowledge.lookup(message, rng) {
            debug!("answered from knowledge base");
            return Reply::new(reply, ReplySource::Knowledge);
        }

        if let Some(web) = &self.web {
            if let Some(reply) = web.search(message).await {
                debug!("answered from web search");
                return Reply::new(reply, ReplySource::WebSearch);
            }
        }

        let text = self
            .fallback
            .choose(rng)
            .map_or(FALLBACK_REPLIES[0], String::as_str);
        debug!("answered from fallback pool");
        Reply::new(text, ReplySource::Fallback)
    }
}
