//! Parley: a cascading text chat assistant.
//!
//! Each user message is answered by the first stage that has something
//! to say:
//!
//! - **Dataset**: TF-IDF cosine match against stored question/answer pairs
//! - **Knowledge**: whole-word topic lookup with canned replies
//! - **Web search**: DuckDuckGo results for question-like messages
//! - **Fallback**: a random generic reply
//!
//! Replies can optionally be spoken via Google Translate TTS. Every
//! provider failure degrades to "no answer from this stage"; resolving a
//! message never fails.

pub mod assistant;
pub mod config;
pub mod corpus;
pub mod dataset;
pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod parley_dirs;
pub mod responder;
pub mod session;
pub mod tts;
pub mod web;

pub use assistant::Assistant;
pub use config::AssistantConfig;
pub use corpus::Corpus;
pub use error::{AssistantError, Result};
pub use responder::{Reply, ReplySource, Responder};
pub use session::{ChatTurn, ConversationSurface, Role, TerminalSurface};
