//! Google Translate speech endpoint client.
//!
//! The endpoint accepts at most about 100 characters per request, so text
//! is split into chunks at sentence and word boundaries, each chunk is
//! fetched in order, and the MP3 frames are concatenated.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, trace};

use super::{MP3_MIME_TYPE, SpeechAudio, SpeechSynthesizer};
use crate::config::TtsConfig;
use crate::error::{AssistantError, Result};

/// Public speech endpoint.
pub const DEFAULT_BASE_URL: &str = "https://translate.google.com/translate_tts";

/// Longest chunk sent in one request, in characters.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Client for the Google Translate speech endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTts {
    client: reqwest::Client,
    base_url: String,
    language: String,
    timeout: Duration,
}

impl GoogleTts {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Tts`] if the HTTP client cannot be built.
    pub fn new(config: &TtsConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("parley/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AssistantError::Tts(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            language: config.language.clone(),
            timeout,
        })
    }

    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let total_s = total.to_string();
        let idx_s = idx.to_string();
        let len_s = chunk.chars().count().to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", chunk),
                ("total", total_s.as_str()),
                ("idx", idx_s.as_str()),
                ("textlen", len_s.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AssistantError::Tts(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AssistantError::Tts(format!("HTTP error: {e}")))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AssistantError::Tts(format!("response read failed: {e}")))?;
        trace!(idx, bytes = bytes.len(), "speech chunk received");
        Ok(bytes.to_vec())
    }

    async fn fetch_all(&self, chunks: &[String]) -> Result<Vec<u8>> {
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let request = self.fetch_chunk(chunk, idx, chunks.len());
            let bytes = tokio::time::timeout(self.timeout, request)
                .await
                .map_err(|_| {
                    AssistantError::Tts(format!(
                        "chunk {idx} timed out after {}s",
                        self.timeout.as_secs()
                    ))
                })??;
            if bytes.is_empty() {
                return Err(AssistantError::Tts(format!("chunk {idx} returned no audio")));
            }
            audio.extend_from_slice(&bytes);
        }
        Ok(audio)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn try_synthesize(&self, text: &str) -> Result<SpeechAudio> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(AssistantError::Tts("nothing to speak".into()));
        }
        debug!(chunks = chunks.len(), "synthesizing reply");

        let bytes = self.fetch_all(&chunks).await?;

        Ok(SpeechAudio {
            bytes,
            mime_type: MP3_MIME_TYPE,
        })
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Sentences end at a newline, or at `.`, `!` or `?` followed by
/// whitespace or the end of text, so URLs and `...` stay intact. Within a
/// sentence words are packed greedily and a single word longer than
/// `max_chars` is cut. Chunks without any letter or digit are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();

    for sentence in sentences(text) {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in sentence.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                chunks.push(word.drain(..max_chars).collect());
            }
            if word.is_empty() {
                continue;
            }

            let extra = if current.is_empty() { word.len() } else { word.len() + 1 };
            if current_len + extra > max_chars {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        if !current.is_empty() {
            chunks.push(current);
        }
    }

    chunks.retain(|c| c.chars().any(char::is_alphanumeric));
    chunks
}

fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let ends = c == '\n'
            || (matches!(c, '.' | '!' | '?')
                && chars.peek().is_none_or(|&(_, next)| next.is_whitespace()));
        if ends {
            let end = i + c.len_utf8();
            out.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}
