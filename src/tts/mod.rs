//! Text-to-speech for assistant replies.
//!
//! Synthesis is best effort: [`SpeechSynthesizer::synthesize`] returns
//! `None` for empty text or any provider failure, and callers simply
//! omit audio for that turn.

pub mod google;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;

pub use google::GoogleTts;

/// MIME type of the audio produced by the bundled synthesizer.
pub const MP3_MIME_TYPE: &str = "audio/mpeg";

/// Encoded audio for one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    /// Encoded audio stream.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
}

/// A text-to-speech backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Convert `text` to audio, reporting why it could not.
    async fn try_synthesize(&self, text: &str) -> Result<SpeechAudio>;

    /// Convert `text` to audio, or `None` if there is nothing to say or
    /// the backend failed.
    async fn synthesize(&self, text: &str) -> Option<SpeechAudio> {
        if text.trim().is_empty() {
            return None;
        }
        match self.try_synthesize(text).await {
            Ok(audio) if !audio.bytes.is_empty() => Some(audio),
            Ok(_) => {
                warn!("speech synthesis returned no audio");
                None
            }
            Err(error) => {
                warn!(%error, "speech synthesis failed");
                None
            }
        }
    }
}
