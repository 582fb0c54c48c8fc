//! The chat session: one resolved reply per user message.

use tracing::{debug, info};

use crate::error::Result;
use crate::responder::{Reply, Responder};
use crate::session::{ChatTurn, ConversationSurface};
use crate::tts::SpeechSynthesizer;

/// Input line that lists recent turns instead of being answered.
pub const HISTORY_COMMAND: &str = "/history";

/// Input line that ends the session.
pub const QUIT_COMMAND: &str = "/quit";

/// Default number of turns listed by [`HISTORY_COMMAND`].
pub const DEFAULT_HISTORY_LIMIT: usize = 500;

/// Drives a [`ConversationSurface`] with replies from a [`Responder`].
///
/// Turns run strictly one after another; the next message is not read
/// until the previous reply (and its audio, if any) has been rendered.
pub struct Assistant<S> {
    responder: Responder,
    speech: Option<Box<dyn SpeechSynthesizer>>,
    surface: S,
    history_limit: usize,
}

impl<S: ConversationSurface> Assistant<S> {
    /// An assistant without speech.
    pub fn new(responder: Responder, surface: S) -> Self {
        Self {
            responder,
            speech: None,
            surface,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Speak each reply with `speech`.
    pub fn with_speech(mut self, speech: Box<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Cap the number of turns shown by [`HISTORY_COMMAND`].
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// The responder answering each message.
    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// The conversation surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consume the assistant, returning its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Answer one message.
    ///
    /// Order: record and show the user turn, resolve, show the reply,
    /// synthesize and show audio when available, then record the reply.
    ///
    /// # Errors
    ///
    /// Only surface failures are returned; resolution and synthesis never
    /// fail.
    pub async fn handle_turn(&mut self, message: &str) -> Result<Reply> {
        let user = ChatTurn::user(message);
        self.surface.append_turn(user.clone());
        self.surface.render(&user)?;

        let reply = self.responder.resolve_reply(message).await;
        debug!(source = ?reply.source, "reply resolved");

        let turn = ChatTurn::assistant(reply.text.clone());
        self.surface.render(&turn)?;

        if let Some(speech) = &self.speech {
            match speech.synthesize(&reply.text).await {
                Some(audio) => self.surface.render_audio(&audio)?,
                None => debug!("no audio for reply"),
            }
        }

        self.surface.append_turn(turn);
        Ok(reply)
    }

    /// Read and answer messages until input ends or [`QUIT_COMMAND`].
    ///
    /// Blank lines are ignored. Returns the number of answered messages.
    ///
    /// # Errors
    ///
    /// Returns the first surface failure.
    pub async fn run(&mut self) -> Result<usize> {
        let mut answered = 0;
        while let Some(line) = self.surface.next_message()? {
            let message = line.trim();
            match message {
                "" => continue,
                QUIT_COMMAND => break,
                HISTORY_COMMAND => {
                    let recent = self.surface.log().recent(self.history_limit).to_vec();
                    self.surface.render_history(&recent)?;
                }
                _ => {
                    self.handle_turn(message).await?;
                    answered += 1;
                }
            }
        }
        info!(answered, "session ended");
        Ok(answered)
    }
}
