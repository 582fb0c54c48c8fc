//! Conversation log and the surface that renders it.
//!
//! The log is append-only for the lifetime of a session. A
//! [`ConversationSurface`] is the UI boundary: it supplies user messages,
//! records turns, and renders text and audio. [`TerminalSurface`] is the
//! line-oriented implementation used by the `parley` binary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{AssistantError, Result};
use crate::tts::SpeechAudio;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person chatting.
    User,
    /// The assistant.
    Assistant,
}

impl Role {
    /// Label used when rendering.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Assistant => "parley",
        }
    }
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Author of the turn.
    pub role: Role,
    /// Message text (markdown for assistant replies).
    pub content: String,
    /// When the turn was created.
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// A turn stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// An assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Append-only, ordered session log.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<ChatTurn>,
}

impl ConversationLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end.
    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// All turns, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// The most recent `n` turns, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> &[ChatTurn] {
        &self.turns[self.turns.len().saturating_sub(n)..]
    }

    /// The newest turn.
    #[must_use]
    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    /// Number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether nothing has been said yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// UI collaborator for a chat session.
pub trait ConversationSurface {
    /// Record a turn in the session log.
    fn append_turn(&mut self, turn: ChatTurn);

    /// Display a turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn render(&mut self, turn: &ChatTurn) -> Result<()>;

    /// Present synthesized audio for the latest reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio cannot be delivered.
    fn render_audio(&mut self, audio: &SpeechAudio) -> Result<()>;

    /// Next message from the user, or `None` when input has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read.
    fn next_message(&mut self) -> Result<Option<String>>;

    /// Display earlier turns, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn render_history(&mut self, turns: &[ChatTurn]) -> Result<()> {
        for turn in turns {
            self.render(turn)?;
        }
        Ok(())
    }

    /// The session log.
    fn log(&self) -> &ConversationLog;
}

/// Line-oriented surface over any reader and writer.
///
/// Audio is written to `reply-NNNN.mp3` files in `audio_dir` and the path
/// is printed.
#[derive(Debug)]
pub struct TerminalSurface<R, W> {
    input: R,
    output: W,
    log: ConversationLog,
    audio_dir: PathBuf,
    audio_files: usize,
    echo_user: bool,
    prompt: String,
}

impl<R: BufRead, W: Write> TerminalSurface<R, W> {
    /// Build a surface writing audio into `audio_dir`.
    pub fn new(input: R, output: W, audio_dir: PathBuf) -> Self {
        Self {
            input,
            output,
            log: ConversationLog::new(),
            audio_dir,
            audio_files: 0,
            echo_user: false,
            prompt: "> ".to_owned(),
        }
    }

    /// Also print user turns (useful when input is not a terminal and the
    /// typed text is not already on screen).
    pub fn with_echo_user(mut self, echo: bool) -> Self {
        self.echo_user = echo;
        self
    }

    /// Set the input prompt. An empty prompt prints nothing.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// The output writer.
    pub fn output(&self) -> &W {
        &self.output
    }

    fn audio_extension(mime_type: &str) -> &'static str {
        match mime_type {
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/wav" | "audio/x-wav" => "wav",
            _ => "bin",
        }
    }
}

impl<R: BufRead, W: Write> ConversationSurface for TerminalSurface<R, W> {
    fn append_turn(&mut self, turn: ChatTurn) {
        self.log.append(turn);
    }

    fn render(&mut self, turn: &ChatTurn) -> Result<()> {
        if turn.role == Role::User && !self.echo_user {
            return Ok(());
        }
        writeln!(self.output, "{}: {}", turn.role.label(), turn.content.trim_end())?;
        writeln!(self.output)?;
        self.output.flush()?;
        Ok(())
    }

    fn render_audio(&mut self, audio: &SpeechAudio) -> Result<()> {
        std::fs::create_dir_all(&self.audio_dir)?;
        if self.audio_files == 0 {
            self.audio_files = highest_reply_number(&self.audio_dir);
        }
        self.audio_files += 1;
        let name = format!(
            "reply-{:04}.{}",
            self.audio_files,
            Self::audio_extension(audio.mime_type)
        );
        let path = self.audio_dir.join(name);
        std::fs::write(&path, &audio.bytes)?;
        writeln!(self.output, "🔊 {}", path.display())?;
        self.output.flush()?;
        Ok(())
    }

    fn next_message(&mut self) -> Result<Option<String>> {
        if !self.prompt.is_empty() {
            write!(self.output, "{}", self.prompt)?;
            self.output.flush()?;
        }
        let mut raw = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut raw)
            .map_err(|e| AssistantError::Surface(format!("failed to read input: {e}")))?;
        if read == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    fn render_history(&mut self, turns: &[ChatTurn]) -> Result<()> {
        if turns.is_empty() {
            writeln!(self.output, "(no messages yet)")?;
        }
        for turn in turns {
            writeln!(
                self.output,
                "[{}] {}: {}",
                turn.timestamp.format("%H:%M:%S"),
                turn.role.label(),
                turn.content.trim_end()
            )?;
        }
        writeln!(self.output)?;
        self.output.flush()?;
        Ok(())
    }

    fn log(&self) -> &ConversationLog {
        &self.log
    }
}

/// Highest `NNNN` among `reply-NNNN.*` files in `dir`, or 0.
fn highest_reply_number(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|entry| {
            let name = entry.ok()?.file_name();
            let stem = name.to_str()?.strip_prefix("reply-")?.split('.').next()?;
            stem.parse::<usize>().ok()
        })
        .max()
        .unwrap_or(0)
}
