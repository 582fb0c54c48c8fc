//! Configuration types for the assistant.
//!
//! Every field has a default, and the defaults reproduce the stock
//! behaviour, so running without a config file is the normal case.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AssistantError, Result};

/// Top-level assistant configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Question/answer dataset location.
    pub dataset: DatasetConfig,
    /// Similarity matcher settings.
    pub matcher: MatcherConfig,
    /// Web search fallback settings.
    pub search: WebSearchConfig,
    /// Text-to-speech settings.
    pub tts: TtsConfig,
    /// Terminal session settings.
    pub session: SessionConfig,
}

/// Dataset file configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the JSON dataset. Relative paths resolve against the
    /// working directory.
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("conversations.json"),
        }
    }
}

/// Similarity matcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// A stored answer is used only when cosine similarity is strictly
    /// greater than this value.
    pub threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: crate::matcher::DEFAULT_THRESHOLD,
        }
    }
}

/// Web search fallback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    /// Whether question-like messages may go to the web.
    pub enabled: bool,
    /// Maximum number of results shown in a reply.
    pub max_results: usize,
    /// Characters of each result body kept before the ellipsis.
    pub snippet_chars: usize,
    /// Upper bound on one search call, in seconds.
    pub timeout_seconds: u64,
    /// Request safe-search filtering.
    pub safe_search: bool,
    /// Result cache lifetime in seconds (0 disables the cache).
    pub cache_ttl_seconds: u64,
    /// Override for the search endpoint (testing, proxies).
    pub endpoint: Option<String>,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_results: 3,
            snippet_chars: crate::web::DEFAULT_SNIPPET_CHARS,
            timeout_seconds: 8,
            safe_search: true,
            cache_ttl_seconds: 600,
            endpoint: None,
        }
    }
}

impl WebSearchConfig {
    /// Translate into the search crate's client configuration.
    pub fn to_client_config(&self) -> parley_search::SearchConfig {
        let mut config = parley_search::SearchConfig {
            max_results: self.max_results,
            timeout_seconds: self.timeout_seconds,
            safe_search: self.safe_search,
            cache_ttl_seconds: self.cache_ttl_seconds,
            ..Default::default()
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        config
    }
}

/// Text-to-speech configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Whether replies are spoken.
    pub enabled: bool,
    /// Language code sent to the speech service.
    pub language: String,
    /// Speech service endpoint.
    pub base_url: String,
    /// Upper bound on one synthesis call, in seconds.
    pub timeout_seconds: u64,
    /// Where the terminal surface writes reply audio.
    /// `None` uses the platform cache directory.
    pub audio_dir: Option<PathBuf>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "en".to_owned(),
            base_url: crate::tts::google::DEFAULT_BASE_URL.to_owned(),
            timeout_seconds: 8,
            audio_dir: None,
        }
    }
}

impl TtsConfig {
    /// Resolved audio output directory.
    pub fn audio_dir(&self) -> PathBuf {
        self.audio_dir
            .clone()
            .unwrap_or_else(crate::parley_dirs::audio_dir)
    }
}

/// Terminal session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Most recent turns shown by the `/history` command.
    pub max_turns: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_turns: 500 }
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// [`validate`](Self::validate).
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| AssistantError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AssistantError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config file path: `config_dir()/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::parley_dirs::config_dir().join("config.toml")
    }

    /// Reject values no stage can work with.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.matcher.threshold) {
            return Err(AssistantError::Config(
                "matcher.threshold must be within 0.0..=1.0".into(),
            ));
        }
        if self.search.max_results == 0 {
            return Err(AssistantError::Config(
                "search.max_results must be greater than 0".into(),
            ));
        }
        if self.search.timeout_seconds == 0 {
            return Err(AssistantError::Config(
                "search.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.tts.timeout_seconds == 0 {
            return Err(AssistantError::Config(
                "tts.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.tts.language.trim().is_empty() {
            return Err(AssistantError::Config("tts.language must not be empty".into()));
        }
        Ok(())
    }
}
