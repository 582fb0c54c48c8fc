//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate locations.
//!
//! # Environment Overrides
//!
//! - `PARLEY_CONFIG_DIR` overrides [`config_dir`]
//! - `PARLEY_CACHE_DIR` overrides [`cache_dir`]

use std::path::PathBuf;

/// Config directory holding `config.toml`.
///
/// Resolves to `dirs::config_dir()/parley/` by default.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("PARLEY_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("parley"))
        .unwrap_or_else(|| PathBuf::from("/tmp/parley-config"))
}

/// Cache directory for expendable output such as synthesized replies.
///
/// Resolves to `dirs::cache_dir()/parley/` by default.
#[must_use]
pub fn cache_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("PARLEY_CACHE_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::cache_dir()
        .map(|d| d.join("parley"))
        .unwrap_or_else(|| PathBuf::from("/tmp/parley-cache"))
}

/// Default location for rendered reply audio (`cache_dir()/audio/`).
#[must_use]
pub fn audio_dir() -> PathBuf {
    cache_dir().join("audio")
}
