//! Shared helpers for integration tests.

use parley::config::{TtsConfig, WebSearchConfig};
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A DuckDuckGo HTML page with two organic results. The second body is
/// longer than 100 characters.
pub(crate) const TWO_RESULTS_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<div class="result results_links web-result">
  <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=x">Rust Programming Language</a>
  <div class="result__snippet">A language empowering everyone to build reliable and efficient software.</div>
</div>
<div class="result results_links web-result">
  <a class="result__a" href="https://en.wikipedia.org/wiki/Rust_(programming_language)">Rust (programming language) - Wikipedia</a>
  <div class="result__snippet">Rust is a general-purpose programming language emphasizing performance, type safety, and concurrency. It enforces memory safety without a garbage collector.</div>
</div>
</body></html>"#;

/// A DuckDuckGo HTML page with no results.
pub(crate) const NO_RESULTS_HTML: &str =
    r#"<!DOCTYPE html><html><body><div class="no-results">No results.</div></body></html>"#;

/// Write a JSON dataset of `(question, answer)` pairs into `dir`.
pub(crate) fn write_dataset(dir: &Path, pairs: &[(&str, &str)]) -> PathBuf {
    let records: Vec<serde_json::Value> = pairs
        .iter()
        .map(|(q, a)| serde_json::json!({ "question": q, "answer": a }))
        .collect();
    let path = dir.join("conversations.json");
    std::fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();
    path
}

/// Search configuration pointed at a mock DuckDuckGo endpoint.
pub(crate) fn search_config(server: &MockServer) -> WebSearchConfig {
    WebSearchConfig {
        endpoint: Some(format!("{}/html/", server.uri())),
        timeout_seconds: 1,
        cache_ttl_seconds: 0,
        ..WebSearchConfig::default()
    }
}

/// Speech configuration pointed at a mock TTS endpoint.
pub(crate) fn tts_config(server: &MockServer, audio_dir: &Path) -> TtsConfig {
    TtsConfig {
        base_url: format!("{}/translate_tts", server.uri()),
        timeout_seconds: 2,
        audio_dir: Some(audio_dir.to_path_buf()),
        ..TtsConfig::default()
    }
}

/// Serve `html` for every search request.
pub(crate) async fn mount_search(server: &MockServer, html: &'static str) {
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}
