//! Configuration persistence and its effect on the assembled components.

use parley::AssistantConfig;
use parley::web::WebSearchFallback;

#[test]
fn test_defaults_survive_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = AssistantConfig::default();
    config.save_to_file(&path).unwrap();
    let loaded = AssistantConfig::from_file(&path).unwrap();

    assert_eq!(loaded.matcher.threshold, 0.6);
    assert_eq!(loaded.search.max_results, 3);
    assert_eq!(loaded.search.snippet_chars, 100);
    assert_eq!(loaded.tts.language, "en");
    assert_eq!(loaded.session.max_turns, 500);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[dataset]\npath = \"data/qa.json\"\n\n[search]\nenabled = false\n",
    )
    .unwrap();

    let config = AssistantConfig::from_file(&path).unwrap();
    assert_eq!(config.dataset.path, std::path::PathBuf::from("data/qa.json"));
    assert!(!config.search.enabled);
    assert!(config.tts.enabled);
    assert_eq!(config.matcher.threshold, 0.6);
}

#[test]
fn test_invalid_threshold_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[matcher]\nthreshold = 1.5\n").unwrap();
    assert!(AssistantConfig::from_file(&path).is_err());
}

#[test]
fn test_search_fallback_builds_from_config() {
    let mut config = AssistantConfig::default();
    config.search.endpoint = Some("http://127.0.0.1:9/html/".into());
    assert!(WebSearchFallback::from_config(&config.search).is_ok());

    config.search.endpoint = Some("ftp://example.com".into());
    assert!(WebSearchFallback::from_config(&config.search).is_err());
}
