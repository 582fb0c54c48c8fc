//! End-to-end behavior of the reply cascade: dataset, knowledge, web
//! search, fallback.

use crate::helpers::{
    NO_RESULTS_HTML, TWO_RESULTS_HTML, mount_search, search_config, write_dataset,
};
use parley::corpus::Corpus;
use parley::knowledge::DEFAULT_TOPICS;
use parley::matcher::DEFAULT_THRESHOLD;
use parley::responder::FALLBACK_REPLIES;
use parley::web::{ELLIPSIS, REPLY_HEADER, WebSearchFallback};
use parley::{ReplySource, Responder};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bike_replies() -> Vec<&'static str> {
    DEFAULT_TOPICS
        .iter()
        .find(|(topic, _)| *topic == "bikes")
        .map(|(_, replies)| replies.to_vec())
        .unwrap()
}

fn empty_corpus() -> Arc<Corpus> {
    Arc::new(Corpus::default())
}

// ─── Dataset stage ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_exact_stored_question_returns_stored_answer() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(
        dir.path(),
        &[
            ("what is a bike", "A bike has two wheels"),
            ("how do I bake bread", "Flour, water, salt, yeast."),
        ],
    );
    let responder = Responder::new(Arc::new(Corpus::load(&path, DEFAULT_THRESHOLD)));

    let reply = responder.resolve_reply("What is a bike").await;
    assert_eq!(reply.source, ReplySource::Dataset);
    assert_eq!(reply.text, "A bike has two wheels");
    assert!((reply.score.unwrap() - 1.0).abs() < 1e-9, "exact match scores 1.0");
}

#[tokio::test]
async fn test_dataset_hit_skips_web_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_RESULTS_HTML))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), &[("what is rust", "A systems language.")]);
    let web = WebSearchFallback::from_config(&search_config(&server)).unwrap();
    let responder =
        Responder::new(Arc::new(Corpus::load(&path, DEFAULT_THRESHOLD))).with_web_search(web);

    assert_eq!(responder.resolve("what is rust").await, "A systems language.");
}

#[tokio::test]
async fn test_malformed_dataset_degrades_to_no_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conversations.json");
    std::fs::write(&path, r#"[{"question": "hi"}]"#).unwrap();

    let corpus = Corpus::load(&path, DEFAULT_THRESHOLD);
    assert!(corpus.dataset().is_empty());
    assert!(!corpus.has_matcher(), "empty dataset must not be fitted");

    let reply = Responder::new(Arc::new(corpus)).resolve("hi").await;
    assert!(!reply.is_empty());
}

#[tokio::test]
async fn test_missing_dataset_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = Corpus::load(&dir.path().join("absent.json"), DEFAULT_THRESHOLD);
    assert!(corpus.best_match("anything").is_none());
}

// ─── Knowledge stage ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bikes_reply_from_knowledge_base() {
    let responder = Responder::new(empty_corpus());
    let reply = responder.resolve_reply("I love my bikes").await;
    assert_eq!(reply.source, ReplySource::Knowledge);
    assert!(
        bike_replies().contains(&reply.text.as_str()),
        "unexpected reply: {}",
        reply.text
    );
}

#[tokio::test]
async fn test_pythonic_does_not_match_python_topic() {
    let responder = Responder::new(empty_corpus());
    for _ in 0..10 {
        let reply = responder.resolve_reply("pythonic").await;
        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(FALLBACK_REPLIES.contains(&reply.text.as_str()));
    }
}

#[tokio::test]
async fn test_knowledge_beats_web_search_for_topic_questions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_RESULTS_HTML))
        .expect(0)
        .mount(&server)
        .await;

    let web = WebSearchFallback::from_config(&search_config(&server)).unwrap();
    let responder = Responder::new(empty_corpus()).with_web_search(web);
    let reply = responder.resolve_reply("what bikes should I buy").await;
    assert_eq!(reply.source, ReplySource::Knowledge);
}

// ─── Web search stage ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_question_renders_search_results_in_order() {
    let server = MockServer::start().await;
    mount_search(&server, TWO_RESULTS_HTML).await;

    let web = WebSearchFallback::from_config(&search_config(&server)).unwrap();
    let responder = Responder::new(empty_corpus()).with_web_search(web);
    let reply = responder.resolve_reply("what is rust").await;

    assert_eq!(reply.source, ReplySource::WebSearch);
    assert!(reply.text.starts_with(REPLY_HEADER));
    assert!(reply
        .text
        .contains("1. [Rust Programming Language](https://www.rust-lang.org/)"));
    let first = reply.text.find("1. [Rust Programming Language]").unwrap();
    let second = reply
        .text
        .find("2. [Rust (programming language) - Wikipedia]")
        .unwrap();
    assert!(first < second, "results must keep provider order");

    for line in reply.text.lines().filter(|l| l.ends_with(ELLIPSIS)) {
        let body = line.trim_end_matches(ELLIPSIS);
        assert!(body.chars().count() <= 100, "snippet too long: {body}");
    }
}

#[tokio::test]
async fn test_search_server_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let web = WebSearchFallback::from_config(&search_config(&server)).unwrap();
    let responder = Responder::new(empty_corpus()).with_web_search(web);
    let reply = responder.resolve_reply("what is rust").await;
    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(FALLBACK_REPLIES.contains(&reply.text.as_str()));
}

#[tokio::test]
async fn test_search_timeout_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(TWO_RESULTS_HTML)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let web = WebSearchFallback::from_config(&search_config(&server)).unwrap();
    let responder = Responder::new(empty_corpus()).with_web_search(web);
    let reply = responder.resolve_reply("what is rust").await;
    assert_eq!(reply.source, ReplySource::Fallback);
}

#[tokio::test]
async fn test_zero_results_falls_back() {
    let server = MockServer::start().await;
    mount_search(&server, NO_RESULTS_HTML).await;

    let web = WebSearchFallback::from_config(&search_config(&server)).unwrap();
    let responder = Responder::new(empty_corpus()).with_web_search(web);
    assert_eq!(
        responder.resolve_reply("who wrote this").await.source,
        ReplySource::Fallback
    );
}

#[tokio::test]
async fn test_statement_never_reaches_search_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_RESULTS_HTML))
        .expect(0)
        .mount(&server)
        .await;

    let web = WebSearchFallback::from_config(&search_config(&server)).unwrap();
    let responder = Responder::new(empty_corpus()).with_web_search(web);
    assert_eq!(
        responder.resolve_reply("tell me a joke").await.source,
        ReplySource::Fallback
    );
}

// ─── Totality ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_message_gets_a_non_empty_reply() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), &[("hello there", "Hi!")]);
    let responder = Responder::new(Arc::new(Corpus::load(&path, DEFAULT_THRESHOLD)));

    for message in ["", "   ", "hello there", "bikes", "python", "?!", "ünïcödé", "a"] {
        let reply = responder.resolve(message).await;
        assert!(!reply.trim().is_empty(), "empty reply for {message:?}");
    }
}

#[test]
fn test_shared_corpus_is_built_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), &[("ping", "pong")]);
    let first = Corpus::shared(&path, DEFAULT_THRESHOLD);
    let second = Corpus::shared(&dir.path().join("other.json"), 0.1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.dataset().len(), 1);
}
