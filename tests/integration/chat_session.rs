//! Full chat sessions over the terminal surface, with speech.

use crate::helpers::tts_config;
use parley::corpus::Corpus;
use parley::tts::GoogleTts;
use parley::{Assistant, ConversationSurface, Responder, Role, TerminalSurface};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

type MemorySurface = TerminalSurface<Cursor<Vec<u8>>, Vec<u8>>;

fn surface(input: &str, audio_dir: &Path) -> MemorySurface {
    TerminalSurface::new(
        Cursor::new(input.as_bytes().to_vec()),
        Vec::new(),
        audio_dir.to_path_buf(),
    )
    .with_prompt("")
}

fn responder() -> Responder {
    Responder::new(Arc::new(Corpus::default()))
}

#[tokio::test]
async fn test_session_writes_audio_for_each_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("tl", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3frame".to_vec()))
        .mount(&server)
        .await;

    let audio_dir = tempfile::tempdir().unwrap();
    let tts = GoogleTts::new(&tts_config(&server, audio_dir.path())).unwrap();
    let mut assistant = Assistant::new(
        responder(),
        surface("tell me about bikes\nand python\n", audio_dir.path()),
    )
    .with_speech(Box::new(tts));

    assert_eq!(assistant.run().await.unwrap(), 2);

    let surface = assistant.into_surface();
    assert_eq!(surface.log().len(), 4);
    let audio = std::fs::read(audio_dir.path().join("reply-0002.mp3")).unwrap();
    assert!(!audio.is_empty());
    assert!(
        audio.chunks(8).all(|frame| frame == b"ID3frame"),
        "chunk audio should be concatenated"
    );
    let out = String::from_utf8(surface.output().clone()).unwrap();
    assert!(out.contains("parley: "), "reply should be rendered: {out}");
    assert!(out.contains("reply-0001.mp3"));
}

#[tokio::test]
async fn test_speech_outage_renders_text_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let audio_dir = tempfile::tempdir().unwrap();
    let tts = GoogleTts::new(&tts_config(&server, audio_dir.path())).unwrap();
    let mut assistant =
        Assistant::new(responder(), surface("python\n", audio_dir.path())).with_speech(Box::new(tts));

    assert_eq!(assistant.run().await.unwrap(), 1);

    let surface = assistant.into_surface();
    let out = String::from_utf8(surface.output().clone()).unwrap();
    assert!(out.contains("Python is my favorite"));
    assert!(!out.contains("🔊"), "no audio should be rendered");
    assert_eq!(std::fs::read_dir(audio_dir.path()).unwrap().count(), 0);
    assert_eq!(surface.log().last().unwrap().role, Role::Assistant);
}

#[tokio::test]
async fn test_history_command_lists_previous_turns() {
    let audio_dir = tempfile::tempdir().unwrap();
    let mut assistant = Assistant::new(
        responder(),
        surface("bikes\n/history\n/quit\nnever read\n", audio_dir.path()),
    );

    assert_eq!(assistant.run().await.unwrap(), 1);

    let surface = assistant.into_surface();
    let out = String::from_utf8(surface.output().clone()).unwrap();
    assert!(out.contains("you: bikes"));
    assert_eq!(surface.log().len(), 2, "commands are not logged as turns");
}

#[tokio::test]
async fn test_log_order_is_user_then_assistant() {
    let audio_dir = tempfile::tempdir().unwrap();
    let mut assistant = Assistant::new(responder(), surface("one\n\ntwo\n", audio_dir.path()));
    assistant.run().await.unwrap();

    let roles: Vec<Role> = assistant
        .surface()
        .log()
        .turns()
        .iter()
        .map(|t| t.role)
        .collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
}
