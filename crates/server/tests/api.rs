//! End-to-end API tests
//!
//! Each test boots the full router on an ephemeral port with the silence
//! backend and exercises the HTTP surface the reader UI uses.

use std::net::SocketAddr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tts_reader_audio::{concat_clips, decode_wav};
use tts_reader_config::{BackendKind, Settings};
use tts_reader_server::{create_router, AppState};

fn silence_settings() -> Settings {
    let mut settings = Settings::default();
    settings.engine.backend = BackendKind::Silence;
    settings.server.rate_limit.enabled = false;
    settings
}

async fn spawn_app(settings: Settings) -> SocketAddr {
    let state = AppState::new(settings).expect("state builds");
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    addr
}

async fn post_json(addr: SocketAddr, path: &str, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{}{}", addr, path))
        .json(&body)
        .send()
        .await
        .expect("request sends")
}

#[tokio::test]
async fn tts_returns_decodable_wav() {
    let addr = spawn_app(silence_settings()).await;

    let response = post_json(
        addr,
        "/tts",
        serde_json::json!({ "text": "Hello there. General reading test.", "speaker": "p225" }),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["format"], "wav");

    let bytes = BASE64.decode(body["audio"].as_str().unwrap()).unwrap();
    let clip = decode_wav(&bytes).unwrap();
    assert_eq!(clip.sample_rate, 22050);
    assert!(!clip.is_empty());
}

#[tokio::test]
async fn tts_missing_text_is_rejected() {
    let addr = spawn_app(silence_settings()).await;

    let response = post_json(addr, "/tts", serde_json::json!({})).await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No text provided");

    let response = post_json(addr, "/tts", serde_json::json!({ "text": "   " })).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn tts_oversized_text_is_rejected() {
    let addr = spawn_app(silence_settings()).await;

    let long = "a".repeat(20_001);
    let response = post_json(addr, "/tts", serde_json::json!({ "text": long })).await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Text too long"));
}

#[tokio::test]
async fn tts_unknown_speaker_falls_back_to_default() {
    let addr = spawn_app(silence_settings()).await;

    let response = post_json(
        addr,
        "/tts",
        serde_json::json!({ "text": "Still speaks.", "speaker": "no-such-voice" }),
    )
    .await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn speakers_lists_roster() {
    let addr = spawn_app(silence_settings()).await;

    let response = reqwest::get(format!("http://{}/speakers", addr)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let speakers: Vec<&str> = body["speakers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(speakers.contains(&"p270"));
}

#[tokio::test]
async fn full_document_reports_progress() {
    let addr = spawn_app(silence_settings()).await;

    let response = post_json(
        addr,
        "/full-document-tts",
        serde_json::json!({
            "text": "Chunk two of four.",
            "speaker": "p270",
            "chunk_index": 1,
            "total_chunks": 4,
        }),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["chunk_index"], 1);
    assert_eq!(body["total_chunks"], 4);
    assert_eq!(body["progress"], 50.0);
}

#[tokio::test]
async fn full_document_without_chunk_metadata() {
    let addr = spawn_app(silence_settings()).await;

    let response = post_json(
        addr,
        "/full-document-tts",
        serde_json::json!({ "text": "A single unchunked export." }),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["format"], "wav");
    assert!(body.get("chunk_index").is_none());
    assert!(body.get("progress").is_none());
}

#[tokio::test]
async fn full_document_export_flow_concatenates() {
    let addr = spawn_app(silence_settings()).await;

    // ~1200 words, chunked the way the reader chunks before export
    let document = (0..1200)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let chunks = tts_reader_text::split_into_chunks(&document, 500);
    assert_eq!(chunks.len(), 3);

    let mut clips = Vec::new();
    for (index, chunk) in chunks.iter().enumerate() {
        let response = post_json(
            addr,
            "/full-document-tts",
            serde_json::json!({
                "text": chunk,
                "speaker": "p270",
                "chunk_index": index,
                "total_chunks": chunks.len(),
            }),
        )
        .await;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.unwrap();
        let bytes = BASE64.decode(body["audio"].as_str().unwrap()).unwrap();
        clips.push(decode_wav(&bytes).unwrap());
    }

    let combined = concat_clips(&clips).unwrap();
    let total: usize = clips.iter().map(|c| c.len()).sum();
    assert_eq!(combined.len(), total);
}

#[tokio::test]
async fn full_document_oversized_chunk_is_rejected() {
    let addr = spawn_app(silence_settings()).await;

    // Double the chunk budget plus a bit: a client that never chunked
    let oversized = (0..1100).map(|_| "word").collect::<Vec<_>>().join(" ");
    let response = post_json(
        addr,
        "/full-document-tts",
        serde_json::json!({ "text": oversized }),
    )
    .await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Chunk too large"));
}

#[tokio::test]
async fn rate_limit_rejects_floods() {
    let mut settings = silence_settings();
    settings.server.rate_limit.enabled = true;
    settings.server.rate_limit.requests_per_second = 1;
    settings.server.rate_limit.burst_multiplier = 1.0;
    let addr = spawn_app(settings).await;

    let first = post_json(addr, "/tts", serde_json::json!({ "text": "one." })).await;
    assert_eq!(first.status(), 200);

    let second = post_json(addr, "/tts", serde_json::json!({ "text": "two." })).await;
    assert_eq!(second.status(), 429);
}

#[tokio::test]
async fn index_serves_reader_ui() {
    let addr = spawn_app(silence_settings()).await;

    let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(response.status(), 200);

    let page = response.text().await.unwrap();
    assert!(page.contains("TTS Reader"));
    // Config is injected, not left as a placeholder
    assert!(!page.contains("__READER_CONFIG__"));
    assert!(page.contains("wordsPerChunk"));
}

#[tokio::test]
async fn health_and_ready_respond() {
    let addr = spawn_app(silence_settings()).await;

    let health = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(health.status(), 200);
    let body: serde_json::Value = health.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let ready = reqwest::get(format!("http://{}/ready", addr)).await.unwrap();
    assert_eq!(ready.status(), 200);
}
