//! HTTP endpoints
//!
//! The synthesis API plus the embedded reader page:
//! - `POST /tts` — one sentence in, base64 WAV out
//! - `GET /speakers` — voice roster
//! - `POST /full-document-tts` — export chunk with progress metadata
//! - `GET /` — the reader UI

use std::time::Instant;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tts_reader_core::Speaker;

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

/// The reader page, served at `/` with `__READER_CONFIG__` substituted
const READER_HTML: &str = include_str!("../assets/reader.html");

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    // JSON-escaped UTF-8 can take several bytes per character
    let body_limit = state.config.limits.max_text_chars * 6 + 4096;

    let mut router = Router::new()
        .route("/", get(index))
        .route("/tts", post(tts))
        .route("/speakers", get(speakers))
        .route("/full-document-tts", post(full_document_tts))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(body_limit));

    if state.config.server.cors_enabled {
        router = router.layer(cors_layer(&state));
    }

    router.with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        // Local single-user tool; open by default
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Synthesis request
#[derive(Debug, Deserialize)]
struct TtsRequest {
    text: Option<String>,
    speaker: Option<String>,
}

/// Synthesis response
#[derive(Debug, Serialize)]
struct TtsResponse {
    audio: String,
    format: &'static str,
}

/// Synthesize one sentence
async fn tts(
    State(state): State<AppState>,
    Json(request): Json<TtsRequest>,
) -> Result<Json<TtsResponse>, ApiError> {
    metrics::record_request("tts");
    state.check_rate_limit()?;

    let text = validate_text(&state, request.text.as_deref())?;
    let speaker = state.resolve_speaker(request.speaker.as_deref()).await;
    let audio = synthesize_base64(&state, text, &speaker).await?;

    Ok(Json(TtsResponse {
        audio,
        format: "wav",
    }))
}

/// Export chunk request
#[derive(Debug, Deserialize)]
struct FullDocumentRequest {
    text: Option<String>,
    speaker: Option<String>,
    chunk_index: Option<u32>,
    total_chunks: Option<u32>,
}

/// Export chunk response
#[derive(Debug, Serialize)]
struct FullDocumentResponse {
    audio: String,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunk_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_chunks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<f64>,
}

/// Synthesize one chunk of a full-document export
async fn full_document_tts(
    State(state): State<AppState>,
    Json(request): Json<FullDocumentRequest>,
) -> Result<Json<FullDocumentResponse>, ApiError> {
    metrics::record_request("full_document_tts");
    state.check_rate_limit()?;

    let text = validate_text(&state, request.text.as_deref())?;

    // The client chunks at the configured word budget; anything far past it
    // means a buggy or foreign client, not a document.
    let words = tts_reader_text::word_count(text);
    let budget = state.config.limits.words_per_chunk;
    if words > budget * 2 {
        metrics::record_error("invalid_request");
        return Err(ApiError::bad_request(format!(
            "Chunk too large: {} words (limit {})",
            words, budget
        )));
    }

    let speaker = state.resolve_speaker(request.speaker.as_deref()).await;
    let audio = synthesize_base64(&state, text, &speaker).await?;

    let (chunk_index, total_chunks) = match (request.chunk_index, request.total_chunks) {
        (Some(index), Some(total)) => (Some(index), Some(total)),
        _ => (None, None),
    };
    let progress = match (chunk_index, total_chunks) {
        (Some(index), Some(total)) if total > 0 => {
            let percent = (index + 1) as f64 / total as f64 * 100.0;
            Some((percent * 10.0).round() / 10.0)
        }
        _ => None,
    };

    Ok(Json(FullDocumentResponse {
        audio,
        format: "wav",
        chunk_index,
        total_chunks,
        progress,
    }))
}

/// List available voices
async fn speakers(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    metrics::record_request("speakers");

    let speakers = state.engine.speakers().await.map_err(|e| {
        metrics::record_error("engine");
        ApiError::from(e)
    })?;

    let names: Vec<&str> = speakers.iter().map(Speaker::name).collect();
    Ok(Json(serde_json::json!({ "speakers": names })))
}

/// Serve the reader UI
async fn index(State(state): State<AppState>) -> Html<String> {
    let reader = &state.config.reader;
    let config = serde_json::json!({
        "defaultSpeaker": state.config.engine.default_speaker,
        "prefetchCount": reader.prefetch_count,
        "baselineWpm": reader.baseline_wpm,
        "defaultWpm": reader.default_wpm,
        "minWpm": reader.min_wpm,
        "maxWpm": reader.max_wpm,
        "wordsPerChunk": state.config.limits.words_per_chunk,
    });

    Html(READER_HTML.replace("__READER_CONFIG__", &config.to_string()))
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check: ready once the engine answers its probe
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.probe().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "degraded",
                "engine": e.to_string(),
            })),
        ),
    }
}

/// Reject missing, empty, and oversized text
fn validate_text<'a>(state: &AppState, text: Option<&'a str>) -> Result<&'a str, ApiError> {
    let text = text.map(str::trim).unwrap_or("");
    if text.is_empty() {
        metrics::record_error("invalid_request");
        return Err(ApiError::bad_request("No text provided"));
    }

    let chars = text.chars().count();
    let limit = state.config.limits.max_text_chars;
    if chars > limit {
        metrics::record_error("invalid_request");
        return Err(ApiError::bad_request(format!(
            "Text too long: {} characters (limit {})",
            chars, limit
        )));
    }

    Ok(text)
}

/// Run synthesis and encode the result as a base64 WAV
async fn synthesize_base64(
    state: &AppState,
    text: &str,
    speaker: &Speaker,
) -> Result<String, ApiError> {
    let started = Instant::now();

    let clip = state.engine.synthesize(text, speaker).await.map_err(|e| {
        metrics::record_error("engine");
        tracing::error!(speaker = %speaker, "synthesis failed: {}", e);
        ApiError::from(e)
    })?;

    let wav = tts_reader_audio::encode_clip(&clip)?;
    metrics::record_synthesis(started.elapsed().as_secs_f64(), text.chars().count());
    tracing::debug!(
        speaker = %speaker,
        words = tts_reader_text::word_count(text),
        duration_ms = clip.duration().as_millis() as u64,
        "synthesized clip"
    );

    Ok(BASE64.encode(wav))
}
