//! Observability metrics
//!
//! Prometheus metrics endpoint for monitoring.

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global Prometheus handle
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder
///
/// Must be called once at startup before recording any metrics. Returns the
/// existing handle on repeat calls so tests can initialize freely.
pub fn init_metrics() -> PrometheusHandle {
    if let Some(handle) = METRICS_HANDLE.get() {
        return handle.clone();
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map(|handle| {
            register_default_metrics();
            handle
        });

    match handle {
        Ok(handle) => METRICS_HANDLE.get_or_init(|| handle).clone(),
        // A recorder already installed elsewhere in the process; render
        // through whichever handle won the race.
        Err(e) => {
            tracing::warn!("Prometheus recorder already installed: {}", e);
            METRICS_HANDLE
                .get_or_init(|| {
                    PrometheusBuilder::new()
                        .build_recorder()
                        .handle()
                })
                .clone()
        }
    }
}

/// Register default application metrics
fn register_default_metrics() {
    counter!("tts_reader_requests_total", "endpoint" => "tts").absolute(0);
    counter!("tts_reader_requests_total", "endpoint" => "full_document_tts").absolute(0);
    counter!("tts_reader_requests_total", "endpoint" => "speakers").absolute(0);

    histogram!("tts_reader_synthesis_duration_seconds").record(0.0);
    counter!("tts_reader_synthesized_chars_total").absolute(0);

    counter!("tts_reader_errors_total", "type" => "engine").absolute(0);
    counter!("tts_reader_errors_total", "type" => "invalid_request").absolute(0);
    counter!("tts_reader_errors_total", "type" => "rate_limit").absolute(0);
}

/// Record a request to an endpoint
pub fn record_request(endpoint: &'static str) {
    counter!("tts_reader_requests_total", "endpoint" => endpoint).increment(1);
}

/// Record a completed synthesis
pub fn record_synthesis(duration_secs: f64, chars: usize) {
    histogram!("tts_reader_synthesis_duration_seconds").record(duration_secs);
    counter!("tts_reader_synthesized_chars_total").increment(chars as u64);
}

/// Record an error by type
pub fn record_error(error_type: &'static str) {
    counter!("tts_reader_errors_total", "type" => error_type).increment(1);
}

/// Metrics endpoint handler
///
/// Returns Prometheus-formatted metrics.
pub async fn metrics_handler() -> impl IntoResponse {
    match METRICS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not initialized",
        )
            .into_response(),
    }
}
