//! API error type
//!
//! Every failure leaves the service as an HTTP status plus a JSON body with
//! a single `error` message field; the reader skips the failed sentence and
//! keeps going.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tts_reader_audio::AudioError;
use tts_reader_engine::EngineError;

/// An error ready to be returned from a handler
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 400 with a message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 429 for rate-limited synthesis requests
    pub fn too_many_requests() -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "Request rate limit exceeded".to_string(),
        }
    }

    /// 503 when the engine cannot serve at all
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }

    /// 500 catch-all
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Status this error maps to
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Unavailable(message) => Self::service_unavailable(message),
            EngineError::Upstream { status, message } => Self {
                status: StatusCode::BAD_GATEWAY,
                message: format!("Upstream error ({}): {}", status, message),
            },
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<AudioError> for ApiError {
    fn from(err: AudioError) -> Self {
        Self::internal(err.to_string())
    }
}
