//! Application state
//!
//! Shared state across all handlers: configuration, the speech backend, the
//! rate limiter, and the lazily fetched speaker roster.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tts_reader_config::{BackendKind, Settings};
use tts_reader_core::Speaker;
use tts_reader_engine::{
    CachedBackend, EngineError, EspeakBackend, HttpBackend, SilenceBackend, SpeechBackend,
};

use crate::error::ApiError;
use crate::rate_limit::RateLimiter;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Settings>,
    /// Speech backend
    pub engine: Arc<dyn SpeechBackend>,
    limiter: Arc<Mutex<RateLimiter>>,
    roster: Arc<OnceCell<Vec<Speaker>>>,
}

impl AppState {
    /// Create application state from settings
    pub fn new(config: Settings) -> Result<Self, EngineError> {
        let engine = build_backend(&config)?;
        let limiter = RateLimiter::new(config.server.rate_limit.clone());

        Ok(Self {
            config: Arc::new(config),
            engine,
            limiter: Arc::new(Mutex::new(limiter)),
            roster: Arc::new(OnceCell::new()),
        })
    }

    /// Consume a rate limit token or reject the request
    pub fn check_rate_limit(&self) -> Result<(), ApiError> {
        self.limiter.lock().check().map_err(|_| {
            crate::metrics::record_error("rate_limit");
            ApiError::too_many_requests()
        })
    }

    /// Resolve a requested speaker name against the backend roster.
    ///
    /// Unknown or missing names resolve to the configured default speaker;
    /// a roster that cannot be fetched resolves the same way, leaving the
    /// failure to the synthesis call itself.
    pub async fn resolve_speaker(&self, requested: Option<&str>) -> Speaker {
        let default = Speaker::new(self.config.engine.default_speaker.clone());

        let requested = match requested {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => return default,
        };

        let engine = Arc::clone(&self.engine);
        let roster = self
            .roster
            .get_or_try_init(|| async move { engine.speakers().await })
            .await;

        match roster {
            Ok(speakers) if speakers.iter().any(|s| s.name() == requested) => {
                Speaker::new(requested)
            }
            Ok(_) => {
                tracing::debug!(speaker = requested, "unknown speaker, using default");
                default
            }
            Err(e) => {
                tracing::warn!("could not fetch speaker roster: {}", e);
                default
            }
        }
    }
}

/// Build the configured speech backend, wrapped in the synthesis cache
fn build_backend(config: &Settings) -> Result<Arc<dyn SpeechBackend>, EngineError> {
    let engine = &config.engine;

    let backend: Arc<dyn SpeechBackend> = match engine.backend {
        BackendKind::Espeak => Arc::new(EspeakBackend::new(
            &engine.espeak_binary,
            &engine.espeak_voice,
            engine.sample_rate,
        )),
        BackendKind::Http => Arc::new(HttpBackend::new(
            &engine.upstream_url,
            engine.sample_rate,
            Duration::from_secs(config.server.timeout_seconds),
        )?),
        BackendKind::Silence => Arc::new(SilenceBackend::new(engine.sample_rate)),
    };

    if engine.cache_capacity > 0 {
        Ok(Arc::new(CachedBackend::new(backend, engine.cache_capacity)))
    } else {
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silence_settings() -> Settings {
        let mut settings = Settings::default();
        settings.engine.backend = BackendKind::Silence;
        settings
    }

    #[tokio::test]
    async fn test_known_speaker_resolves() {
        let state = AppState::new(silence_settings()).unwrap();
        let speaker = state.resolve_speaker(Some("p225")).await;
        assert_eq!(speaker.name(), "p225");
    }

    #[tokio::test]
    async fn test_unknown_speaker_falls_back_to_default() {
        let state = AppState::new(silence_settings()).unwrap();
        let speaker = state.resolve_speaker(Some("not-a-voice")).await;
        assert_eq!(speaker.name(), "p270");
    }

    #[tokio::test]
    async fn test_missing_speaker_uses_default() {
        let state = AppState::new(silence_settings()).unwrap();
        assert_eq!(state.resolve_speaker(None).await.name(), "p270");
        assert_eq!(state.resolve_speaker(Some("  ")).await.name(), "p270");
    }
}
