//! Speech synthesis backends
//!
//! The synthesis engine is an opaque external dependency reached through the
//! [`SpeechBackend`] trait:
//! - **espeak**: spawns a local `espeak-ng` process per request
//! - **http**: forwards requests to an upstream Coqui-compatible server
//! - **silence**: deterministic stub for development and tests
//!
//! [`CachedBackend`] wraps any of them with an LRU keyed on text, speaker,
//! and sample rate.

mod cache;
mod espeak;
mod http;
mod silence;

pub use cache::CachedBackend;
pub use espeak::EspeakBackend;
pub use http::HttpBackend;
pub use silence::SilenceBackend;

use async_trait::async_trait;
use thiserror::Error;
use tts_reader_audio::AudioError;
use tts_reader_core::{AudioClip, Speaker};

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine cannot serve requests at all
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    /// Synthesis of a specific request failed
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// The upstream server answered with an error status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Backend produced audio this service cannot parse
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Speech backend trait
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Synthesize text with the given speaker
    async fn synthesize(&self, text: &str, speaker: &Speaker) -> Result<AudioClip, EngineError>;

    /// List the voices this backend offers
    async fn speakers(&self) -> Result<Vec<Speaker>, EngineError>;

    /// Output sample rate
    fn sample_rate(&self) -> u32;

    /// Readiness probe; by default the backend is ready if it can list voices
    async fn probe(&self) -> Result<(), EngineError> {
        self.speakers().await.map(|_| ())
    }
}
