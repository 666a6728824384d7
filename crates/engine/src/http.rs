//! Upstream HTTP backend
//!
//! Forwards synthesis requests to a Coqui-compatible server speaking the
//! same `{text, speaker}` / `{audio, format}` JSON as this service, so the
//! model can keep running in a separate process.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use tts_reader_audio::decode_wav;
use tts_reader_core::{AudioClip, Speaker};

use crate::{EngineError, SpeechBackend};

#[derive(Debug, Deserialize)]
struct SynthesisReply {
    audio: String,
    format: String,
}

#[derive(Debug, Deserialize)]
struct SpeakersReply {
    #[serde(default)]
    speakers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: String,
}

/// Backend that proxies to an upstream synthesis server
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    sample_rate: u32,
}

impl HttpBackend {
    /// Create a backend for the given upstream
    pub fn new(
        base_url: impl Into<String>,
        sample_rate: u32,
        timeout: Duration,
    ) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            sample_rate,
        })
    }

    async fn upstream_error(status: u16, response: reqwest::Response) -> EngineError {
        let message = match response.json::<ErrorReply>().await {
            Ok(body) => body.error,
            Err(_) => "upstream returned no error detail".to_string(),
        };
        EngineError::Upstream { status, message }
    }
}

#[async_trait]
impl SpeechBackend for HttpBackend {
    async fn synthesize(&self, text: &str, speaker: &Speaker) -> Result<AudioClip, EngineError> {
        let response = self
            .client
            .post(format!("{}/tts", self.base_url))
            .json(&serde_json::json!({
                "text": text,
                "speaker": speaker.name(),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::upstream_error(status.as_u16(), response).await);
        }

        let reply: SynthesisReply = response.json().await?;
        if reply.format != "wav" {
            return Err(EngineError::Synthesis(format!(
                "upstream produced unsupported format: {}",
                reply.format
            )));
        }

        let bytes = BASE64
            .decode(reply.audio.as_bytes())
            .map_err(|e| EngineError::Synthesis(format!("invalid base64 audio: {}", e)))?;

        Ok(decode_wav(&bytes)?)
    }

    async fn speakers(&self) -> Result<Vec<Speaker>, EngineError> {
        let response = self
            .client
            .get(format!("{}/speakers", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::upstream_error(status.as_u16(), response).await);
        }

        let reply: SpeakersReply = response.json().await?;
        Ok(reply.speakers.into_iter().map(Speaker::from).collect())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
