//! Silence backend for development and tests
//!
//! Produces silent clips whose length tracks the input text (~50 ms per
//! character), so timing-dependent code paths behave like a real engine
//! without one installed.

use async_trait::async_trait;
use tts_reader_core::{AudioClip, Speaker};

use crate::{EngineError, SpeechBackend};

/// Fixed roster mirroring the multi-speaker models this tool is used with.
const SPEAKERS: &[&str] = &[
    "p225", "p226", "p227", "p228", "p243", "p270", "p273", "p294",
];

/// Deterministic stub backend
#[derive(Debug, Clone, Copy)]
pub struct SilenceBackend {
    sample_rate: u32,
}

impl SilenceBackend {
    /// Create a stub backend at the given sample rate
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

#[async_trait]
impl SpeechBackend for SilenceBackend {
    async fn synthesize(&self, text: &str, _speaker: &Speaker) -> Result<AudioClip, EngineError> {
        // ~50ms per character, at least one frame so the clip is playable
        let chars = text.chars().count().max(1);
        let samples = chars * (self.sample_rate as usize / 20);
        Ok(AudioClip::new(vec![0.0; samples], self.sample_rate))
    }

    async fn speakers(&self) -> Result<Vec<Speaker>, EngineError> {
        Ok(SPEAKERS.iter().map(|&s| Speaker::from(s)).collect())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duration_tracks_text_length() {
        let backend = SilenceBackend::new(22050);
        let short = backend
            .synthesize("hi", &Speaker::from("p270"))
            .await
            .unwrap();
        let long = backend
            .synthesize("a much longer sentence to speak", &Speaker::from("p270"))
            .await
            .unwrap();

        assert!(long.len() > short.len());
        assert_eq!(short.len(), 2 * (22050 / 20));
    }

    #[tokio::test]
    async fn test_roster_contains_default_speaker() {
        let backend = SilenceBackend::new(22050);
        let speakers = backend.speakers().await.unwrap();
        assert!(speakers.contains(&Speaker::from("p270")));
    }

    #[tokio::test]
    async fn test_empty_text_still_yields_audio() {
        let backend = SilenceBackend::new(22050);
        let clip = backend.synthesize("", &Speaker::from("p270")).await.unwrap();
        assert!(!clip.is_empty());
    }
}
