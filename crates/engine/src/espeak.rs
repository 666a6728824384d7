//! espeak-ng subprocess backend
//!
//! Spawns the system `espeak-ng` binary per request with `--stdout` and
//! parses the WAV it writes. Speed stays at the engine default; playback
//! rate is applied client-side from the WPM setting.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tts_reader_audio::decode_wav;
use tts_reader_core::{AudioClip, Speaker};

use crate::{EngineError, SpeechBackend};

/// Voice variants exposed as the speaker roster.
const VOICE_VARIANTS: &[&str] = &[
    "en", "en+m1", "en+m2", "en+m3", "en+m4", "en+m5", "en+m6", "en+m7", "en+f1", "en+f2",
    "en+f3", "en+f4", "en+f5", "en+croak", "en+whisper",
];

/// Backend that shells out to espeak-ng
pub struct EspeakBackend {
    binary: String,
    base_voice: String,
    sample_rate: u32,
}

impl EspeakBackend {
    /// Create a backend for the given binary and base voice
    pub fn new(binary: impl Into<String>, base_voice: impl Into<String>, sample_rate: u32) -> Self {
        Self {
            binary: binary.into(),
            base_voice: base_voice.into(),
            sample_rate,
        }
    }

    /// Resolve a requested speaker to an espeak voice.
    ///
    /// Unknown names fall back to the base voice rather than erroring, so a
    /// stale saved voice in the UI still plays.
    fn voice_for(&self, speaker: &Speaker) -> String {
        if VOICE_VARIANTS.contains(&speaker.name()) {
            speaker.name().to_string()
        } else {
            self.base_voice.clone()
        }
    }
}

#[async_trait]
impl SpeechBackend for EspeakBackend {
    async fn synthesize(&self, text: &str, speaker: &Speaker) -> Result<AudioClip, EngineError> {
        let voice = self.voice_for(speaker);

        let output = Command::new(&self.binary)
            .arg("-v")
            .arg(&voice)
            .arg("--stdout")
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EngineError::Unavailable(format!("espeak binary not found: {}", self.binary))
                } else {
                    EngineError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Synthesis(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        let clip = decode_wav(&output.stdout)?;
        tracing::debug!(
            voice = %voice,
            chars = text.chars().count(),
            samples = clip.len(),
            "espeak synthesis complete"
        );
        Ok(clip)
    }

    async fn speakers(&self) -> Result<Vec<Speaker>, EngineError> {
        Ok(VOICE_VARIANTS.iter().map(|&v| Speaker::from(v)).collect())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn probe(&self) -> Result<(), EngineError> {
        let status = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                EngineError::Unavailable(format!("cannot run {}: {}", self.binary, e))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(EngineError::Unavailable(format!(
                "{} --version exited with {}",
                self.binary, status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_voice_passes_through() {
        let backend = EspeakBackend::new("espeak-ng", "en", 22050);
        assert_eq!(backend.voice_for(&Speaker::from("en+f3")), "en+f3");
    }

    #[test]
    fn test_unknown_voice_falls_back() {
        let backend = EspeakBackend::new("espeak-ng", "en", 22050);
        assert_eq!(backend.voice_for(&Speaker::from("p270")), "en");
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let backend = EspeakBackend::new("definitely-not-a-tts-binary", "en", 22050);
        let err = backend
            .synthesize("hello", &Speaker::from("en"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unavailable(_)));
    }
}
