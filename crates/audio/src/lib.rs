//! WAV encoding and decoding for synthesized audio
//!
//! The wire format is 16-bit PCM mono WAV: every backend output is
//! normalized to [`AudioClip`] samples and re-encoded here before leaving
//! the service.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;
use tts_reader_core::AudioClip;

/// Audio codec errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// Input bytes are not a WAV this service handles
    #[error("Malformed audio: {0}")]
    Malformed(String),

    /// Clips with different sample rates cannot be joined
    #[error("Sample rate mismatch: expected {expected} Hz, got {got} Hz")]
    SampleRateMismatch { expected: u32, got: u32 },

    /// Encoder failure
    #[error("Encode error: {0}")]
    Encode(String),
}

/// Encode samples as a 16-bit PCM mono WAV.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| AudioError::Encode(e.to_string()))?;
        for &sample in samples {
            let value = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(value)
                .map_err(|e| AudioError::Encode(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioError::Encode(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

/// Encode a clip as a 16-bit PCM mono WAV.
pub fn encode_clip(clip: &AudioClip) -> Result<Vec<u8>, AudioError> {
    encode_wav(&clip.samples, clip.sample_rate)
}

/// Decode a mono WAV into normalized f32 samples.
///
/// Accepts 16-bit integer and 32-bit float source data, the two formats the
/// supported backends produce.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioClip, AudioError> {
    let mut reader =
        WavReader::new(Cursor::new(bytes)).map_err(|e| AudioError::Malformed(e.to_string()))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(AudioError::Malformed(format!(
            "expected mono audio, got {} channels",
            spec.channels
        )));
    }

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| AudioError::Malformed(e.to_string()))?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| AudioError::Malformed(e.to_string()))?,
        (format, bits) => {
            return Err(AudioError::Malformed(format!(
                "unsupported sample format: {:?} {} bit",
                format, bits
            )))
        }
    };

    Ok(AudioClip::new(samples, spec.sample_rate))
}

/// Join clips into one, in order.
///
/// All clips must share a sample rate; empty input yields an error rather
/// than an unplayable zero-rate clip.
pub fn concat_clips(clips: &[AudioClip]) -> Result<AudioClip, AudioError> {
    let first = clips
        .first()
        .ok_or_else(|| AudioError::Malformed("no clips to join".to_string()))?;

    let total: usize = clips.iter().map(AudioClip::len).sum();
    let mut samples = Vec::with_capacity(total);

    for clip in clips {
        if clip.sample_rate != first.sample_rate {
            return Err(AudioError::SampleRateMismatch {
                expected: first.sample_rate,
                got: clip.sample_rate,
            });
        }
        samples.extend_from_slice(&clip.samples);
    }

    Ok(AudioClip::new(samples, first.sample_rate))
}
