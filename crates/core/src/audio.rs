//! Audio clip type shared between the engine and the audio codec.

use std::time::Duration;

/// A mono audio clip as normalized f32 samples (-1.0 to 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// PCM samples
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioClip {
    /// Create a clip from samples and a sample rate
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// An empty clip at the given sample rate
    pub fn empty(sample_rate: u32) -> Self {
        Self::new(Vec::new(), sample_rate)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the clip holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback duration at the clip's sample rate
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let clip = AudioClip::new(vec![0.0; 22050], 22050);
        assert_eq!(clip.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_empty() {
        let clip = AudioClip::empty(16000);
        assert!(clip.is_empty());
        assert_eq!(clip.duration(), Duration::ZERO);
    }
}
