//! Token bucket rate limiter for synthesis endpoints
//!
//! Sentence playback with prefetch produces short request bursts; the bucket
//! absorbs those and rejects sustained floods.

use std::time::Instant;
use tts_reader_config::RateLimitConfig;

/// Token bucket rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    tokens: f32,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: RateLimitConfig) -> Self {
        let burst = config.requests_per_second as f32 * config.burst_multiplier;
        Self {
            config,
            tokens: burst,
            last_refill: Instant::now(),
        }
    }

    /// Refill tokens based on elapsed time
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed_secs = now.duration_since(self.last_refill).as_secs_f32();

        if elapsed_secs > 0.0 {
            let refill = elapsed_secs * self.config.requests_per_second as f32;
            let max = self.config.requests_per_second as f32 * self.config.burst_multiplier;
            self.tokens = (self.tokens + refill).min(max);
            self.last_refill = now;
        }
    }

    /// Check if a request may proceed (and consume a token if so)
    pub fn check(&mut self) -> Result<(), RateLimitError> {
        if !self.config.enabled {
            return Ok(());
        }

        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(RateLimitError)
        }
    }

    /// Remaining tokens (for diagnostics)
    pub fn remaining_tokens(&self) -> f32 {
        self.tokens
    }
}

/// Request rate limit exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitError;

impl std::fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Request rate limit exceeded")
    }
}

impl std::error::Error for RateLimitError {}
