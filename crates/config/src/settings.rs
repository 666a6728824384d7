//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Speech engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Request limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Reader UI configuration
    #[serde(default)]
    pub reader: ReaderConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.reader.min_wpm == 0 || self.reader.min_wpm >= self.reader.max_wpm {
            return Err(ConfigError::InvalidValue {
                field: "reader.min_wpm".to_string(),
                message: format!(
                    "WPM bounds must satisfy 0 < min < max (got {}..{})",
                    self.reader.min_wpm, self.reader.max_wpm
                ),
            });
        }

        if self.reader.default_wpm < self.reader.min_wpm
            || self.reader.default_wpm > self.reader.max_wpm
        {
            return Err(ConfigError::InvalidValue {
                field: "reader.default_wpm".to_string(),
                message: "Default WPM must lie within the configured bounds".to_string(),
            });
        }

        if self.limits.words_per_chunk == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.words_per_chunk".to_string(),
                message: "Export chunks must hold at least one word".to_string(),
            });
        }

        if self.limits.max_text_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_text_chars".to_string(),
                message: "Text length limit must be non-zero".to_string(),
            });
        }

        if self.engine.sample_rate < 8000 {
            return Err(ConfigError::InvalidValue {
                field: "engine.sample_rate".to_string(),
                message: format!("Sample rate too low: {}", self.engine.sample_rate),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins (empty = any, matching the local-tool deployment)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5080
}
fn default_timeout() -> u64 {
    120
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum synthesis requests per second
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Burst allowance (multiple of rate limit)
    #[serde(default = "default_burst_multiplier")]
    pub burst_multiplier: f32,
}

fn default_requests_per_second() -> u32 {
    // Sentence prefetch issues a handful of requests per played sentence
    10
}

fn default_burst_multiplier() -> f32 {
    3.0
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            requests_per_second: default_requests_per_second(),
            burst_multiplier: default_burst_multiplier(),
        }
    }
}

/// Speech backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Spawn a local espeak-ng process per request
    Espeak,
    /// Forward requests to an upstream Coqui-compatible HTTP server
    Http,
    /// Deterministic silence, for development and tests
    Silence,
}

/// Speech engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Backend to use
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// espeak binary name or path
    #[serde(default = "default_espeak_binary")]
    pub espeak_binary: String,

    /// espeak base voice
    #[serde(default = "default_espeak_voice")]
    pub espeak_voice: String,

    /// Upstream URL for the http backend
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Default speaker when the request names none (or an unknown one)
    #[serde(default = "default_speaker")]
    pub default_speaker: String,

    /// Output sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Synthesis cache capacity in entries (0 disables the cache)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_backend() -> BackendKind {
    BackendKind::Espeak
}
fn default_espeak_binary() -> String {
    "espeak-ng".to_string()
}
fn default_espeak_voice() -> String {
    "en".to_string()
}
fn default_upstream_url() -> String {
    "http://127.0.0.1:5002".to_string()
}
fn default_speaker() -> String {
    "p270".to_string()
}
fn default_sample_rate() -> u32 {
    22050
}
fn default_cache_capacity() -> usize {
    256
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            espeak_binary: default_espeak_binary(),
            espeak_voice: default_espeak_voice(),
            upstream_url: default_upstream_url(),
            default_speaker: default_speaker(),
            sample_rate: default_sample_rate(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum text length per synthesis request, in characters
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// Words per chunk for full-document export
    #[serde(default = "default_words_per_chunk")]
    pub words_per_chunk: usize,
}

fn default_max_text_chars() -> usize {
    20_000
}
fn default_words_per_chunk() -> usize {
    500
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
            words_per_chunk: default_words_per_chunk(),
        }
    }
}

/// Reader UI configuration, served to the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Number of sentences to prefetch ahead of playback
    #[serde(default = "default_prefetch_count")]
    pub prefetch_count: usize,

    /// WPM corresponding to playbackRate 1.0
    #[serde(default = "default_wpm")]
    pub baseline_wpm: u32,

    /// Initial WPM when no saved preference exists
    #[serde(default = "default_wpm")]
    pub default_wpm: u32,

    /// Lowest accepted WPM
    #[serde(default = "default_min_wpm")]
    pub min_wpm: u32,

    /// Highest accepted WPM
    #[serde(default = "default_max_wpm")]
    pub max_wpm: u32,
}

fn default_prefetch_count() -> usize {
    2
}
fn default_wpm() -> u32 {
    180
}
fn default_min_wpm() -> u32 {
    50
}
fn default_max_wpm() -> u32 {
    500
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            prefetch_count: default_prefetch_count(),
            baseline_wpm: default_wpm(),
            default_wpm: default_wpm(),
            min_wpm: default_min_wpm(),
            max_wpm: default_max_wpm(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable the Prometheus /metrics endpoint
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (TTS_READER prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("TTS_READER")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5080);
        assert_eq!(settings.engine.default_speaker, "p270");
        assert_eq!(settings.limits.words_per_chunk, 500);
        assert_eq!(settings.reader.prefetch_count, 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_wpm_bounds_validation() {
        let mut settings = Settings::default();
        settings.reader.min_wpm = 500;
        settings.reader.max_wpm = 50;
        assert!(settings.validate().is_err());

        settings.reader.min_wpm = 50;
        settings.reader.max_wpm = 500;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_default_wpm_within_bounds() {
        let mut settings = Settings::default();
        settings.reader.default_wpm = 10;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut settings = Settings::default();
        settings.limits.words_per_chunk = 0;
        assert!(settings.validate().is_err());
    }
}
