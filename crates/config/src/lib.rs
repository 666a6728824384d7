//! Configuration for the document reader service
//!
//! Settings are layered from `config/default.yaml`, an optional
//! environment-specific file, and `TTS_READER__`-prefixed environment
//! variables.

mod settings;

pub use settings::{
    load_settings, BackendKind, EngineConfig, LimitsConfig, ObservabilityConfig, RateLimitConfig,
    ReaderConfig, ServerConfig, Settings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value failed validation
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Underlying loader error
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
