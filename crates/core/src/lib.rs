//! Core types for the document reader
//!
//! This crate provides foundational types used across all other crates:
//! - Audio clip type
//! - Error types
//! - Speaker identifier

pub mod audio;
pub mod error;
pub mod speaker;

pub use audio::AudioClip;
pub use error::{Error, Result};
pub use speaker::Speaker;
