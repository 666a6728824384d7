//! Crate-wide error type.

use thiserror::Error;

/// Top-level error for the document reader
#[derive(Error, Debug)]
pub enum Error {
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
