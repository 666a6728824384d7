//! Speaker identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named voice offered by the speech backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Speaker(pub String);

impl Speaker {
    /// Create a speaker from a name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The speaker name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Speaker {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Speaker {
    fn from(name: String) -> Self {
        Self(name)
    }
}
