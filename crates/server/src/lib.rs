//! Document reader server
//!
//! HTTP endpoints for speech synthesis plus the embedded reader UI.

pub mod error;
pub mod http;
pub mod metrics;
pub mod rate_limit;
pub mod state;

pub use error::ApiError;
pub use http::create_router;
pub use rate_limit::{RateLimitError, RateLimiter};
pub use state::AppState;
