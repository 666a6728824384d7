//! Text pipeline for the document reader
//!
//! This crate turns extracted document text into the units the rest of the
//! system works with:
//! - **Segmentation**: split text into playable sentences
//! - **Chunking**: split a full document into word-bounded export chunks
//! - **Timing**: estimate remaining listening time from word counts and WPM

mod chunk;
mod segment;
mod timing;

pub use chunk::split_into_chunks;
pub use segment::{normalize_whitespace, word_count, SentenceSegmenter};
pub use timing::{estimate_reading_time, format_clock};
