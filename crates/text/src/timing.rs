//! Listening time estimation

use std::time::Duration;

/// Estimate listening time for `words` words at `wpm` words per minute.
pub fn estimate_reading_time(words: usize, wpm: u32) -> Duration {
    if wpm == 0 {
        return Duration::ZERO;
    }
    let seconds = (words as f64) * 60.0 / (wpm as f64);
    Duration::from_secs_f64(seconds)
}

/// Format a duration as `m:ss` for the time-left display.
pub fn format_clock(duration: Duration) -> String {
    let total = duration.as_secs_f64().round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
