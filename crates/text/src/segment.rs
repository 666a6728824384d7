//! Sentence segmentation
//!
//! Splits extracted text into the sentence sequence the reader navigates.
//! Segmentation is intentionally simple punctuation matching: sentence
//! indices must stay stable between the server and the UI, so both sides use
//! the same rule. Abbreviations ("Dr.", "e.g.") over-split; that is accepted.

use regex::Regex;

/// Matches a run of text up to and including its terminal punctuation.
const SENTENCE_PATTERN: &str = r"[^.!?]+[.!?]+";

/// Sentence splitter over punctuation boundaries.
pub struct SentenceSegmenter {
    sentence_re: Regex,
}

impl SentenceSegmenter {
    /// Create a new segmenter
    pub fn new() -> Self {
        Self {
            sentence_re: Regex::new(SENTENCE_PATTERN).expect("sentence pattern compiles"),
        }
    }

    /// Split text into trimmed, non-empty sentences.
    ///
    /// Text without any terminal punctuation becomes a single sentence, so
    /// short fragments (headings, captions) are still playable.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let sentences: Vec<String> = self
            .sentence_re
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if sentences.is_empty() {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            return vec![trimmed.to_string()];
        }

        sentences
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse whitespace runs into single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = true;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_gap {
                out.push(' ');
                in_gap = true;
            }
        } else {
            out.push(c);
            in_gap = false;
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Count words by whitespace splitting, ignoring empty fragments.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
