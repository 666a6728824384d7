//! Export chunking
//!
//! Full-document export synthesizes the document in word-bounded chunks so
//! progress can be reported per chunk and a single failed request does not
//! discard the whole run.

/// Split text into chunks of at most `words_per_chunk` words.
///
/// Word order is preserved and whitespace is normalized to single spaces
/// inside each chunk. Non-empty input always yields at least one chunk.
pub fn split_into_chunks(text: &str, words_per_chunk: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let per_chunk = words_per_chunk.max(1);
    words
        .chunks(per_chunk)
        .map(|chunk| chunk.join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_word_budget() {
        let text = (0..1250).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let chunks = split_into_chunks(&text, 500);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].split_whitespace().count(), 500);
        assert_eq!(chunks[1].split_whitespace().count(), 500);
        assert_eq!(chunks[2].split_whitespace().count(), 250);
    }

    #[test]
    fn test_reassembly_preserves_word_sequence() {
        let text = "  the   quick\nbrown fox\tjumps ";
        let chunks = split_into_chunks(text, 2);
        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, "the quick brown fox jumps");
    }

    #[test]
    fn test_short_input_is_single_chunk() {
        let chunks = split_into_chunks("just a few words", 500);
        assert_eq!(chunks, vec!["just a few words"]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(split_into_chunks("", 500).is_empty());
        assert!(split_into_chunks("   ", 500).is_empty());
    }

    #[test]
    fn test_zero_budget_clamped() {
        let chunks = split_into_chunks("a b c", 0);
        assert_eq!(chunks.len(), 3);
    }
}
