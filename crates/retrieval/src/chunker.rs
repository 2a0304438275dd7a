//! Text chunking with configurable size and overlap.
//!
//! Splits raw domain text into successive character windows of at most
//! `chunk_size` characters, each sharing exactly `overlap` characters
//! with its predecessor. Where a window would cut mid-word, the split
//! point backs up to the last whitespace within a bounded lookback.

use crate::types::Chunk;
use concierge_core::{ConciergeError, ConciergeResult};

/// How many characters before the window end to scan for a whitespace
/// break point.
const BOUNDARY_LOOKBACK: usize = 60;

/// Character-window chunker.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker, validating `overlap < chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> ConciergeResult<Self> {
        if chunk_size == 0 {
            return Err(ConciergeError::InvalidArgument(
                "chunk_size must be a positive integer".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(ConciergeError::InvalidArgument(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Split text into a lazy sequence of chunks.
    ///
    /// The sequence is finite and restartable: calling `split` again
    /// yields the same chunks. Text no longer than `chunk_size` produces
    /// exactly one chunk containing the whole text.
    pub fn split<'a>(&self, text: &'a str, source_id: &str, domain: &str) -> Chunks<'a> {
        Chunks {
            text,
            source_id: source_id.to_string(),
            domain: domain.to_string(),
            chunk_size: self.chunk_size,
            overlap: self.overlap,
            start: 0,
            sequence: 0,
            done: text.is_empty(),
        }
    }
}

/// Iterator over the chunks of one source document.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    source_id: String,
    domain: String,
    chunk_size: usize,
    overlap: usize,
    start: usize,
    sequence: u32,
    done: bool,
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.done {
            return None;
        }

        let start = self.start;
        let mut end = advance_chars(self.text, start, self.chunk_size);

        if end < self.text.len() {
            // Prefer a whitespace break near the window end. The break
            // must leave more than `overlap` characters in the window so
            // the next start still moves forward.
            let min_end = advance_chars(self.text, start, self.overlap + 1);
            let window = &self.text[start..end];
            if let Some(candidate) = window
                .char_indices()
                .rev()
                .take(BOUNDARY_LOOKBACK)
                .find(|(_, c)| c.is_whitespace())
                .map(|(i, c)| start + i + c.len_utf8())
            {
                if candidate >= min_end {
                    end = candidate;
                }
            }
        }

        let chunk = Chunk {
            text: self.text[start..end].to_string(),
            source_id: self.source_id.clone(),
            domain: self.domain.clone(),
            sequence_index: self.sequence,
        };
        self.sequence += 1;

        if end >= self.text.len() {
            self.done = true;
        } else {
            self.start = retreat_chars(self.text, end, self.overlap);
        }

        Some(chunk)
    }
}

/// Byte index after walking `n` characters forward from `start`.
fn advance_chars(text: &str, start: usize, n: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len())
}

/// Byte index after walking `n` characters backward from `end`.
fn retreat_chars(text: &str, end: usize, n: usize) -> usize {
    if n == 0 {
        return end;
    }
    text[..end]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(chunker: &Chunker, text: &str) -> Vec<Chunk> {
        chunker.split(text, "test-source", "rooms").collect()
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunker = Chunker::new(100, 20).unwrap();
        let chunks = collect(&chunker, "Check-in at 3pm");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Check-in at 3pm");
        assert_eq!(chunks[0].sequence_index, 0);
        assert_eq!(chunks[0].domain, "rooms");
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        let chunker = Chunker::new(100, 20).unwrap();
        assert!(collect(&chunker, "").is_empty());
    }

    #[test]
    fn test_chunk_length_bounded() {
        let chunker = Chunker::new(50, 10).unwrap();
        let text = "lorem ipsum dolor sit amet ".repeat(30);
        for chunk in collect(&chunker, &text) {
            assert!(chunk.text.chars().count() <= 50);
        }
    }

    #[test]
    fn test_consecutive_chunks_share_exact_overlap() {
        let chunker = Chunker::new(50, 10).unwrap();
        let text = "the quick brown fox jumps over the lazy dog ".repeat(10);
        let chunks = collect(&chunker, &text);
        assert!(chunks.len() >= 2);

        for pair in chunks.windows(2) {
            let tail: String = pair[0]
                .text
                .chars()
                .rev()
                .take(10)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            let head: String = pair[1].text.chars().take(10).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_overlap_reconstructs_original_text() {
        let chunker = Chunker::new(40, 8).unwrap();
        let text = "one two three four five six seven eight nine ten ".repeat(8);
        let chunks = collect(&chunker, &text);

        let mut rebuilt = chunks[0].text.clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.text.chars().skip(8));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_prefers_whitespace_boundary() {
        let chunker = Chunker::new(30, 5).unwrap();
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let chunks = collect(&chunker, text);
        assert!(chunks.len() >= 2);

        // Every non-final chunk should end at a word boundary
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.text.ends_with(char::is_whitespace),
                "chunk {:?} cuts mid-word",
                chunk.text
            );
        }
    }

    #[test]
    fn test_sequence_indexes_are_ordered() {
        let chunker = Chunker::new(40, 8).unwrap();
        let text = "word ".repeat(100);
        let chunks = collect(&chunker, &text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i as u32);
        }
    }

    #[test]
    fn test_split_is_restartable() {
        let chunker = Chunker::new(40, 8).unwrap();
        let text = "word ".repeat(50);
        let first: Vec<Chunk> = collect(&chunker, &text);
        let second: Vec<Chunk> = collect(&chunker, &text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_multibyte_text_stays_on_char_boundaries() {
        let chunker = Chunker::new(20, 4).unwrap();
        let text = "árbol café niño señal über ".repeat(10);
        let chunks = collect(&chunker, &text);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 20);
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(Chunker::new(0, 0).is_err());
        assert!(Chunker::new(100, 100).is_err());
        assert!(Chunker::new(100, 150).is_err());
        assert!(Chunker::new(500, 100).is_ok());
    }
}
