//! Text chunking implementation
//!
//! Splits text into bounded, overlapping chunks. A piece that is too large is
//! re-split with the next finer separator (paragraph, line, sentence, word,
//! character), and the resulting small pieces are merged back into windows
//! no longer than the configured maximum.
//!
//! Separators stay attached to the end of the piece they terminate, so every
//! chunk is an exact substring of the input and together the chunks cover
//! every character.

use std::collections::VecDeque;
use std::ops::Range;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Chunk, ChunkingConfig, ChunkingResult, Document};

type Span = Range<usize>;

/// Recursive character-based text chunker
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a new chunker with default configuration
    pub fn new() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }

    /// Create a new chunker with custom configuration
    pub fn with_config(config: ChunkingConfig) -> DomainResult<Self> {
        config
            .validate()
            .map_err(|e| DomainError::InvalidConfig(format!("Invalid chunking config: {e}")))?;

        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `text` into ordered chunks
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        self.split_span(text, 0..text.len(), &self.config.separators)
            .into_iter()
            .enumerate()
            .map(|(index, span)| Chunk::new(index, text[span.clone()].to_string(), span.start))
            .collect()
    }

    /// Chunk a document and report sizing statistics
    pub fn chunk_document(&self, document: &Document) -> ChunkingResult {
        let chunks = self.chunk(&document.text);

        tracing::debug!(
            title = %document.title,
            language = %document.language,
            chunks = chunks.len(),
            "chunked document"
        );

        ChunkingResult::new(chunks, document.char_len(), self.config.clone())
    }

    fn split_span(&self, text: &str, span: Span, separators: &[String]) -> Vec<Span> {
        let (separator, finer) = pick_separator(&text[span.clone()], separators);
        let pieces = split_keeping_separator(text, span, separator);

        let mut output = Vec::new();
        let mut pending: Vec<Span> = Vec::new();

        for piece in pieces {
            if char_len(text, &piece) <= self.config.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                output.extend(self.merge(text, &pending));
                pending.clear();
            }
            output.extend(self.split_span(text, piece, finer));
        }

        if !pending.is_empty() {
            output.extend(self.merge(text, &pending));
        }

        output
    }

    /// Merge consecutive small pieces into windows of at most `chunk_size`
    /// characters, carrying up to `chunk_overlap` characters into the next window.
    fn merge(&self, text: &str, pieces: &[Span]) -> Vec<Span> {
        let max = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut merged = Vec::new();
        let mut window: VecDeque<(Span, usize)> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(text, piece);

            if total + len > max {
                if let Some(span) = window_span(&window) {
                    merged.push(span);
                }

                while total > overlap || (total > 0 && total + len > max) {
                    match window.pop_front() {
                        Some((_, popped)) => total -= popped,
                        None => break,
                    }
                }
            }

            window.push_back((piece.clone(), len));
            total += len;
        }

        if let Some(span) = window_span(&window) {
            merged.push(span);
        }

        merged
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new()
    }
}

/// First separator present in `text`; the empty separator always applies.
/// Returns the chosen separator and the finer ones after it.
fn pick_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() || text.contains(separator.as_str()) {
            return (separator.as_str(), &separators[i + 1..]);
        }
    }
    ("", &[])
}

fn split_keeping_separator(text: &str, span: Span, separator: &str) -> Vec<Span> {
    let slice = &text[span.clone()];

    if separator.is_empty() {
        return slice
            .char_indices()
            .map(|(pos, c)| span.start + pos..span.start + pos + c.len_utf8())
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (pos, matched) in slice.match_indices(separator) {
        let end = pos + matched.len();
        pieces.push(span.start + start..span.start + end);
        start = end;
    }
    if start < slice.len() {
        pieces.push(span.start + start..span.end);
    }
    pieces
}

fn window_span(window: &VecDeque<(Span, usize)>) -> Option<Span> {
    let first = window.front()?;
    let last = window.back()?;
    Some(first.0.start..last.0.end)
}

fn char_len(text: &str, span: &Span) -> usize {
    text[span.clone()].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> Chunker {
        Chunker::with_config(ChunkingConfig::new(size, overlap)).unwrap()
    }

    fn assert_covers(text: &str, chunks: &[Chunk]) {
        let mut covered = vec![false; text.len()];
        for chunk in chunks {
            assert_eq!(&text[chunk.start_offset..chunk.end_offset], chunk.content);
            for flag in &mut covered[chunk.start_offset..chunk.end_offset] {
                *flag = true;
            }
        }
        assert!(covered.iter().all(|c| *c), "every byte must be covered");
    }

    #[test]
    fn test_invalid_config() {
        let result = Chunker::with_config(ChunkingConfig::new(100, 150));
        assert!(matches!(result, Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(Chunker::new().chunk("").is_empty());
    }

    #[test]
    fn test_chunk_short_text() {
        let chunks = Chunker::new().chunk("This is a short text.");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].content, "This is a short text.");
        assert_eq!(chunks[0].start_offset, 0);
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = "First paragraph here.\n\nSecond paragraph here.";
        let chunks = chunker(30, 0).chunk(text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "First paragraph here.\n\n");
        assert_eq!(chunks[1].content, "Second paragraph here.");
    }

    #[test]
    fn test_falls_back_to_words() {
        let text = "alpha beta gamma delta epsilon";
        let chunks = chunker(12, 0).chunk(text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.char_len() <= 12, "chunk too long: {:?}", chunk.content);
        }
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_falls_back_to_characters() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunker(10, 0).chunk(text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, "abcdefghij");
        assert_eq!(chunks[2].content, "uvwxyz");
    }

    #[test]
    fn test_chunk_with_overlap() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = chunker(20, 8).chunk(text);

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            assert!(
                pair[1].start_offset < pair[0].end_offset,
                "consecutive chunks should overlap: {:?} / {:?}",
                pair[0].content,
                pair[1].content
            );
            let shared = pair[0].end_offset - pair[1].start_offset;
            assert!(shared <= 8);
        }
        assert_covers(text, &chunks);
    }

    #[test]
    fn test_multibyte_text() {
        let text = "Größe über Straße. Ärger öfter üben. Café naïve façade.";
        let chunks = chunker(15, 4).chunk(text);

        for chunk in &chunks {
            assert!(chunk.char_len() <= 15);
            assert!(!chunk.content.is_empty());
        }
        assert_covers(text, &chunks);
    }

    #[test]
    fn test_indices_are_sequential() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let chunks = chunker(50, 10).chunk(&text);

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
        for pair in chunks.windows(2) {
            assert!(pair[0].start_offset < pair[1].start_offset);
        }
    }

    #[test]
    fn test_chunk_document() {
        let doc = Document::new("Munich", "de", "Weißwurst ist beliebt in München.");
        let result = Chunker::new().chunk_document(&doc);

        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.original_size, doc.char_len());
    }

    #[test]
    fn test_pick_separator() {
        let separators: Vec<String> = ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect();

        let (sep, finer) = pick_separator("a b\nc", &separators);
        assert_eq!(sep, "\n");
        assert_eq!(finer.len(), 2);

        let (sep, finer) = pick_separator("abc", &separators);
        assert_eq!(sep, "");
        assert!(finer.is_empty());
    }
}
