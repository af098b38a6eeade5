//! Text chunking domain models
//!
//! Models for splitting documents into bounded, overlapping chunks before
//! embedding. Sizes are measured in characters, not bytes.

use serde::{Deserialize, Serialize};

/// Configuration for document chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters
    pub chunk_size: usize,

    /// Target overlap between consecutive chunks in characters
    pub chunk_overlap: usize,

    /// Separators tried from coarsest to finest when a piece is too large.
    /// The empty separator splits between characters and always applies.
    pub separators: Vec<String>,
}

impl Default for ChunkingConfig {
    /// - 512 characters per chunk
    /// - 50 characters overlap
    /// - paragraph, line, sentence, word, then character boundaries
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 50,
            separators: default_separators(),
        }
    }
}

fn default_separators() -> Vec<String> {
    ["\n\n", "\n", ". ", " ", ""]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

impl ChunkingConfig {
    /// Create a configuration with the default separator hierarchy
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: default_separators(),
        }
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be less than chunk_size".to_string());
        }

        if self.separators.is_empty() {
            return Err("at least one separator is required".to_string());
        }

        Ok(())
    }
}

/// A contiguous segment of a source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk within its corpus (0-based)
    pub index: usize,

    /// The text content of this chunk
    pub content: String,

    /// Byte offset of the first character in the source text
    pub start_offset: usize,

    /// Byte offset one past the last character in the source text
    pub end_offset: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: usize, content: String, start_offset: usize) -> Self {
        let end_offset = start_offset + content.len();
        Self {
            index,
            content,
            start_offset,
            end_offset,
        }
    }

    /// Length of the chunk in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Result of a chunking operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingResult {
    /// The chunks created
    pub chunks: Vec<Chunk>,

    /// Original document size in characters
    pub original_size: usize,

    /// Configuration used for chunking
    pub config: ChunkingConfig,
}

impl ChunkingResult {
    /// Create a new chunking result
    pub fn new(chunks: Vec<Chunk>, original_size: usize, config: ChunkingConfig) -> Self {
        Self {
            chunks,
            original_size,
            config,
        }
    }

    /// Total characters across all chunks (overlap counted twice)
    pub fn total_chars(&self) -> usize {
        self.chunks.iter().map(Chunk::char_len).sum()
    }

    /// Calculate the average chunk size in characters
    pub fn average_chunk_size(&self) -> f64 {
        if self.chunks.is_empty() {
            0.0
        } else {
            self.total_chars() as f64 / self.chunks.len() as f64
        }
    }

    /// How much the text grew because of overlap (1.0 = no overlap)
    pub fn expansion_ratio(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            self.total_chars() as f64 / self.original_size as f64
        }
    }
}
