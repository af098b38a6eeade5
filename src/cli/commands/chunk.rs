//! `chunk`: split a document and report the chunks

use anyhow::{Context, Result};
use serde::Serialize;

use super::load_document;
use crate::cli::output::{dim, list_table, output, truncate, CommandOutput};
use crate::cli::types::ChunkArgs;
use crate::domain::models::{Chunk, Config, Document};
use crate::infrastructure::vector::Chunker;
use crate::services::clean_chunk_text;

/// Result of `chunk`
#[derive(Debug, Serialize)]
pub struct ChunkOutput {
    /// Document title
    pub title: String,
    /// Maximum chunk size used, in characters
    pub chunk_size: usize,
    /// Overlap used, in characters
    pub chunk_overlap: usize,
    /// Document size in characters
    pub original_size: usize,
    /// Mean chunk size in characters
    pub average_chunk_size: f64,
    /// Total chunk characters over document characters
    pub expansion_ratio: f64,
    /// The chunks, in document order
    pub chunks: Vec<Chunk>,
}

impl CommandOutput for ChunkOutput {
    fn to_human(&self) -> String {
        if self.chunks.is_empty() {
            return format!("No chunks produced for '{}'.", self.title);
        }

        let mut table = list_table(&["#", "bytes", "chars", "text"]);
        for chunk in &self.chunks {
            table.add_row(vec![
                chunk.index.to_string(),
                format!("{}..{}", chunk.start_offset, chunk.end_offset),
                chunk.char_len().to_string(),
                truncate(&clean_chunk_text(&chunk.content), 60),
            ]);
        }

        format!(
            "{table}\n{}",
            dim(&format!(
                "{} chunks from {} characters (max {}, overlap {}, average {:.1}, expansion {:.2}x)",
                self.chunks.len(),
                self.original_size,
                self.chunk_size,
                self.chunk_overlap,
                self.average_chunk_size,
                self.expansion_ratio
            ))
        )
    }
}

/// Run `chunk`
pub fn execute(args: ChunkArgs, config: &Config, json: bool) -> Result<()> {
    let document = load_document(&args.file, "und")?;

    let mut chunking = config.chunking.clone();
    if let Some(size) = args.size {
        chunking.chunk_size = size;
    }
    if let Some(overlap) = args.overlap {
        chunking.chunk_overlap = overlap;
    }

    let chunker = Chunker::with_config(chunking).context("Invalid chunking options")?;
    output(&summarize(&chunker, document), json);

    Ok(())
}

fn summarize(chunker: &Chunker, document: Document) -> ChunkOutput {
    let result = chunker.chunk_document(&document);

    ChunkOutput {
        title: document.title,
        chunk_size: result.config.chunk_size,
        chunk_overlap: result.config.chunk_overlap,
        original_size: result.original_size,
        average_chunk_size: result.average_chunk_size(),
        expansion_ratio: result.expansion_ratio(),
        chunks: result.chunks,
    }
}
