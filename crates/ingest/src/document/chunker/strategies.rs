use super::helpers::{build_chunks_with_overlap, merge_tiny, split_oversized};
use super::types::{Chunk, ChunkConfig};

/// Chunk free text: paragraphs first, oversized paragraphs by sentence,
/// tiny fragments merged forward, overlap carried between neighbours.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<Chunk> {
    let pieces = split_oversized(text, config.max_chunk_tokens);
    let pieces = merge_tiny(pieces, config.min_chunk_tokens);
    build_chunks_with_overlap(pieces, config)
}
