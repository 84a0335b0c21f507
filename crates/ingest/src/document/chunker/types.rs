//! Chunk configuration and output types.

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the chunking engine.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum tokens per chunk (default: 200).
    pub max_chunk_tokens: usize,
    /// Minimum tokens per chunk; smaller chunks are merged (default: 20).
    pub min_chunk_tokens: usize,
    /// Overlap tokens between adjacent chunks (default: 20).
    pub overlap_tokens: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chunk_tokens: 200,
            min_chunk_tokens: 20,
            overlap_tokens: 20,
        }
    }
}

// ── Chunk output ────────────────────────────────────────────────────────────

/// A window of corpus text.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 0-based index within the text.
    pub index: usize,
    /// The chunk text content, including any overlap prefix.
    pub content: String,
}
