//! Windowing for oversized corpora.
//!
//! Splits text into overlapping chunks of bounded token count using
//! paragraph, then sentence, then word boundaries.

mod helpers;
mod strategies;
mod types;

pub use helpers::{count_tokens, sentence_spans, split_sentences};
pub use strategies::chunk_text;
pub use types::{Chunk, ChunkConfig};
