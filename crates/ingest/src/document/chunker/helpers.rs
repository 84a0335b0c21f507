//! Text splitting and merging utilities used by the chunker and the
//! extractive answerer.

use std::ops::Range;

use super::types::{Chunk, ChunkConfig};

/// Approximate token count via whitespace splitting.
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Extract the last `overlap_tokens` words from `text`.
pub(crate) fn get_overlap_text(text: &str, overlap_tokens: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= overlap_tokens {
        return text.to_string();
    }
    words[words.len() - overlap_tokens..].join(" ")
}

/// Byte ranges of the sentences in `text`, trimmed of surrounding whitespace.
///
/// A sentence ends at `.`, `!` or `?` followed by end of text, a newline, or
/// a space and then an uppercase letter or newline. A blank line also ends a
/// sentence. Every range lies on char boundaries, so `&text[range]` is safe.
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut start = 0;

    let mut i = 0;
    while i < bytes.len() {
        let boundary = match bytes[i] {
            b'.' | b'!' | b'?' => match bytes.get(i + 1) {
                None | Some(b'\n') | Some(b'\r') => Some(i + 1),
                Some(b' ') => match bytes.get(i + 2) {
                    None => Some(i + 1),
                    Some(c) if c.is_ascii_uppercase() || *c == b'\n' => Some(i + 1),
                    _ => None,
                },
                _ => None,
            },
            b'\n' if bytes.get(i + 1) == Some(&b'\n') => Some(i),
            _ => None,
        };

        if let Some(end) = boundary {
            push_trimmed(text, start..end, &mut spans);
            start = end;
        }
        i += 1;
    }

    push_trimmed(text, start..bytes.len(), &mut spans);
    spans
}

fn push_trimmed(text: &str, range: Range<usize>, spans: &mut Vec<Range<usize>>) {
    let slice = &text[range.clone()];
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    if lead + trail < slice.len() {
        spans.push(range.start + lead..range.end - trail);
    }
}

/// Split `text` into owned sentences. See [`sentence_spans`].
pub fn split_sentences(text: &str) -> Vec<String> {
    sentence_spans(text)
        .into_iter()
        .map(|r| text[r].to_string())
        .collect()
}

/// Split text that exceeds `max_tokens` first by `\n\n`, then by sentence.
/// Returns pieces each <= max_tokens (a sentence-free run is split by words).
pub(crate) fn split_oversized(text: &str, max_tokens: usize) -> Vec<String> {
    let max_tokens = max_tokens.max(1);
    let mut pieces = Vec::new();

    for para in text.split("\n\n") {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }
        if count_tokens(para) <= max_tokens {
            pieces.push(para.to_string());
            continue;
        }

        let mut buf = String::new();
        for sent in split_sentences(para) {
            if buf.is_empty() {
                buf = sent;
            } else if count_tokens(&buf) + count_tokens(&sent) <= max_tokens {
                buf.push(' ');
                buf.push_str(&sent);
            } else {
                pieces.push(std::mem::take(&mut buf));
                buf = sent;
            }
            if count_tokens(&buf) > max_tokens {
                let words: Vec<&str> = buf.split_whitespace().collect();
                let mut groups: Vec<String> =
                    words.chunks(max_tokens).map(|w| w.join(" ")).collect();
                buf = groups.pop().unwrap_or_default();
                pieces.extend(groups);
            }
        }
        if !buf.is_empty() {
            pieces.push(buf);
        }
    }
    pieces
}

/// Merge adjacent fragments smaller than `min_tokens` into their neighbour.
pub(crate) fn merge_tiny(fragments: Vec<String>, min_tokens: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(fragments.len());
    for frag in fragments {
        if let Some(last) = merged.last_mut() {
            if count_tokens(last) < min_tokens {
                last.push('\n');
                last.push_str(&frag);
                continue;
            }
        }
        merged.push(frag);
    }
    // Final pass: if the last element is tiny, merge it backwards.
    if merged.len() >= 2 && merged.last().map_or(0, |l| count_tokens(l)) < min_tokens {
        if let Some(last) = merged.pop() {
            if let Some(prev) = merged.last_mut() {
                prev.push('\n');
                prev.push_str(&last);
            }
        }
    }
    merged
}

/// Build `Chunk` structs, prefixing each with the tail of its predecessor.
pub(crate) fn build_chunks_with_overlap(fragments: Vec<String>, config: &ChunkConfig) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(fragments.len());

    for (i, frag) in fragments.iter().enumerate() {
        let content = if i > 0 && config.overlap_tokens > 0 {
            let overlap = get_overlap_text(&fragments[i - 1], config.overlap_tokens);
            format!("{overlap} {frag}")
        } else {
            frag.clone()
        };
        chunks.push(Chunk { index: i, content });
    }
    chunks
}
