//! Bounding the corpus text sent to a backend.

use std::borrow::Cow;

use docchat_core::config::QaConfig;
use docchat_core::ContextPolicyKind;
use docchat_ingest::document::chunker::{chunk_text, ChunkConfig};
use tracing::debug;

use crate::lexical;

/// Separator placed between non-adjacent windows.
const WINDOW_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone)]
pub enum ContextPolicy {
    /// Keep the first `max_chars` characters.
    Truncate { max_chars: usize },
    /// Keep the best-matching windows, in corpus order, within `max_chars`.
    Window { max_chars: usize, chunks: ChunkConfig },
}

impl ContextPolicy {
    pub fn from_config(qa: &QaConfig) -> Self {
        match qa.context_policy {
            ContextPolicyKind::Truncate => ContextPolicy::Truncate {
                max_chars: qa.max_context_chars,
            },
            ContextPolicyKind::Window => ContextPolicy::Window {
                max_chars: qa.max_context_chars,
                chunks: ChunkConfig {
                    max_chunk_tokens: qa.window_tokens.max(1),
                    min_chunk_tokens: (qa.window_tokens / 10).max(1),
                    overlap_tokens: qa.window_overlap_tokens,
                },
            },
        }
    }

    pub fn max_chars(&self) -> usize {
        match self {
            ContextPolicy::Truncate { max_chars } | ContextPolicy::Window { max_chars, .. } => {
                *max_chars
            }
        }
    }

    /// Cut `corpus` down to the budget. Corpora within budget pass through.
    pub fn select<'a>(&self, corpus: &'a str, question: &str) -> Cow<'a, str> {
        let max_chars = self.max_chars();
        if corpus.chars().count() <= max_chars {
            return Cow::Borrowed(corpus);
        }

        match self {
            ContextPolicy::Truncate { .. } => {
                debug!(max_chars, "truncating context");
                Cow::Borrowed(truncate_chars(corpus, max_chars))
            }
            ContextPolicy::Window { chunks, .. } => {
                Cow::Owned(best_windows(corpus, question, chunks, max_chars))
            }
        }
    }
}

/// Longest prefix of `text` with at most `max_chars` code points.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn best_windows(corpus: &str, question: &str, config: &ChunkConfig, max_chars: usize) -> String {
    let windows = chunk_text(corpus, config);
    let contents: Vec<&str> = windows.iter().map(|w| w.content.as_str()).collect();
    let scores = lexical::score_passages(&contents, question);

    let mut ranked: Vec<usize> = (0..windows.len()).collect();
    // Stable sort keeps corpus order among equal scores.
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut chosen = Vec::new();
    let mut used = 0usize;
    for i in ranked {
        let len = contents[i].chars().count() + WINDOW_SEPARATOR.len();
        if used + len <= max_chars {
            chosen.push(i);
            used += len;
        }
    }

    if chosen.is_empty() {
        // Even the best window is over budget.
        let best = lexical::best_index(&scores).unwrap_or(0);
        return contents
            .get(best)
            .map(|c| truncate_chars(c, max_chars).to_string())
            .unwrap_or_default();
    }

    chosen.sort_unstable();
    debug!(windows = chosen.len(), of = windows.len(), "selected context windows");
    chosen
        .iter()
        .map(|&i| contents[i])
        .collect::<Vec<_>>()
        .join(WINDOW_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_corpus_passes_through() {
        let policy = ContextPolicy::Truncate { max_chars: 100 };
        assert!(matches!(policy.select("short", "q"), Cow::Borrowed("short")));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("abc", 10), "abc");
        let policy = ContextPolicy::Truncate { max_chars: 4 };
        assert_eq!(policy.select("ñañaña", "q"), "ñaña");
    }

    #[test]
    fn window_policy_keeps_relevant_windows_in_order() {
        let corpus = [
            "Bananas grow in tropical climates and are harvested green.",
            "The engine uses a turbocharger to compress intake air.",
            "Banana plants are technically giant herbs, not trees.",
            "Rainfall in the desert is rare and unpredictable.",
        ]
        .join("\n\n");
        let policy = ContextPolicy::Window {
            max_chars: 130,
            chunks: ChunkConfig {
                max_chunk_tokens: 20,
                min_chunk_tokens: 1,
                overlap_tokens: 0,
            },
        };
        let selected = policy.select(&corpus, "Where do bananas grow?");
        assert!(selected.contains("tropical"));
        assert!(selected.contains("giant herbs"));
        assert!(!selected.contains("turbocharger"));
        assert!(selected.find("tropical").unwrap() < selected.find("giant herbs").unwrap());
        assert!(selected.chars().count() <= 130);
    }

    #[test]
    fn oversized_single_window_is_truncated() {
        let corpus = "word ".repeat(100);
        let policy = ContextPolicy::Window {
            max_chars: 20,
            chunks: ChunkConfig {
                max_chunk_tokens: 100,
                min_chunk_tokens: 1,
                overlap_tokens: 0,
            },
        };
        let selected = policy.select(&corpus, "word");
        assert_eq!(selected.chars().count(), 20);
    }

    #[test]
    fn from_config_maps_policy_kind() {
        let qa = QaConfig {
            context_policy: ContextPolicyKind::Window,
            max_context_chars: 500,
            window_tokens: 50,
            window_overlap_tokens: 5,
            ..QaConfig::default()
        };
        match ContextPolicy::from_config(&qa) {
            ContextPolicy::Window { max_chars, chunks } => {
                assert_eq!(max_chars, 500);
                assert_eq!(chunks.max_chunk_tokens, 50);
                assert_eq!(chunks.min_chunk_tokens, 5);
                assert_eq!(chunks.overlap_tokens, 5);
            }
            other => panic!("unexpected policy {other:?}"),
        }
    }
}
