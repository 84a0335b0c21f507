//! Term overlap scoring between a question and candidate passages.

use std::collections::{HashMap, HashSet};

const STOPWORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can",
    "could", "did", "do", "does", "for", "from", "had", "has", "have", "how", "i", "if",
    "in", "into", "is", "it", "its", "me", "my", "of", "on", "or", "our", "said", "say",
    "says", "should", "so", "tell", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "to", "was", "we", "were", "what", "when",
    "where", "which", "who", "whom", "why", "will", "with", "would", "you", "your",
];

/// Lower-case content terms of `text`, stopwords removed, plurals folded.
pub fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .map(fold_plural)
        .collect()
}

fn fold_plural(term: String) -> String {
    if term.len() > 3 && term.ends_with('s') && !term.ends_with("ss") {
        term[..term.len() - 1].to_string()
    } else {
        term
    }
}

/// Score each passage against `question`: the sum of IDF weights of the
/// question terms the passage contains. Zero means no shared term.
pub fn score_passages(passages: &[&str], question: &str) -> Vec<f64> {
    let query: HashSet<String> = terms(question).into_iter().collect();
    if query.is_empty() || passages.is_empty() {
        return vec![0.0; passages.len()];
    }

    let passage_terms: Vec<HashSet<String>> = passages
        .iter()
        .map(|p| terms(p).into_iter().filter(|t| query.contains(t)).collect())
        .collect();

    let mut df: HashMap<&str, usize> = HashMap::new();
    for set in &passage_terms {
        for t in set {
            *df.entry(t.as_str()).or_default() += 1;
        }
    }

    let n = passages.len() as f64;
    passage_terms
        .iter()
        .map(|set| {
            set.iter()
                .map(|t| {
                    let d = df.get(t.as_str()).copied().unwrap_or(1) as f64;
                    (1.0 + n / d).ln()
                })
                .sum()
        })
        .collect()
}

/// Index of the highest score; ties go to the earliest passage.
/// `None` when every score is zero.
pub fn best_index(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s > 0.0 && best.map_or(true, |(_, b)| s > b) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}
