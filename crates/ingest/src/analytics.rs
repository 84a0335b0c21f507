//! Per-document and collective text metrics.

use serde::{Deserialize, Serialize};

use crate::corpus::DocumentText;
use crate::sentiment::SentimentChart;

/// Label used for the aggregate block and its chart.
pub const COLLECTIVE_LABEL: &str = "Collective Summary";

/// Analytics feature switches. All default off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsToggles {
    pub enabled: bool,
    pub char_count: bool,
    pub word_count: bool,
    pub sentiment: bool,
}

impl AnalyticsToggles {
    pub fn any_metric(&self) -> bool {
        self.char_count || self.word_count || self.sentiment
    }
}

/// Metrics for one document (or the collective block). A metric is `None`
/// when its toggle is off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetrics {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentChart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub documents: Vec<DocumentMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collective: Option<DocumentMetrics>,
}

impl AnalyticsReport {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.collective.is_none()
    }
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Code-point count (not bytes).
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

fn metrics(name: &str, text: &str, toggles: &AnalyticsToggles) -> DocumentMetrics {
    DocumentMetrics {
        name: name.to_string(),
        word_count: toggles.word_count.then(|| word_count(text)),
        char_count: toggles.char_count.then(|| char_count(text)),
        sentiment: toggles.sentiment.then(|| SentimentChart::new(name, text)),
    }
}

/// Build the analytics block for an ingested batch.
///
/// Nothing is produced while analytics are disabled. The collective block
/// appears only for multi-document batches with at least one metric on.
pub fn report(documents: &[DocumentText], toggles: &AnalyticsToggles) -> AnalyticsReport {
    if !toggles.enabled {
        return AnalyticsReport::default();
    }

    let per_doc = documents
        .iter()
        .map(|d| metrics(&d.name, &d.text, toggles))
        .collect();

    let collective = (documents.len() > 1 && toggles.any_metric()).then(|| {
        let all_text: String = documents.iter().map(|d| d.text.as_str()).collect();
        metrics(COLLECTIVE_LABEL, &all_text, toggles)
    });

    AnalyticsReport {
        documents: per_doc,
        collective,
    }
}
