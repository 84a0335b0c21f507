//! Document ingestion: text extraction, corpus assembly, chunking and
//! lightweight per-document analytics.

pub mod analytics;
pub mod corpus;
pub mod document;
pub mod sentiment;

pub use analytics::{AnalyticsReport, AnalyticsToggles, DocumentMetrics};
pub use corpus::{CorpusBuild, CorpusBuilder, DocumentFailure, DocumentText};
pub use document::{ExtractedDocument, ExtractionError, FileTypeExtractor, TextExtractor};
