//! Corpus assembly from an upload batch.

use docchat_core::UploadedDocument;
use serde::Serialize;
use tracing::{info, warn};

use crate::document::{FileTypeExtractor, TextExtractor};

/// Text extracted from one document (pages joined, trailing newline).
#[derive(Debug, Clone, Serialize)]
pub struct DocumentText {
    pub name: String,
    pub text: String,
}

/// A document that could not be read. The rest of the batch is unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub name: String,
    pub error: String,
}

/// Everything one build produced.
#[derive(Debug, Clone, Default)]
pub struct CorpusBuild {
    /// Kept texts, each followed by `\n`, in upload order.
    pub corpus: String,
    /// Every successfully extracted document, blank ones included.
    pub documents: Vec<DocumentText>,
    /// Names of documents skipped because they had no text.
    pub skipped: Vec<String>,
    pub failures: Vec<DocumentFailure>,
}

impl CorpusBuild {
    pub fn is_empty(&self) -> bool {
        self.corpus.trim().is_empty()
    }

    pub fn kept_count(&self) -> usize {
        self.documents.len() - self.skipped.len()
    }
}

/// Concatenates per-document text into one corpus.
pub struct CorpusBuilder<E = FileTypeExtractor> {
    extractor: E,
}

impl Default for CorpusBuilder<FileTypeExtractor> {
    fn default() -> Self {
        Self::new(FileTypeExtractor)
    }
}

impl<E: TextExtractor> CorpusBuilder<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    pub fn build(&self, documents: &[UploadedDocument]) -> CorpusBuild {
        let mut build = CorpusBuild::default();

        for doc in documents {
            let extracted = match self.extractor.extract(doc) {
                Ok(extracted) => extracted,
                Err(e) => {
                    warn!(document = %doc.name, error = %e, "extraction failed, continuing batch");
                    build.failures.push(DocumentFailure {
                        name: doc.name.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let text = extracted.full_text();
            if extracted.is_blank() {
                warn!(document = %doc.name, "no extractable text, skipped");
                build.skipped.push(doc.name.clone());
            } else {
                build.corpus.push_str(&text);
                build.corpus.push('\n');
            }

            build.documents.push(DocumentText {
                name: doc.name.clone(),
                text,
            });
        }

        info!(
            documents = documents.len(),
            kept = build.kept_count(),
            failed = build.failures.len(),
            corpus_chars = build.corpus.chars().count(),
            "corpus built"
        );
        build
    }
}
