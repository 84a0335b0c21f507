pub mod chunker;
mod pdf;
mod txt;

use docchat_core::UploadedDocument;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: '{0}' (expected pdf, txt or md)")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number (for PDFs). For TXT/MD, always 1.
    pub page_number: usize,
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Sanitised filename.
    pub filename: String,
    /// File type: "pdf", "txt", "md"
    pub file_type: String,
    /// Pages in document order.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Pages joined with `\n`, plus one trailing `\n`.
    pub fn full_text(&self) -> String {
        let mut text = self
            .pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        text
    }

    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Turns an uploaded file into per-page text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &UploadedDocument) -> Result<ExtractedDocument, ExtractionError>;
}

/// Default extractor: dispatches on the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTypeExtractor;

impl TextExtractor for FileTypeExtractor {
    fn extract(&self, document: &UploadedDocument) -> Result<ExtractedDocument, ExtractionError> {
        extract_text(&document.bytes, &document.name)
    }
}

/// Extract text from file bytes based on file type.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    };

    let (file_type, pages) = match ext.as_str() {
        "pdf" => ("pdf", pdf::extract_pdf(bytes)?),
        "txt" | "text" => ("txt", txt::extract_txt(bytes)),
        "md" | "markdown" => ("md", txt::extract_txt(bytes)),
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        pages,
    })
}
