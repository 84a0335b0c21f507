use std::panic::{self, AssertUnwindSafe};

use super::{ExtractionError, PageContent};

/// One `PageContent` per PDF page, in page order. Pages without a text
/// layer come back empty.
pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    let texts = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| ExtractionError::PdfError("parser aborted on malformed PDF".to_string()))?
    .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    let pages: Vec<PageContent> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| PageContent {
            page_number: i + 1,
            text: text.trim().to_string(),
        })
        .collect();

    if pages.iter().all(|p| p.text.is_empty()) {
        // Scanned/image PDF: no text layer. Caller decides whether that's fatal.
        tracing::warn!(pages = pages.len(), "PDF has no extractable text layer");
    }
    tracing::debug!(pages = pages.len(), "PDF text extracted");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PAGES: &[u8] = include_bytes!("../../tests/fixtures/two_pages.pdf");

    #[test]
    fn empty_bytes_fail() {
        assert!(extract_pdf(b"").is_err());
    }

    #[test]
    fn truncated_header_fails() {
        assert!(extract_pdf(b"%PDF-1.4\n%garbage").is_err());
    }

    #[test]
    fn one_entry_per_page_in_order() {
        let pages = extract_pdf(TWO_PAGES).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].text, "The sky is blue.");
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].text, "Grass is green.");
    }
}
