use unicode_normalization::UnicodeNormalization;

/// Fallback label when sanitising leaves nothing behind.
pub const FALLBACK_DOCUMENT_NAME: &str = "document";

/// One uploaded file. Only the sanitised name is ever kept; the raw
/// client-supplied name is discarded at construction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(raw_name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: sanitize_filename(raw_name),
            bytes: bytes.into(),
        }
    }
}

/// Neutralise a client-supplied filename for display and use as a label.
///
/// Accented letters are decomposed (NFKD) and reduced to their ASCII base,
/// path separators become word breaks, whitespace runs collapse to `_`,
/// anything outside `[A-Za-z0-9_.-]` (control characters included) is
/// dropped, and leading/trailing `.`/`_` are stripped so `..` cannot
/// survive as a path component.
pub fn sanitize_filename(raw: &str) -> String {
    let spaced: String = raw
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_DOCUMENT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
