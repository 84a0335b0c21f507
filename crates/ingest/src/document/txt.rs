use super::PageContent;

/// Plain text and markdown are a single page.
pub fn extract_txt(bytes: &[u8]) -> Vec<PageContent> {
    let text = String::from_utf8_lossy(bytes);

    vec![PageContent {
        page_number: 1,
        text: text.trim().to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_simple_text() {
        let content = b"Hello, world!\nThis is a test file.";
        let pages = extract_txt(content);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert!(pages[0].text.contains("Hello, world!"));
    }

    #[test]
    fn extract_utf8_text() {
        let content = "Ünïcödé text with émojis 🎉".as_bytes();
        let pages = extract_txt(content);
        assert_eq!(pages[0].text, "Ünïcödé text with émojis 🎉");
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let pages = extract_txt(b"ok \xff bytes");
        assert!(pages[0].text.starts_with("ok "));
        assert!(pages[0].text.ends_with(" bytes"));
    }

    #[test]
    fn extract_empty_text() {
        let pages = extract_txt(b"");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "");
    }

    #[test]
    fn trims_whitespace() {
        let content = b"  \n  Hello  \n  ";
        let pages = extract_txt(content);
        assert_eq!(pages[0].text, "Hello");
    }
}
