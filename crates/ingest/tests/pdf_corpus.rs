use docchat_core::UploadedDocument;
use docchat_ingest::document::chunker::split_sentences;
use docchat_ingest::document::extract_text;
use docchat_ingest::CorpusBuilder;

const TWO_PAGES: &[u8] = include_bytes!("fixtures/two_pages.pdf");

#[test]
fn pages_are_joined_with_newlines() {
    let doc = extract_text(TWO_PAGES, "two.pdf").unwrap();
    assert_eq!(doc.file_type, "pdf");
    assert_eq!(doc.full_text(), "The sky is blue.\nGrass is green.\n");
}

#[test]
fn page_boundary_ends_a_sentence() {
    let build = CorpusBuilder::default().build(&[UploadedDocument::new("two.pdf", TWO_PAGES)]);
    assert!(build.failures.is_empty());
    assert_eq!(build.corpus, "The sky is blue.\nGrass is green.\n\n");
    assert_eq!(
        split_sentences(&build.corpus),
        vec!["The sky is blue.", "Grass is green."]
    );
}
