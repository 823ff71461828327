//! Integration tests for chapter extraction through the public API.

mod common;

use common::{page_numbers, MockBook, SyntheticPdf};
use pdfchapter::{
    open_bytes, ContentExtractor, ConversationMessage, Error, ExtractMode, ExtractOptions,
    LoadedDocument, ReaderSession,
};

fn book() -> MockBook {
    MockBook::new(
        20,
        &[
            (1, "Preface", 1),
            (1, "Part One", 3),
            (2, "Chapter 1", 3),
            (2, "Chapter 2", 9),
            (1, "Index", 16),
        ],
    )
}

#[test]
fn test_extracts_every_page_of_the_chapter() {
    let doc = LoadedDocument::load(book());
    let extractor = ContentExtractor::default();

    let images = extractor.extract_segment_containing(Some(&doc), 10).unwrap();
    assert_eq!(page_numbers(&images), (9..=15).collect::<Vec<u32>>());

    let images = extractor.extract_segment_containing(Some(&doc), 19).unwrap();
    assert_eq!(page_numbers(&images), [16, 17, 18, 19, 20]);
}

#[test]
fn test_segments_cover_document_without_gaps() {
    let doc = LoadedDocument::load(book());
    let segments = doc.segments();

    assert_eq!(segments.first().unwrap().start_page, 0);
    assert_eq!(segments.last().unwrap().end_page, 19);
    for pair in segments.windows(2) {
        assert_eq!(pair[0].end_page + 1, pair[1].start_page);
    }
    for page in 0..20 {
        assert!(doc.segment_at(page).is_some(), "page {} uncovered", page);
    }
}

#[test]
fn test_limit_is_checked_before_rendering() {
    let doc = LoadedDocument::load(book());
    let extractor = ContentExtractor::new(ExtractOptions::new().with_max_pages(5));

    let result = extractor.extract_segment_containing(Some(&doc), 3);
    assert!(matches!(
        result,
        Err(Error::SegmentTooLarge {
            pages: 6,
            max_pages: 5
        })
    ));
    assert_eq!(doc.backend().renders.get(), 0);
}

#[test]
fn test_hundred_page_chapter_is_allowed() {
    let doc = LoadedDocument::load(MockBook::new(
        201,
        &[(1, "Long", 1), (1, "Longer", 101)],
    ));
    let extractor = ContentExtractor::default();

    assert_eq!(
        extractor
            .extract_segment_containing(Some(&doc), 0)
            .unwrap()
            .len(),
        100
    );
    assert!(matches!(
        extractor.extract_segment_containing(Some(&doc), 100),
        Err(Error::SegmentTooLarge {
            pages: 101,
            max_pages: 100
        })
    ));
}

#[test]
fn test_failed_page_keeps_earlier_images() {
    let mut backend = book();
    backend.fail_on = Some(11);
    let doc = LoadedDocument::load(backend);

    match ContentExtractor::default().extract_segment_containing(Some(&doc), 8) {
        Err(Error::ExtractionAborted { page, rendered, .. }) => {
            assert_eq!(page, 11);
            assert_eq!(page_numbers(&rendered), [9, 10, 11]);
        }
        other => panic!("expected ExtractionAborted, got {:?}", other),
    }
}

#[test]
fn test_lopdf_backend_extraction_aborts_on_first_page() {
    let pdf = SyntheticPdf::new(4, &[(1, "Only", 1)]);
    let doc = open_bytes(&pdf.to_bytes()).unwrap();
    let extractor = ContentExtractor::default();

    match extractor.extract_segment_containing(Some(&doc), 2) {
        Err(Error::ExtractionAborted {
            page,
            source,
            rendered,
        }) => {
            assert_eq!(page, 0);
            assert!(matches!(*source, Error::RenderUnsupported(_)));
            assert!(rendered.is_empty());
        }
        other => panic!("expected ExtractionAborted, got {:?}", other),
    }

    assert!(matches!(
        extractor.extract_single_page(Some(&doc), 2),
        Err(Error::RenderUnsupported(_))
    ));
}

#[test]
fn test_session_to_context_message() {
    let mut session = ReaderSession::new(ExtractOptions::default());
    session.open(book());
    session.go_to_page(4).unwrap();
    assert_eq!(session.current_segment().unwrap().title, "Chapter_1");

    let images = session.extract_content().unwrap();
    assert_eq!(images.len(), 6);
    let message = ConversationMessage::context(session.mode(), &images).unwrap();
    assert_eq!(message.image_count(), 6);

    session.toggle_mode();
    assert_eq!(session.mode(), ExtractMode::SinglePage);
    let images = session.extract_content().unwrap();
    assert_eq!(page_numbers(&images), [4]);
}

#[test]
fn test_session_navigation_follows_chapters() {
    let mut session = ReaderSession::default();
    session.open(book());

    let mut titles = Vec::new();
    loop {
        let title = session.current_segment().unwrap().title.clone();
        if titles.last() != Some(&title) {
            titles.push(title);
        }
        if !session.next_page() {
            break;
        }
    }

    assert_eq!(titles, ["Preface", "Chapter_1", "Chapter_2", "Index"]);
    assert_eq!(session.page_label(), "Page: 20/20");
}
