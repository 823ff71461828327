//! An opened document together with its segment list.

use crate::error::{Error, Result};
use crate::model::Segment;
use crate::parser::{LopdfBackend, PdfBackend};
use crate::segment::{find_segment, load_outline};

/// A backend plus the segments inferred from its outline.
///
/// The segment list is computed once, when the document is loaded, and never
/// changes afterwards. Opening another document means building another
/// `LoadedDocument`.
pub struct LoadedDocument<B> {
    backend: B,
    total_pages: u32,
    segments: Vec<Segment>,
}

impl<B: PdfBackend> LoadedDocument<B> {
    /// Read the page count and outline from the backend and segment it.
    pub fn load(backend: B) -> Self {
        let total_pages = backend.page_count();
        let segments = load_outline(&backend);
        log::info!(
            "Loaded PDF with {} pages and {} chapters",
            total_pages,
            segments.len()
        );

        Self {
            backend,
            total_pages,
            segments,
        }
    }

    /// Use a precomputed segment list instead of the backend's outline.
    pub fn with_segments(backend: B, segments: Vec<Segment>) -> Self {
        let total_pages = backend.page_count();
        Self {
            backend,
            total_pages,
            segments,
        }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of pages in the document.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Segments in outline-leaf order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment containing a (0-indexed) page.
    pub fn segment_at(&self, page: u32) -> Option<&Segment> {
        find_segment(&self.segments, page)
    }

    /// Give the backend back, dropping the segments.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl LoadedDocument<LopdfBackend> {
    /// Text of the chapter containing a (0-indexed) page.
    pub fn segment_text_at(&self, page: u32) -> Result<String> {
        let segment = self
            .segment_at(page)
            .ok_or(Error::PageNotInAnySegment { page })?;
        log::info!(
            "Extracting text of '{}' (pages {})",
            segment.title,
            segment.display_range()
        );
        self.backend.segment_text(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OutlineEntry, RasterImage};

    struct Book;

    impl PdfBackend for Book {
        fn page_count(&self) -> u32 {
            6
        }

        fn outline(&self) -> Result<Vec<OutlineEntry>> {
            Ok(vec![
                OutlineEntry::new(1, "A", 1),
                OutlineEntry::new(2, "A.1", 1),
                OutlineEntry::new(2, "A.2", 3),
                OutlineEntry::new(1, "B", 5),
            ])
        }

        fn render_page(&self, _index: u32, _scale: f32) -> Result<RasterImage> {
            Ok(RasterImage::blank(1, 1))
        }
    }

    #[test]
    fn test_load_segments_once() {
        let doc = LoadedDocument::load(Book);
        assert_eq!(doc.total_pages(), 6);
        assert_eq!(doc.segments().len(), 3);
        assert_eq!(doc.segment_at(3).unwrap().title, "A_2");
        assert!(doc.segment_at(6).is_none());
    }

    #[test]
    fn test_with_segments() {
        let doc = LoadedDocument::with_segments(Book, vec![Segment::new("X", 0, 5)]);
        assert_eq!(doc.segments(), &[Segment::new("X", 0, 5)]);
    }
}
