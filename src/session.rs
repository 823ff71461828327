//! Reader state: the open document, the current page and the extraction mode.

use crate::document::LoadedDocument;
use crate::error::{Error, Result};
use crate::extract::{ContentExtractor, ExtractMode, ExtractOptions};
use crate::model::{RasterImage, Segment};
use crate::parser::PdfBackend;

/// A page-by-page reading session over at most one document.
pub struct ReaderSession<B> {
    document: Option<LoadedDocument<B>>,
    current_page: u32,
    extractor: ContentExtractor,
}

impl<B: PdfBackend> ReaderSession<B> {
    /// Create an empty session.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            document: None,
            current_page: 0,
            extractor: ContentExtractor::new(options),
        }
    }

    /// Open a document, replacing the current one.
    ///
    /// The new segment list is fully built before the old document is
    /// dropped. The current page goes back to the first page.
    pub fn open(&mut self, backend: B) {
        let loaded = LoadedDocument::load(backend);
        self.document = Some(loaded);
        self.current_page = 0;
    }

    /// Close the current document, if any.
    pub fn close(&mut self) -> Option<B> {
        self.current_page = 0;
        self.document.take().map(LoadedDocument::into_backend)
    }

    /// The open document.
    pub fn document(&self) -> Option<&LoadedDocument<B>> {
        self.document.as_ref()
    }

    /// Check if a document is open.
    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    /// Pages in the open document (0 when none is open).
    pub fn total_pages(&self) -> u32 {
        self.document.as_ref().map_or(0, LoadedDocument::total_pages)
    }

    /// Segments of the open document.
    pub fn segments(&self) -> &[Segment] {
        self.document
            .as_ref()
            .map(LoadedDocument::segments)
            .unwrap_or(&[])
    }

    /// Current page (0-indexed).
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Status text such as "Page: 3/10".
    pub fn page_label(&self) -> String {
        let total = self.total_pages();
        if total == 0 {
            return "Page: 0/0".to_string();
        }
        format!("Page: {}/{}", self.current_page + 1, total)
    }

    /// Move to the next page. Returns false at the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page + 1 < self.total_pages() {
            self.current_page += 1;
            return true;
        }
        false
    }

    /// Move to the previous page. Returns false at the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 0 && self.is_open() {
            self.current_page -= 1;
            return true;
        }
        false
    }

    /// Jump to the first page.
    pub fn first_page(&mut self) {
        self.current_page = 0;
    }

    /// Jump to the last page.
    pub fn last_page(&mut self) {
        self.current_page = self.total_pages().saturating_sub(1);
    }

    /// Jump to a page given as a 1-indexed number, as a user would type it.
    pub fn go_to_page(&mut self, page_number: u32) -> Result<()> {
        let total = self
            .document
            .as_ref()
            .map(LoadedDocument::total_pages)
            .ok_or(Error::NoDocumentLoaded)?;

        if page_number == 0 || page_number > total {
            return Err(Error::PageOutOfRange(page_number, total));
        }
        self.current_page = page_number - 1;
        Ok(())
    }

    /// The segment the current page belongs to, if any.
    pub fn current_segment(&self) -> Option<&Segment> {
        self.document.as_ref()?.segment_at(self.current_page)
    }

    /// Current extraction mode.
    pub fn mode(&self) -> ExtractMode {
        self.extractor.options().mode
    }

    /// Set the extraction mode.
    pub fn set_mode(&mut self, mode: ExtractMode) {
        let options = self.extractor.options().clone().with_mode(mode);
        self.extractor = ContentExtractor::new(options);
    }

    /// Switch between chapter and single-page mode.
    pub fn toggle_mode(&mut self) -> ExtractMode {
        let mode = self.mode().toggled();
        self.set_mode(mode);
        mode
    }

    /// Label for the extraction action in the current mode.
    pub fn extract_label(&self) -> &'static str {
        self.mode().action_label()
    }

    /// Extract the current chapter or page, depending on the mode.
    pub fn extract_content(&self) -> Result<Vec<RasterImage>> {
        self.extractor
            .extract(self.document.as_ref(), self.current_page)
    }
}

impl<B: PdfBackend> Default for ReaderSession<B> {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}
