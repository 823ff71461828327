//! Page-image extraction for a chapter or a single page.
//!
//! # Example
//!
//! ```no_run
//! use pdfchapter::extract::{ContentExtractor, ExtractOptions};
//! use pdfchapter::{LoadedDocument, LopdfBackend};
//!
//! fn main() -> pdfchapter::Result<()> {
//!     let doc = LoadedDocument::load(LopdfBackend::load_file("book.pdf")?);
//!     let extractor = ContentExtractor::new(ExtractOptions::default());
//!
//!     let images = extractor.extract_segment_containing(Some(&doc), 12)?;
//!     println!("{} pages", images.len());
//!     Ok(())
//! }
//! ```

mod options;

pub use options::{ExtractMode, ExtractOptions, DEFAULT_MAX_PAGES, DEFAULT_RENDER_SCALE};

use crate::document::LoadedDocument;
use crate::error::{Error, Result};
use crate::model::{RasterImage, Segment};
use crate::parser::PdfBackend;

/// Renders the pages of a segment, or a single page, through a backend.
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    options: ExtractOptions,
}

impl ContentExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The extractor's options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract according to the configured [`ExtractMode`].
    pub fn extract<B: PdfBackend>(
        &self,
        document: Option<&LoadedDocument<B>>,
        page_index: u32,
    ) -> Result<Vec<RasterImage>> {
        match self.options.mode {
            ExtractMode::Chapter => self.extract_segment_containing(document, page_index),
            ExtractMode::SinglePage => self.extract_single_page(document, page_index),
        }
    }

    /// Find and validate the segment an extraction of `page_index` would cover.
    ///
    /// Fails with [`Error::PageNotInAnySegment`], [`Error::InvalidSegmentBounds`]
    /// or [`Error::SegmentTooLarge`].
    pub fn locate_segment<'d, B: PdfBackend>(
        &self,
        document: &'d LoadedDocument<B>,
        page_index: u32,
    ) -> Result<&'d Segment> {
        let segment = document
            .segment_at(page_index)
            .ok_or(Error::PageNotInAnySegment { page: page_index })?;

        let total_pages = document.total_pages();
        if !segment.is_within(total_pages) {
            return Err(Error::InvalidSegmentBounds {
                start: segment.start_page,
                end: segment.end_page,
                total_pages,
            });
        }

        let pages = segment.page_count();
        if pages > self.options.max_pages {
            return Err(Error::SegmentTooLarge {
                pages,
                max_pages: self.options.max_pages,
            });
        }

        Ok(segment)
    }

    /// Render every page of the first segment containing `page_index`.
    pub fn extract_segment_containing<B: PdfBackend>(
        &self,
        document: Option<&LoadedDocument<B>>,
        page_index: u32,
    ) -> Result<Vec<RasterImage>> {
        self.extract_segment_with_progress(document, page_index, |_, _| {})
    }

    /// Like [`extract_segment_containing`](Self::extract_segment_containing),
    /// calling `on_page(done, total)` after each rendered page.
    ///
    /// If a page fails to render the loop stops, and the error
    /// ([`Error::ExtractionAborted`]) carries the images rendered so far.
    pub fn extract_segment_with_progress<B, F>(
        &self,
        document: Option<&LoadedDocument<B>>,
        page_index: u32,
        mut on_page: F,
    ) -> Result<Vec<RasterImage>>
    where
        B: PdfBackend,
        F: FnMut(u32, u32),
    {
        let document = document.ok_or(Error::NoDocumentLoaded)?;
        let segment = self.locate_segment(document, page_index)?;
        let total_pages = document.total_pages();
        let count = segment.page_count();

        let mut images = Vec::with_capacity(count as usize);
        for page in segment.start_page..=segment.end_page {
            if page >= total_pages {
                break;
            }

            match document
                .backend()
                .render_page(page, self.options.render_scale)
            {
                Ok(image) => images.push(image),
                Err(e) => {
                    log::error!("Extraction error on page {}: {}", page + 1, e);
                    return Err(Error::ExtractionAborted {
                        page,
                        source: Box::new(e),
                        rendered: images,
                    });
                }
            }

            log::info!("Processed page {}", page + 1);
            on_page(images.len() as u32, count);
        }

        log::info!(
            "Extracted chapter: {} (pages {}, {} images)",
            segment.title,
            segment.display_range(),
            images.len()
        );
        Ok(images)
    }

    /// Render just `page_index`, bypassing segmentation.
    pub fn extract_single_page<B: PdfBackend>(
        &self,
        document: Option<&LoadedDocument<B>>,
        page_index: u32,
    ) -> Result<Vec<RasterImage>> {
        let document = document.ok_or(Error::NoDocumentLoaded)?;

        let total_pages = document.total_pages();
        if page_index >= total_pages {
            return Err(Error::PageOutOfRange(page_index + 1, total_pages));
        }

        let image = document
            .backend()
            .render_page(page_index, self.options.render_scale)?;
        log::info!("Extracted page {}", page_index + 1);
        Ok(vec![image])
    }
}
