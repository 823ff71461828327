//! PDF backend abstraction layer.
//!
//! Segmentation and extraction only need three things from a PDF library:
//! the page count, the flattened outline, and a page rasterizer. The
//! [`PdfBackend`] trait isolates those from the concrete library.

use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::detect::{pdf_version_from_bytes, pdf_version_from_path};
use crate::error::{Error, Result};
use crate::model::{OutlineEntry, RasterImage, Segment};

use super::outline_reader::read_outline;

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// The document outline, flattened depth-first in original order.
    ///
    /// May fail on corrupt documents.
    fn outline(&self) -> Result<Vec<OutlineEntry>>;

    /// Rasterize a page (0-indexed) at the given scale factor.
    ///
    /// A scale of 1.0 renders at 72 dpi.
    fn render_page(&self, index: u32, scale: f32) -> Result<RasterImage>;
}

impl<B: PdfBackend + ?Sized> PdfBackend for Box<B> {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        (**self).outline()
    }

    fn render_page(&self, index: u32, scale: f32) -> Result<RasterImage> {
        (**self).render_page(index, scale)
    }
}

impl<B: PdfBackend + ?Sized> PdfBackend for &B {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        (**self).outline()
    }

    fn render_page(&self, index: u32, scale: f32) -> Result<RasterImage> {
        (**self).render_page(index, scale)
    }
}

// ---------------------------------------------------------------------------
// LopdfBackend: page tree and outline through lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
///
/// lopdf has no rasterizer, so [`PdfBackend::render_page`] always fails with
/// [`Error::RenderUnsupported`]. Use the MuPDF backend (feature `mupdf`) when
/// page images are needed.
pub struct LopdfBackend {
    doc: LopdfDocument,
    version: String,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let version = pdf_version_from_path(path)?;
        let doc = LopdfDocument::load(path).map_err(load_error)?;
        Ok(Self::with_document(doc, version))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let version = pdf_version_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(load_error)?;
        Ok(Self::with_document(doc, version))
    }

    /// Load from a reader.
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    fn with_document(doc: LopdfDocument, version: String) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; outline titles may be unreadable");
        }
        Self { doc, version }
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// PDF version from the file header (e.g. "1.7").
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Extract the text of every page in a segment, in page order.
    pub fn segment_text(&self, segment: &Segment) -> Result<String> {
        let total = self.page_count();
        if !segment.is_within(total) {
            return Err(Error::InvalidSegmentBounds {
                start: segment.start_page,
                end: segment.end_page,
                total_pages: total,
            });
        }

        let mut text = String::new();
        for page_num in segment.start_page + 1..=segment.end_page + 1 {
            let page_text = self
                .doc
                .extract_text(&[page_num])
                .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))?;
            log::debug!("Extracted {} bytes of text from page {}", page_text.len(), page_num);
            text.push_str(&page_text);
        }

        Ok(text)
    }
}

fn load_error(err: lopdf::Error) -> Error {
    match err {
        lopdf::Error::Decryption(_) => Error::Encrypted,
        _ => Error::from(err),
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        read_outline(&self.doc)
    }

    fn render_page(&self, index: u32, _scale: f32) -> Result<RasterImage> {
        let total = self.page_count();
        if index >= total {
            return Err(Error::PageOutOfRange(index + 1, total));
        }
        Err(Error::RenderUnsupported("lopdf"))
    }
}
