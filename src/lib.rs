//! # pdfchapter
//!
//! Chapter-aware page extraction from PDF documents.
//!
//! The document outline (table of contents) is reduced to its deepest
//! subdivisions, each of which owns a contiguous range of pages. Given a
//! page, the pages of its chapter can then be rendered to images and handed
//! to a multimodal model as conversation context.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfchapter::open_file;
//!
//! fn main() -> pdfchapter::Result<()> {
//!     let doc = open_file("book.pdf")?;
//!
//!     for segment in doc.segments() {
//!         println!("{} (pages {})", segment.title, segment.display_range());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline segmentation**: leaf subdivisions, with fallbacks for flat,
//!   empty or broken outlines
//! - **Bounded extraction**: chapters over a page limit are refused up front
//! - **Pluggable backends**: `lopdf` for structure, MuPDF (feature `mupdf`)
//!   for rasterization
//! - **Chat context**: PNG data URLs in the common chat-completions shape

pub mod conversation;
pub mod detect;
pub mod document;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod segment;
pub mod session;

// Re-export commonly used types
pub use conversation::{Conversation, ConversationMessage, ContentPart, MessageContent, Role};
pub use detect::{is_pdf_bytes, pdf_version_from_bytes, pdf_version_from_path};
pub use document::LoadedDocument;
pub use error::{Error, Result};
pub use extract::{ContentExtractor, ExtractMode, ExtractOptions};
pub use model::{OutlineEntry, RasterImage, Segment};
#[cfg(feature = "mupdf")]
pub use parser::MupdfBackend;
pub use parser::{LopdfBackend, PdfBackend};
pub use segment::{find_segment, load_outline, segment};
pub use session::ReaderSession;

use std::io::Read;
use std::path::Path;

/// Open a PDF file and segment its outline.
///
/// # Example
///
/// ```no_run
/// use pdfchapter::open_file;
///
/// let doc = open_file("book.pdf").unwrap();
/// println!("Pages: {}", doc.total_pages());
/// ```
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<LoadedDocument<LopdfBackend>> {
    let backend = LopdfBackend::load_file(path)?;
    Ok(LoadedDocument::load(backend))
}

/// Open a PDF from bytes and segment its outline.
pub fn open_bytes(data: &[u8]) -> Result<LoadedDocument<LopdfBackend>> {
    let backend = LopdfBackend::load_bytes(data)?;
    Ok(LoadedDocument::load(backend))
}

/// Open a PDF from a reader and segment its outline.
pub fn open_reader<R: Read>(reader: R) -> Result<LoadedDocument<LopdfBackend>> {
    let backend = LopdfBackend::load_reader(reader)?;
    Ok(LoadedDocument::load(backend))
}

/// Segments of a PDF file, without keeping the document open.
///
/// # Example
///
/// ```no_run
/// use pdfchapter::segments_from_file;
///
/// let segments = segments_from_file("book.pdf").unwrap();
/// println!("{} chapters", segments.len());
/// ```
pub fn segments_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>> {
    let doc = open_file(path)?;
    Ok(doc.segments().to_vec())
}

/// The flattened outline of a PDF file.
pub fn outline_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<OutlineEntry>> {
    LopdfBackend::load_file(path)?.outline()
}

/// Open a PDF file with the MuPDF backend, which can render pages.
#[cfg(feature = "mupdf")]
pub fn open_file_renderable<P: AsRef<Path>>(path: P) -> Result<LoadedDocument<MupdfBackend>> {
    let backend = MupdfBackend::open(path)?;
    Ok(LoadedDocument::load(backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_open_bytes_empty_data() {
        let data: [u8; 0] = [];
        assert!(open_bytes(&data).is_err());
    }

    #[test]
    fn test_open_bytes_too_short() {
        let result = open_bytes(b"%PDF");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_open_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert!(matches!(open_bytes(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_open_bytes_truncated_body() {
        // Valid header, no body
        assert!(open_bytes(b"%PDF-1.7\n%garbage").is_err());
    }

    #[test]
    fn test_open_file_missing() {
        let result = open_file("/nonexistent/book.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    // ==================== Re-export Tests ====================

    #[test]
    fn test_reexported_segmenter() {
        let outline = vec![OutlineEntry::new(1, "Intro", 1), OutlineEntry::new(1, "End", 3)];
        let segments = segment(&outline, 4);
        assert_eq!(find_segment(&segments, 3).unwrap().title, "End");
    }

    #[test]
    fn test_default_extract_options() {
        let extractor = ContentExtractor::new(ExtractOptions::default());
        assert_eq!(extractor.options().max_pages, 100);
        assert_eq!(extractor.options().render_scale, 2.0);
    }
}
