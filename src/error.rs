//! Error types for pdfchapter.

use std::io;
use thiserror::Error;

use crate::model::RasterImage;

/// Result type alias for pdfchapter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while segmenting or extracting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The outline could not be read from the document.
    #[error("Failed to read document outline: {0}")]
    OutlineRead(String),

    /// An extraction was requested while no document is open.
    #[error("No PDF loaded")]
    NoDocumentLoaded,

    /// The requested page is not covered by any segment.
    #[error("Page {} is not in any chapter", .page + 1)]
    PageNotInAnySegment {
        /// Zero-based page index.
        page: u32,
    },

    /// A segment failed the bounds re-check before extraction.
    #[error("Invalid chapter boundaries: pages {start}..={end} in a {total_pages}-page document")]
    InvalidSegmentBounds {
        start: u32,
        end: u32,
        total_pages: u32,
    },

    /// The segment has more pages than the configured limit.
    #[error("Chapter too large ({pages} pages). Max allowed: {max_pages}")]
    SegmentTooLarge { pages: u32, max_pages: u32 },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The backend failed to rasterize a page.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The backend has no rasterizer.
    #[error("Page rendering is not supported by the {0} backend")]
    RenderUnsupported(&'static str),

    /// A page failed to render in the middle of an extraction.
    ///
    /// `rendered` holds the images produced before the failure, in page order.
    #[error("Extraction aborted at page {} after {} rendered pages: {source}", .page + 1, .rendered.len())]
    ExtractionAborted {
        /// Zero-based index of the page that failed.
        page: u32,
        #[source]
        source: Box<Error>,
        rendered: Vec<RasterImage>,
    },

    /// Error extracting page text.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// A pixel buffer does not match its declared dimensions.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Error encoding a rendered page.
    #[error("Image encoding error: {0}")]
    ImageEncode(String),

    /// Error serializing messages or segments.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageEncode(err.to_string())
    }
}

#[cfg(feature = "mupdf")]
impl From<mupdf::Error> for Error {
    fn from(err: mupdf::Error) -> Self {
        Error::Render(err.to_string())
    }
}
