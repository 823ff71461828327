//! Data model shared by the segmenter, the extractor and the backends.
//!
//! Outline entries come in from a backend, segments are derived from them
//! once per document, and raster images come back out of extraction.

mod outline;
mod raster;
mod segment;

pub use outline::OutlineEntry;
pub use raster::RasterImage;
pub use segment::{sanitize_title, Segment, FULL_DOCUMENT_TITLE};
