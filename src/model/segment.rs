//! Chapter segments: contiguous, inclusive page ranges.

use serde::{Deserialize, Serialize};

/// Title of the single segment used when no usable outline exists.
pub const FULL_DOCUMENT_TITLE: &str = "Full Document";

/// A contiguous, inclusive range of pages assigned to one outline leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Sanitized title (alphanumerics and underscores only)
    pub title: String,

    /// First page (0-indexed)
    pub start_page: u32,

    /// Last page (0-indexed, inclusive)
    pub end_page: u32,
}

impl Segment {
    /// Create a segment from an already sanitized title.
    pub fn new(title: impl Into<String>, start_page: u32, end_page: u32) -> Self {
        Self {
            title: title.into(),
            start_page,
            end_page,
        }
    }

    /// The segment covering a whole document of `total_pages` pages.
    ///
    /// `total_pages` must be at least 1.
    pub fn full_document(total_pages: u32) -> Self {
        Self::new(FULL_DOCUMENT_TITLE, 0, total_pages.saturating_sub(1))
    }

    /// Check if a (0-indexed) page falls inside this segment.
    pub fn contains(&self, page: u32) -> bool {
        self.start_page <= page && page <= self.end_page
    }

    /// Number of pages in the segment.
    ///
    /// Zero for a range whose end precedes its start.
    pub fn page_count(&self) -> u32 {
        if self.end_page < self.start_page {
            return 0;
        }
        self.end_page - self.start_page + 1
    }

    /// Check the bounds invariant `start <= end < total_pages`.
    pub fn is_within(&self, total_pages: u32) -> bool {
        self.start_page <= self.end_page && self.end_page < total_pages
    }

    /// Human-readable page range (1-indexed), e.g. "3-7".
    pub fn display_range(&self) -> String {
        format!("{}-{}", self.start_page + 1, self.end_page + 1)
    }
}

/// Reduce an outline title to alphanumerics and underscores.
///
/// Leading and trailing whitespace is trimmed first; every remaining
/// non-alphanumeric character becomes exactly one underscore.
pub fn sanitize_title(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
