//! Flattened outline (bookmark) entries.

use serde::{Deserialize, Serialize};

/// One entry of a document outline, flattened in original order.
///
/// Entries are not sorted by page, and the level may rise or fall by any
/// amount between consecutive entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Nesting level (1 = top level)
    pub level: u32,

    /// Entry title as stored in the document
    pub title: String,

    /// Target page number (1-indexed, 0 if the destination could not be resolved)
    pub target_page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: u32, title: impl Into<String>, target_page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            target_page,
        }
    }

    /// Check if this is a top-level entry.
    pub fn is_top_level(&self) -> bool {
        self.level == 1
    }
}

impl From<(u32, &str, u32)> for OutlineEntry {
    fn from((level, title, target_page): (u32, &str, u32)) -> Self {
        Self::new(level, title, target_page)
    }
}
