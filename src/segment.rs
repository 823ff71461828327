//! Chapter-boundary inference from a document outline.
//!
//! The outline's deepest subdivisions ("leaves") become segments: each leaf
//! owns the pages from its own target up to the page before the next leaf's
//! target, and the last leaf runs to the end of the document.
//!
//! # Example
//!
//! ```
//! use pdfchapter::model::OutlineEntry;
//! use pdfchapter::segment::segment;
//!
//! let outline = vec![
//!     OutlineEntry::new(1, "A", 1),
//!     OutlineEntry::new(2, "A.1", 1),
//!     OutlineEntry::new(2, "A.2", 3),
//!     OutlineEntry::new(1, "B", 5),
//! ];
//! let segments = segment(&outline, 6);
//!
//! let ranges: Vec<_> = segments
//!     .iter()
//!     .map(|s| (s.title.as_str(), s.start_page, s.end_page))
//!     .collect();
//! assert_eq!(ranges, [("A_1", 0, 1), ("A_2", 2, 3), ("B", 4, 5)]);
//! ```

use crate::model::{sanitize_title, OutlineEntry, Segment};
use crate::parser::PdfBackend;

/// Read a backend's outline and segment it.
///
/// Never fails: an outline that cannot be read degrades to a single
/// "Full Document" segment.
pub fn load_outline<B: PdfBackend + ?Sized>(backend: &B) -> Vec<Segment> {
    let total_pages = backend.page_count();

    match backend.outline() {
        Ok(outline) => segment(&outline, total_pages),
        Err(e) => {
            log::warn!("Chapter detection failed: {}", e);
            full_document(total_pages)
        }
    }
}

/// Partition `total_pages` pages into segments, one per outline leaf.
///
/// Pure function of its inputs. Returns an empty list only when
/// `total_pages` is zero.
pub fn segment(outline: &[OutlineEntry], total_pages: u32) -> Vec<Segment> {
    if total_pages == 0 {
        log::warn!("Document has no pages; no segments produced");
        return Vec::new();
    }

    if outline.is_empty() {
        return full_document(total_pages);
    }

    let mut leaves = leaf_entries(outline);
    if leaves.is_empty() {
        leaves = outline.iter().filter(|e| e.is_top_level()).collect();
        if leaves.is_empty() {
            return full_document(total_pages);
        }
    }

    let last_page = total_pages - 1;
    let mut segments = Vec::with_capacity(leaves.len());

    for (i, leaf) in leaves.iter().enumerate() {
        if leaf.target_page == 0 || leaf.target_page > total_pages {
            log::warn!(
                "Outline entry '{}' targets page {} outside 1-{}; clamped",
                leaf.title,
                leaf.target_page,
                total_pages
            );
        }

        let mut start = leaf.target_page.saturating_sub(1).min(last_page);
        let mut end = match leaves.get(i + 1) {
            // One page before the next leaf's (0-indexed) start
            Some(next) => next.target_page.saturating_sub(1 + 1).min(last_page),
            None => last_page,
        };

        start = start.min(last_page);
        end = start.max(end.min(last_page));

        let seg = Segment::new(sanitize_title(&leaf.title), start, end);
        log::info!(
            "Subdivision: {} (pages {})",
            leaf.title,
            seg.display_range()
        );
        segments.push(seg);
    }

    segments
}

/// Flag each entry that has no deeper entry directly beneath it.
///
/// Scanning forward from entry `i`, the first entry at the same or a
/// shallower level ends the scan; a deeper entry seen before that makes `i`
/// a parent. Since the scan stops at the first entry either way, only the
/// immediate successor decides.
pub fn leaf_flags(outline: &[OutlineEntry]) -> Vec<bool> {
    outline
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            outline
                .get(i + 1)
                .map_or(true, |next| next.level <= entry.level)
        })
        .collect()
}

/// Leaf entries in original order.
pub fn leaf_entries(outline: &[OutlineEntry]) -> Vec<&OutlineEntry> {
    let flags = leaf_flags(outline);
    log::debug!(
        "{} of {} outline entries are leaves",
        flags.iter().filter(|&&leaf| leaf).count(),
        outline.len()
    );

    outline
        .iter()
        .zip(flags)
        .filter_map(|(entry, leaf)| leaf.then_some(entry))
        .collect()
}

/// Find the first segment containing a (0-indexed) page.
///
/// Segments are scanned in order, so a page claimed by two segments (see
/// duplicate outline targets) belongs to the earlier one.
pub fn find_segment(segments: &[Segment], page: u32) -> Option<&Segment> {
    segments.iter().find(|s| s.contains(page))
}

fn full_document(total_pages: u32) -> Vec<Segment> {
    if total_pages == 0 {
        return Vec::new();
    }
    vec![Segment::full_document(total_pages)]
}
