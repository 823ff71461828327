//! Flatten the `/Outlines` tree of a lopdf document into [`OutlineEntry`]s.

use std::collections::{HashMap, HashSet};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::OutlineEntry;

/// Outlines nested deeper than this are treated as malformed.
const MAX_DEPTH: u32 = 64;

/// Name trees nested deeper than this are not searched.
const MAX_NAME_TREE_DEPTH: u32 = 32;

/// Indirections followed from an item's `/Dest` or `/D` to an explicit
/// `[page ...]` array. A named destination stored as an indirect
/// `<< /D [...] >>` takes four.
const MAX_DEST_HOPS: u32 = 8;

/// Read the document outline, depth-first, with top-level entries at level 1.
///
/// A document without `/Outlines` yields an empty list. Items whose
/// destination cannot be resolved to a page get `target_page == 0`.
pub(crate) fn read_outline(doc: &Document) -> Result<Vec<OutlineEntry>> {
    let catalog = doc
        .catalog()
        .map_err(|e| Error::OutlineRead(e.to_string()))?;

    let Ok(outlines) = catalog.get(b"Outlines") else {
        return Ok(Vec::new());
    };
    let outlines = resolve_dict(doc, outlines)
        .ok_or_else(|| Error::OutlineRead("/Outlines is not a dictionary".to_string()))?;
    let Ok(first) = outlines.get(b"First").and_then(Object::as_reference) else {
        return Ok(Vec::new());
    };

    let mut reader = OutlineReader {
        doc,
        pages: doc
            .get_pages()
            .into_iter()
            .map(|(num, id)| (id, num))
            .collect(),
        visited: HashSet::new(),
        entries: Vec::new(),
    };
    reader.walk(first, 1)?;

    log::debug!("Read {} outline entries", reader.entries.len());
    Ok(reader.entries)
}

struct OutlineReader<'a> {
    doc: &'a Document,
    /// Page object id -> page number (1-indexed)
    pages: HashMap<ObjectId, u32>,
    visited: HashSet<ObjectId>,
    entries: Vec<OutlineEntry>,
}

impl<'a> OutlineReader<'a> {
    /// Visit an item, its children, then its following siblings.
    fn walk(&mut self, first: ObjectId, level: u32) -> Result<()> {
        if level > MAX_DEPTH {
            return Err(Error::OutlineRead(format!(
                "outline nested deeper than {} levels",
                MAX_DEPTH
            )));
        }

        let doc = self.doc;
        let mut current = Some(first);
        while let Some(id) = current {
            // Sibling and child links must form a tree
            if !self.visited.insert(id) {
                return Err(Error::OutlineRead(format!(
                    "outline item {} {} R is linked twice",
                    id.0, id.1
                )));
            }

            let item = doc
                .get_dictionary(id)
                .map_err(|e| Error::OutlineRead(format!("outline item {} {} R: {}", id.0, id.1, e)))?;

            let title = item
                .get(b"Title")
                .ok()
                .and_then(|obj| decode_text_object(doc, obj))
                .unwrap_or_default();
            let target_page = self.destination_page(item).unwrap_or(0);
            self.entries
                .push(OutlineEntry::new(level, title, target_page));

            if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
                self.walk(child, level + 1)?;
            }

            current = item.get(b"Next").and_then(Object::as_reference).ok();
        }

        Ok(())
    }

    /// Get the destination page (1-indexed) of an outline item.
    fn destination_page(&self, item: &Dictionary) -> Option<u32> {
        // Try Dest first
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve_destination(dest, 0);
        }

        // Then a GoTo action
        let action = resolve_dict(self.doc, item.get(b"A").ok()?)?;
        self.resolve_destination(action.get(b"D").ok()?, 0)
    }

    /// Resolve an explicit or named destination to a page number.
    fn resolve_destination(&self, dest: &Object, hops: u32) -> Option<u32> {
        if hops > MAX_DEST_HOPS {
            log::debug!("Destination chain longer than {} hops", MAX_DEST_HOPS);
            return None;
        }

        match dest {
            Object::Reference(id) => {
                let obj = self.doc.get_object(*id).ok()?;
                self.resolve_destination(obj, hops + 1)
            }
            Object::Array(array) => {
                let page_ref = array.first()?.as_reference().ok()?;
                self.pages.get(&page_ref).copied()
            }
            // Named destination values may be wrapped as << /D [...] >>
            Object::Dictionary(dict) => self.resolve_destination(dict.get(b"D").ok()?, hops + 1),
            Object::Name(name) => {
                let target = self.lookup_legacy_dest(name)?;
                self.resolve_destination(target, hops + 1)
            }
            Object::String(name, _) => {
                let target = self.lookup_named_dest(name)?;
                self.resolve_destination(target, hops + 1)
            }
            _ => None,
        }
    }

    /// Look up a name in the catalog's `/Dests` dictionary (PDF 1.1).
    fn lookup_legacy_dest(&self, name: &[u8]) -> Option<&'a Object> {
        let doc = self.doc;
        let catalog = doc.catalog().ok()?;
        let dests = resolve_dict(doc, catalog.get(b"Dests").ok()?)?;
        dests.get(name).ok()
    }

    /// Look up a name in the `/Names /Dests` name tree (PDF 1.2+).
    fn lookup_named_dest(&self, name: &[u8]) -> Option<&'a Object> {
        let doc = self.doc;
        let catalog = doc.catalog().ok()?;
        let names = resolve_dict(doc, catalog.get(b"Names").ok()?)?;
        let root = resolve_dict(doc, names.get(b"Dests").ok()?)?;
        search_name_tree(doc, root, name, 0)
    }
}

/// Linear search of a name tree node and its kids.
fn search_name_tree<'a>(
    doc: &'a Document,
    node: &'a Dictionary,
    name: &[u8],
    depth: u32,
) -> Option<&'a Object> {
    if depth > MAX_NAME_TREE_DEPTH {
        return None;
    }

    if let Ok(names) = node.get(b"Names").and_then(Object::as_array) {
        for pair in names.chunks(2) {
            if let [Object::String(key, _), value] = pair {
                if key.as_slice() == name {
                    return Some(value);
                }
            }
        }
    }

    let kids = node.get(b"Kids").and_then(Object::as_array).ok()?;
    kids.iter()
        .filter_map(|kid| resolve_dict(doc, kid))
        .find_map(|kid| search_name_tree(doc, kid, name, depth + 1))
}

/// Follow a reference (if any) to a dictionary.
fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(r) => doc.get_dictionary(*r).ok(),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

/// Decode a text string object, following one level of indirection.
fn decode_text_object(doc: &Document, obj: &Object) -> Option<String> {
    match obj {
        Object::Reference(r) => match doc.get_object(*r).ok()? {
            Object::String(bytes, _) => Some(decode_pdf_text(bytes)),
            _ => None,
        },
        Object::String(bytes, _) => Some(decode_pdf_text(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Decode PDF text string bytes.
///
/// UTF-16BE with BOM is the standard Unicode form; UTF-8 with BOM is
/// allowed since PDF 2.0. Anything else is tried as UTF-8, then Latin-1.
pub(crate) fn decode_pdf_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
