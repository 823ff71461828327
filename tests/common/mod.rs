//! Synthetic PDFs and mock backends shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use pdfchapter::error::{Error, Result};
use pdfchapter::{OutlineEntry, PdfBackend, RasterImage};

/// A lopdf document with blank pages and an outline built from
/// `(level, title, target_page)` triples. A target of 0 gets no destination.
pub struct SyntheticPdf {
    pub doc: Document,
    pub page_ids: Vec<ObjectId>,
    pub item_ids: Vec<ObjectId>,
}

impl SyntheticPdf {
    pub fn new(page_count: u32, outline: &[(u32, &str, u32)]) -> Self {
        let mut doc = Document::with_version("1.5");

        let pages_id = doc.new_object_id();
        let page_ids: Vec<ObjectId> = (0..page_count)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                })
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
                "Count" => page_count as i64,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        let mut item_ids = Vec::new();
        if !outline.is_empty() {
            let outlines_id = doc.new_object_id();
            item_ids = outline.iter().map(|_| doc.new_object_id()).collect();

            // Parent of each item by level, None for top level
            let mut parents: Vec<Option<usize>> = Vec::with_capacity(outline.len());
            let mut stack: Vec<(u32, usize)> = Vec::new();
            for (i, &(level, _, _)) in outline.iter().enumerate() {
                while stack.last().is_some_and(|&(l, _)| l >= level) {
                    stack.pop();
                }
                parents.push(stack.last().map(|&(_, idx)| idx));
                stack.push((level, i));
            }

            let mut children: HashMap<Option<usize>, Vec<usize>> = HashMap::new();
            for (i, parent) in parents.iter().enumerate() {
                children.entry(*parent).or_default().push(i);
            }

            for (i, &(_, title, target)) in outline.iter().enumerate() {
                let parent_id = parents[i].map_or(outlines_id, |p| item_ids[p]);
                let mut item = dictionary! {
                    "Title" => Object::string_literal(title),
                    "Parent" => parent_id,
                };
                if target > 0 && target <= page_count {
                    item.set(
                        "Dest",
                        vec![Object::Reference(page_ids[target as usize - 1]), "Fit".into()],
                    );
                }

                let siblings = &children[&parents[i]];
                let pos = siblings.iter().position(|&s| s == i).unwrap_or(0);
                if pos > 0 {
                    item.set("Prev", item_ids[siblings[pos - 1]]);
                }
                if let Some(&next) = siblings.get(pos + 1) {
                    item.set("Next", item_ids[next]);
                }
                link_children(&mut item, children.get(&Some(i)), &item_ids);

                doc.objects.insert(item_ids[i], Object::Dictionary(item));
            }

            let mut root = dictionary! { "Type" => "Outlines" };
            link_children(&mut root, children.get(&None), &item_ids);
            doc.objects.insert(outlines_id, Object::Dictionary(root));
            catalog.set("Outlines", outlines_id);
        }

        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        Self {
            doc,
            page_ids,
            item_ids,
        }
    }

    /// Mutable access to an outline item dictionary.
    pub fn item_mut(&mut self, index: usize) -> &mut Dictionary {
        self.doc
            .get_object_mut(self.item_ids[index])
            .and_then(Object::as_dict_mut)
            .unwrap()
    }

    /// Mutable access to the document catalog.
    pub fn catalog_mut(&mut self) -> &mut Dictionary {
        let root = self
            .doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .unwrap();
        self.doc
            .get_object_mut(root)
            .and_then(Object::as_dict_mut)
            .unwrap()
    }

    /// Give every page a content stream drawing one line of text.
    pub fn with_page_text(mut self, lines: &[&str]) -> Self {
        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        for (&page_id, line) in self.page_ids.clone().iter().zip(lines) {
            let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", line);
            let content_id = self
                .doc
                .add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page = self
                .doc
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .unwrap();
            page.set("Contents", content_id);
            page.set(
                "Resources",
                dictionary! { "Font" => dictionary! { "F1" => font_id } },
            );
        }
        self
    }

    /// Serialize to PDF bytes.
    pub fn to_bytes(mut self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.doc.save_to(&mut buf).unwrap();
        buf
    }
}

fn link_children(dict: &mut Dictionary, children: Option<&Vec<usize>>, item_ids: &[ObjectId]) {
    if let Some(children) = children {
        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            dict.set("First", item_ids[first]);
            dict.set("Last", item_ids[last]);
            dict.set("Count", children.len() as i64);
        }
    }
}

/// In-memory backend that renders each page as a 1-pixel-high image whose
/// width is the 1-based page number.
pub struct MockBook {
    pub pages: u32,
    pub outline: Vec<OutlineEntry>,
    pub fail_on: Option<u32>,
    pub renders: Cell<u32>,
}

impl MockBook {
    pub fn new(pages: u32, outline: &[(u32, &str, u32)]) -> Self {
        Self {
            pages,
            outline: outline.iter().map(|&e| OutlineEntry::from(e)).collect(),
            fail_on: None,
            renders: Cell::new(0),
        }
    }
}

impl PdfBackend for MockBook {
    fn page_count(&self) -> u32 {
        self.pages
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        Ok(self.outline.clone())
    }

    fn render_page(&self, index: u32, _scale: f32) -> Result<RasterImage> {
        self.renders.set(self.renders.get() + 1);
        if self.fail_on == Some(index) {
            return Err(Error::Render(format!("page {} is damaged", index + 1)));
        }
        Ok(RasterImage::blank(index + 1, 1))
    }
}

/// Widths of rendered mock pages, i.e. their 1-based page numbers.
pub fn page_numbers(images: &[RasterImage]) -> Vec<u32> {
    images.iter().map(RasterImage::width).collect()
}
