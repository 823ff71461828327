//! MuPDF-backed rasterizer. Behind feature `mupdf`.
//!
//! The outline and page tree still come from lopdf; MuPDF is only asked to
//! rasterize pages.

#![cfg(feature = "mupdf")]

use std::path::Path;

use mupdf::{Colorspace, Document, Matrix};

use crate::error::{Error, Result};
use crate::model::{OutlineEntry, RasterImage};

use super::backend::{LopdfBackend, PdfBackend};

/// [`PdfBackend`] that renders pages with MuPDF.
pub struct MupdfBackend {
    structure: LopdfBackend,
    document: Document,
}

impl MupdfBackend {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let structure = LopdfBackend::load_file(path)?;

        let path_str = path
            .to_str()
            .ok_or_else(|| Error::Render("invalid path encoding".to_string()))?;
        let document = Document::open(path_str)?;

        Ok(Self {
            structure,
            document,
        })
    }

    /// PDF version from the file header.
    pub fn version(&self) -> &str {
        self.structure.version()
    }
}

impl PdfBackend for MupdfBackend {
    fn page_count(&self) -> u32 {
        self.structure.page_count()
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        self.structure.outline()
    }

    fn render_page(&self, index: u32, scale: f32) -> Result<RasterImage> {
        let total = self.page_count();
        if index >= total {
            return Err(Error::PageOutOfRange(index + 1, total));
        }

        let page = self.document.load_page(index as i32)?;
        let matrix = Matrix::new_scale(scale, scale);
        let pixmap = page.to_pixmap(&matrix, &Colorspace::device_rgb(), false, false)?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let channels = pixmap.n();
        let row_len = width as usize * channels as usize;

        // Samples may be padded to the pixmap stride
        let samples = pixmap.samples();
        let stride = if height > 0 {
            samples.len() / height as usize
        } else {
            row_len
        };
        let pixels = if stride == row_len {
            samples.to_vec()
        } else {
            samples
                .chunks(stride)
                .flat_map(|row| &row[..row_len.min(row.len())])
                .copied()
                .collect()
        };

        log::debug!(
            "Rendered page {} at {:.2}x ({}x{})",
            index + 1,
            scale,
            width,
            height
        );
        RasterImage::new(width, height, channels, pixels)
    }
}
