//! PDF access: the backend trait and its implementations.

mod backend;
#[cfg(feature = "mupdf")]
mod mupdf_backend;
mod outline_reader;

pub use backend::{LopdfBackend, PdfBackend};
#[cfg(feature = "mupdf")]
pub use mupdf_backend::MupdfBackend;
