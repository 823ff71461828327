//! PDF header detection, run before a document is handed to a backend.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// Magic plus a "d.d" version.
const HEADER_LEN: usize = PDF_MAGIC.len() + 3;

/// Read the PDF version from the start of a file.
///
/// Fails with [`Error::UnknownFormat`] if the file does not start with a
/// `%PDF-` header, and with [`Error::UnsupportedVersion`] if the version is
/// not of the form `d.d`.
pub fn pdf_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    File::open(path)?
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    pdf_version_from_bytes(&header)
}

/// Read the PDF version from the first bytes of a document.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    let version = data
        .strip_prefix(PDF_MAGIC)
        .and_then(|rest| rest.get(..3))
        .ok_or(Error::UnknownFormat)?;

    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(String::from_utf8_lossy(version).into_owned())
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(pdf_version_from_bytes(data).unwrap(), "1.7");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = pdf_version_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        assert!(matches!(
            pdf_version_from_bytes(b"%PDF-1"),
            Err(Error::UnknownFormat)
        ));
        assert!(!is_pdf_bytes(b""));
    }

    #[test]
    fn test_detect_bad_version() {
        assert!(matches!(
            pdf_version_from_bytes(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(v)) if v == "x.y"
        ));
    }

    #[test]
    fn test_detect_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-2.0\n").unwrap();
        assert_eq!(pdf_version_from_path(file.path()).unwrap(), "2.0");
    }
}
