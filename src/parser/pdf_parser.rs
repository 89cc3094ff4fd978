//! PDF line source using lopdf.

use std::fs;
use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{SourceDocument, SourcePage};

use super::layout::LayoutAnalyzer;
use super::options::{ErrorMode, ParseOptions};
use super::LineSource;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];
/// Bound on Parent hops when resolving inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Verify that data starts with a `%PDF-x.y` header and return the version.
pub fn check_pdf_header(data: &[u8]) -> Result<String> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    let version = rest.get(..3).ok_or(Error::UnknownFormat)?;

    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(String::from_utf8_lossy(version).to_string())
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).to_string(),
        )),
    }
}

/// Reads styled lines from a PDF document.
pub struct PdfLineSource {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfLineSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Read a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        check_pdf_header(data)?;

        let doc = LopdfDocument::load_mem(data)?;
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; decoded text may be unreadable");
        }

        Ok(Self { doc, options })
    }

    /// Read a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Read one page (1-indexed).
    pub fn load_page(&self, page_num: u32) -> Result<SourcePage> {
        let pages = self.doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        self.read_page(page_num, *page_id)
    }

    fn read_page(&self, page_num: u32, page_id: ObjectId) -> Result<SourcePage> {
        let [x0, y0, x1, y1] = self.media_box(page_id).unwrap_or(DEFAULT_MEDIA_BOX);
        let mut page = SourcePage::new(page_num, (x1 - x0).abs(), (y1 - y0).abs());

        let analyzer =
            LayoutAnalyzer::new(&self.doc).with_normalization(self.options.normalize_unicode);
        page.lines = analyzer
            .extract_page_lines(page_id, y0.max(y1))
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))?;

        Ok(page)
    }

    /// MediaBox of a page, following Parent inheritance.
    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        let mut current = page_id;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            let dict = self.doc.get_dictionary(current).ok()?;

            if let Ok(media_box) = dict.get(b"MediaBox") {
                let media_box = match media_box {
                    Object::Reference(r) => self.doc.get_object(*r).ok()?,
                    other => other,
                };
                let array = media_box.as_array().ok()?;
                if array.len() < 4 {
                    return None;
                }
                let mut rect = [0.0f32; 4];
                for (slot, value) in rect.iter_mut().zip(array.iter()) {
                    *slot = value.as_float().ok()?;
                }
                return Some(rect);
            }

            current = dict.get(b"Parent").ok()?.as_reference().ok()?;
        }

        None
    }
}

impl LineSource for PdfLineSource {
    fn load(&self) -> Result<SourceDocument> {
        let page_ids = self.doc.get_pages();
        if page_ids.is_empty() {
            return Err(Error::NoPages);
        }

        log::info!("Reading lines from {} pages", page_ids.len());

        let mut document = SourceDocument::new();
        for (page_num, page_id) in page_ids {
            match self.read_page(page_num, page_id) {
                Ok(page) => document.add_page(page),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Skipping page {}: {}", page_num, e);
                    // Keep numbering and page count intact.
                    let [x0, y0, x1, y1] =
                        self.media_box(page_id).unwrap_or(DEFAULT_MEDIA_BOX);
                    document.add_page(SourcePage::new(
                        page_num,
                        (x1 - x0).abs(),
                        (y1 - y0).abs(),
                    ));
                }
            }
        }

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_pdf_header() {
        assert_eq!(check_pdf_header(b"%PDF-1.7\n%\xe2\xe3").unwrap(), "1.7");
        assert_eq!(check_pdf_header(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_check_pdf_header_rejects_other_formats() {
        assert!(matches!(
            check_pdf_header(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(check_pdf_header(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(
            check_pdf_header(b"%PDF-x.y"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let result = PdfLineSource::open("/definitely/not/here.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_from_bytes_not_pdf() {
        let result = PdfLineSource::from_bytes(b"plain text, not a pdf");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
