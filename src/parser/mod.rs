//! Line sources: where styled text lines come from.
//!
//! The outline pipeline never touches PDF bytes. It consumes a
//! [`SourceDocument`] from anything implementing [`LineSource`]; the PDF
//! implementation is [`PdfLineSource`].

mod layout;
mod options;
mod pdf_parser;

pub use layout::{group_spans_into_lines, LayoutAnalyzer, SpanLine, TextSpan};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::{check_pdf_header, PdfLineSource};

use crate::error::Result;
use crate::model::SourceDocument;

/// Something that can produce the per-page line stream of one document.
///
/// Implementations must report a missing file, an undecodable file and a
/// document without pages as errors.
pub trait LineSource {
    /// Load every page's lines, in page order.
    fn load(&self) -> Result<SourceDocument>;
}

impl LineSource for SourceDocument {
    fn load(&self) -> Result<SourceDocument> {
        Ok(self.clone())
    }
}

impl<T: LineSource + ?Sized> LineSource for &T {
    fn load(&self) -> Result<SourceDocument> {
        (**self).load()
    }
}
