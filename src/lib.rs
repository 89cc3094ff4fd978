//! # pdfoutline
//!
//! Infers a document outline (title plus H1/H2/H3 headings with page numbers)
//! from the text layout of a PDF, without relying on embedded bookmarks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let result = extract_outline("document.pdf");
//!     println!("{}", render::to_json(&result, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## How it works
//!
//! - **Header/footer suppression**: text repeating in the page margins is ignored
//! - **Font size analysis**: the most common size is body text, larger sizes are headings
//! - **Heading detection**: numbering, keywords, capitalization and bold text
//! - **Level assignment**: size rank, overridden by explicit "1.2.3" numbering
//! - **Title inference**: the largest text on the first page
//!
//! Extraction never fails: an unreadable document produces
//! `{"title": "Error: Could Not Process Document", "outline": []}`.

pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

pub use error::{Error, Result};
pub use model::{
    BoundingBox, DocumentResult, HeadingLevel, OutlineEntry, RawLine, RawSpan, SourceDocument,
    SourcePage, StyleFlags, TextLine,
};
pub use outline::{
    FontStatistics, HeaderFooterDetector, HeadingClassifier, HeadingRules, LineExtractor,
    OutlineExtractor, OutlineOptions, TitleExtractor,
};
pub use parser::{ErrorMode, LineSource, ParseOptions, PdfLineSource};
pub use render::{to_json, to_text, JsonFormat};

use std::path::{Path, PathBuf};

/// Extract the outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline;
///
/// let result = extract_outline("document.pdf");
/// for entry in &result.outline {
///     println!("{} {} (page {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> DocumentResult {
    OutlineExtractor::new().extract_path(path)
}

/// Extract the outline of a PDF file with custom thresholds.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{extract_outline_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new().with_margins(0.1, 0.9);
/// let result = extract_outline_with_options("document.pdf", options);
/// ```
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> DocumentResult {
    OutlineExtractor::with_options(options).extract_path(path)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_from_bytes(data: &[u8]) -> DocumentResult {
    OutlineExtractor::new().extract_bytes(data)
}

/// Extract the outline from any line source.
///
/// # Example
///
/// ```
/// use pdfoutline::{extract_outline_from_source, BoundingBox, RawLine, RawSpan, SourceDocument, SourcePage};
///
/// let page = SourcePage::letter(1)
///     .with_line(RawLine::single(
///         RawSpan::new("Annual Report", "Helvetica-Bold", 24.0),
///         BoundingBox::new(72.0, 200.0, 300.0, 224.0),
///     ))
///     .with_line(RawLine::single(
///         RawSpan::new("Revenue grew in every region.", "Helvetica", 12.0),
///         BoundingBox::new(72.0, 240.0, 300.0, 252.0),
///     ));
/// let result = extract_outline_from_source(&SourceDocument::new().with_page(page));
/// assert_eq!(result.title, "Annual Report");
/// assert!(result.outline.is_empty());
/// ```
pub fn extract_outline_from_source<S: LineSource>(source: &S) -> DocumentResult {
    OutlineExtractor::new().extract(source)
}

/// Extract outlines for many PDF files in parallel.
///
/// Each document runs through its own pipeline; results keep the input order.
pub fn extract_outlines<P>(paths: &[P]) -> Vec<(PathBuf, DocumentResult)>
where
    P: AsRef<Path> + Sync,
{
    OutlineExtractor::new().extract_paths(paths)
}

/// Extract the outline of a PDF file, reading it asynchronously.
#[cfg(feature = "async")]
pub async fn extract_outline_async<P: AsRef<Path>>(path: P) -> DocumentResult {
    let path = path.as_ref();
    match tokio::fs::read(path).await {
        Ok(data) => extract_outline_from_bytes(&data),
        Err(e) => {
            log::error!("PDF file not readable: {}: {}", path.display(), e);
            DocumentResult::error()
        }
    }
}
