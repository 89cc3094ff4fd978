//! Data model shared by the line source, the outline pipeline and the renderers.
//!
//! Values flow one way: a line source produces a [`SourceDocument`], the
//! extractor turns it into cleaned [`TextLine`]s, and the assembler produces a
//! [`DocumentResult`].

mod line;
mod outline;
mod source;

pub use line::{round_size, BoundingBox, StyleFlags, TextLine};
pub(crate) use line::size_key;
pub use outline::{DocumentResult, HeadingLevel, OutlineEntry, ERROR_TITLE, UNTITLED};
pub use source::{RawLine, RawSpan, SourceDocument, SourcePage};
