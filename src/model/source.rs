//! Raw per-page line stream handed over by a line source.

use serde::{Deserialize, Serialize};

use super::{BoundingBox, StyleFlags};

/// A run of text sharing one font and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Text content (may carry surrounding whitespace)
    pub text: String,
    /// Font base name
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Style attributes
    pub flags: StyleFlags,
}

impl RawSpan {
    /// Create a span; style is inferred from the font name.
    pub fn new(text: impl Into<String>, font_name: impl Into<String>, font_size: f32) -> Self {
        let font_name = font_name.into();
        let flags = StyleFlags::from_font_name(&font_name);
        Self {
            text: text.into(),
            font_name,
            font_size,
            flags,
        }
    }

    /// Override the style flags.
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// One visual line: its spans in reading order and its bounding box.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawLine {
    /// Spans, left to right
    pub spans: Vec<RawSpan>,
    /// Line bounding box (top-down coordinates)
    pub bbox: BoundingBox,
}

impl RawLine {
    /// Create a line from spans and a bounding box.
    pub fn new(spans: Vec<RawSpan>, bbox: BoundingBox) -> Self {
        Self { spans, bbox }
    }

    /// Single-span convenience constructor.
    pub fn single(span: RawSpan, bbox: BoundingBox) -> Self {
        Self::new(vec![span], bbox)
    }

    /// Non-empty span texts, trimmed and joined by single spaces.
    pub fn joined_text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First span, the representative style of the line.
    pub fn first_span(&self) -> Option<&RawSpan> {
        self.spans.first()
    }
}

/// A page of raw lines in top-to-bottom order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePage {
    /// 1-based page number
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Lines in visual order
    pub lines: Vec<RawLine>,
}

impl SourcePage {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            lines: Vec::new(),
        }
    }

    /// Create an empty US Letter page (612 x 792 points).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Append a line.
    pub fn add_line(&mut self, line: RawLine) {
        self.lines.push(line);
    }

    /// Builder-style append.
    pub fn with_line(mut self, line: RawLine) -> Self {
        self.add_line(line);
        self
    }
}

/// The whole line stream of one document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Pages in document order
    pub pages: Vec<SourcePage>,
}

impl SourceDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn add_page(&mut self, page: SourcePage) {
        self.pages.push(page);
    }

    /// Builder-style append.
    pub fn with_page(mut self, page: SourcePage) -> Self {
        self.add_page(page);
        self
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Whether the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Height of the first page, the layout reference for margin zones.
    pub fn reference_height(&self) -> Option<f32> {
        self.pages.first().map(|p| p.height)
    }
}
