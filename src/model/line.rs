//! Styled text lines, as produced by a line source and cleaned by the extractor.

use serde::{Deserialize, Serialize};

/// Rectangle in top-down page coordinates (y grows towards the page bottom).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Style attributes of a text run.
///
/// Only boldness feeds heading detection; italic is carried for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleFlags {
    /// Bold weight
    pub bold: bool,
    /// Italic or oblique
    pub italic: bool,
}

impl StyleFlags {
    /// Bit used for bold in MuPDF-style span flags.
    pub const RAW_BOLD: u32 = 1 << 4;
    /// Bit used for italic in MuPDF-style span flags.
    pub const RAW_ITALIC: u32 = 1 << 1;

    /// Plain (non-bold, upright) style.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Bold style.
    pub fn bold() -> Self {
        Self {
            bold: true,
            italic: false,
        }
    }

    /// Project a raw MuPDF-style flag word onto the attributes we consult.
    pub fn from_raw(bits: u32) -> Self {
        Self {
            bold: bits & Self::RAW_BOLD != 0,
            italic: bits & Self::RAW_ITALIC != 0,
        }
    }

    /// Infer style from a font's base name (e.g., "Helvetica-BoldOblique").
    pub fn from_font_name(font_name: &str) -> Self {
        let lower = font_name.to_lowercase();
        Self {
            bold: lower.contains("bold")
                || lower.contains("black")
                || lower.contains("heavy")
                || lower.contains("semibold"),
            italic: lower.contains("italic") || lower.contains("oblique"),
        }
    }
}

/// Round a font size to one decimal place.
pub fn round_size(size: f32) -> f32 {
    (size * 10.0).round() / 10.0
}

/// Integer key for a font size at 0.1 precision.
pub(crate) fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// One visually contiguous line of text after cleaning.
///
/// `text` is never empty: lines without renderable spans never become a `TextLine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Span texts joined by single spaces, trimmed
    pub text: String,
    /// Font of the line's first span
    pub font_name: String,
    /// Size of the line's first span, rounded to one decimal
    pub font_size: f32,
    /// Style of the line's first span
    pub flags: StyleFlags,
    /// Line bounding box
    pub bbox: BoundingBox,
    /// 1-based page number
    pub page: u32,
}

impl TextLine {
    /// Create a text line; `font_size` is rounded to one decimal.
    pub fn new(text: impl Into<String>, font_size: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            font_name: String::new(),
            font_size: round_size(font_size),
            flags: StyleFlags::plain(),
            bbox: BoundingBox::default(),
            page,
        }
    }

    /// Set the font name.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    /// Set the style flags.
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Whether the line's representative style is bold.
    pub fn is_bold(&self) -> bool {
        self.flags.bold
    }
}
