//! Outline output types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title reported when a document yields no extractable lines.
pub const ERROR_TITLE: &str = "Error: Could Not Process Document";

/// Title reported when no title candidate is found.
pub const UNTITLED: &str = "Untitled Document";

/// Heading level in the inferred hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Level for a zero-based rank (0 → H1, 1 → H2, anything deeper → H3).
    pub fn from_rank(rank: usize) -> Self {
        match rank {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Numeric depth (1-3).
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// One heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text as it appears in the document
    pub text: String,
    /// 1-based page number
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Title plus ordered outline of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Inferred document title
    pub title: String,
    /// Headings ordered by ascending page
    pub outline: Vec<OutlineEntry>,
}

impl DocumentResult {
    /// Create a result from a title and outline.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// The fixed result for documents that could not be processed.
    pub fn error() -> Self {
        Self::new(ERROR_TITLE, Vec::new())
    }

    /// Whether this is the fixed error result.
    pub fn is_error(&self) -> bool {
        self.title == ERROR_TITLE && self.outline.is_empty()
    }

    /// Number of headings.
    pub fn heading_count(&self) -> usize {
        self.outline.len()
    }

    /// Headings at one level.
    pub fn headings_at(&self, level: HeadingLevel) -> impl Iterator<Item = &OutlineEntry> {
        self.outline.iter().filter(move |e| e.level == level)
    }
}
