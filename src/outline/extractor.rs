//! Line cleaning: suppression set and table-of-contents leaders.

use std::collections::HashSet;

use regex::Regex;

use crate::model::{round_size, SourceDocument, TextLine};

/// Trailing "dot leader + page number" of a table-of-contents entry.
const DOT_LEADER_PATTERN: &str = r"\s\.{3,}\s*\d+$";

/// Turns the raw line stream into the cleaned line sequence.
#[derive(Debug, Clone)]
pub struct LineExtractor {
    dot_leader: Regex,
}

impl LineExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self {
            dot_leader: Regex::new(DOT_LEADER_PATTERN).expect("dot leader pattern is valid"),
        }
    }

    /// Whether text ends like a table-of-contents entry ("Scope ....... 12").
    pub fn is_dot_leader(&self, text: &str) -> bool {
        self.dot_leader.is_match(text)
    }

    /// Clean every page's lines, preserving page order and line order.
    pub fn extract(&self, doc: &SourceDocument, suppressed: &HashSet<String>) -> Vec<TextLine> {
        let mut lines = Vec::new();

        for page in &doc.pages {
            for raw in &page.lines {
                let Some(first) = raw.first_span() else {
                    continue;
                };

                let text = raw.joined_text();
                if text.is_empty() || suppressed.contains(&text) || self.is_dot_leader(&text) {
                    continue;
                }

                lines.push(TextLine {
                    text,
                    font_name: first.font_name.clone(),
                    font_size: round_size(first.font_size),
                    flags: first.flags,
                    bbox: raw.bbox,
                    page: page.number,
                });
            }
        }

        log::info!("Extracted {} text lines after filtering", lines.len());
        lines
    }
}

impl Default for LineExtractor {
    fn default() -> Self {
        Self::new()
    }
}
