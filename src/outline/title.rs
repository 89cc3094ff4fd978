//! Title inference from the largest text on the opening page.

use regex::Regex;

use crate::model::{size_key, TextLine, UNTITLED};

use super::OutlineOptions;

/// Infers a document title from the cleaned lines.
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    scan_lines: usize,
    max_chars: usize,
    truncate_chars: usize,
    whitespace: Regex,
}

impl TitleExtractor {
    /// Create a title extractor from outline options.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            scan_lines: options.title_scan_lines,
            max_chars: options.title_max_chars,
            truncate_chars: options.title_truncate_chars,
            whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
        }
    }

    /// Title from page 1, else page 2, else "Untitled Document".
    ///
    /// Every candidate line at the largest size contributes, so titles set
    /// over several lines come back whole.
    pub fn extract(&self, lines: &[TextLine]) -> String {
        let candidates = [1, 2]
            .into_iter()
            .map(|page| self.page_head(lines, page))
            .find(|head| !head.is_empty());

        let Some(candidates) = candidates else {
            return UNTITLED.to_string();
        };

        let Some(max_key) = candidates.iter().map(|l| size_key(l.font_size)).max() else {
            return UNTITLED.to_string();
        };

        let joined = candidates
            .iter()
            .filter(|l| size_key(l.font_size) == max_key)
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let title = self.whitespace.replace_all(joined.trim(), " ").into_owned();

        if title.is_empty() {
            return UNTITLED.to_string();
        }
        self.truncate(title)
    }

    /// The first `scan_lines` lines of a page.
    fn page_head<'a>(&self, lines: &'a [TextLine], page: u32) -> Vec<&'a TextLine> {
        lines
            .iter()
            .filter(|l| l.page == page)
            .take(self.scan_lines)
            .collect()
    }

    fn truncate(&self, title: String) -> String {
        if title.chars().count() <= self.max_chars {
            return title;
        }
        let mut truncated: String = title.chars().take(self.truncate_chars).collect();
        truncated.push_str("...");
        truncated
    }
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self::new(&OutlineOptions::default())
    }
}
