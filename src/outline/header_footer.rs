//! Repeated header and footer detection.

use std::collections::{HashMap, HashSet};

use crate::model::SourceDocument;

use super::OutlineOptions;

/// Finds text that repeats in the top or bottom margin across pages.
#[derive(Debug, Clone)]
pub struct HeaderFooterDetector {
    header_margin_ratio: f32,
    footer_margin_ratio: f32,
    min_text_len: usize,
}

impl HeaderFooterDetector {
    /// Create a detector from outline options.
    pub fn new(options: &OutlineOptions) -> Self {
        Self {
            header_margin_ratio: options.header_margin_ratio,
            footer_margin_ratio: options.footer_margin_ratio,
            min_text_len: options.min_repeat_text_len,
        }
    }

    /// Occurrences needed before a margin text is suppressed.
    pub fn threshold(page_count: usize) -> usize {
        if page_count > 2 {
            (page_count / 2).max(2)
        } else {
            1
        }
    }

    /// Build the suppression set for a document.
    ///
    /// The first page's height defines both margin zones for every page.
    pub fn detect(&self, doc: &SourceDocument) -> HashSet<String> {
        let Some(page_height) = doc.reference_height() else {
            return HashSet::new();
        };

        let header_limit = page_height * self.header_margin_ratio;
        let footer_limit = page_height * self.footer_margin_ratio;

        let mut header_counts: HashMap<String, usize> = HashMap::new();
        let mut footer_counts: HashMap<String, usize> = HashMap::new();

        for line in doc.pages.iter().flat_map(|p| &p.lines) {
            let text = line.joined_text();
            if text.chars().count() < self.min_text_len {
                continue;
            }

            let top = line.bbox.top;
            if top < header_limit {
                *header_counts.entry(text).or_insert(0) += 1;
            } else if top > footer_limit {
                *footer_counts.entry(text).or_insert(0) += 1;
            }
        }

        let threshold = Self::threshold(doc.pages.len());
        let suppressed: HashSet<String> = header_counts
            .into_iter()
            .chain(footer_counts)
            .filter(|(_, count)| *count >= threshold)
            .map(|(text, _)| text)
            .collect();

        if !suppressed.is_empty() {
            log::info!(
                "Identified {} repeating header/footer texts to ignore: {:?}",
                suppressed.len(),
                suppressed
            );
        }

        suppressed
    }
}

impl Default for HeaderFooterDetector {
    fn default() -> Self {
        Self::new(&OutlineOptions::default())
    }
}
