//! Outline assembly: the full pipeline from line stream to `DocumentResult`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::model::{DocumentResult, HeadingLevel, OutlineEntry, SourceDocument, TextLine};
use crate::parser::{LineSource, ParseOptions, PdfLineSource};

use super::{
    FontStatistics, HeaderFooterDetector, HeadingClassifier, HeadingRules, LineExtractor,
    OutlineOptions, TitleExtractor,
};

/// A cleaned line judged to be a heading, with its assigned level.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate<'a> {
    /// The heading line
    pub line: &'a TextLine,
    /// Assigned level
    pub level: HeadingLevel,
}

impl HeadingCandidate<'_> {
    /// Convert into an outline entry.
    pub fn to_entry(&self) -> OutlineEntry {
        OutlineEntry::new(self.level, self.line.text.clone(), self.line.page)
    }
}

/// Infers a title and heading outline from a document's line stream.
///
/// Holds only read-only configuration, so one extractor can serve any number
/// of documents, including from several threads at once.
#[derive(Debug, Clone)]
pub struct OutlineExtractor {
    options: OutlineOptions,
    parse_options: ParseOptions,
    detector: HeaderFooterDetector,
    extractor: LineExtractor,
    titles: TitleExtractor,
    classifier: HeadingClassifier,
}

impl OutlineExtractor {
    /// Create an extractor with default thresholds and rules.
    pub fn new() -> Self {
        Self::with_options(OutlineOptions::default())
    }

    /// Create an extractor with custom thresholds.
    pub fn with_options(options: OutlineOptions) -> Self {
        Self {
            detector: HeaderFooterDetector::new(&options),
            extractor: LineExtractor::new(),
            titles: TitleExtractor::new(&options),
            classifier: HeadingClassifier::new(HeadingRules::default(), &options),
            options,
            parse_options: ParseOptions::default(),
        }
    }

    /// Use custom PDF parsing options, e.g. lenient page handling.
    pub fn with_parse_options(mut self, parse_options: ParseOptions) -> Self {
        self.parse_options = parse_options;
        self
    }

    /// Replace the heading rule tables.
    pub fn with_rules(mut self, rules: HeadingRules) -> Self {
        self.classifier = HeadingClassifier::new(rules, &self.options);
        self
    }

    /// Thresholds in use.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Heading classifier in use.
    pub fn classifier(&self) -> &HeadingClassifier {
        &self.classifier
    }

    /// Suppress repeating headers/footers and TOC leaders.
    pub fn clean_lines(&self, doc: &SourceDocument) -> Vec<TextLine> {
        if doc.is_empty() {
            return Vec::new();
        }
        let suppressed = self.detector.detect(doc);
        self.extractor.extract(doc, &suppressed)
    }

    /// Load and clean a source; any source failure yields no lines.
    pub fn extract_lines<S: LineSource>(&self, source: &S) -> Vec<TextLine> {
        match source.load() {
            Ok(doc) => self.clean_lines(&doc),
            Err(e) => {
                log::error!("Failed to extract text lines: {}", e);
                Vec::new()
            }
        }
    }

    /// Run the pipeline over a line source. Never fails.
    pub fn extract<S: LineSource>(&self, source: &S) -> DocumentResult {
        let lines = self.extract_lines(source);
        self.build_outline(&lines)
    }

    /// Run the pipeline over a PDF file. Never fails.
    pub fn extract_path<P: AsRef<Path>>(&self, path: P) -> DocumentResult {
        let path = path.as_ref();
        match PdfLineSource::open_with_options(path, self.parse_options.clone()) {
            Ok(source) => {
                log::info!("Processing {} pages from '{}'", source.page_count(), path.display());
                self.extract(&source)
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                DocumentResult::error()
            }
        }
    }

    /// Run the pipeline over PDF bytes. Never fails.
    pub fn extract_bytes(&self, data: &[u8]) -> DocumentResult {
        match PdfLineSource::from_bytes_with_options(data, self.parse_options.clone()) {
            Ok(source) => self.extract(&source),
            Err(e) => {
                log::error!("Failed to read PDF data: {}", e);
                DocumentResult::error()
            }
        }
    }

    /// Run the pipeline over many PDF files in parallel, keeping input order.
    pub fn extract_paths<P>(&self, paths: &[P]) -> Vec<(PathBuf, DocumentResult)>
    where
        P: AsRef<Path> + Sync,
    {
        paths
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                (path.to_path_buf(), self.extract_path(path))
            })
            .collect()
    }

    /// Font statistics for the cleaned lines, with the smallest-size fallback applied.
    pub fn font_statistics(&self, lines: &[TextLine]) -> FontStatistics {
        let mut stats = FontStatistics::analyze(lines, self.options.default_body_size);
        stats.apply_fallback();
        stats
    }

    /// Heading candidates in line order, after the title and duplicate filters.
    pub fn heading_candidates<'a>(
        &self,
        lines: &'a [TextLine],
        title: &str,
        stats: &FontStatistics,
    ) -> Vec<HeadingCandidate<'a>> {
        let title = title.trim();
        let mut seen: HashSet<(String, u32)> = HashSet::new();
        let mut candidates = Vec::new();

        for line in lines {
            // Headings must be larger than body text.
            if !stats.is_above_body(line.font_size) {
                continue;
            }
            if !self.classifier.is_candidate(line) {
                continue;
            }

            if line.text.trim() == title && line.page <= self.options.title_exclusion_max_page {
                log::debug!("Skipping heading that repeats the title: '{}'", line.text);
                continue;
            }

            if !seen.insert((line.text.to_lowercase(), line.page)) {
                continue;
            }

            candidates.push(HeadingCandidate {
                line,
                level: self.classifier.classify(line, stats),
            });
        }

        candidates
    }

    /// Assemble the result from cleaned lines.
    ///
    /// No lines means the document could not be processed.
    pub fn build_outline(&self, lines: &[TextLine]) -> DocumentResult {
        if lines.is_empty() {
            return DocumentResult::error();
        }

        let title = self.titles.extract(lines);
        let stats = self.font_statistics(lines);

        let mut outline: Vec<OutlineEntry> = self
            .heading_candidates(lines, &title, &stats)
            .iter()
            .map(HeadingCandidate::to_entry)
            .collect();
        outline.sort_by_key(|entry| entry.page);

        log::info!("Found {} headings; title '{}'", outline.len(), title);
        DocumentResult::new(title, outline)
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyleFlags;

    fn line(text: &str, size: f32, page: u32) -> TextLine {
        TextLine::new(text, size, page)
    }

    fn body(page: u32, n: usize) -> Vec<TextLine> {
        (0..n)
            .map(|i| line(&format!("ordinary body sentence number {}.", i), 11.0, page))
            .collect()
    }

    #[test]
    fn test_empty_lines_give_error_result() {
        assert!(OutlineExtractor::new().build_outline(&[]).is_error());
    }

    #[test]
    fn test_title_excluded_from_outline() {
        let mut lines = vec![line("Annual Report", 24.0, 1)];
        lines.extend(body(1, 4));
        let result = OutlineExtractor::new().build_outline(&lines);
        assert_eq!(result.title, "Annual Report");
        assert!(result.outline.is_empty());
    }

    #[test]
    fn test_title_text_kept_after_exclusion_pages() {
        let mut lines = vec![line("Annual Report", 24.0, 1)];
        lines.extend(body(1, 4));
        lines.push(line("Annual Report", 24.0, 3));
        let result = OutlineExtractor::new().build_outline(&lines);
        assert_eq!(result.outline, vec![OutlineEntry::new(HeadingLevel::H1, "Annual Report", 3)]);
    }

    #[test]
    fn test_body_sized_lines_never_headings() {
        let mut lines = vec![line("Guide", 20.0, 1)];
        lines.extend(body(1, 5));
        lines.push(line("INTRODUCTION", 11.0, 1));
        lines.push(line("Bold body", 11.0, 1).with_flags(StyleFlags::bold()));
        let result = OutlineExtractor::new().build_outline(&lines);
        assert!(result.outline.is_empty());
    }

    #[test]
    fn test_duplicates_collapse_per_page() {
        let mut lines = vec![line("Handbook", 26.0, 1)];
        lines.extend(body(1, 6));
        lines.push(line("Project Scope", 16.0, 2));
        lines.push(line("project scope", 16.0, 2).with_flags(StyleFlags::bold()));
        lines.push(line("Project Scope", 16.0, 3));
        lines.extend(body(3, 6));
        let result = OutlineExtractor::new().build_outline(&lines);

        let pages: Vec<u32> = result.outline.iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![2, 3]);
        assert!(result.outline.iter().all(|e| e.text == "Project Scope"));
    }

    #[test]
    fn test_levels_and_ordering() {
        let mut lines = vec![line("Strategy Paper", 28.0, 1)];
        lines.extend(body(1, 8));
        lines.push(line("Market Context", 18.0, 2));
        lines.push(line("2.1 Regional Trends", 14.0, 2));
        lines.push(line("Key Risks", 14.0, 3));
        lines.push(line("3 Recommendations", 14.0, 3));
        lines.extend(body(3, 8));
        let result = OutlineExtractor::new().build_outline(&lines);

        assert_eq!(result.title, "Strategy Paper");
        assert_eq!(
            result.outline,
            vec![
                OutlineEntry::new(HeadingLevel::H2, "Market Context", 2),
                OutlineEntry::new(HeadingLevel::H2, "2.1 Regional Trends", 2),
                OutlineEntry::new(HeadingLevel::H3, "Key Risks", 3),
                OutlineEntry::new(HeadingLevel::H1, "3 Recommendations", 3),
            ]
        );
    }

    #[test]
    fn test_fallback_when_largest_size_dominates() {
        // Most lines are large, so nothing is above the body size until the fallback.
        let mut lines: Vec<TextLine> = (0..5)
            .map(|i| line(&format!("large paragraph text {}.", i), 16.0, 1))
            .collect();
        lines.push(line("Closing Notes", 16.0, 2));
        lines.push(line("small print", 9.0, 2));
        let result = OutlineExtractor::new().build_outline(&lines);

        assert_eq!(
            result.outline,
            vec![OutlineEntry::new(HeadingLevel::H1, "Closing Notes", 2)]
        );
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let rules = HeadingRules::new([r"^Part\s+\d+"], Vec::<String>::new()).unwrap();
        let extractor = OutlineExtractor::new().with_rules(rules);

        let mut lines = vec![line("Manual", 22.0, 1)];
        lines.extend(body(1, 5));
        lines.push(line("Part 2 Operations", 15.0, 2));
        lines.push(line("Maintenance Schedule", 15.0, 2));
        let result = extractor.build_outline(&lines);

        assert_eq!(result.outline.len(), 1);
        assert_eq!(result.outline[0].text, "Part 2 Operations");
    }
}
