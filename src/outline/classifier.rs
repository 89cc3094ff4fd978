//! Heading detection and level assignment.
//!
//! A line is a heading candidate when its text looks like a heading (keyword
//! or pattern) or when it is set in bold. Levels come from the line's rank
//! among the heading sizes unless the text carries explicit numbering such
//! as "3.2", which wins over size.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{HeadingLevel, TextLine};

use super::{FontStatistics, OutlineOptions};

/// Built-in heading shapes, tried in order.
const DEFAULT_PATTERNS: &[&str] = &[
    // "1 Text", "1.1 Text", "1.1.1 Text"
    r"^\d+(\.\d+)*\s+.*",
    // "Chapter 1 ...", "Section A ..."
    r"^(Chapter|Section)\s+([A-Z]|\d+)\s+.*",
    // ALL CAPS
    r"^[A-Z\s]{3,}$",
    // Title Case With Two Or More Words
    r"^([A-Z][a-z]+)(\s[A-Z][a-z]+)+$",
    // "IV. Text"
    r"^[IVXLCDM]+\.\s+.+",
];

/// Texts that are headings whatever their shape (compared lowercased).
const DEFAULT_KEYWORDS: &[&str] = &[
    "acknowledgements",
    "revision history",
    "table of contents",
    "references",
    "trademarks",
    "introduction",
    "overview",
];

/// Leading section number, e.g. "2.4.1".
const NUMERIC_PREFIX_PATTERN: &str = r"^\d+(\.\d+)*";

/// Pattern and keyword tables for heading detection.
#[derive(Debug, Clone)]
pub struct HeadingRules {
    patterns: Vec<Regex>,
    keywords: HashSet<String>,
}

impl HeadingRules {
    /// Build rules from pattern sources and keywords.
    ///
    /// Patterns are matched at the start of the text; anchor them with `$`
    /// to require a full match. Keywords are compared case-insensitively.
    pub fn new<P, K>(patterns: P, keywords: K) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .collect();
        Ok(Self { patterns, keywords })
    }

    /// Append a pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns.push(compile(pattern)?);
        Ok(self)
    }

    /// Add a keyword.
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keywords.insert(keyword.trim().to_lowercase());
        self
    }

    /// Whether the text is one of the keywords.
    pub fn is_keyword(&self, text: &str) -> bool {
        self.keywords.contains(&text.trim().to_lowercase())
    }

    /// Whether the text matches any pattern at its start.
    pub fn matches_pattern(&self, text: &str) -> bool {
        self.patterns
            .iter()
            .any(|re| re.find(text).is_some_and(|m| m.start() == 0))
    }

    /// Number of patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS, DEFAULT_KEYWORDS).expect("built-in heading rules are valid")
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Decides whether a line is a heading and at which level.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    rules: HeadingRules,
    numeric_prefix: Regex,
    digits_only: Regex,
    min_len: usize,
    max_len: usize,
}

impl HeadingClassifier {
    /// Create a classifier with the given rules and length bounds from options.
    pub fn new(rules: HeadingRules, options: &OutlineOptions) -> Self {
        Self {
            rules,
            numeric_prefix: Regex::new(NUMERIC_PREFIX_PATTERN).expect("prefix pattern is valid"),
            digits_only: Regex::new(r"^\d+$").expect("digits pattern is valid"),
            min_len: options.min_heading_len,
            max_len: options.max_heading_len,
        }
    }

    /// The rule tables in use.
    pub fn rules(&self) -> &HeadingRules {
        &self.rules
    }

    /// Whether the text alone looks like a heading.
    ///
    /// Out-of-range lengths and bare numbers never qualify.
    pub fn looks_like_heading(&self, text: &str) -> bool {
        if !self.has_heading_length(text) {
            return false;
        }
        self.rules.is_keyword(text) || self.rules.matches_pattern(text)
    }

    /// Whether a line is a heading candidate (text shape or bold style).
    pub fn is_candidate(&self, line: &TextLine) -> bool {
        self.looks_like_heading(&line.text)
            || (line.is_bold() && self.has_heading_length(&line.text))
    }

    fn has_heading_length(&self, text: &str) -> bool {
        let len = text.chars().count();
        len >= self.min_len && len <= self.max_len && !self.digits_only.is_match(text)
    }

    /// Number of segments in a leading "1.2.3"-style prefix, if any.
    pub fn numbering_depth(&self, text: &str) -> Option<usize> {
        self.numeric_prefix
            .find(text)
            .map(|m| m.as_str().split('.').count())
    }

    /// Assign a level from size rank, overridden by explicit numbering.
    pub fn classify(&self, line: &TextLine, stats: &FontStatistics) -> HeadingLevel {
        if let Some(depth) = self.numbering_depth(&line.text) {
            return HeadingLevel::from_rank(depth - 1);
        }
        stats
            .heading_rank(line.font_size)
            .map(HeadingLevel::from_rank)
            .unwrap_or(HeadingLevel::H3)
    }
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new(HeadingRules::default(), &OutlineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyleFlags;

    fn stats(body: f32, headings: &[f32]) -> FontStatistics {
        FontStatistics {
            body_size: body,
            heading_sizes: headings.to_vec(),
            ..FontStatistics::default()
        }
    }

    #[test]
    fn test_patterns() {
        let classifier = HeadingClassifier::default();
        assert!(classifier.looks_like_heading("1 Scope"));
        assert!(classifier.looks_like_heading("2.3.1 Data Model"));
        assert!(classifier.looks_like_heading("Chapter 4 Results"));
        assert!(classifier.looks_like_heading("Section B Appendix"));
        assert!(classifier.looks_like_heading("SUMMARY OF FINDINGS"));
        assert!(classifier.looks_like_heading("Business Outcomes"));
        assert!(classifier.looks_like_heading("IV. Budget"));

        assert!(!classifier.looks_like_heading("this is ordinary prose."));
        assert!(!classifier.looks_like_heading("Chapter four"));
        assert!(!classifier.looks_like_heading("Results"));
        assert!(!classifier.looks_like_heading("Phase 2: Rollout"));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let classifier = HeadingClassifier::default();
        assert!(classifier.looks_like_heading("REFERENCES"));
        assert!(classifier.looks_like_heading("Revision history"));
        assert!(classifier.looks_like_heading("acknowledgements"));
    }

    #[test]
    fn test_length_and_digit_guards() {
        let classifier = HeadingClassifier::default();
        assert!(!classifier.looks_like_heading("IV"));
        assert!(!classifier.looks_like_heading("2024"));
        assert!(!classifier.looks_like_heading(&"A".repeat(201)));

        // Bold cannot rescue a bare number.
        let line = TextLine::new("42", 16.0, 1).with_flags(StyleFlags::bold());
        assert!(!classifier.is_candidate(&line));
    }

    #[test]
    fn test_bold_is_candidate() {
        let classifier = HeadingClassifier::default();
        let plain = TextLine::new("what we learned", 14.0, 1);
        let bold = plain.clone().with_flags(StyleFlags::bold());
        assert!(!classifier.is_candidate(&plain));
        assert!(classifier.is_candidate(&bold));
    }

    #[test]
    fn test_level_by_size_rank() {
        let classifier = HeadingClassifier::default();
        let stats = stats(10.0, &[24.0, 18.0, 14.0, 12.0]);

        let level = |size| classifier.classify(&TextLine::new("Project Goals", size, 1), &stats);
        assert_eq!(level(24.0), HeadingLevel::H1);
        assert_eq!(level(18.0), HeadingLevel::H2);
        assert_eq!(level(14.0), HeadingLevel::H3);
        assert_eq!(level(12.0), HeadingLevel::H3);
        assert_eq!(level(13.0), HeadingLevel::H3);
    }

    #[test]
    fn test_numbering_overrides_size() {
        let classifier = HeadingClassifier::default();
        let stats = stats(10.0, &[24.0, 18.0]);

        let line = TextLine::new("3.2 Data Pipeline", 24.0, 1);
        assert_eq!(classifier.classify(&line, &stats), HeadingLevel::H2);

        let line = TextLine::new("4 Results", 18.0, 1);
        assert_eq!(classifier.classify(&line, &stats), HeadingLevel::H1);

        let line = TextLine::new("1.2.3.4 Detail", 24.0, 1);
        assert_eq!(classifier.classify(&line, &stats), HeadingLevel::H3);
    }

    #[test]
    fn test_numbering_depth() {
        let classifier = HeadingClassifier::default();
        assert_eq!(classifier.numbering_depth("2.1 Scope"), Some(2));
        assert_eq!(classifier.numbering_depth("2. Scope"), Some(1));
        assert_eq!(classifier.numbering_depth("Scope 2.1"), None);
    }

    #[test]
    fn test_custom_rules() {
        let rules = HeadingRules::new([r"^Appendix\s+[A-Z]"], ["glossary"]).unwrap();
        let classifier = HeadingClassifier::new(rules, &OutlineOptions::default());
        assert!(classifier.looks_like_heading("Appendix C: Tables"));
        assert!(classifier.looks_like_heading("Glossary"));
        assert!(!classifier.looks_like_heading("Introduction"));

        let rules = HeadingRules::default()
            .with_keyword("  Glossary ")
            .with_pattern(r"^Annex\s+\d+")
            .unwrap();
        assert_eq!(rules.pattern_count(), DEFAULT_PATTERNS.len() + 1);
        assert!(rules.is_keyword("GLOSSARY"));
        assert!(rules.matches_pattern("Annex 4 Forms"));

        let err = HeadingRules::default().with_pattern("([").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
