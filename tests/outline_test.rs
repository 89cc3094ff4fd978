//! End-to-end outline inference over in-memory line sources.

use pdfoutline::{
    extract_outline_from_source, to_json, BoundingBox, DocumentResult, HeadingLevel, JsonFormat,
    OutlineEntry, OutlineExtractor, RawLine, RawSpan, SourceDocument, SourcePage,
};

/// Builds letter-sized pages line by line, top to bottom.
struct PageBuilder {
    page: SourcePage,
    cursor: f32,
}

impl PageBuilder {
    fn new(number: u32) -> Self {
        Self {
            page: SourcePage::letter(number),
            cursor: 140.0,
        }
    }

    fn text(mut self, text: &str, font: &str, size: f32) -> Self {
        let top = self.cursor;
        self.page.add_line(RawLine::single(
            RawSpan::new(text, font, size),
            BoundingBox::new(72.0, top, 520.0, top + size),
        ));
        self.cursor += size * 1.6;
        self
    }

    fn body(self, count: usize) -> Self {
        (0..count).fold(self, |b, i| {
            b.text(
                &format!("Body paragraph sentence {} with ordinary words.", i),
                "Times-Roman",
                12.0,
            )
        })
    }

    fn at(mut self, top: f32, text: &str, font: &str, size: f32) -> Self {
        self.page.add_line(RawLine::single(
            RawSpan::new(text, font, size),
            BoundingBox::new(72.0, top, 300.0, top + size),
        ));
        self
    }

    fn build(self) -> SourcePage {
        self.page
    }
}

fn document(pages: Vec<SourcePage>) -> SourceDocument {
    pages
        .into_iter()
        .fold(SourceDocument::new(), |doc, page| doc.with_page(page))
}

#[test]
fn test_title_only_document() {
    let doc = document(vec![PageBuilder::new(1)
        .text("Annual Report", "Helvetica", 24.0)
        .body(4)
        .build()]);

    let result = extract_outline_from_source(&doc);
    assert_eq!(result.title, "Annual Report");
    assert!(result.outline.is_empty());
}

#[test]
fn test_numbered_heading_level_from_numbering() {
    let doc = document(vec![
        PageBuilder::new(1)
            .text("Platform Design", "Helvetica-Bold", 26.0)
            .body(6)
            .build(),
        PageBuilder::new(2)
            .text("3.2 Data Pipeline", "Helvetica-Bold", 26.0)
            .body(6)
            .build(),
    ]);

    let result = extract_outline_from_source(&doc);
    assert_eq!(
        result.outline,
        vec![OutlineEntry::new(HeadingLevel::H2, "3.2 Data Pipeline", 2)]
    );
}

#[test]
fn test_dot_leader_lines_dropped() {
    let doc = document(vec![
        PageBuilder::new(1)
            .text("User Guide", "Helvetica-Bold", 24.0)
            .text("Table of Contents", "Helvetica-Bold", 16.0)
            .text("Getting Started ......... 4", "Helvetica-Bold", 16.0)
            .text("Page 3 of 10 ......... 42", "Helvetica-Bold", 16.0)
            .body(5)
            .build(),
        PageBuilder::new(2)
            .text("Getting Started", "Helvetica-Bold", 16.0)
            .body(5)
            .build(),
    ]);

    let extractor = OutlineExtractor::new();
    let lines = extractor.clean_lines(&doc);
    assert!(lines.iter().all(|l| !l.text.contains("......")));

    let result = extractor.extract(&doc);
    let texts: Vec<&str> = result.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Table of Contents", "Getting Started"]);
}

#[test]
fn test_repeating_footer_suppressed() {
    let pages = (1..=6)
        .map(|n| {
            let mut page = PageBuilder::new(n).body(4);
            if n == 1 {
                page = page.text("Security Review", "Helvetica-Bold", 22.0);
            }
            if n != 4 {
                page = page.at(760.0, "Confidential", "Helvetica-Bold", 14.0);
            }
            page.build()
        })
        .collect();
    let doc = document(pages);

    let extractor = OutlineExtractor::new();
    let lines = extractor.clean_lines(&doc);
    assert!(lines.iter().all(|l| l.text != "Confidential"));

    let result = extractor.extract(&doc);
    assert!(result.outline.iter().all(|e| e.text != "Confidential"));
}

#[test]
fn test_empty_document_gives_error_result() {
    let result = extract_outline_from_source(&SourceDocument::new());
    assert_eq!(result, DocumentResult::error());
    assert_eq!(
        to_json(&result, JsonFormat::Compact).unwrap(),
        r#"{"title":"Error: Could Not Process Document","outline":[]}"#
    );
}

#[test]
fn test_pages_without_text_give_error_result() {
    let doc = document(vec![SourcePage::letter(1), SourcePage::letter(2)]);
    assert!(extract_outline_from_source(&doc).is_error());
}

#[test]
fn test_untitled_when_opening_pages_empty() {
    let doc = document(vec![
        SourcePage::letter(1),
        SourcePage::letter(2),
        PageBuilder::new(3)
            .text("Late Heading", "Helvetica-Bold", 18.0)
            .body(4)
            .build(),
    ]);

    let result = extract_outline_from_source(&doc);
    assert_eq!(result.title, "Untitled Document");
    assert_eq!(
        result.outline,
        vec![OutlineEntry::new(HeadingLevel::H1, "Late Heading", 3)]
    );
}

#[test]
fn test_outline_invariants_hold() {
    let doc = document(vec![
        PageBuilder::new(1)
            .text("Research Proposal", "Helvetica-Bold", 28.0)
            .text("Overview", "Helvetica-Bold", 18.0)
            .body(6)
            .build(),
        PageBuilder::new(2)
            .text("1 Background", "Helvetica-Bold", 18.0)
            .text("1.1 Prior Work", "Helvetica-Bold", 14.0)
            .text("PRIOR WORK", "Helvetica", 14.0)
            .body(6)
            .build(),
        PageBuilder::new(3)
            .text("2 Method", "Helvetica-Bold", 18.0)
            .text("2 method", "Helvetica-Bold", 18.0)
            .text("Important note", "Times-Bold", 12.0)
            .body(6)
            .build(),
    ]);

    let result = extract_outline_from_source(&doc);
    assert_eq!(result.title, "Research Proposal");

    // Page order is non-decreasing and pages are 1-based.
    let pages: Vec<u32> = result.outline.iter().map(|e| e.page).collect();
    assert!(pages.windows(2).all(|w| w[0] <= w[1]));
    assert!(pages.iter().all(|p| *p >= 1));

    // No (text, page) pair twice, case-insensitively.
    let mut keys: Vec<(String, u32)> = result
        .outline
        .iter()
        .map(|e| (e.text.to_lowercase(), e.page))
        .collect();
    let before = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), before);

    // Body-sized bold text never becomes a heading.
    assert!(result.outline.iter().all(|e| e.text != "Important note"));

    assert_eq!(
        result.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H2, "Overview", 1),
            OutlineEntry::new(HeadingLevel::H1, "1 Background", 2),
            OutlineEntry::new(HeadingLevel::H2, "1.1 Prior Work", 2),
            OutlineEntry::new(HeadingLevel::H3, "PRIOR WORK", 2),
            OutlineEntry::new(HeadingLevel::H1, "2 Method", 3),
        ]
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let doc = document(vec![
        PageBuilder::new(1)
            .text("Release Notes", "Helvetica-Bold", 24.0)
            .body(3)
            .build(),
        PageBuilder::new(2)
            .text("Known Issues", "Helvetica-Bold", 16.0)
            .body(3)
            .build(),
    ]);

    let extractor = OutlineExtractor::new();
    let first = extractor.extract(&doc);
    let second = extractor.extract(&doc);
    assert_eq!(first, second);
    assert_eq!(
        to_json(&first, JsonFormat::Pretty).unwrap(),
        to_json(&second, JsonFormat::Pretty).unwrap()
    );
}
