//! Tunable thresholds of the outline heuristics.

/// Thresholds used by every stage of the outline pipeline.
///
/// Defaults are the values the heuristics were tuned with.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Lines whose top lies above this fraction of the first page's height are in the header zone
    pub header_margin_ratio: f32,

    /// Lines whose top lies below this fraction of the first page's height are in the footer zone
    pub footer_margin_ratio: f32,

    /// Shortest text (in characters) counted as a header/footer candidate
    pub min_repeat_text_len: usize,

    /// Number of lines of the title page considered for the title
    pub title_scan_lines: usize,

    /// Titles longer than this many characters are truncated
    pub title_max_chars: usize,

    /// Characters kept before the ellipsis when truncating a title
    pub title_truncate_chars: usize,

    /// Body size assumed when there are no lines at all
    pub default_body_size: f32,

    /// Shortest heading text in characters
    pub min_heading_len: usize,

    /// Longest heading text in characters
    pub max_heading_len: usize,

    /// Headings equal to the title are dropped up to this page
    pub title_exclusion_max_page: u32,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header and footer margin ratios.
    pub fn with_margins(mut self, header: f32, footer: f32) -> Self {
        self.header_margin_ratio = header.clamp(0.0, 1.0);
        self.footer_margin_ratio = footer.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum header/footer text length.
    pub fn with_min_repeat_text_len(mut self, len: usize) -> Self {
        self.min_repeat_text_len = len;
        self
    }

    /// Set how many lines of the title page are scanned for the title.
    pub fn with_title_scan_lines(mut self, lines: usize) -> Self {
        self.title_scan_lines = lines;
        self
    }

    /// Set the title length cap; truncation keeps `max - 3` characters plus "...".
    pub fn with_title_max_chars(mut self, max: usize) -> Self {
        self.title_max_chars = max;
        self.title_truncate_chars = max.saturating_sub(3);
        self
    }

    /// Set the accepted heading length range (inclusive).
    pub fn with_heading_len(mut self, min: usize, max: usize) -> Self {
        self.min_heading_len = min;
        self.max_heading_len = max.max(min);
        self
    }

    /// Set the last page on which a heading equal to the title is dropped.
    pub fn with_title_exclusion_max_page(mut self, page: u32) -> Self {
        self.title_exclusion_max_page = page;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            header_margin_ratio: 0.15,
            footer_margin_ratio: 0.85,
            min_repeat_text_len: 4,
            title_scan_lines: 30,
            title_max_chars: 150,
            title_truncate_chars: 147,
            default_body_size: 10.0,
            min_heading_len: 3,
            max_heading_len: 200,
            title_exclusion_max_page: 2,
        }
    }
}
