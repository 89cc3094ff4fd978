//! Layout analysis for PDF pages.
//!
//! Walks a page's content stream, tracks the text matrix, and groups the
//! resulting spans into visual lines with top-down bounding boxes.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, RawLine, RawSpan};

/// Fraction of the font size above the baseline (approximate ascender).
const ASCENT: f32 = 0.8;
/// Fraction of the font size below the baseline (approximate descender).
const DESCENT: f32 = 0.2;
/// Average glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;
/// Default leading when no TL operator has been seen.
const DEFAULT_LEADING: f32 = 12.0;

/// A positioned text span decoded from a show-text operator.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF bottom-up space)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Font base name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new text span; width is estimated from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let width = text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge in PDF space.
    pub fn top(&self) -> f32 {
        self.y + self.font_size * ASCENT
    }

    /// Bottom edge in PDF space.
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * DESCENT
    }
}

/// Spans sharing a baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct SpanLine {
    /// The spans in this line
    pub spans: Vec<TextSpan>,
}

impl SpanLine {
    fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        Self { spans }
    }

    /// Convert to a raw line in top-down coordinates.
    ///
    /// Adjacent spans with the same font and size are merged into one style run.
    pub fn into_raw_line(self, page_top: f32) -> RawLine {
        let mut bbox: Option<BoundingBox> = None;
        let mut runs: Vec<TextSpan> = Vec::new();

        for span in self.spans {
            let span_box = BoundingBox::new(
                span.x,
                page_top - span.top(),
                span.right(),
                page_top - span.bottom(),
            );
            bbox = Some(match bbox {
                Some(b) => b.union(&span_box),
                None => span_box,
            });

            match runs.last_mut() {
                Some(prev)
                    if prev.font_name == span.font_name
                        && (prev.font_size - span.font_size).abs() < 0.05 =>
                {
                    if needs_space(prev, &span) {
                        prev.text.push(' ');
                    }
                    prev.text.push_str(&span.text);
                    prev.width = span.right() - prev.x;
                }
                _ => runs.push(span),
            }
        }

        let spans = runs
            .into_iter()
            .map(|run| RawSpan::new(run.text, run.font_name, run.font_size))
            .collect();
        RawLine::new(spans, bbox.unwrap_or_default())
    }
}

/// Whether a word space belongs between two adjacent spans.
fn needs_space(prev: &TextSpan, curr: &TextSpan) -> bool {
    let gap = curr.x - prev.right();
    let char_count = curr.text.chars().count();
    let avg_char_width = if char_count > 0 && curr.width > 0.0 {
        curr.width / char_count as f32
    } else {
        curr.font_size * AVG_CHAR_WIDTH
    };
    if gap <= avg_char_width * 0.2 {
        return false;
    }

    let prev_ends_with_space = prev.text.ends_with(' ') || prev.text.ends_with('\u{00A0}');
    let curr_starts_with_space = curr.text.starts_with(' ') || curr.text.starts_with('\u{00A0}');
    if prev_ends_with_space || curr_starts_with_space {
        return false;
    }

    let prev_cjk = prev
        .text
        .chars()
        .last()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    let curr_cjk = curr
        .text
        .chars()
        .next()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    !(prev_cjk && curr_cjk)
}

/// Layout analyzer for extracting positioned lines from PDF pages.
pub struct LayoutAnalyzer<'a> {
    doc: &'a LopdfDocument,
    normalize_unicode: bool,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self {
            doc,
            normalize_unicode: true,
        }
    }

    /// Enable or disable NFC normalization of decoded text.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Extract the raw lines of a page, top to bottom.
    pub fn extract_page_lines(&self, page_id: ObjectId, page_top: f32) -> Result<Vec<RawLine>> {
        let spans = self.extract_page_spans(page_id)?;
        let lines = group_spans_into_lines(spans);
        log::debug!("Grouped page {:?} into {} lines", page_id, lines.len());
        Ok(lines
            .into_iter()
            .map(|line| line.into_raw_line(page_top))
            .collect())
    }

    /// Extract text spans from a page with position and font information.
    pub fn extract_page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut base_fonts = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            base_fonts.insert(name.clone(), base_font);
        }

        let content = self.get_page_content(page_id)?;
        self.parse_content_stream(&content, &base_fonts, &lopdf_fonts)
    }

    /// Get the concatenated page content stream.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // Blank page
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(stream_bytes(s)),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    content.extend_from_slice(&stream_bytes(s));
                    content.push(b' ');
                }
            }
        }
        content
    }

    /// Decode a PDF string with the current font's encoding.
    fn decode(&self, font: Option<&&Dictionary>, bytes: &[u8]) -> String {
        let decoded = font
            .and_then(|f| f.get_font_encoding(self.doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes));

        if self.normalize_unicode {
            decoded.nfc().collect()
        } else {
            decoded
        }
    }

    /// Decode a TJ array, turning large negative kerns into word spaces.
    ///
    /// Also returns the horizontal advance of the whole array in ems.
    fn decode_tj_array(&self, font: Option<&&Dictionary>, items: &[Object]) -> (String, f32) {
        // 200 thousandths of an em is wide enough to be a word gap.
        let space_threshold = 200.0;
        let mut combined = String::new();
        let mut advance = 0.0;

        for item in items {
            let adjustment = match item {
                Object::String(bytes, _) => {
                    let text = self.decode(font, bytes);
                    advance += estimated_advance(&text);
                    combined.push_str(&text);
                    continue;
                }
                Object::Integer(n) => -(*n as f32),
                Object::Real(n) => -n,
                _ => continue,
            };
            advance += adjustment / 1000.0;

            if adjustment > space_threshold
                && !combined.is_empty()
                && !combined.ends_with(' ')
                && !combined.ends_with('\u{00A0}')
            {
                if let Some(c) = combined.chars().last() {
                    if !is_spaceless_script_char(c) {
                        combined.push(' ');
                    }
                }
            }
        }

        (combined, advance)
    }

    /// Run the text operators of a content stream and collect spans.
    fn parse_content_stream(
        &self,
        content: &[u8],
        base_fonts: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut font_resource: Vec<u8> = Vec::new();
        let mut font_name = String::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut ctm = Matrix::identity();
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut in_text_block = false;

        for op in content.operations {
            let shown = match op.operator.as_str() {
                "q" => {
                    ctm_stack.push(ctm);
                    None
                }
                "Q" => {
                    if let Some(saved) = ctm_stack.pop() {
                        ctm = saved;
                    }
                    None
                }
                "cm" => {
                    if op.operands.len() >= 6 {
                        let m = matrix_operands(&op.operands);
                        ctm = m.multiply(&ctm);
                    }
                    None
                }
                "BT" => {
                    in_text_block = true;
                    matrix.begin();
                    None
                }
                "ET" => {
                    in_text_block = false;
                    None
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            font_resource = name.clone();
                            font_name = base_fonts
                                .get(name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        }
                        font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                    None
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                    None
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.translate(tx, ty);
                    }
                    None
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(matrix_operands(&op.operands));
                    }
                    None
                }
                "T*" => {
                    matrix.next_line();
                    None
                }
                "Tj" if in_text_block => match op.operands.first() {
                    Some(Object::String(bytes, _)) => {
                        let text = self.decode(lopdf_fonts.get(&font_resource), bytes);
                        let advance = estimated_advance(&text);
                        Some((text, advance))
                    }
                    _ => None,
                },
                "TJ" if in_text_block => match op.operands.first() {
                    Some(Object::Array(items)) => {
                        Some(self.decode_tj_array(lopdf_fonts.get(&font_resource), items))
                    }
                    _ => None,
                },
                "'" | "\"" => {
                    matrix.next_line();
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    match op.operands.get(idx) {
                        Some(Object::String(bytes, _)) if in_text_block => {
                            let text = self.decode(lopdf_fonts.get(&font_resource), bytes);
                            let advance = estimated_advance(&text);
                            Some((text, advance))
                        }
                        _ => None,
                    }
                }
                _ => None,
            };

            if let Some((text, advance)) = shown {
                if !text.trim().is_empty() {
                    // Text rendering matrix: text space mapped through the CTM.
                    let trm = matrix.to_matrix().multiply(&ctm);
                    spans.push(TextSpan::new(
                        text,
                        trm.e,
                        trm.f,
                        font_size * trm.vertical_scale(),
                        font_name.clone(),
                    ));
                }
                matrix.advance(advance * font_size);
            }
        }

        Ok(spans)
    }
}

/// Group spans into lines by baseline, top to bottom.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<SpanLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF y grows upwards: sort descending for top-to-bottom order.
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(SpanLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(SpanLine::from_spans(current));
    }

    lines
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // Start of the current line (Tlm)
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextMatrix {
    /// Reset the matrix at BT; leading is text state and survives.
    fn begin(&mut self) {
        let leading = self.leading;
        *self = Self {
            leading,
            ..Self::default()
        };
    }

    fn set(&mut self, m: Matrix) {
        self.a = m.a;
        self.b = m.b;
        self.c = m.c;
        self.d = m.d;
        self.e = m.e;
        self.f = m.f;
        self.line_e = m.e;
        self.line_f = m.f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    /// Move along the baseline after showing text; the line start stays put.
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn to_matrix(&self) -> Matrix {
        Matrix {
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
            e: self.e,
            f: self.f,
        }
    }
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// The six numeric operands of `cm` or `Tm`.
fn matrix_operands(operands: &[Object]) -> Matrix {
    let n = |i: usize, default: f32| operands.get(i).and_then(get_number).unwrap_or(default);
    Matrix {
        a: n(0, 1.0),
        b: n(1, 0.0),
        c: n(2, 0.0),
        d: n(3, 1.0),
        e: n(4, 0.0),
        f: n(5, 0.0),
    }
}

/// Estimated advance of shown text, in ems.
fn estimated_advance(text: &str) -> f32 {
    text.chars().count() as f32 * AVG_CHAR_WIDTH
}

/// Stream data, decompressed when a filter applies.
fn stream_bytes(stream: &lopdf::Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if a character belongs to a script written without word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Text decoding fallback when no font encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
