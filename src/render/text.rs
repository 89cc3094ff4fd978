//! Plain text rendering of an outline.

use crate::model::DocumentResult;

/// Render the title followed by one indented line per heading.
///
/// H1 entries start at column 0; each deeper level adds two spaces.
pub fn to_text(result: &DocumentResult) -> String {
    let mut output = String::new();
    output.push_str(&result.title);
    output.push('\n');

    for entry in &result.outline {
        let indent = "  ".repeat(usize::from(entry.level.depth() - 1));
        output.push_str(&format!("{}{} (p. {})\n", indent, entry.text, entry.page));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};

    #[test]
    fn test_to_text() {
        let result = DocumentResult::new(
            "Field Guide",
            vec![
                OutlineEntry::new(HeadingLevel::H1, "1 Setup", 2),
                OutlineEntry::new(HeadingLevel::H2, "1.1 Tools", 2),
                OutlineEntry::new(HeadingLevel::H3, "Checklist", 3),
            ],
        );
        assert_eq!(
            to_text(&result),
            "Field Guide\n1 Setup (p. 2)\n  1.1 Tools (p. 2)\n    Checklist (p. 3)\n"
        );
    }

    #[test]
    fn test_to_text_empty_outline() {
        assert_eq!(to_text(&DocumentResult::error()), "Error: Could Not Process Document\n");
    }
}
