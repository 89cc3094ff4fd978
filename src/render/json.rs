//! JSON rendering for outline results.

use crate::error::{Error, Result};
use crate::model::DocumentResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline result to JSON.
pub fn to_json(result: &DocumentResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};

    fn sample() -> DocumentResult {
        DocumentResult::new(
            "Test",
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Introduction", 1),
                OutlineEntry::new(HeadingLevel::H2, "Überblick", 2),
            ],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Test\""));
        assert!(json.contains("\"level\": \"H2\""));
        assert!(json.contains("Überblick")); // non-ASCII kept as-is
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&DocumentResult::error(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Error: Could Not Process Document","outline":[]}"#
        );
    }
}
