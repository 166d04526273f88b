//! v1 tree format as JSON
//!
//!     Output is pretty-printed with a configurable indent (two spaces by default) and keeps key
//!     order, so a tree read from disk and written back without edits comes out the same.

use crate::error::FormatError;
use crate::format::Format;
use oeos_parser::oeos::tree;
use oeos_parser::Document;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

#[derive(Debug, Clone)]
pub struct JsonFormat {
    indent_width: usize,
}

impl JsonFormat {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "v1-json"
    }

    fn description(&self) -> &str {
        "OEOS v1 tree format (JSON)"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        let value: serde_json::Value = serde_json::from_str(source)
            .map_err(|e| FormatError::ParseError(format!("invalid JSON: {}", e)))?;
        Ok(tree::decode(&value)?)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let indent = " ".repeat(self.indent_width);
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = Serializer::with_formatter(&mut out, formatter);
        tree::encode(doc)
            .serialize(&mut ser)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        let mut text =
            String::from_utf8(out).map_err(|e| FormatError::SerializationError(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oeos_parser::oeos::ast::{Command, Page};

    fn sample() -> Document {
        Document::new().with_page(Page::new("start", vec![Command::goto("end")]))
    }

    #[test]
    fn test_serialize_uses_indent_width() {
        let text = JsonFormat::new(4).serialize(&sample()).unwrap();
        assert_eq!(
            text,
            "{\n    \"pages\": {\n        \"start\": [\n            {\n                \"goto\": {\n                    \"target\": \"end\"\n                }\n            }\n        ]\n    }\n}\n"
        );
    }

    #[test]
    fn test_parse_round_trips() {
        let format = JsonFormat::default();
        let text = format.serialize(&sample()).unwrap();
        assert_eq!(format.parse(&text).unwrap(), sample());
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = JsonFormat::default().parse("{ \"pages\": ").unwrap_err();
        assert!(matches!(err, FormatError::ParseError(msg) if msg.starts_with("invalid JSON")));
    }

    #[test]
    fn test_tree_errors_carry_the_path() {
        let err = JsonFormat::default()
            .parse(r#"{"pages": {"p": [{"choice": {"options": [{}]}}]}}"#)
            .unwrap_err();
        let FormatError::Tree(err) = err else {
            panic!("expected a tree error");
        };
        assert_eq!(err.path, "pages.p[0].choice.options[0]");
    }
}
