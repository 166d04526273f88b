//! v1 tree format as YAML
//!
//! Same tree as [super::JsonFormat], carried through serde_yaml so hand-edited trees can use the
//! friendlier syntax.

use crate::error::FormatError;
use crate::format::Format;
use oeos_parser::oeos::tree;
use oeos_parser::Document;

#[derive(Debug, Clone, Default)]
pub struct YamlFormat;

impl Format for YamlFormat {
    fn name(&self) -> &str {
        "v1-yaml"
    }

    fn description(&self) -> &str {
        "OEOS v1 tree format (YAML)"
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        let value: serde_json::Value = serde_yaml::from_str(source)
            .map_err(|e| FormatError::ParseError(format!("invalid YAML: {}", e)))?;
        Ok(tree::decode(&value)?)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serde_yaml::to_string(&tree::encode(doc))
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}
