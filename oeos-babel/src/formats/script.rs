//! OEOScript format
//!
//! Thin adapter over the parser and serializer of oeos-parser.

use crate::error::FormatError;
use crate::format::Format;
use oeos_parser::{parse, Document, FormattingRules, ScriptSerializer};

#[derive(Debug, Clone, Default)]
pub struct ScriptFormat {
    rules: FormattingRules,
}

impl ScriptFormat {
    pub fn new(rules: FormattingRules) -> Self {
        Self { rules }
    }
}

impl Format for ScriptFormat {
    fn name(&self) -> &str {
        "oeoscript"
    }

    fn description(&self) -> &str {
        "OEOScript (v4) indentation-based text"
    }

    fn extensions(&self) -> &[&str] {
        &["oeos", "txt"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse(source)?)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(ScriptSerializer::new(self.rules.clone()).serialize(doc))
    }
}
