//! Format trait definition
//!
//! Every representation of a script implements [Format], so callers convert between any two of
//! them through the same two calls.

use crate::error::FormatError;
use oeos_parser::Document;

/// A text representation of a [Document].
///
/// Implementors override the directions they support and report them through
/// [supports_parsing](Format::supports_parsing) and
/// [supports_serialization](Format::supports_serialization).
///
/// ```ignore
/// struct Outline;
///
/// impl Format for Outline {
///     fn name(&self) -> &str {
///         "outline"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
///         Ok(doc.pages.iter().map(|p| p.id.clone()).collect::<Vec<_>>().join("\n"))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Registry key, e.g. "oeoscript" or "v1-json"
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions this format is usually stored under, without the dot
    fn extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    fn parse(&self, _source: &str) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
