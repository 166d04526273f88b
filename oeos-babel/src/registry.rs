//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name, or looked up by file extension.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{JsonFormat, ScriptFormat, YamlFormat};
use oeos_parser::Document;
use std::collections::HashMap;
use std::path::Path;

/// Registry of script formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
///
/// let doc = registry.parse(&json, "v1-json")?;
/// let script = registry.serialize(&doc, "oeoscript")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name of the format registered for the file's extension, compared case-insensitively.
    ///
    /// When several formats claim the extension the alphabetically first one wins.
    pub fn detect(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.list_formats().into_iter().find(|name| {
            self.formats[name]
                .extensions()
                .iter()
                .any(|candidate| *candidate == ext)
        })
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support parsing",
                format
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support serialization",
                format
            )));
        }
        fmt.serialize(doc)
    }

    /// Parse with one format and serialize with another
    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<String, FormatError> {
        // Resolve both ends first so a bad target fails before any parsing work
        self.get(to)?;
        let doc = self.parse(source, from)?;
        tracing::debug!(
            from,
            to,
            pages = doc.pages.len(),
            commands = doc.command_count(),
            "converting"
        );
        self.serialize(&doc, to)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(ScriptFormat::default());
        registry.register(JsonFormat::default());
        registry.register(YamlFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
