//! Conversion directions offered by the CLI
//!
//! Each direction pairs the script format with a tree format. Which tree format is used depends
//! on the configured `tree.format` and, when that is `auto`, on the tree file's extension.

use oeos_babel::{FormatError, FormatRegistry, JsonFormat, ScriptFormat, YamlFormat};
use oeos_config::{OeosConfig, TreeFormat};
use oeos_parser::FormattingRules;
use std::path::Path;

pub const SCRIPT: &str = "oeoscript";
pub const TREE_JSON: &str = "v1-json";
pub const TREE_YAML: &str = "v1-yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Script in, tree out
    ToV1,
    /// Tree in, script out
    ToV4,
}

/// All direction names accepted on the command line
pub const DIRECTIONS: &[&str] = &["to_v1", "to_v4"];

impl Direction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "to_v1" => Some(Direction::ToV1),
            "to_v4" => Some(Direction::ToV4),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::ToV1 => "to_v1",
            Direction::ToV4 => "to_v4",
        }
    }

    /// Source and target format names for the given input and output paths.
    pub fn formats(
        self,
        registry: &FormatRegistry,
        tree_format: TreeFormat,
        input: &Path,
        output: &Path,
    ) -> (&'static str, &'static str) {
        match self {
            Direction::ToV1 => (SCRIPT, tree_format_for(registry, tree_format, output)),
            Direction::ToV4 => (tree_format_for(registry, tree_format, input), SCRIPT),
        }
    }
}

fn tree_format_for(registry: &FormatRegistry, configured: TreeFormat, path: &Path) -> &'static str {
    match configured {
        TreeFormat::Json => TREE_JSON,
        TreeFormat::Yaml => TREE_YAML,
        TreeFormat::Auto => match registry.detect(path).as_deref() {
            Some(TREE_YAML) => TREE_YAML,
            _ => TREE_JSON,
        },
    }
}

/// Registry whose formats honor the loaded configuration.
pub fn registry_for(config: &OeosConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(ScriptFormat::new(FormattingRules::from(&config.script)));
    registry.register(JsonFormat::new(config.tree.indent_width));
    registry.register(YamlFormat);
    registry
}

/// Convert `source` in the given direction.
pub fn convert(
    registry: &FormatRegistry,
    direction: Direction,
    tree_format: TreeFormat,
    source: &str,
    input: &Path,
    output: &Path,
) -> Result<String, FormatError> {
    let (from, to) = direction.formats(registry, tree_format, input, output);
    tracing::info!(direction = direction.name(), from, to, "converting {}", input.display());
    registry.convert(source, from, to)
}
