//! Shared configuration loader for the OEOS toolchain.
//!
//! `defaults/oeos.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`OeosConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use oeos_parser::FormattingRules;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/oeos.default.toml");

/// Top-level configuration consumed by OEOS applications.
#[derive(Debug, Clone, Deserialize)]
pub struct OeosConfig {
    pub script: ScriptConfig,
    pub tree: TreeConfig,
    pub logging: LoggingConfig,
}

/// Mirrors the knobs exposed by the script serializer.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptConfig {
    pub indent_string: String,
    pub blank_line_between_pages: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeConfig {
    pub indent_width: usize,
    pub format: TreeFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeFormat {
    Auto,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive for the log subscriber, e.g. `warn` or `oeos_parser=debug`
    pub level: String,
}

impl ScriptConfig {
    /// The parser measures nesting by leading spaces and tabs, so the indent unit must be made
    /// of them and must not be empty.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_string.is_empty()
            || !self.indent_string.chars().all(|c| c == ' ' || c == '\t')
        {
            return Err(ConfigError::Message(format!(
                "script.indent_string must be one or more spaces or tabs, got {:?}",
                self.indent_string
            )));
        }
        Ok(())
    }
}

impl From<&ScriptConfig> for FormattingRules {
    fn from(config: &ScriptConfig) -> Self {
        FormattingRules {
            indent_string: config.indent_string.clone(),
            blank_line_between_pages: config.blank_line_between_pages,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<OeosConfig, ConfigError> {
        let config: OeosConfig = self.builder.build()?.try_deserialize()?;
        config.script.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<OeosConfig, ConfigError> {
    Loader::new().build()
}
