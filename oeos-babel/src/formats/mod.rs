//! Format implementations
//!
//!     oeoscript   the indentation-based script text
//!     v1-json     the tree format as JSON
//!     v1-yaml     the tree format as YAML

pub mod json;
pub mod script;
pub mod yaml;

pub use json::JsonFormat;
pub use script::ScriptFormat;
pub use yaml::YamlFormat;
