//! Format interoperability for OEOS scripts
//!
//!     This crate puts the script text and the v1 tree format behind one interface, so converting
//!     between any two of them is `registry.convert(source, from, to)`.
//!
//! Architecture
//!
//!     - Format trait: uniform interface for all formats (parsing and/or serialization)
//!     - FormatRegistry: discovery by name or file extension
//!     - Format implementations: oeoscript, v1-json and v1-yaml
//!
//!     This is a pure lib: it powers oeos-cli but makes no assumptions about a shell. No printing,
//!     no env vars, no file access. Callers hand in text and get text back.
//!
//!     The file structure:
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── script.rs           # OEOScript, via oeos-parser
//!     │   ├── json.rs             # v1 tree as JSON
//!     │   ├── yaml.rs             # v1 tree as YAML
//!     │   └── mod.rs
//!     └── lib.rs
//!
//! Round Trips
//!
//!     All three formats carry the same [oeos_parser::Document], so script -> tree -> script is
//!     lossless for anything the script grammar can express. The only value a tree may hold that a
//!     script cannot is a nested list or object parameter; those are written as `null` in the
//!     script, with a warning.

pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use formats::{JsonFormat, ScriptFormat, YamlFormat};
pub use registry::FormatRegistry;
