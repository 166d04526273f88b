//! Error type shared by every format

use oeos_parser::{ParseError, TreeError};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A script line that does not parse
    Script(ParseError),
    /// A tree document with the wrong shape
    Tree(TreeError),
    /// Input that is not valid JSON or YAML
    ParseError(String),
    SerializationError(String),
    FormatNotFound(String),
    NotSupported(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Script(err) => write!(f, "script error: {}", err),
            FormatError::Tree(err) => write!(f, "tree error: {}", err),
            FormatError::ParseError(msg) => write!(f, "parse error: {}", msg),
            FormatError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            FormatError::FormatNotFound(name) => write!(f, "format '{}' not found", name),
            FormatError::NotSupported(msg) => write!(f, "not supported: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Script(err) => Some(err),
            FormatError::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for FormatError {
    fn from(err: ParseError) -> Self {
        FormatError::Script(err)
    }
}

impl From<TreeError> for FormatError {
    fn from(err: TreeError) -> Self {
        FormatError::Tree(err)
    }
}
