//! Error types for script parsing and tree decoding

use std::fmt;

/// What went wrong on a script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An opening `---` with no closing `---`
    UnterminatedMeta,
    /// A command before the first page header
    CommandOutsidePage,
    /// `else` / `else if` with no `if` before it in the same block
    ElseWithoutIf,
    /// `else` / `else if` after the chain was closed by a bare `else`
    ElseAfterTerminalElse,
    /// An option line without its quoted label, or with an incomplete shortcut
    MalformedOption(String),
    /// Something other than `goto` or `end` after `->`
    UnsupportedShortcut(String),
    /// A quoted option line outside a `choice` block
    OptionOutsideChoice,
    /// A line under `notification.create` that is neither `commands` nor `timerCommands`
    UnexpectedNotificationChild,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnterminatedMeta => write!(f, "meta block '---' is never closed"),
            ParseErrorKind::CommandOutsidePage => {
                write!(f, "command found outside of a page declaration")
            }
            ParseErrorKind::ElseWithoutIf => write!(f, "'else' or 'else if' has no matching 'if'"),
            ParseErrorKind::ElseAfterTerminalElse => {
                write!(f, "'else' or 'else if' is not allowed after a final 'else' block")
            }
            ParseErrorKind::MalformedOption(msg) => write!(f, "could not parse option: {}", msg),
            ParseErrorKind::UnsupportedShortcut(token) => write!(
                f,
                "shortcut '->' only supports 'end' and 'goto', but got '{}'",
                token
            ),
            ParseErrorKind::OptionOutsideChoice => {
                write!(f, "option line found outside of a 'choice' block")
            }
            ParseErrorKind::UnexpectedNotificationChild => write!(
                f,
                "expected 'commands' or 'timerCommands' under 'notification.create'"
            ),
        }
    }
}

/// A script parse failure, located by physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number in the whole input
    pub line: usize,
    /// The raw line as written
    pub text: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, text: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            line,
            text: text.into(),
            kind,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: '{}': {}", self.line, self.text, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// A tree document that does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeError {
    /// Location of the offending node, e.g. `pages.start[2].if.commands`
    pub path: String,
    pub message: String,
}

impl TreeError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "at {}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for TreeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_names_line_and_text() {
        let err = ParseError::new(7, "  else", ParseErrorKind::ElseWithoutIf);
        assert_eq!(
            err.to_string(),
            "line 7: '  else': 'else' or 'else if' has no matching 'if'"
        );
    }

    #[test]
    fn test_tree_error_display() {
        let err = TreeError::new("pages.start[0]", "command must be an object");
        assert_eq!(err.to_string(), "at pages.start[0]: command must be an object");
        assert_eq!(TreeError::new("", "boom").to_string(), "boom");
    }
}
