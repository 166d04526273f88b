//! Script parsing
//!
//!     Turns OEOScript text into a [Document]. The parser is a single pass over physical lines
//!     driven by indentation:
//!
//!         1. An optional meta block (see [meta]) supplies the init code.
//!         2. A line starting at column 0 with `>` or `#` opens a page. Every open block closes.
//!         3. Any other line first closes the blocks opened at the same or a deeper indentation,
//!            then is read according to the innermost block still open (see [ContextKind]).
//!
//!     Indentation is the count of leading spaces and tabs, one column each.
//!
//!     Blank lines are skipped, as are indented lines starting with `#`. Inside an `eval` block
//!     neither rule applies: every line deeper than the `eval` itself, blank or not, is code.
//!
//!     Each block lives on the context stack as a [Frame](context) owning the list it is filling.
//!     Closing a frame moves its content into the command it belongs to, so the document is only
//!     touched when pages close.
//!
//! Errors
//!
//!     The first malformed line stops the parse. Its [ParseError] carries the 1-based line number
//!     and the raw line text.

mod context;
mod meta;

pub use context::ContextKind;

use crate::oeos::ast::{Body, Command, CommandKind, Document, Else, NotificationList, Page};
use crate::oeos::error::{ParseError, ParseErrorKind};
use crate::oeos::grammar::{self, BlockKind, Line};
pub(crate) use context::indent_width;
use context::{Container, Frame, Target};

/// Parse a complete script.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    ScriptParser::new().parse(source)
}

/// Single-use parser state. [ScriptParser::parse] consumes it, so no context survives between
/// inputs.
#[derive(Debug, Default)]
pub struct ScriptParser {
    document: Document,
    stack: Vec<Frame>,
}

impl ScriptParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(mut self, source: &str) -> Result<Document, ParseError> {
        let lines: Vec<&str> = source.lines().collect();
        let (init, body_start) = meta::split_meta(&lines)?;
        self.document.init = init;

        for (idx, raw) in lines.iter().enumerate().skip(body_start) {
            self.feed(idx + 1, raw)?;
        }
        self.close_all();

        let mut document = self.document;
        document.normalize();
        tracing::debug!(
            pages = document.pages.len(),
            commands = document.command_count(),
            "parsed script"
        );
        Ok(document)
    }

    fn feed(&mut self, line_no: usize, raw: &str) -> Result<(), ParseError> {
        let content = raw.trim();
        let indent = indent_width(raw);
        let error = |kind: ParseErrorKind| ParseError::new(line_no, raw.trim_end(), kind);

        // Lines deeper than an open eval are code, comments included
        let in_code = matches!(
            self.stack.last(),
            Some(Frame {
                indent: Some(opened),
                container: Container::Literal(_),
            }) if indent > *opened
        );
        if content.is_empty() {
            if let Some(Frame {
                container: Container::Literal(code),
                ..
            }) = self.stack.last_mut()
            {
                code.push(String::new());
            }
            return Ok(());
        }
        if !in_code && content.starts_with('#') && !raw.starts_with('#') {
            return Ok(());
        }

        if indent == 0 && (content.starts_with('>') || content.starts_with('#')) {
            self.close_all();
            let id = content[1..].trim();
            tracing::debug!(page = id, line = line_no, "page");
            self.stack.push(Frame::page(id.to_string()));
            return Ok(());
        }

        while self.stack.last().is_some_and(|frame| frame.closes_at(indent)) {
            self.close_top();
        }
        let Some(frame) = self.stack.last_mut() else {
            return Err(error(ParseErrorKind::CommandOutsidePage));
        };
        tracing::trace!(line = line_no, indent, context = ?frame.kind(), "line");

        match &mut frame.container {
            Container::Options(options) => {
                let (option, flags) = grammar::parse_option(content).map_err(error)?;
                options.push(option);
                if flags.opens.is_some() {
                    self.stack.push(Frame::commands(indent, Target::OptionBody));
                }
            }
            Container::Notification(_) => {
                let list = NotificationList::from_keyword(content)
                    .ok_or_else(|| error(ParseErrorKind::UnexpectedNotificationChild))?;
                self.stack
                    .push(Frame::commands(indent, Target::Notification(list)));
            }
            Container::Literal(code) => code.push(raw.to_string()),
            Container::Page { commands, .. } | Container::Commands { commands, .. } => {
                let (command, flags) = match grammar::parse_line(content).map_err(error)? {
                    Line::Command(command, flags) => (command, flags),
                    Line::Option(..) => return Err(error(ParseErrorKind::OptionOutsideChoice)),
                };
                let target = if flags.else_continuation {
                    attach_else(commands, command).map_err(error)?
                } else {
                    let target = body_target(&command);
                    commands.push(command);
                    target
                };
                if let Some(kind) = flags.opens {
                    self.stack.push(child_frame(kind, indent, target));
                }
            }
        }
        Ok(())
    }

    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame.container {
            Container::Page { id, commands } => {
                self.document.insert_page(Page::new(id, commands));
            }
            child => {
                if let Some(parent) = self.stack.last_mut() {
                    parent.adopt(child);
                }
            }
        }
    }

    fn close_all(&mut self) {
        while !self.stack.is_empty() {
            self.close_top();
        }
    }
}

/// Link an `else` / `else if` line to the `if` ending `commands`.
fn attach_else(commands: &mut [Command], command: Command) -> Result<Target, ParseErrorKind> {
    let chain = commands
        .last_mut()
        .and_then(Command::as_conditional_mut)
        .ok_or(ParseErrorKind::ElseWithoutIf)?;
    let Body::Conditional(link) = command.body else {
        return Err(ParseErrorKind::ElseWithoutIf);
    };
    let (branch, target) = if link.condition.is_some() {
        (Else::If(Box::new(link)), Target::IfBody)
    } else {
        (Else::Commands(Vec::new()), Target::ElseBody)
    };
    chain
        .append_else(branch)
        .map_err(|_| ParseErrorKind::ElseAfterTerminalElse)?;
    Ok(target)
}

fn body_target(command: &Command) -> Target {
    match command.kind() {
        CommandKind::Timer => Target::TimerBody,
        _ => Target::IfBody,
    }
}

fn child_frame(kind: BlockKind, indent: usize, target: Target) -> Frame {
    match kind {
        BlockKind::Commands => Frame::commands(indent, target),
        BlockKind::Options => Frame::new(indent, Container::Options(Vec::new())),
        BlockKind::Notification => Frame::new(indent, Container::Notification(Default::default())),
        BlockKind::Literal => Frame::new(indent, Container::Literal(Vec::new())),
    }
}
