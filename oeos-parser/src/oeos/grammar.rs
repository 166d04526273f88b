//! Line grammar
//!
//!     OEOScript is line oriented: every line is a command, an option of a `choice`, or raw code
//!     inside an `eval` block. This module reads and writes single lines; nesting is the parser's
//!     business, driven by the [BlockFlags] a line reports.
//!
//! Command lines
//!
//!     name [positional] [key: value]...
//!
//!     The positional value only exists for shortcut commands (see [shortcut_key]), and only when
//!     the arguments do not start with a named argument (`<word>:`). Named arguments are found
//!     by scanning for `key: literal` pairs, where the literal is a quoted string, a boolean, a
//!     number or a `$variable`. Anything else in the argument text is ignored.
//!
//!     Structural names open blocks:
//!
//!         if <cond>        commands block
//!         else if <cond>   commands block, continues the preceding if
//!         else             commands block, closes the preceding if
//!         choice           options block
//!         notification.create  `commands` / `timerCommands` sub-blocks
//!         timer            commands block
//!         eval             literal code block, unless `code:` is given inline
//!
//! Option lines
//!
//!     "label" [when: lit] [color: lit] [keep: bool] [-> goto <target> | -> end]
//!
//!     Without the `->` shortcut the option opens a commands block.

use crate::oeos::ast::command::{ELSE_KEYWORD, END, GOTO};
use crate::oeos::ast::{Body, ChoiceOption, Command, CommandKind, Conditional, Params, Value};
use crate::oeos::error::ParseErrorKind;
use crate::oeos::literal::{self, LITERAL_PATTERN, QUOTED_PATTERN};
use crate::oeos::parsing::indent_width;
use once_cell::sync::Lazy;
use regex::Regex;

/// Commands taking one positional argument, and the parameter it binds to.
const SHORTCUTS: &[(&str, &str)] = &[
    ("say", "label"),
    ("image", "url"),
    ("audio.play", "url"),
    ("goto", "target"),
    ("storage.remove", "key"),
    ("enable", "target"),
    ("disable", "target"),
    ("notification.remove", "id"),
    ("timer.remove", "id"),
];

/// Parameters that hold nested sequences in the tree format and never appear inline.
pub const STRUCTURAL_KEYS: &[&str] = &["commands", "options", "elseCommands", "timerCommands"];

static POSITIONAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r#"(?s)^({}|\S+)\s*(.*)$"#, QUOTED_PATTERN)).unwrap());

static NAMED_ARG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r#"(\w+):\s*({})"#, LITERAL_PATTERN)).unwrap());

static NAMED_START_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+:").unwrap());

static OPTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r#"(?s)^({})\s*(.*)$"#, QUOTED_PATTERN)).unwrap());

static OPTION_ARG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"\b(when|color|keep):\s*({})"#, LITERAL_PATTERN)).unwrap()
});

pub fn shortcut_key(name: &str) -> Option<&'static str> {
    SHORTCUTS
        .iter()
        .find(|(command, _)| *command == name)
        .map(|(_, key)| *key)
}

/// The kind of nested block a line opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Commands,
    Options,
    Notification,
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockFlags {
    pub opens: Option<BlockKind>,
    /// The line is an `else` / `else if` continuing an earlier `if`.
    pub else_continuation: bool,
}

impl BlockFlags {
    fn opens(kind: BlockKind) -> Self {
        Self {
            opens: Some(kind),
            else_continuation: false,
        }
    }
}

/// One parsed line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Command(Command, BlockFlags),
    Option(ChoiceOption, BlockFlags),
}

/// Parse a trimmed, non-empty line.
pub fn parse_line(content: &str) -> Result<Line, ParseErrorKind> {
    if content.starts_with('"') {
        let (option, flags) = parse_option(content)?;
        return Ok(Line::Option(option, flags));
    }
    let (command, flags) = parse_command(content);
    Ok(Line::Command(command, flags))
}

/// Parse a command line. Command lines always parse; unknown names take the generic path.
pub fn parse_command(content: &str) -> (Command, BlockFlags) {
    let (name, args) = match content.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim_start()),
        None => (content, ""),
    };

    let mut params = Params::new();
    let mut rest = args;
    if let Some(key) = shortcut_key(name) {
        if !NAMED_START_REGEX.is_match(args) {
            if let Some(caps) = POSITIONAL_REGEX.captures(args) {
                params.insert(key, literal::decode(&caps[1]));
                rest = caps.get(2).map_or("", |m| m.as_str());
            }
        }
    }
    extract_named_args(rest, &mut params);

    match CommandKind::of(name) {
        CommandKind::If => conditional(Some(args), false),
        _ if name == ELSE_KEYWORD => match strip_keyword(args, "if") {
            Some(condition) if !condition.is_empty() => conditional(Some(condition), true),
            _ => conditional(None, true),
        },
        CommandKind::Choice => (
            Command::new(name).with_params(params),
            BlockFlags::opens(BlockKind::Options),
        ),
        CommandKind::Notification => (
            Command::new(name).with_params(params),
            BlockFlags::opens(BlockKind::Notification),
        ),
        CommandKind::Timer => (
            Command::new(name)
                .with_params(params)
                .with_body(Body::Timer(Some(Vec::new()))),
            BlockFlags::opens(BlockKind::Commands),
        ),
        CommandKind::Eval => match params.remove("code") {
            Some(code) => {
                params.insert("action", code);
                (Command::new(name).with_params(params), BlockFlags::default())
            }
            None => {
                params.insert("action", Value::String(String::new()));
                (
                    Command::new(name).with_params(params),
                    BlockFlags::opens(BlockKind::Literal),
                )
            }
        },
        CommandKind::Other => (Command::new(name).with_params(params), BlockFlags::default()),
    }
}

fn conditional(condition: Option<&str>, else_continuation: bool) -> (Command, BlockFlags) {
    let cond = Conditional {
        condition: condition.map(|c| c.trim().to_string()),
        ..Conditional::default()
    };
    let flags = BlockFlags {
        opens: Some(BlockKind::Commands),
        else_continuation,
    };
    (Command::conditional(cond), flags)
}

/// `text` with a leading whole-word `keyword` removed.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let after = text.strip_prefix(keyword)?;
    if after.is_empty() || after.starts_with(char::is_whitespace) {
        Some(after.trim())
    } else {
        None
    }
}

fn extract_named_args(text: &str, params: &mut Params) {
    for caps in NAMED_ARG_REGEX.captures_iter(text) {
        params.insert(&caps[1], literal::decode(&caps[2]));
    }
}

/// Parse an option line of a `choice` block.
pub fn parse_option(content: &str) -> Result<(ChoiceOption, BlockFlags), ParseErrorKind> {
    let caps = OPTION_REGEX.captures(content).ok_or_else(|| {
        ParseErrorKind::MalformedOption(format!("missing quoted label in '{}'", content))
    })?;
    let label = literal::decode(&caps[1]);
    let rest = caps.get(2).map_or("", |m| m.as_str());

    let (args, shortcut) = match find_outside_quotes(rest, "->") {
        Some(idx) => (&rest[..idx], Some(rest[idx + 2..].trim())),
        None => (rest, None),
    };

    let mut option = ChoiceOption::new(label);
    let mut flags = BlockFlags::default();
    match shortcut {
        Some(target) => option.commands.push(parse_jump(target)?),
        None => flags.opens = Some(BlockKind::Commands),
    }

    for caps in OPTION_ARG_REGEX.captures_iter(args) {
        let value = literal::decode(&caps[2]);
        match &caps[1] {
            "when" => option.visible = (!value.is_true()).then_some(value),
            "color" => option.color = Some(value),
            _ => option.keep = value.is_true(),
        }
    }
    Ok((option, flags))
}

fn parse_jump(text: &str) -> Result<Command, ParseErrorKind> {
    let (keyword, arg) = match text.split_once(char::is_whitespace) {
        Some((keyword, arg)) => (keyword, arg.trim()),
        None => (text, ""),
    };
    match keyword {
        END => Ok(Command::end()),
        GOTO if arg.is_empty() => Err(ParseErrorKind::MalformedOption(
            "'-> goto' needs a target".to_string(),
        )),
        GOTO => Ok(Command::goto(literal::decode(arg))),
        other => Err(ParseErrorKind::UnsupportedShortcut(other.to_string())),
    }
}

/// Byte offset of `needle` in `text`, skipping quoted literals.
fn find_outside_quotes(text: &str, needle: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
        } else if c == '"' {
            in_quotes = true;
        } else if text[idx..].starts_with(needle) {
            return Some(idx);
        }
    }
    None
}

/// A command rendered back to script text.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedCommand {
    pub header: String,
    /// Raw code lines of an `eval` block, to be written one level deeper than the header.
    pub literal: Option<Vec<String>>,
}

impl FormattedCommand {
    fn line(header: String) -> Self {
        Self {
            header,
            literal: None,
        }
    }
}

/// Render the header line of a command (structural bodies are written by the serializer).
pub fn format_command(command: &Command) -> FormattedCommand {
    let name = command.name.as_str();
    if let Some(key) = shortcut_key(name) {
        if let Some(value) = command.params.get(key) {
            let header = join_parts(
                [name.to_string(), literal::encode(value)],
                named_args(&command.params, &[key]),
            );
            return FormattedCommand::line(header);
        }
    }

    if command.kind() == CommandKind::Eval {
        let action = command.params.get("action");
        let rest = named_args(&command.params, &["action"]);
        return match action.and_then(Value::as_str) {
            Some(code) if code.contains('\n') => FormattedCommand {
                header: join_parts([name.to_string()], rest),
                literal: Some(code_lines(code)),
            },
            _ => {
                let code = action
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                let header = join_parts(
                    [name.to_string(), format!("code: {}", literal::encode(&code))],
                    rest,
                );
                FormattedCommand::line(header)
            }
        };
    }

    FormattedCommand::line(join_parts(
        [name.to_string()],
        named_args(&command.params, &[]),
    ))
}

/// Render the line of a `choice` option.
pub fn format_option(option: &ChoiceOption) -> String {
    // The line is only recognized as an option when it opens with a quote.
    let label = match &option.label {
        Value::String(s) | Value::Variable(s) => literal::quote(s),
        other => literal::quote(&literal::encode(other)),
    };
    let mut parts = vec![label];
    if let Some(visible) = option.visible.as_ref().filter(|v| !v.is_true()) {
        parts.push(format!("when: {}", literal::encode(visible)));
    }
    if let Some(color) = &option.color {
        parts.push(format!("color: {}", literal::encode(color)));
    }
    if option.keep {
        parts.push("keep: true".to_string());
    }
    if let Some(jump) = option.jump() {
        parts.push("->".to_string());
        parts.push(jump.name.clone());
        if let Some(target) = jump.params.get("target") {
            parts.push(literal::encode(target));
        }
    }
    parts.join(" ")
}

fn named_args(params: &Params, skip: &[&str]) -> Vec<String> {
    params
        .iter()
        .filter(|(key, _)| !skip.contains(key) && !STRUCTURAL_KEYS.contains(key))
        .map(|(key, value)| format!("{}: {}", key, literal::encode(value)))
        .collect()
}

fn join_parts<const N: usize>(head: [String; N], rest: Vec<String>) -> String {
    head.into_iter().chain(rest).collect::<Vec<_>>().join(" ")
}

/// Split embedded code into lines, stripping the indentation shared by all of them.
fn code_lines(code: &str) -> Vec<String> {
    let code = code.trim_matches('\n');
    let common = code
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(indent_width)
        .min()
        .unwrap_or(0);
    code.lines()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l[common.min(l.len())..].trim_end().to_string()
            }
        })
        .collect()
}
