//! Script serialization
//!
//!     Writes a [Document] as OEOScript. Line content comes from the [grammar] formatters; this
//!     module only decides the nesting:
//!
//!         ---                  meta block, only when the document has init code
//!         init: |
//!           <init lines>
//!         ---
//!
//!         > <page id>
//!           <command>          one level per nested block
//!
//!     Output parses back to an equal document whenever every value has a literal form. Spellings
//!     are not preserved: shortcut commands use their positional form, options use the `->`
//!     shortcut whenever their body is a single plain jump, and an `if` link without a condition
//!     is written `if true` at the head of a chain and `else` anywhere else.

use crate::oeos::ast::{Body, Command, Conditional, Document, NotificationList};
use crate::oeos::grammar::{self, format_command, format_option};

/// Layout knobs for the script writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingRules {
    /// One level of indentation. Spaces and/or tabs, never empty, or the output won't parse back.
    pub indent_string: String,
    /// Separate pages with an empty line
    pub blank_line_between_pages: bool,
}

impl Default for FormattingRules {
    fn default() -> Self {
        Self {
            indent_string: "  ".to_string(),
            blank_line_between_pages: true,
        }
    }
}

/// Serialize with the default layout.
pub fn serialize(doc: &Document) -> String {
    ScriptSerializer::new(FormattingRules::default()).serialize(doc)
}

pub struct ScriptSerializer {
    rules: FormattingRules,
    output: String,
    indent_level: usize,
}

impl ScriptSerializer {
    pub fn new(rules: FormattingRules) -> Self {
        Self {
            rules,
            output: String::new(),
            indent_level: 0,
        }
    }

    pub fn serialize(mut self, doc: &Document) -> String {
        if let Some(init) = doc.init.as_deref().filter(|i| !i.trim().is_empty()) {
            self.write_meta(init);
        }
        for page in &doc.pages {
            if self.rules.blank_line_between_pages && !self.output.is_empty() {
                self.output.push('\n');
            }
            self.write_line(&format!("> {}", page.id));
            self.nested(|s| s.write_commands(&page.commands));
        }
        tracing::debug!(
            pages = doc.pages.len(),
            bytes = self.output.len(),
            "serialized script"
        );
        self.output
    }

    fn write_meta(&mut self, init: &str) {
        self.write_line("---");
        self.write_line("init: |");
        self.nested(|s| {
            for line in init.lines() {
                s.write_line(line.trim_end());
            }
        });
        self.write_line("---");
    }

    fn indent(&self) -> String {
        self.rules.indent_string.repeat(self.indent_level)
    }

    fn write_line(&mut self, text: &str) {
        if !text.is_empty() {
            self.output.push_str(&self.indent());
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent_level += 1;
        f(self);
        self.indent_level -= 1;
    }

    fn write_commands(&mut self, commands: &[Command]) {
        for command in commands {
            self.write_command(command);
        }
    }

    fn write_command(&mut self, command: &Command) {
        match &command.body {
            Body::Conditional(cond) => {
                if !command.params.is_empty() {
                    let keys = command.params.keys().collect::<Vec<_>>().join(", ");
                    tracing::warn!(%keys, "if parameters have no script form, dropping them");
                }
                self.write_conditional(cond)
            }
            Body::Options(options) => {
                self.write_line(&format_command(command).header);
                self.nested(|s| {
                    for option in options {
                        s.write_line(&format_option(option));
                        if option.jump().is_none() {
                            s.nested(|s| s.write_commands(&option.commands));
                        }
                    }
                });
            }
            Body::Notification(lists) => {
                self.write_line(&format_command(command).header);
                self.nested(|s| {
                    let slots = [
                        (NotificationList::Commands, &lists.commands),
                        (NotificationList::TimerCommands, &lists.timer_commands),
                    ];
                    for (list, commands) in slots {
                        if let Some(commands) = commands {
                            s.write_line(list.keyword());
                            s.nested(|s| s.write_commands(commands));
                        }
                    }
                });
            }
            Body::Timer(commands) => {
                self.write_line(&format_command(command).header);
                if let Some(commands) = commands {
                    self.nested(|s| s.write_commands(commands));
                }
            }
            Body::None => self.write_plain(command),
        }
    }

    fn write_plain(&mut self, command: &Command) {
        let grammar::FormattedCommand { header, literal } = format_command(command);
        self.write_line(&header);
        if let Some(lines) = literal {
            self.nested(|s| {
                for line in &lines {
                    s.write_line(line);
                }
            });
        }
    }

    fn write_conditional(&mut self, cond: &Conditional) {
        for (idx, link) in cond.links().enumerate() {
            let header = match (idx, link.condition.as_deref()) {
                (0, None) => "if true".to_string(),
                (0, Some(condition)) => format!("if {}", condition),
                (_, Some(condition)) if !condition.trim().is_empty() => {
                    format!("else if {}", condition)
                }
                // An unconditioned link always runs, so it ends the chain.
                _ => {
                    if link.otherwise.is_some() {
                        tracing::warn!("dropping unreachable branches after an unconditioned else");
                    }
                    self.write_line("else");
                    self.nested(|s| s.write_commands(&link.commands));
                    return;
                }
            };
            self.write_line(&header);
            self.nested(|s| s.write_commands(&link.commands));
        }
        if let Some(terminal) = cond.terminal() {
            self.write_line("else");
            self.nested(|s| s.write_commands(terminal));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oeos::ast::{Else, Page};

    #[test]
    fn test_custom_indent_and_no_page_gap() {
        let rules = FormattingRules {
            indent_string: "    ".to_string(),
            blank_line_between_pages: false,
        };
        let doc = Document::new()
            .with_page(Page::new("a", vec![Command::goto("b")]))
            .with_page(Page::new("b", vec![Command::end()]));
        assert_eq!(
            ScriptSerializer::new(rules).serialize(&doc),
            "> a\n    goto \"b\"\n> b\n    end\n"
        );
    }

    #[test]
    fn test_unconditioned_links() {
        let cond = Conditional::default()
            .with_commands(vec![Command::end()])
            .with_else(Else::If(Box::new(
                Conditional::default().with_commands(vec![Command::goto("x")]),
            )));
        let doc = Document::new().with_page(Page::new("p", vec![Command::conditional(cond)]));
        assert_eq!(
            serialize(&doc),
            "> p\n  if true\n    end\n  else\n    goto \"x\"\n"
        );
    }
}
