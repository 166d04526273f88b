//! Context stack frames
//!
//! Each frame owns the container it is filling. Nothing is shared with the document while a frame
//! is open: when the frame is popped its container is moved into the command (or option, or
//! notification) it belongs to, which is always the last item of the frame below.

use crate::oeos::ast::{
    Body, ChoiceOption, Command, Else, NotificationList, NotificationLists, Value,
};

/// What kind of lines a frame accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Page,
    CommandsList,
    OptionsList,
    NotificationBlock,
    EvalLiteral,
}

/// Where a commands list goes once its frame closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Target {
    /// Body of the last `if` link of the parent's last command
    IfBody,
    /// Terminal `else` of the parent's last command
    ElseBody,
    TimerBody,
    /// Body of the parent's last option
    OptionBody,
    Notification(NotificationList),
}

#[derive(Debug)]
pub(super) enum Container {
    Page { id: String, commands: Vec<Command> },
    Commands { commands: Vec<Command>, target: Target },
    Options(Vec<ChoiceOption>),
    Notification(NotificationLists),
    Literal(Vec<String>),
}

#[derive(Debug)]
pub(super) struct Frame {
    /// Width of the line that opened the frame; `None` for pages, which only close on the next
    /// page header.
    pub indent: Option<usize>,
    pub container: Container,
}

impl Frame {
    pub fn page(id: String) -> Self {
        Self {
            indent: None,
            container: Container::Page {
                id,
                commands: Vec::new(),
            },
        }
    }

    pub fn new(indent: usize, container: Container) -> Self {
        Self {
            indent: Some(indent),
            container,
        }
    }

    pub fn commands(indent: usize, target: Target) -> Self {
        Self::new(
            indent,
            Container::Commands {
                commands: Vec::new(),
                target,
            },
        )
    }

    pub fn kind(&self) -> ContextKind {
        match self.container {
            Container::Page { .. } => ContextKind::Page,
            Container::Commands { .. } => ContextKind::CommandsList,
            Container::Options(_) => ContextKind::OptionsList,
            Container::Notification(_) => ContextKind::NotificationBlock,
            Container::Literal(_) => ContextKind::EvalLiteral,
        }
    }

    /// Whether a line of this width belongs to an outer frame.
    pub fn closes_at(&self, indent: usize) -> bool {
        self.indent.is_some_and(|opened| indent <= opened)
    }

    pub fn command_list_mut(&mut self) -> Option<&mut Vec<Command>> {
        match &mut self.container {
            Container::Page { commands, .. } | Container::Commands { commands, .. } => {
                Some(commands)
            }
            _ => None,
        }
    }

    fn last_command_mut(&mut self) -> Option<&mut Command> {
        self.command_list_mut().and_then(|list| list.last_mut())
    }

    /// Move a closed child frame's content into this frame.
    pub fn adopt(&mut self, child: Container) {
        match child {
            Container::Page { .. } => {}
            Container::Commands { commands, target } => self.adopt_commands(commands, target),
            Container::Options(options) => {
                if let Some(command) = self.last_command_mut() {
                    command.body = Body::Options(options);
                }
            }
            Container::Notification(lists) => {
                if let Some(command) = self.last_command_mut() {
                    command.body = Body::Notification(lists);
                }
            }
            Container::Literal(lines) => {
                if let Some(command) = self.last_command_mut() {
                    command
                        .params
                        .insert("action", Value::text(join_literal(&lines)));
                }
            }
        }
    }

    fn adopt_commands(&mut self, commands: Vec<Command>, target: Target) {
        match target {
            Target::OptionBody => {
                if let Container::Options(options) = &mut self.container {
                    if let Some(option) = options.last_mut() {
                        option.commands = commands;
                    }
                }
            }
            Target::Notification(list) => {
                if let Container::Notification(lists) = &mut self.container {
                    *lists.slot_mut(list) = Some(commands);
                }
            }
            Target::TimerBody => {
                if let Some(command) = self.last_command_mut() {
                    command.body = Body::Timer(Some(commands));
                }
            }
            Target::IfBody | Target::ElseBody => {
                let Some(cond) = self
                    .last_command_mut()
                    .and_then(Command::as_conditional_mut)
                else {
                    return;
                };
                cond.with_last_link(|link| match target {
                    Target::IfBody => link.commands = commands,
                    _ => link.otherwise = Some(Else::Commands(commands)),
                });
            }
        }
    }
}

/// Join literal lines, removing the indentation of the first non-blank line from all of them.
pub(super) fn join_literal<S: AsRef<str>>(lines: &[S]) -> String {
    let base = lines
        .iter()
        .map(|l| l.as_ref())
        .find(|l| !l.trim().is_empty())
        .map(indent_width)
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| l.as_ref())
        .map(|l| l[base.min(indent_width(l))..].trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indentation width of a line. Spaces and tabs count one column each.
pub(crate) fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_literal_keeps_relative_indentation() {
        let lines = vec![
            "      if (a) {".to_string(),
            "        b()".to_string(),
            "".to_string(),
            "      }".to_string(),
        ];
        assert_eq!(join_literal(&lines), "if (a) {\n  b()\n\n}");
    }

    #[test]
    fn test_closes_at() {
        assert!(!Frame::page("p".to_string()).closes_at(0));
        let frame = Frame::commands(2, Target::TimerBody);
        assert!(frame.closes_at(2));
        assert!(frame.closes_at(0));
        assert!(!frame.closes_at(4));
    }
}
