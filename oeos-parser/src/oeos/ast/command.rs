//! Commands
//!
//!     A command is a name plus an ordered parameter map. Names are open-ended: anything the
//!     grammar does not know about passes through the generic `name key: value` path untouched.
//!
//!     A handful of names carry nested command sequences. Those live in [Body], an overlay on top
//!     of the generic storage:
//!
//!         - `if`                   [Body::Conditional]: condition, body and the else chain
//!         - `choice`               [Body::Options]: the selectable options
//!         - `notification.create`  [Body::Notification]: immediate and timer-fired lists
//!         - `timer`                [Body::Timer]: the commands run when the timer fires
//!
//!     `eval` keeps its code in the regular `action` parameter; it only differs from a generic
//!     command in how the line grammar writes it.
//!
//! Else chains
//!
//!     In the tree format an `if` links to its alternative through `elseCommands`, a list whose
//!     single element is either another `if` (an "else if") or any other command sequence (the
//!     terminal "else"). Here that link is explicit: each [Conditional] owns at most one [Else],
//!     and a terminal [Else::Commands] closes the chain for good.

use super::params::Params;
use super::value::Value;
use std::fmt;

pub const IF: &str = "if";
pub const CHOICE: &str = "choice";
pub const NOTIFICATION_CREATE: &str = "notification.create";
pub const TIMER: &str = "timer";
pub const EVAL: &str = "eval";
pub const ELSE_KEYWORD: &str = "else";
pub const GOTO: &str = "goto";
pub const END: &str = "end";

/// Structural role of a command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    If,
    Choice,
    Notification,
    Timer,
    Eval,
    Other,
}

impl CommandKind {
    pub fn of(name: &str) -> Self {
        match name {
            IF => CommandKind::If,
            CHOICE => CommandKind::Choice,
            NOTIFICATION_CREATE => CommandKind::Notification,
            TIMER => CommandKind::Timer,
            EVAL => CommandKind::Eval,
            _ => CommandKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub params: Params,
    pub body: Body,
}

/// Nested content owned by a structural command.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    #[default]
    None,
    Conditional(Conditional),
    Options(Vec<ChoiceOption>),
    Notification(NotificationLists),
    /// `None` when the timer has no body; an empty list only exists mid-parse.
    Timer(Option<Vec<Command>>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conditional {
    /// `None` for a terminal-style `if` link written as a bare `else`.
    pub condition: Option<String>,
    pub commands: Vec<Command>,
    pub otherwise: Option<Else>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Else {
    If(Box<Conditional>),
    Commands(Vec<Command>),
}

/// Returned when appending to a chain that already ends in a terminal `else`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElseChainClosed;

impl fmt::Display for ElseChainClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "else chain already ends in a terminal 'else'")
    }
}

impl std::error::Error for ElseChainClosed {}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub label: Value,
    pub commands: Vec<Command>,
    /// Visibility condition; absent means always visible.
    pub visible: Option<Value>,
    pub color: Option<Value>,
    pub keep: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationLists {
    pub commands: Option<Vec<Command>>,
    pub timer_commands: Option<Vec<Command>>,
}

/// The two sub-lists of `notification.create`, by their script keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationList {
    Commands,
    TimerCommands,
}

impl NotificationList {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "commands" => Some(NotificationList::Commands),
            "timerCommands" => Some(NotificationList::TimerCommands),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            NotificationList::Commands => "commands",
            NotificationList::TimerCommands => "timerCommands",
        }
    }
}

impl NotificationLists {
    pub fn slot_mut(&mut self, list: NotificationList) -> &mut Option<Vec<Command>> {
        match list {
            NotificationList::Commands => &mut self.commands,
            NotificationList::TimerCommands => &mut self.timer_commands,
        }
    }
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let body = match CommandKind::of(&name) {
            CommandKind::If => Body::Conditional(Conditional::default()),
            CommandKind::Choice => Body::Options(Vec::new()),
            CommandKind::Notification => Body::Notification(NotificationLists::default()),
            CommandKind::Timer => Body::Timer(None),
            CommandKind::Eval | CommandKind::Other => Body::None,
        };
        Self {
            name,
            params: Params::new(),
            body,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn goto(target: impl Into<Value>) -> Self {
        Command::new(GOTO).with_param("target", target)
    }

    pub fn end() -> Self {
        Command::new(END)
    }

    pub fn conditional(conditional: Conditional) -> Self {
        Command::new(IF).with_body(Body::Conditional(conditional))
    }

    pub fn kind(&self) -> CommandKind {
        CommandKind::of(&self.name)
    }

    pub fn as_conditional(&self) -> Option<&Conditional> {
        match &self.body {
            Body::Conditional(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_conditional_mut(&mut self) -> Option<&mut Conditional> {
        match &mut self.body {
            Body::Conditional(c) => Some(c),
            _ => None,
        }
    }

    /// A parameterless `end`, or a `goto` whose only parameter is its target.
    pub fn is_jump(&self) -> bool {
        if self.body != Body::None {
            return false;
        }
        match self.name.as_str() {
            END => self.params.is_empty(),
            GOTO => self.params.len() == 1 && self.params.contains_key("target"),
            _ => false,
        }
    }

    /// Every command list directly nested in this command.
    pub fn child_lists_mut(&mut self) -> Vec<&mut Vec<Command>> {
        let mut lists = Vec::new();
        match &mut self.body {
            Body::None => {}
            Body::Conditional(cond) => cond.collect_lists_mut(&mut lists),
            Body::Options(options) => {
                lists.extend(options.iter_mut().map(|opt| &mut opt.commands));
            }
            Body::Notification(n) => {
                lists.extend(n.commands.as_mut());
                lists.extend(n.timer_commands.as_mut());
            }
            Body::Timer(commands) => lists.extend(commands.as_mut()),
        }
        lists
    }
}

impl Conditional {
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            condition: Some(condition.into()),
            ..Self::default()
        }
    }

    pub fn with_commands(mut self, commands: Vec<Command>) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_else(mut self, otherwise: Else) -> Self {
        self.otherwise = Some(otherwise);
        self
    }

    /// Walk to the end of the chain and attach `branch` there.
    pub fn append_else(&mut self, branch: Else) -> Result<(), ElseChainClosed> {
        match &mut self.otherwise {
            None => {
                self.otherwise = Some(branch);
                Ok(())
            }
            Some(Else::If(next)) => next.append_else(branch),
            Some(Else::Commands(_)) => Err(ElseChainClosed),
        }
    }

    /// Run `f` on the last `if` link of the chain.
    pub fn with_last_link<R>(&mut self, f: impl FnOnce(&mut Conditional) -> R) -> R {
        match &mut self.otherwise {
            Some(Else::If(next)) => next.with_last_link(f),
            _ => f(self),
        }
    }

    /// The `if` links of the chain, this one first.
    pub fn links(&self) -> impl Iterator<Item = &Conditional> {
        std::iter::successors(Some(self), |link| match &link.otherwise {
            Some(Else::If(next)) => Some(next.as_ref()),
            _ => None,
        })
    }

    /// The terminal `else` body, if the chain has one.
    pub fn terminal(&self) -> Option<&Vec<Command>> {
        self.links().find_map(|link| match &link.otherwise {
            Some(Else::Commands(commands)) => Some(commands),
            _ => None,
        })
    }

    fn collect_lists_mut<'a>(&'a mut self, lists: &mut Vec<&'a mut Vec<Command>>) {
        let mut link = Some(self);
        while let Some(current) = link {
            lists.push(&mut current.commands);
            link = match &mut current.otherwise {
                Some(Else::If(next)) => Some(next.as_mut()),
                Some(Else::Commands(commands)) => {
                    lists.push(commands);
                    None
                }
                None => None,
            };
        }
    }
}

impl ChoiceOption {
    pub fn new(label: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
            visible: None,
            color: None,
            keep: false,
        }
    }

    pub fn with_commands(mut self, commands: Vec<Command>) -> Self {
        self.commands = commands;
        self
    }

    /// The single jump this option's body consists of, if it is one.
    pub fn jump(&self) -> Option<&Command> {
        match self.commands.as_slice() {
            [only] if only.is_jump() => Some(only),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(conditions: &[&str]) -> Conditional {
        let mut head = Conditional::new(conditions[0]);
        for condition in &conditions[1..] {
            head.append_else(Else::If(Box::new(Conditional::new(*condition))))
                .unwrap();
        }
        head
    }

    #[test]
    fn test_new_sets_structural_body() {
        assert!(matches!(Command::new("if").body, Body::Conditional(_)));
        assert!(matches!(Command::new("choice").body, Body::Options(_)));
        assert!(matches!(Command::new("timer").body, Body::Timer(None)));
        assert_eq!(Command::new("say").body, Body::None);
    }

    #[test]
    fn test_append_walks_to_the_end() {
        let chain = chain_of(&["$a", "$b", "$c"]);
        let conditions: Vec<_> = chain
            .links()
            .map(|l| l.condition.clone().unwrap())
            .collect();
        assert_eq!(conditions, vec!["$a", "$b", "$c"]);
    }

    #[test]
    fn test_append_after_terminal_else_fails() {
        let mut chain = chain_of(&["$a", "$b"]);
        chain
            .append_else(Else::Commands(vec![Command::end()]))
            .unwrap();
        assert_eq!(
            chain.append_else(Else::Commands(vec![])),
            Err(ElseChainClosed)
        );
        assert_eq!(chain.terminal(), Some(&vec![Command::end()]));
    }

    #[test]
    fn test_with_last_link() {
        let mut chain = chain_of(&["$a", "$b"]);
        chain.with_last_link(|link| link.commands.push(Command::end()));
        let last = chain.links().last().unwrap();
        assert_eq!(last.condition.as_deref(), Some("$b"));
        assert_eq!(last.commands, vec![Command::end()]);
        assert!(chain.commands.is_empty());
    }

    #[test]
    fn test_is_jump() {
        assert!(Command::end().is_jump());
        assert!(Command::goto("page2").is_jump());
        assert!(!Command::goto("page2").with_param("mode", "x").is_jump());
        assert!(!Command::new("say").with_param("label", "hi").is_jump());
    }

    #[test]
    fn test_child_lists_cover_whole_chain() {
        let mut cond = chain_of(&["$a", "$b"]);
        cond.append_else(Else::Commands(vec![Command::end()]))
            .unwrap();
        let mut command = Command::conditional(cond);
        assert_eq!(command.child_lists_mut().len(), 3);
    }
}
