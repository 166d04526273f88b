//! Document element
//!
//! A document is an optional init script plus its pages. Each page owns its command sequence and
//! every nested sequence is owned by the command or option containing it, so the whole script is a
//! plain tree with no shared nodes.

use super::command::{Command, CommandKind};
use super::value::Value;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Raw code run once before any page.
    pub init: Option<String>,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: String,
    pub commands: Vec<Command>,
}

impl Page {
    pub fn new(id: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            id: id.into(),
            commands,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_init(mut self, init: impl Into<String>) -> Self {
        self.init = Some(init.into());
        self
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.insert_page(page);
        self
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Add a page, replacing the commands of an existing page with the same id in place.
    pub fn insert_page(&mut self, page: Page) {
        match self.pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => existing.commands = page.commands,
            None => self.pages.push(page),
        }
    }

    /// Bring the document to its canonical tree shape.
    ///
    /// Trims `eval` actions and drops empty `timer` bodies, walking every nested list with an
    /// explicit work stack.
    pub fn normalize(&mut self) {
        if let Some(init) = self.init.as_mut() {
            let trimmed = init.trim();
            if trimmed.len() != init.len() {
                *init = trimmed.to_string();
            }
        }
        let mut pending: Vec<&mut Vec<Command>> =
            self.pages.iter_mut().map(|p| &mut p.commands).collect();
        while let Some(list) = pending.pop() {
            for command in list.iter_mut() {
                normalize_command(command);
                pending.extend(command.child_lists_mut());
            }
        }
    }

    /// Total number of commands, nested ones included.
    pub fn command_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&Vec<Command>> = self.pages.iter().map(|p| &p.commands).collect();
        while let Some(list) = pending.pop() {
            count += list.len();
            for command in list {
                pending.extend(child_lists(command));
            }
        }
        count
    }
}

fn normalize_command(command: &mut Command) {
    use super::command::Body;

    if command.kind() == CommandKind::Eval {
        if let Some(Value::String(action) | Value::Variable(action)) =
            command.params.get("action")
        {
            let trimmed = action.trim();
            if trimmed.len() != action.len() {
                let trimmed = trimmed.to_string();
                command.params.insert("action", Value::text(trimmed));
            }
        }
    }
    if let Body::Timer(commands) = &mut command.body {
        if commands.as_ref().is_some_and(|c| c.is_empty()) {
            *commands = None;
        }
    }
}

fn child_lists(command: &Command) -> Vec<&Vec<Command>> {
    use super::command::{Body, Else};

    let mut lists = Vec::new();
    match &command.body {
        Body::None => {}
        Body::Conditional(cond) => {
            for link in cond.links() {
                lists.push(&link.commands);
                if let Some(Else::Commands(commands)) = &link.otherwise {
                    lists.push(commands);
                }
            }
        }
        Body::Options(options) => lists.extend(options.iter().map(|o| &o.commands)),
        Body::Notification(n) => {
            lists.extend(n.commands.as_ref());
            lists.extend(n.timer_commands.as_ref());
        }
        Body::Timer(commands) => lists.extend(commands.as_ref()),
    }
    lists
}

#[cfg(test)]
mod tests {
    use super::super::command::Body;
    use super::*;

    #[test]
    fn test_insert_page_replaces_in_place() {
        let mut doc = Document::new()
            .with_page(Page::new("start", vec![Command::end()]))
            .with_page(Page::new("other", vec![]));
        doc.insert_page(Page::new("start", vec![Command::goto("other")]));
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].id, "start");
        assert_eq!(doc.pages[0].commands, vec![Command::goto("other")]);
    }

    #[test]
    fn test_normalize_trims_nested_actions_and_empty_timers() {
        let eval = Command::new("eval").with_param("action", "  x = 1\n");
        let timer = Command::new("timer")
            .with_param("duration", "5s")
            .with_body(Body::Timer(Some(vec![])));
        let outer = Command::new("timer").with_body(Body::Timer(Some(vec![eval, timer])));
        let mut doc = Document::new().with_page(Page::new("start", vec![outer]));

        doc.normalize();

        let Body::Timer(Some(inner)) = &doc.pages[0].commands[0].body else {
            panic!("outer timer lost its body");
        };
        assert_eq!(inner[0].params.get("action"), Some(&Value::from("x = 1")));
        assert_eq!(inner[1].body, Body::Timer(None));
    }

    #[test]
    fn test_command_count_includes_nested() {
        let timer = Command::new("timer").with_body(Body::Timer(Some(vec![Command::end()])));
        let doc = Document::new().with_page(Page::new("start", vec![timer, Command::end()]));
        assert_eq!(doc.command_count(), 3);
    }
}
