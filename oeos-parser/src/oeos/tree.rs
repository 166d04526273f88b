//! Tree format mapping
//!
//!     The tree format is the nested-mapping form of a script:
//!
//!         {
//!           "pages": { "<page id>": [ <command>, ... ] },
//!           "meta": { "init": "<code>" }
//!         }
//!
//!     where each command is a single-key object, `{"say": {"label": "hi"}}`. Decoding also accepts
//!     the array forms `["end"]`, `["say", "hi"]` and `["say", {"label": "hi"}]`; a bare scalar
//!     binds to the command's positional key (the shortcut table, plus `action` for `eval`).
//!
//!     Structural keys map onto [Body]: `condition` / `commands` / `elseCommands` for `if`,
//!     `options` for `choice`, `commands` / `timerCommands` for `notification.create` and
//!     `commands` for `timer`. Everything else is a flat parameter.
//!
//!     Encoding always writes the object form, flat parameters first, and gives the same JSON for
//!     documents that only differ in how an else chain was spelled.

use crate::oeos::ast::command::{EVAL, IF};
use crate::oeos::ast::{
    Body, ChoiceOption, Command, CommandKind, Conditional, Document, Else, NotificationLists, Page,
    Params, Value,
};
use crate::oeos::error::TreeError;
use crate::oeos::grammar::shortcut_key;
use serde_json::{Map, Value as Json};
use std::borrow::Cow;

type Object = Map<String, Json>;

impl Document {
    /// Decode a tree-format document.
    pub fn from_tree(tree: &Json) -> Result<Self, TreeError> {
        decode(tree)
    }

    /// Encode as a tree-format document.
    pub fn to_tree(&self) -> Json {
        encode(self)
    }
}

pub fn decode(tree: &Json) -> Result<Document, TreeError> {
    let root = tree
        .as_object()
        .ok_or_else(|| TreeError::new("", "document must be an object"))?;

    let mut doc = Document::new();
    match root.get("meta") {
        None | Some(Json::Null) => {}
        Some(Json::Object(meta)) => match meta.get("init") {
            None | Some(Json::Null) => {}
            Some(Json::String(init)) => {
                doc.init = (!init.trim().is_empty()).then(|| init.clone());
            }
            Some(_) => return Err(TreeError::new("meta.init", "init must be a string")),
        },
        Some(_) => return Err(TreeError::new("meta", "meta must be an object")),
    }

    let pages = root
        .get("pages")
        .ok_or_else(|| TreeError::new("pages", "missing"))?
        .as_object()
        .ok_or_else(|| TreeError::new("pages", "pages must be an object"))?;
    for (id, commands) in pages {
        let path = format!("pages.{}", id);
        doc.insert_page(Page::new(id.clone(), decode_list(commands, &path)?));
    }

    tracing::debug!(
        pages = doc.pages.len(),
        commands = doc.command_count(),
        "decoded tree"
    );
    Ok(doc)
}

pub fn encode(doc: &Document) -> Json {
    let pages: Object = doc
        .pages
        .iter()
        .map(|page| (page.id.clone(), encode_list(&page.commands)))
        .collect();
    let mut root = Object::new();
    root.insert("pages".to_string(), Json::Object(pages));
    if let Some(init) = doc.init.as_deref().filter(|i| !i.trim().is_empty()) {
        let mut meta = Object::new();
        meta.insert("init".to_string(), Json::String(init.to_string()));
        root.insert("meta".to_string(), Json::Object(meta));
    }
    Json::Object(root)
}

// Decoding

fn decode_list(value: &Json, path: &str) -> Result<Vec<Command>, TreeError> {
    let items = value
        .as_array()
        .ok_or_else(|| TreeError::new(path, "expected a list of commands"))?;
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| decode_command(item, &format!("{}[{}]", path, idx)))
        .collect()
}

fn optional_list(args: &Object, key: &str, path: &str) -> Result<Option<Vec<Command>>, TreeError> {
    match args.get(key) {
        None | Some(Json::Null) => Ok(None),
        Some(value) => decode_list(value, &format!("{}.{}", path, key)).map(Some),
    }
}

fn decode_command(value: &Json, path: &str) -> Result<Command, TreeError> {
    let (name, args) = match value {
        Json::Object(obj) => match (obj.len(), obj.iter().next()) {
            (1, Some((name, args))) => (name.as_str(), Some(args)),
            _ => {
                return Err(TreeError::new(
                    path,
                    "command object must have exactly one key",
                ))
            }
        },
        Json::Array(items) => match items.as_slice() {
            [Json::String(name)] => (name.as_str(), None),
            [Json::String(name), args] => (name.as_str(), Some(args)),
            _ => {
                return Err(TreeError::new(
                    path,
                    "array command must be [name] or [name, arguments]",
                ))
            }
        },
        _ => return Err(TreeError::new(path, "command must be an object or an array")),
    };

    let args: Cow<Object> = match args {
        None | Some(Json::Null) => Cow::Owned(Object::new()),
        Some(Json::Object(params)) => Cow::Borrowed(params),
        Some(Json::Array(_)) => {
            return Err(TreeError::new(
                path,
                format!("arguments of '{}' must be an object", name),
            ))
        }
        Some(scalar) => {
            let key = positional_key(name).ok_or_else(|| {
                TreeError::new(path, format!("'{}' takes no positional argument", name))
            })?;
            let mut params = Object::new();
            params.insert(key.to_string(), scalar.clone());
            Cow::Owned(params)
        }
    };

    build_command(name, &args, &format!("{}.{}", path, name))
}

fn positional_key(name: &str) -> Option<&'static str> {
    shortcut_key(name).or((name == EVAL).then_some("action"))
}

fn build_command(name: &str, args: &Object, path: &str) -> Result<Command, TreeError> {
    let command = Command::new(name);
    let command = match command.kind() {
        CommandKind::If => command
            .with_params(flat_params(args, &["condition", "commands", "elseCommands"]))
            .with_body(Body::Conditional(decode_conditional(args, path)?)),
        CommandKind::Choice => {
            let options = match args.get("options") {
                None | Some(Json::Null) => Vec::new(),
                Some(Json::Array(items)) => items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| {
                        decode_option(item, &format!("{}.options[{}]", path, idx))
                    })
                    .collect::<Result<_, _>>()?,
                Some(_) => {
                    return Err(TreeError::new(
                        format!("{}.options", path),
                        "options must be a list",
                    ))
                }
            };
            command
                .with_params(flat_params(args, &["options"]))
                .with_body(Body::Options(options))
        }
        CommandKind::Notification => {
            let lists = NotificationLists {
                commands: optional_list(args, "commands", path)?,
                timer_commands: optional_list(args, "timerCommands", path)?,
            };
            command
                .with_params(flat_params(args, &["commands", "timerCommands"]))
                .with_body(Body::Notification(lists))
        }
        CommandKind::Timer => {
            let commands = optional_list(args, "commands", path)?.filter(|c| !c.is_empty());
            command
                .with_params(flat_params(args, &["commands"]))
                .with_body(Body::Timer(commands))
        }
        CommandKind::Eval | CommandKind::Other => command.with_params(flat_params(args, &[])),
    };
    Ok(command)
}

fn flat_params(args: &Object, skip: &[&str]) -> Params {
    args.iter()
        .filter(|(key, _)| !skip.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), Value::from_json(value)))
        .collect()
}

fn decode_conditional(args: &Object, path: &str) -> Result<Conditional, TreeError> {
    let condition = match args.get("condition") {
        None | Some(Json::Null) => None,
        Some(Json::String(condition)) => Some(condition.clone()),
        Some(scalar @ (Json::Bool(_) | Json::Number(_))) => Some(scalar.to_string()),
        Some(_) => {
            return Err(TreeError::new(
                format!("{}.condition", path),
                "condition must be a string",
            ))
        }
    };
    let commands = optional_list(args, "commands", path)?.unwrap_or_default();
    let otherwise = optional_list(args, "elseCommands", path)?
        .filter(|c| !c.is_empty())
        .map(into_else);
    Ok(Conditional {
        condition,
        commands,
        otherwise,
    })
}

/// A lone parameterless `if` continues the chain; anything else is the terminal branch.
fn into_else(mut commands: Vec<Command>) -> Else {
    match commands.pop() {
        Some(Command {
            params,
            body: Body::Conditional(link),
            ..
        }) if commands.is_empty() && params.is_empty() => Else::If(Box::new(link)),
        Some(last) => {
            commands.push(last);
            Else::Commands(commands)
        }
        None => Else::Commands(commands),
    }
}

fn decode_option(value: &Json, path: &str) -> Result<ChoiceOption, TreeError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TreeError::new(path, "option must be an object"))?;
    let label = obj
        .get("label")
        .map(Value::from_json)
        .ok_or_else(|| TreeError::new(path, "option needs a label"))?;
    let present = |key: &str| obj.get(key).filter(|v| !v.is_null());

    let mut option = ChoiceOption::new(label);
    option.commands = optional_list(obj, "commands", path)?.unwrap_or_default();
    option.visible = present("visible")
        .map(Value::from_json)
        .filter(|v| !v.is_true());
    option.color = present("color").map(Value::from_json);
    option.keep = present("keep").and_then(Json::as_bool).unwrap_or(false);
    Ok(option)
}

// Encoding

fn encode_list(commands: &[Command]) -> Json {
    Json::Array(commands.iter().map(encode_command).collect())
}

fn encode_command(command: &Command) -> Json {
    let mut args: Object = command
        .params
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_json()))
        .collect();
    match &command.body {
        Body::None | Body::Timer(None) => {}
        Body::Conditional(cond) => encode_conditional(cond, &mut args),
        Body::Options(options) => {
            let options = options.iter().map(encode_option).collect();
            args.insert("options".to_string(), Json::Array(options));
        }
        Body::Notification(lists) => {
            if let Some(commands) = &lists.commands {
                args.insert("commands".to_string(), encode_list(commands));
            }
            if let Some(commands) = &lists.timer_commands {
                args.insert("timerCommands".to_string(), encode_list(commands));
            }
        }
        Body::Timer(Some(commands)) => {
            if !commands.is_empty() {
                args.insert("commands".to_string(), encode_list(commands));
            }
        }
    }
    single_key(command.name.clone(), Json::Object(args))
}

fn encode_conditional(cond: &Conditional, args: &mut Object) {
    if let Some(condition) = &cond.condition {
        args.insert("condition".to_string(), Json::String(condition.clone()));
    }
    args.insert("commands".to_string(), encode_list(&cond.commands));
    match &cond.otherwise {
        None => {}
        Some(Else::If(next)) => {
            let mut link = Object::new();
            encode_conditional(next, &mut link);
            let chain = Json::Array(vec![single_key(IF.to_string(), Json::Object(link))]);
            args.insert("elseCommands".to_string(), chain);
        }
        Some(Else::Commands(commands)) => {
            args.insert("elseCommands".to_string(), encode_list(commands));
        }
    }
}

fn encode_option(option: &ChoiceOption) -> Json {
    let mut obj = Object::new();
    obj.insert("label".to_string(), option.label.to_json());
    obj.insert("commands".to_string(), encode_list(&option.commands));
    if let Some(visible) = &option.visible {
        obj.insert("visible".to_string(), visible.to_json());
    }
    if let Some(color) = &option.color {
        obj.insert("color".to_string(), color.to_json());
    }
    if option.keep {
        obj.insert("keep".to_string(), Json::Bool(true));
    }
    Json::Object(obj)
}

fn single_key(key: String, value: Json) -> Json {
    let mut obj = Object::new();
    obj.insert(key, value);
    Json::Object(obj)
}
