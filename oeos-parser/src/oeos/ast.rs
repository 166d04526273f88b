//! Document model for OEOS scripts
//!
//!     The same model backs both representations of a script: the tree format (nested
//!     mappings and lists, usually JSON) and OEOScript, the indentation-based text format.
//!
//!     See [Document](document::Document) for the root, [Command](command::Command) for the
//!     open-ended command record and [Value](value::Value) for parameter scalars.

pub mod command;
pub mod document;
pub mod params;
pub mod value;

pub use command::{
    Body, ChoiceOption, Command, CommandKind, Conditional, Else, ElseChainClosed,
    NotificationList, NotificationLists,
};
pub use document::{Document, Page};
pub use params::Params;
pub use value::Value;
