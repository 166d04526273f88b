//! # oeos-parser
//!
//! Reading and writing OEOS scripts.
//!
//! A script exists in two equivalent forms: the tree format (v1), a nested mapping document usually
//! stored as JSON, and OEOScript (v4), an indentation-based text format meant to be written by
//! hand. Both map onto the same [Document](oeos::ast::Document):
//!
//!     tree    --[Document::from_tree]-->  Document  --[serialize]-->  script
//!     script  --[parse]-------------------> Document --[Document::to_tree]--> tree
//!
//! File Layout
//!
//!     src/oeos
//!       ├── ast          Document model: pages, commands, values
//!       ├── literal      Scalar values <-> script literals
//!       ├── grammar      Single script lines <-> commands and options
//!       ├── parsing      Indentation-driven script parser
//!       ├── serializing  Script writer
//!       └── tree         Document <-> tree format
//!
//! Conversions are all-or-nothing: the first malformed line or node stops with a
//! [ParseError](oeos::error::ParseError) or [TreeError](oeos::error::TreeError), and no partial
//! document is returned.

#![allow(rustdoc::invalid_html_tags)]

pub mod oeos;

pub use oeos::ast::{Document, Page};
pub use oeos::error::{ParseError, ParseErrorKind, TreeError};
pub use oeos::parsing::parse;
pub use oeos::serializing::{serialize, FormattingRules, ScriptSerializer};
