//! Main module for OEOS script handling

pub mod ast;
pub mod error;
pub mod grammar;
pub mod literal;
pub mod parsing;
pub mod serializing;
pub mod tree;
