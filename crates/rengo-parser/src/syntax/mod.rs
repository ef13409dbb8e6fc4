//! Syntax tree definitions.

pub mod ast;
