//! Parser and AST types for the rengo rename engine.
//!
//! The tree is a closed set of sum types: every statement and expression
//! form the rewriter must traverse is a variant of `Stmt` or `Expr`, so an
//! unhandled construct is a compile-time error in the traversal code, not a
//! runtime fault.

pub mod parser;
pub mod syntax;

pub use parser::{ParseError, Parser};
pub use syntax::ast;
