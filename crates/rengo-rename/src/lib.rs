//! Scope-aware identifier renaming.
//!
//! The engine mutates parsed trees in place. `rename` resolves the binding
//! visible at a position: function-scope bindings are renamed together
//! with their scope by the locator, package-scope bindings are propagated
//! across every file by the package walker. Both walks stop wherever an
//! inner declaration shadows the target name, so a different binding that
//! merely shares the spelling is never touched.

pub mod driver;
pub mod error;
pub mod locate;
pub mod package;
pub mod rewrite;

pub use driver::{is_valid_identifier, rename};
pub use error::RenameError;
pub use locate::{find_enclosing_decl, rename_declaration, ScopeKind};
pub use package::{rename_package_binding, rewrite_package, Package, SourceFile};
pub use rewrite::{rewrite_expr, rewrite_stmt, rewrite_stmts, RenameRequest};
