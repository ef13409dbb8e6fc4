//! Rename orchestration: validate the replacement, locate the binding,
//! then rewrite its scope. The binding site is renamed before any
//! occurrence walk, so the walkers never have to special-case it.

use rengo_common::Pos;
use rengo_scanner::{is_identifier_part, is_identifier_start, text_to_keyword};
use tracing::debug;

use crate::error::RenameError;
use crate::locate::{rename_declaration, ScopeKind};
use crate::package::{rename_package_binding, rewrite_package, Package};
use crate::rewrite::RenameRequest;

/// Whether `name` can be introduced as an identifier. Keywords and the
/// blank identifier are refused: the blank identifier never binds.
pub fn is_valid_identifier(name: &str) -> bool {
    if name.is_empty() || name == "_" || text_to_keyword(name).is_some() {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

/// Rename the binding of `name` visible at `pos` in `pkg.files[file]` to
/// `new_name`, rewriting every occurrence in the binding's scope.
///
/// Nothing is mutated on error: validation and package-scope resolution
/// both happen before any occurrence is touched.
pub fn rename(
    pkg: &mut Package,
    file: usize,
    name: &str,
    pos: Pos,
    new_name: &str,
) -> Result<ScopeKind, RenameError> {
    if !is_valid_identifier(new_name) {
        return Err(RenameError::InvalidIdentifier {
            name: new_name.to_string(),
        });
    }
    let req = RenameRequest::new(name, new_name);
    let scope = {
        let source = pkg
            .files
            .get_mut(file)
            .ok_or(RenameError::UnknownFile { index: file })?;
        rename_declaration(&mut source.ast, pos, &req)
    };
    match scope {
        ScopeKind::Function(index) => {
            debug!(name, new_name, file, decl = index, "function-scope rename done");
            Ok(ScopeKind::Function(index))
        }
        ScopeKind::Package => {
            // binding site first, use sites second
            if !rename_package_binding(pkg, &req) {
                return Err(RenameError::NotFound {
                    name: name.to_string(),
                    pos,
                });
            }
            debug!(name, new_name, "propagating package-scope rename");
            rewrite_package(pkg, &req);
            Ok(ScopeKind::Package)
        }
    }
}

#[cfg(test)]
mod driver_tests {
    use super::*;
    use crate::package::SourceFile;
    use rengo_emitter::print_file;
    use rengo_parser::parser::parse_file;

    fn single_file_package(src: &str) -> Package {
        let mut pkg = Package::new("p");
        pkg.add_file(SourceFile::new("main.go", parse_file(src).expect("parse")));
        pkg
    }

    #[test]
    fn accepts_plain_identifiers_only() {
        assert!(is_valid_identifier("total"));
        assert!(is_valid_identifier("_private2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("_"));
        assert!(!is_valid_identifier("func"));
        assert!(!is_valid_identifier("2fast"));
        assert!(!is_valid_identifier("has space"));
    }

    #[test]
    fn rejects_keyword_replacement_before_touching_anything() {
        let src = "package p\n\nvar x int\n";
        let mut pkg = single_file_package(src);
        let err = rename(&mut pkg, 0, "x", Pos::new(15), "range").unwrap_err();
        assert_eq!(
            err,
            RenameError::InvalidIdentifier {
                name: "range".into()
            }
        );
        assert_eq!(print_file(&pkg.files[0].ast), src);
    }

    #[test]
    fn unknown_name_is_an_error_and_mutates_nothing() {
        let src = "package p\n\nvar x int\n\nfunc f() {\n\tuse(x)\n}\n";
        let mut pkg = single_file_package(src);
        let pos = Pos::new(src.find("use(x)").unwrap() as u32);
        let err = rename(&mut pkg, 0, "missing", pos, "other").unwrap_err();
        assert!(matches!(err, RenameError::NotFound { ref name, .. } if name == "missing"));
        assert_eq!(print_file(&pkg.files[0].ast), src);
    }

    #[test]
    fn file_index_is_checked() {
        let mut pkg = single_file_package("package p\n\nvar x int\n");
        let err = rename(&mut pkg, 3, "x", Pos::ZERO, "y").unwrap_err();
        assert_eq!(err, RenameError::UnknownFile { index: 3 });
    }

    #[test]
    fn renaming_to_the_same_name_changes_nothing() {
        let src = "package p\n\nfunc f() {\n\tx := 1\n\tuse(x)\n}\n";
        let mut pkg = single_file_package(src);
        let pos = Pos::new(src.find("x := 1").unwrap() as u32);
        let scope = rename(&mut pkg, 0, "x", pos, "x").expect("rename");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(print_file(&pkg.files[0].ast), src);
    }

    #[test]
    fn package_rename_from_a_use_site_spans_all_files() {
        let a = "package p\n\nvar limit = 10\n";
        let b = "package p\n\nfunc check(n int) bool {\n\treturn n < limit\n}\n";
        let mut pkg = Package::new("p");
        pkg.add_file(SourceFile::new("a.go", parse_file(a).expect("parse")));
        pkg.add_file(SourceFile::new("b.go", parse_file(b).expect("parse")));
        let pos = Pos::new(b.find("limit").unwrap() as u32);
        let scope = rename(&mut pkg, 1, "limit", pos, "cap").expect("rename");
        assert_eq!(scope, ScopeKind::Package);
        assert_eq!(print_file(&pkg.files[0].ast), "package p\n\nvar cap = 10\n");
        assert_eq!(
            print_file(&pkg.files[1].ast),
            "package p\n\nfunc check(n int) bool {\n\treturn n < cap\n}\n"
        );
    }
}
