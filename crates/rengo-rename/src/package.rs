//! Package-scope propagation.
//!
//! A package-scope rename runs in two steps: the binding identifier itself
//! is renamed first, then every file's use sites are rewritten: top-level
//! type and initializer expressions, and function bodies. A function whose
//! signature reuses the name (receiver, parameter or named result) shadows
//! the package binding for its whole body, so only its receiver and
//! parameter types are walked.

use rengo_parser::ast::*;
use tracing::debug;

use crate::rewrite::{fields_bind, rewrite_expr, rewrite_fields, rewrite_stmts, RenameRequest};

/// One parsed file of a package, tagged with the path it was read from.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub file_name: String,
    pub ast: File,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, ast: File) -> SourceFile {
        SourceFile {
            file_name: file_name.into(),
            ast,
        }
    }
}

/// All files of a package, in the order they were given.
#[derive(Clone, Debug, Default)]
pub struct Package {
    pub name: String,
    pub files: Vec<SourceFile>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Package {
        Package {
            name: name.into(),
            files: Vec::new(),
        }
    }

    pub fn add_file(&mut self, file: SourceFile) {
        self.files.push(file);
    }

    /// Whether any file declares `name` at package scope.
    pub fn declares(&self, name: &str) -> bool {
        self.files.iter().any(|file| file_declares(&file.ast, name))
    }
}

fn file_declares(file: &File, name: &str) -> bool {
    file.decls.iter().any(|decl| match decl {
        Decl::Func(decl) => decl.name.name == name,
        Decl::Gen(decl) => decl.specs.iter().any(|spec| match spec {
            Spec::Import(spec) => import_binding(spec) == name,
            Spec::Type(spec) => spec.name.name == name,
            Spec::Value(spec) => spec.names.iter().any(|n| n.name == name),
        }),
    })
}

/// The identifier an import introduces: its alias, or the final segment of
/// the import path.
fn import_binding(spec: &ImportSpec) -> &str {
    if let Some(alias) = &spec.alias {
        return &alias.name;
    }
    let path = spec.path.value.trim_matches('"');
    path.rsplit('/').next().unwrap_or(path)
}

/// Rename the package-level binding identifier itself. Returns `false`
/// when no top-level declaration of the target exists, in which case
/// nothing was touched. Runs before `rewrite_package`, which only ever
/// rewrites use sites.
pub fn rename_package_binding(pkg: &mut Package, req: &RenameRequest) -> bool {
    for file in &mut pkg.files {
        for decl in &mut file.ast.decls {
            match decl {
                Decl::Func(decl) if decl.name.name == req.from => {
                    decl.name.name = req.to.clone();
                    return true;
                }
                Decl::Func(_) => {}
                Decl::Gen(decl) => {
                    for spec in &mut decl.specs {
                        if rename_spec_binding(spec, req) {
                            return true;
                        }
                    }
                }
            }
        }
    }
    false
}

fn rename_spec_binding(spec: &mut Spec, req: &RenameRequest) -> bool {
    match spec {
        Spec::Import(spec) => {
            if let Some(alias) = spec.alias.as_mut() {
                if alias.name == req.from {
                    alias.name = req.to.clone();
                    return true;
                }
                false
            } else if import_binding(spec) == req.from {
                // a renamed bare import keeps its path and gains an alias
                let span = spec.path.span;
                spec.alias = Some(Ident::new(req.to.clone(), span));
                true
            } else {
                false
            }
        }
        Spec::Type(spec) if spec.name.name == req.from => {
            spec.name.name = req.to.clone();
            true
        }
        Spec::Type(_) => false,
        Spec::Value(spec) => {
            // last matching identifier in a spec wins
            for name in spec.names.iter_mut().rev() {
                if name.name == req.from {
                    name.name = req.to.clone();
                    return true;
                }
            }
            false
        }
    }
}

/// Apply a package-scope rename's use sites to every file. The binding
/// site has already been renamed by `rename_package_binding`.
pub fn rewrite_package(pkg: &mut Package, req: &RenameRequest) {
    for file in &mut pkg.files {
        rewrite_file(&mut file.ast, req);
    }
}

fn rewrite_file(file: &mut File, req: &RenameRequest) {
    for decl in &mut file.decls {
        match decl {
            Decl::Gen(decl) => rewrite_gen_decl(decl, req),
            Decl::Func(decl) => rewrite_func_decl(decl, req),
        }
    }
}

fn rewrite_gen_decl(decl: &mut GenDecl, req: &RenameRequest) {
    for spec in &mut decl.specs {
        match spec {
            // imports cannot reference package-scope identifiers
            Spec::Import(_) => {}
            Spec::Type(spec) => rewrite_expr(&mut spec.ty, req),
            Spec::Value(spec) => {
                if let Some(ty) = spec.ty.as_mut() {
                    rewrite_expr(ty, req);
                }
                for value in &mut spec.values {
                    rewrite_expr(value, req);
                }
            }
        }
    }
}

fn rewrite_func_decl(decl: &mut FuncDecl, req: &RenameRequest) {
    if let Some(recv) = decl.recv.as_mut() {
        rewrite_expr(&mut recv.ty, req);
    }
    rewrite_fields(&mut decl.func_type.params, req);
    let shadowed = decl
        .recv
        .as_ref()
        .is_some_and(|recv| recv.names.iter().any(|n| n.name == req.from))
        || fields_bind(&decl.func_type.params, &req.from)
        || fields_bind(&decl.func_type.results, &req.from);
    if shadowed {
        debug!(name = %req.from, func = %decl.name.name, "signature shadows package binding, skipping body");
        return;
    }
    if let Some(body) = decl.body.as_mut() {
        rewrite_stmts(&mut body.stmts, req);
    }
}
