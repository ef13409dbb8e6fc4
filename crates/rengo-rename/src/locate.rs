//! Declaration location.
//!
//! Given a position, decide which binding of the target name is visible
//! there and whether it lives in a function or at package scope. For
//! function-scope bindings the locator also performs the rename: it
//! rewrites the binding identifier and then every occurrence in the
//! binding's scope, so the binding site is never revisited by the walker.

use rengo_common::{Pos, Spanned};
use rengo_parser::ast::*;
use tracing::debug;

use crate::rewrite::{rewrite_cases, rewrite_expr, rewrite_spec, rewrite_stmt, rewrite_stmts, RenameRequest};

/// Where the located declaration lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// Declared inside the top-level declaration at this index; the rename
    /// is confined to that function.
    Function(usize),
    /// Declared at package scope; the rename spans every file.
    Package,
}

/// The top-level declaration whose span covers `pos`, and the scope a
/// binding declared there would live in. Imports are folded into package
/// scope, a documented approximation.
pub fn find_enclosing_decl(file: &File, pos: Pos) -> Option<(usize, ScopeKind)> {
    let index = file.decls.iter().position(|decl| decl.span().contains(pos))?;
    let scope = match &file.decls[index] {
        Decl::Func(_) => ScopeKind::Function(index),
        Decl::Gen(_) => ScopeKind::Package,
    };
    Some((index, scope))
}

/// Resolve the binding of `req.from` visible at `pos` and, when it is
/// function-scoped, rename it together with its whole scope. Anything not
/// resolvable locally falls through to package scope; the caller decides
/// whether a package-level declaration actually exists.
pub fn rename_declaration(file: &mut File, pos: Pos, req: &RenameRequest) -> ScopeKind {
    if let Some((index, ScopeKind::Function(_))) = find_enclosing_decl(file, pos) {
        if let Decl::Func(decl) = &mut file.decls[index] {
            if rename_in_func(decl, pos, req) {
                debug!(name = %req.from, decl = index, "renamed function-scope binding");
                return ScopeKind::Function(index);
            }
        }
    }
    debug!(name = %req.from, pos = %pos, "no local binding, resolving at package scope");
    ScopeKind::Package
}

fn rename_in_func(decl: &mut FuncDecl, pos: Pos, req: &RenameRequest) -> bool {
    if let Some(body) = decl.body.as_mut() {
        if rename_in_stmts(&mut body.stmts, pos, req) {
            return true;
        }
    }
    if rename_signature_binding(decl, req) {
        if let Some(body) = decl.body.as_mut() {
            rewrite_stmts(&mut body.stmts, req);
        }
        return true;
    }
    false
}

/// Receiver, parameter and named-result identifiers are function-scope
/// bindings covering the whole body.
fn rename_signature_binding(decl: &mut FuncDecl, req: &RenameRequest) -> bool {
    let fields = decl
        .recv
        .iter_mut()
        .chain(decl.func_type.params.iter_mut())
        .chain(decl.func_type.results.iter_mut());
    for field in fields {
        for name in &mut field.names {
            if name.name == req.from {
                name.name = req.to.clone();
                return true;
            }
        }
    }
    false
}

/// Search a block's statements for the binding visible at `pos`: descend
/// into the statement containing the position first (innermost wins), then
/// walk back to the nearest block-level declaration of the name. On a hit,
/// the binding is renamed and the rest of its scope rewritten.
fn rename_in_stmts(stmts: &mut [Stmt], pos: Pos, req: &RenameRequest) -> bool {
    let Some(at) = stmts.iter().position(|stmt| stmt.span().contains(pos)) else {
        return false;
    };
    if rename_in_stmt(&mut stmts[at], pos, req) {
        return true;
    }
    for index in (0..=at).rev() {
        // The containing statement binds only when the position sits on one
        // of its declared names; a define's right-hand side still sees the
        // outer binding.
        if index == at && !declares_at(&stmts[at], pos, req) {
            continue;
        }
        if rename_block_binding(&mut stmts[index], req) {
            rewrite_stmts(&mut stmts[index + 1..], req);
            return true;
        }
    }
    false
}

/// Whether `pos` sits on an identifier this statement declares with the
/// target name.
fn declares_at(stmt: &Stmt, pos: Pos, req: &RenameRequest) -> bool {
    match stmt {
        Stmt::Assign(assign) if assign.is_define() => assign.lhs.iter().any(|lhs| {
            matches!(lhs.as_ident(), Some(id) if id.name == req.from && id.span.contains(pos))
        }),
        Stmt::Decl(decl) => decl.specs.iter().any(|spec| match spec {
            Spec::Import(_) => false,
            Spec::Type(spec) => spec.name.name == req.from && spec.name.span.contains(pos),
            Spec::Value(spec) => spec
                .names
                .iter()
                .any(|name| name.name == req.from && name.span.contains(pos)),
        }),
        Stmt::Labeled(labeled) => declares_at(&labeled.stmt, pos, req),
        _ => false,
    }
}

/// Rename the binding if this statement declares the target at block
/// level: a `:=` left-hand side or a declaration group.
fn rename_block_binding(stmt: &mut Stmt, req: &RenameRequest) -> bool {
    match stmt {
        Stmt::Assign(assign) if assign.is_define() => {
            for lhs in &mut assign.lhs {
                if rename_ident_expr(lhs, req) {
                    return true;
                }
            }
            false
        }
        Stmt::Decl(decl) => rename_group_binding(decl, req),
        Stmt::Labeled(labeled) => rename_block_binding(&mut labeled.stmt, req),
        _ => false,
    }
}

fn rename_group_binding(decl: &mut GenDecl, req: &RenameRequest) -> bool {
    for index in 0..decl.specs.len() {
        let found = match &mut decl.specs[index] {
            Spec::Type(spec) if spec.name.name == req.from => {
                spec.name.name = req.to.clone();
                // a local type may refer to itself
                rewrite_expr(&mut spec.ty, req);
                true
            }
            Spec::Value(spec) => {
                let mut hit = false;
                for name in &mut spec.names {
                    if name.name == req.from {
                        name.name = req.to.clone();
                        hit = true;
                        break;
                    }
                }
                hit
            }
            _ => false,
        };
        if found {
            // later specs in the same group already see the new binding
            for spec in &mut decl.specs[index + 1..] {
                rewrite_spec(spec, req);
            }
            return true;
        }
    }
    false
}

fn rename_ident_expr(expr: &mut Expr, req: &RenameRequest) -> bool {
    if let Expr::Ident(ident) = expr {
        if ident.name == req.from {
            ident.name = req.to.clone();
            return true;
        }
    }
    false
}

/// Descend into the statement containing `pos`, handling the bindings each
/// construct introduces for its own extent: header inits, range and
/// type-switch bindings, select clause bindings, function literals.
fn rename_in_stmt(stmt: &mut Stmt, pos: Pos, req: &RenameRequest) -> bool {
    match stmt {
        Stmt::Assign(assign) => assign
            .lhs
            .iter_mut()
            .chain(assign.rhs.iter_mut())
            .any(|expr| rename_in_expr(expr, pos, req)),
        Stmt::Block(block) => rename_in_stmts(&mut block.stmts, pos, req),
        Stmt::Branch(_) | Stmt::Empty(_) => false,
        Stmt::Decl(decl) => decl.specs.iter_mut().any(|spec| match spec {
            Spec::Value(spec) => spec
                .values
                .iter_mut()
                .any(|value| rename_in_expr(value, pos, req)),
            _ => false,
        }),
        Stmt::Defer(defer) => rename_in_call(&mut defer.call, pos, req),
        Stmt::Expr(expr_stmt) => rename_in_expr(&mut expr_stmt.expr, pos, req),
        Stmt::For(for_stmt) => {
            if for_stmt.body.span.contains(pos)
                && rename_in_stmts(&mut for_stmt.body.stmts, pos, req)
            {
                return true;
            }
            if let Some(cond) = for_stmt.cond.as_mut() {
                if rename_in_expr(cond, pos, req) {
                    return true;
                }
            }
            if let Some(init) = for_stmt.init.as_deref_mut() {
                if rename_in_stmt(init, pos, req) {
                    return true;
                }
                if init.span().contains(pos) && !declares_at(init, pos, req) {
                    return false;
                }
                if rename_block_binding(init, req) {
                    if let Some(cond) = for_stmt.cond.as_mut() {
                        rewrite_expr(cond, req);
                    }
                    if let Some(post) = for_stmt.post.as_deref_mut() {
                        rewrite_stmt(post, req);
                    }
                    rewrite_stmts(&mut for_stmt.body.stmts, req);
                    return true;
                }
            }
            false
        }
        Stmt::Go(go) => rename_in_call(&mut go.call, pos, req),
        Stmt::If(if_stmt) => {
            if if_stmt.then_branch.span.contains(pos)
                && rename_in_stmts(&mut if_stmt.then_branch.stmts, pos, req)
            {
                return true;
            }
            if let Some(else_branch) = if_stmt.else_branch.as_deref_mut() {
                if else_branch.span().contains(pos) && rename_in_stmt(else_branch, pos, req) {
                    return true;
                }
            }
            if rename_in_expr(&mut if_stmt.cond, pos, req) {
                return true;
            }
            if let Some(init) = if_stmt.init.as_deref_mut() {
                if rename_in_stmt(init, pos, req) {
                    return true;
                }
                if init.span().contains(pos) && !declares_at(init, pos, req) {
                    return false;
                }
                if rename_block_binding(init, req) {
                    rewrite_expr(&mut if_stmt.cond, req);
                    rewrite_stmts(&mut if_stmt.then_branch.stmts, req);
                    if let Some(else_branch) = if_stmt.else_branch.as_deref_mut() {
                        rewrite_stmt(else_branch, req);
                    }
                    return true;
                }
            }
            false
        }
        Stmt::IncDec(incdec) => rename_in_expr(&mut incdec.expr, pos, req),
        Stmt::Labeled(labeled) => rename_in_stmt(&mut labeled.stmt, pos, req),
        Stmt::Range(range) => {
            if range.body.span.contains(pos) && rename_in_stmts(&mut range.body.stmts, pos, req) {
                return true;
            }
            if rename_in_expr(&mut range.subject, pos, req) {
                return true;
            }
            // the subject is evaluated outside the loop's binding
            if range.define && !range.subject.span().contains(pos) {
                let hit = range
                    .key
                    .as_mut()
                    .is_some_and(|key| rename_ident_expr(key, req))
                    || range
                        .value
                        .as_mut()
                        .is_some_and(|value| rename_ident_expr(value, req));
                if hit {
                    rewrite_stmts(&mut range.body.stmts, req);
                    return true;
                }
            }
            false
        }
        Stmt::Return(ret) => ret
            .results
            .iter_mut()
            .any(|result| rename_in_expr(result, pos, req)),
        Stmt::Select(select) => {
            for clause in &mut select.clauses {
                if !clause.span.contains(pos) {
                    continue;
                }
                if rename_in_stmts(&mut clause.body, pos, req) {
                    return true;
                }
                if let Some(comm) = clause.comm.as_deref_mut() {
                    if rename_in_stmt(comm, pos, req) {
                        return true;
                    }
                    if comm.span().contains(pos) && !declares_at(comm, pos, req) {
                        return false;
                    }
                    if rename_block_binding(comm, req) {
                        rewrite_stmts(&mut clause.body, req);
                        return true;
                    }
                }
                return false;
            }
            false
        }
        Stmt::Send(send) => {
            rename_in_expr(&mut send.chan, pos, req) || rename_in_expr(&mut send.value, pos, req)
        }
        Stmt::Switch(switch) => {
            if rename_in_cases(&mut switch.cases, pos, req) {
                return true;
            }
            if let Some(tag) = switch.tag.as_mut() {
                if rename_in_expr(tag, pos, req) {
                    return true;
                }
            }
            if let Some(init) = switch.init.as_deref_mut() {
                if rename_in_stmt(init, pos, req) {
                    return true;
                }
                if init.span().contains(pos) && !declares_at(init, pos, req) {
                    return false;
                }
                if rename_block_binding(init, req) {
                    if let Some(tag) = switch.tag.as_mut() {
                        rewrite_expr(tag, req);
                    }
                    rewrite_cases(&mut switch.cases, req);
                    return true;
                }
            }
            false
        }
        Stmt::TypeSwitch(switch) => {
            if rename_in_cases(&mut switch.cases, pos, req) {
                return true;
            }
            // the binding scopes over the case bodies, not the header
            let in_header = switch.subject.span().contains(pos)
                || switch
                    .init
                    .as_deref()
                    .is_some_and(|init| init.span().contains(pos));
            if !in_header {
                if let Some(binding) = switch.binding.as_mut() {
                    if binding.name == req.from {
                        binding.name = req.to.clone();
                        for case in &mut switch.cases {
                            rewrite_stmts(&mut case.body, req);
                        }
                        return true;
                    }
                }
            }
            if let Some(init) = switch.init.as_deref_mut() {
                if rename_in_stmt(init, pos, req) {
                    return true;
                }
                if init.span().contains(pos) && !declares_at(init, pos, req) {
                    return false;
                }
                if rename_block_binding(init, req) {
                    rewrite_expr(&mut switch.subject, req);
                    rewrite_cases(&mut switch.cases, req);
                    return true;
                }
            }
            false
        }
    }
}

fn rename_in_cases(cases: &mut [CaseClause], pos: Pos, req: &RenameRequest) -> bool {
    for case in cases {
        if case.span.contains(pos) && rename_in_stmts(&mut case.body, pos, req) {
            return true;
        }
    }
    false
}

fn rename_in_call(call: &mut CallExpr, pos: Pos, req: &RenameRequest) -> bool {
    rename_in_expr(&mut call.fun, pos, req)
        || call
            .args
            .iter_mut()
            .any(|arg| rename_in_expr(arg, pos, req))
}

/// The only expression that declares anything is a function literal; look
/// for one covering `pos` and resolve inside it.
fn rename_in_expr(expr: &mut Expr, pos: Pos, req: &RenameRequest) -> bool {
    match expr {
        Expr::FuncLit(lit) if lit.span.contains(pos) => {
            if rename_in_stmts(&mut lit.body.stmts, pos, req) {
                return true;
            }
            let fields = lit
                .func_type
                .params
                .iter_mut()
                .chain(lit.func_type.results.iter_mut());
            for field in fields {
                for name in &mut field.names {
                    if name.name == req.from {
                        name.name = req.to.clone();
                        rewrite_stmts(&mut lit.body.stmts, req);
                        return true;
                    }
                }
            }
            false
        }
        Expr::Binary(e) => {
            rename_in_expr(&mut e.x, pos, req) || rename_in_expr(&mut e.y, pos, req)
        }
        Expr::Call(e) => rename_in_call(e, pos, req),
        Expr::Composite(e) => e.elts.iter_mut().any(|elt| rename_in_expr(elt, pos, req)),
        Expr::Index(e) => {
            rename_in_expr(&mut e.x, pos, req) || rename_in_expr(&mut e.index, pos, req)
        }
        Expr::KeyValue(e) => rename_in_expr(&mut e.value, pos, req),
        Expr::Paren(e) => rename_in_expr(&mut e.x, pos, req),
        Expr::Selector(e) => rename_in_expr(&mut e.x, pos, req),
        Expr::Slice(e) => {
            rename_in_expr(&mut e.x, pos, req)
                || e.low
                    .as_deref_mut()
                    .is_some_and(|low| rename_in_expr(low, pos, req))
                || e.high
                    .as_deref_mut()
                    .is_some_and(|high| rename_in_expr(high, pos, req))
        }
        Expr::Star(e) => rename_in_expr(&mut e.x, pos, req),
        Expr::TypeAssert(e) => rename_in_expr(&mut e.x, pos, req),
        Expr::Unary(e) => rename_in_expr(&mut e.x, pos, req),
        _ => false,
    }
}

#[cfg(test)]
mod locate_tests {
    use super::*;
    use rengo_emitter::print_file;
    use rengo_parser::parser::parse_file;

    fn apply(src: &str, needle: &str, from: &str, to: &str) -> (ScopeKind, String) {
        let mut file = parse_file(src).expect("parse");
        let offset = src.find(needle).expect("needle not in source");
        let req = RenameRequest::new(from, to);
        let scope = rename_declaration(&mut file, Pos::new(offset as u32), &req);
        (scope, print_file(&file))
    }

    #[test]
    fn renames_inner_shadowed_binding_only() {
        let src = "package p\n\nfunc f() {\n\tx := 1\n\t{\n\t\tx := 2\n\t\tuse(x)\n\t}\n\tuse(x)\n}\n";
        let (scope, out) = apply(src, "x := 2", "x", "y");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\tx := 1\n\t{\n\t\ty := 2\n\t\tuse(y)\n\t}\n\tuse(x)\n}\n"
        );
    }

    #[test]
    fn resolves_parameter_from_a_use_site() {
        let src = "package p\n\nfunc f(n int) int {\n\treturn n + 1\n}\n";
        let (scope, out) = apply(src, "n + 1", "n", "m");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(out, "package p\n\nfunc f(m int) int {\n\treturn m + 1\n}\n");
    }

    #[test]
    fn falls_back_to_package_scope_without_mutating() {
        let src = "package p\n\nvar count int\n\nfunc f() {\n\tcount++\n}\n";
        let (scope, out) = apply(src, "count++", "count", "total");
        assert_eq!(scope, ScopeKind::Package);
        assert_eq!(out, src);
    }

    #[test]
    fn renames_range_value_binding() {
        let src =
            "package p\n\nfunc f(xs []int) {\n\tfor i, v := range xs {\n\t\tuse(i, v)\n\t}\n}\n";
        let (scope, out) = apply(src, "v)", "v", "item");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(
            out,
            "package p\n\nfunc f(xs []int) {\n\tfor i, item := range xs {\n\t\tuse(i, item)\n\t}\n}\n"
        );
    }

    #[test]
    fn renames_type_switch_binding_in_every_case() {
        let src = "package p\n\nfunc f(v interface{}) {\n\tswitch t := v.(type) {\n\tcase int:\n\t\tuse(t)\n\tdefault:\n\t\tuse(t)\n\t}\n}\n";
        let (scope, out) = apply(src, "use(t)", "t", "got");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(
            out,
            "package p\n\nfunc f(v interface{}) {\n\tswitch got := v.(type) {\n\tcase int:\n\t\tuse(got)\n\tdefault:\n\t\tuse(got)\n\t}\n}\n"
        );
    }

    #[test]
    fn if_init_binding_covers_cond_and_both_branches() {
        let src = "package p\n\nfunc f() {\n\tif err := open(); err != nil {\n\t\tfail(err)\n\t} else {\n\t\tok(err)\n\t}\n}\n";
        let (scope, out) = apply(src, "err != nil", "err", "e");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\tif e := open(); e != nil {\n\t\tfail(e)\n\t} else {\n\t\tok(e)\n\t}\n}\n"
        );
    }

    #[test]
    fn renames_closure_local_without_touching_enclosing_scope() {
        let src = "package p\n\nfunc f() {\n\tn := 1\n\tg := func() {\n\t\tn := 2\n\t\tuse(n)\n\t}\n\tg()\n\tuse(n)\n}\n";
        let (scope, out) = apply(src, "n := 2", "n", "k");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\tn := 1\n\tg := func() {\n\t\tk := 2\n\t\tuse(k)\n\t}\n\tg()\n\tuse(n)\n}\n"
        );
    }

    #[test]
    fn later_shadow_cuts_off_rename_of_outer_binding() {
        let src = "package p\n\nfunc f() {\n\tx := 1\n\tuse(x)\n\tx := 2\n\tuse(x)\n}\n";
        let (scope, out) = apply(src, "x := 1", "x", "y");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\ty := 1\n\tuse(y)\n\tx := 2\n\tuse(x)\n}\n"
        );
    }

    #[test]
    fn define_right_hand_side_resolves_the_outer_binding() {
        let src = "package p\n\nfunc f() {\n\tx := 1\n\t{\n\t\tx := g(x)\n\t\tuse(x)\n\t}\n\tuse(x)\n}\n";
        let (scope, out) = apply(src, "x)", "x", "y");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\ty := 1\n\t{\n\t\tx := g(y)\n\t\tuse(x)\n\t}\n\tuse(y)\n}\n"
        );
    }

    #[test]
    fn header_init_right_hand_side_resolves_the_outer_binding() {
        let src = "package p\n\nfunc f() {\n\terr := setup()\n\tif err := wrap(err); err != nil {\n\t\tfail(err)\n\t}\n\tuse(err)\n}\n";
        let (scope, out) = apply(src, "err);", "err", "e");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\te := setup()\n\tif err := wrap(e); err != nil {\n\t\tfail(err)\n\t}\n\tuse(e)\n}\n"
        );
    }

    #[test]
    fn range_subject_resolves_the_outer_binding() {
        let src =
            "package p\n\nfunc f() {\n\txs := load()\n\tfor xs := range xs {\n\t\tuse(xs)\n\t}\n}\n";
        let (scope, out) = apply(src, "xs {", "xs", "items");
        assert_eq!(scope, ScopeKind::Function(0));
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\titems := load()\n\tfor xs := range items {\n\t\tuse(xs)\n\t}\n}\n"
        );
    }

    #[test]
    fn function_name_itself_is_not_a_local_binding() {
        let src = "package p\n\nfunc f() {\n\tf()\n}\n";
        let (scope, out) = apply(src, "f()", "f", "g");
        assert_eq!(scope, ScopeKind::Package);
        assert_eq!(out, src);
    }
}
