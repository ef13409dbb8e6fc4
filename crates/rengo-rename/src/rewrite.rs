//! Scope-bounded occurrence rewriting.
//!
//! The walker renames every identifier occurrence of a target name inside
//! a statement list, and stops at the point where a new declaration of the
//! same name takes over: a `:=` left-hand side, a declaration group, a
//! range binding, an init statement in an `if`/`for`/`switch` header, or a
//! signature name on a function literal. Occurrences past such a point
//! belong to a different binding and are left alone.

use rengo_parser::ast::*;

/// The rename being applied: every occurrence of `from` in scope becomes
/// `to`.
#[derive(Clone, Debug)]
pub struct RenameRequest {
    pub from: String,
    pub to: String,
}

impl RenameRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> RenameRequest {
        RenameRequest {
            from: from.into(),
            to: to.into(),
        }
    }

    pub(crate) fn apply(&self, ident: &mut Ident) {
        if ident.name == self.from {
            ident.name = self.to.clone();
        }
    }
}

/// Rewrite a statement list, honouring the shadow cutoff: once a statement
/// declares the target name itself, the rest of the list is out of scope.
pub fn rewrite_stmts(stmts: &mut [Stmt], req: &RenameRequest) {
    for stmt in stmts.iter_mut() {
        if rewrite_stmt(stmt, req) {
            break;
        }
    }
}

/// Rewrite one statement. Returns `true` when the statement introduces a
/// new binding of the target name that shadows the remainder of the
/// enclosing block.
pub fn rewrite_stmt(stmt: &mut Stmt, req: &RenameRequest) -> bool {
    match stmt {
        Stmt::Assign(assign) => {
            // Right-hand sides are evaluated before any new binding exists.
            for rhs in &mut assign.rhs {
                rewrite_expr(rhs, req);
            }
            if assign.is_define() {
                assign
                    .lhs
                    .iter()
                    .any(|lhs| matches!(lhs.as_ident(), Some(id) if id.name == req.from))
            } else {
                for lhs in &mut assign.lhs {
                    rewrite_expr(lhs, req);
                }
                false
            }
        }
        Stmt::Block(block) => {
            // A nested block confines its own shadows.
            rewrite_stmts(&mut block.stmts, req);
            false
        }
        Stmt::Branch(_) | Stmt::Empty(_) => false,
        Stmt::Decl(decl) => {
            for spec in &mut decl.specs {
                if let Spec::Type(type_spec) = spec {
                    // A redeclared type may refer to itself; leave it whole.
                    if type_spec.name.name == req.from {
                        return true;
                    }
                }
                rewrite_spec(spec, req);
                if let Spec::Value(value_spec) = spec {
                    if value_spec.names.iter().any(|n| n.name == req.from) {
                        return true;
                    }
                }
            }
            false
        }
        Stmt::Defer(defer) => {
            rewrite_call(&mut defer.call, req);
            false
        }
        Stmt::Expr(expr_stmt) => {
            rewrite_expr(&mut expr_stmt.expr, req);
            false
        }
        Stmt::For(for_stmt) => {
            if let Some(init) = for_stmt.init.as_deref_mut() {
                // An init that declares the target owns the whole construct.
                if rewrite_stmt(init, req) {
                    return false;
                }
            }
            if let Some(cond) = for_stmt.cond.as_mut() {
                rewrite_expr(cond, req);
            }
            if let Some(post) = for_stmt.post.as_deref_mut() {
                rewrite_stmt(post, req);
            }
            rewrite_stmts(&mut for_stmt.body.stmts, req);
            false
        }
        Stmt::Go(go) => {
            rewrite_call(&mut go.call, req);
            false
        }
        Stmt::If(if_stmt) => {
            if let Some(init) = if_stmt.init.as_deref_mut() {
                if rewrite_stmt(init, req) {
                    return false;
                }
            }
            rewrite_expr(&mut if_stmt.cond, req);
            rewrite_stmts(&mut if_stmt.then_branch.stmts, req);
            if let Some(else_branch) = if_stmt.else_branch.as_deref_mut() {
                rewrite_stmt(else_branch, req);
            }
            false
        }
        Stmt::IncDec(incdec) => {
            rewrite_expr(&mut incdec.expr, req);
            false
        }
        Stmt::Labeled(labeled) => rewrite_stmt(&mut labeled.stmt, req),
        Stmt::Range(range) => {
            rewrite_expr(&mut range.subject, req);
            let binds_target = range.define
                && (ident_is(&range.key, &req.from) || ident_is(&range.value, &req.from));
            if binds_target {
                return false;
            }
            if !range.define {
                if let Some(key) = range.key.as_mut() {
                    rewrite_expr(key, req);
                }
                if let Some(value) = range.value.as_mut() {
                    rewrite_expr(value, req);
                }
            }
            rewrite_stmts(&mut range.body.stmts, req);
            false
        }
        Stmt::Return(ret) => {
            for result in &mut ret.results {
                rewrite_expr(result, req);
            }
            false
        }
        Stmt::Select(select) => {
            for clause in &mut select.clauses {
                if let Some(comm) = clause.comm.as_deref_mut() {
                    // `case v := <-ch:` scopes v to this clause only.
                    if rewrite_stmt(comm, req) {
                        continue;
                    }
                }
                rewrite_stmts(&mut clause.body, req);
            }
            false
        }
        Stmt::Send(send) => {
            rewrite_expr(&mut send.chan, req);
            rewrite_expr(&mut send.value, req);
            false
        }
        Stmt::Switch(switch) => {
            if let Some(init) = switch.init.as_deref_mut() {
                if rewrite_stmt(init, req) {
                    return false;
                }
            }
            if let Some(tag) = switch.tag.as_mut() {
                rewrite_expr(tag, req);
            }
            rewrite_cases(&mut switch.cases, req);
            false
        }
        Stmt::TypeSwitch(switch) => {
            if let Some(init) = switch.init.as_deref_mut() {
                if rewrite_stmt(init, req) {
                    return false;
                }
            }
            rewrite_expr(&mut switch.subject, req);
            if switch.binding.as_ref().is_some_and(|b| b.name == req.from) {
                return false;
            }
            rewrite_cases(&mut switch.cases, req);
            false
        }
    }
}

pub(crate) fn rewrite_cases(cases: &mut [CaseClause], req: &RenameRequest) {
    for case in cases {
        for expr in &mut case.exprs {
            rewrite_expr(expr, req);
        }
        rewrite_stmts(&mut case.body, req);
    }
}

pub(crate) fn rewrite_spec(spec: &mut Spec, req: &RenameRequest) {
    match spec {
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

fn rewrite_call(call: &mut CallExpr, req: &RenameRequest) {
    rewrite_expr(&mut call.fun, req);
    for arg in &mut call.args {
        rewrite_expr(arg, req);
    }
}

/// Rewrite every occurrence inside one expression.
pub fn rewrite_expr(expr: &mut Expr, req: &RenameRequest) {
    match expr {
        Expr::ArrayType(e) => {
            if let Some(len) = e.len.as_deref_mut() {
                rewrite_expr(len, req);
            }
            rewrite_expr(&mut e.elt, req);
        }
        Expr::Binary(e) => {
            rewrite_expr(&mut e.x, req);
            rewrite_expr(&mut e.y, req);
        }
        Expr::Call(e) => rewrite_call(e, req),
        Expr::ChanType(e) => rewrite_expr(&mut e.value, req),
        Expr::Composite(e) => {
            if let Some(ty) = e.ty.as_deref_mut() {
                rewrite_expr(ty, req);
            }
            for elt in &mut e.elts {
                rewrite_expr(elt, req);
            }
        }
        Expr::Ellipsis(e) => {
            if let Some(elt) = e.elt.as_deref_mut() {
                rewrite_expr(elt, req);
            }
        }
        Expr::FuncLit(lit) => {
            rewrite_fields(&mut lit.func_type.params, req);
            rewrite_fields(&mut lit.func_type.results, req);
            // A signature name that matches shadows the target for the
            // whole literal body.
            let shadowed = fields_bind(&lit.func_type.params, &req.from)
                || fields_bind(&lit.func_type.results, &req.from);
            if !shadowed {
                rewrite_stmts(&mut lit.body.stmts, req);
            }
        }
        Expr::FuncType(func_type) => {
            rewrite_fields(&mut func_type.params, req);
            rewrite_fields(&mut func_type.results, req);
        }
        Expr::Ident(ident) => req.apply(ident),
        Expr::Index(e) => {
            rewrite_expr(&mut e.x, req);
            rewrite_expr(&mut e.index, req);
        }
        Expr::InterfaceType(e) => rewrite_fields(&mut e.methods, req),
        Expr::KeyValue(e) => {
            rewrite_expr(&mut e.key, req);
            rewrite_expr(&mut e.value, req);
        }
        Expr::Lit(_) => {}
        Expr::MapType(e) => {
            rewrite_expr(&mut e.key, req);
            rewrite_expr(&mut e.value, req);
        }
        Expr::Paren(e) => rewrite_expr(&mut e.x, req),
        Expr::Selector(e) => {
            // Only the base: member names are not rename targets.
            rewrite_expr(&mut e.x, req);
        }
        Expr::Slice(e) => {
            rewrite_expr(&mut e.x, req);
            if let Some(low) = e.low.as_deref_mut() {
                rewrite_expr(low, req);
            }
            if let Some(high) = e.high.as_deref_mut() {
                rewrite_expr(high, req);
            }
        }
        Expr::Star(e) => rewrite_expr(&mut e.x, req),
        Expr::StructType(e) => rewrite_fields(&mut e.fields, req),
        Expr::TypeAssert(e) => {
            rewrite_expr(&mut e.x, req);
            if let Some(ty) = e.ty.as_deref_mut() {
                rewrite_expr(ty, req);
            }
        }
        Expr::Unary(e) => rewrite_expr(&mut e.x, req),
    }
}

/// Rewrite field type expressions. Field names are declarations, not uses.
pub fn rewrite_fields(fields: &mut [Field], req: &RenameRequest) {
    for field in fields {
        rewrite_expr(&mut field.ty, req);
    }
}

pub(crate) fn fields_bind(fields: &[Field], name: &str) -> bool {
    fields
        .iter()
        .any(|field| field.names.iter().any(|n| n.name == name))
}

fn ident_is(expr: &Option<Expr>, name: &str) -> bool {
    expr.as_ref()
        .and_then(Expr::as_ident)
        .is_some_and(|ident| ident.name == name)
}

#[cfg(test)]
mod rewrite_tests {
    use super::*;
    use rengo_emitter::print_file;
    use rengo_parser::parser::parse_file;

    fn rewritten(src: &str, from: &str, to: &str) -> String {
        let mut file = parse_file(src).expect("parse");
        let req = RenameRequest::new(from, to);
        for decl in &mut file.decls {
            if let Decl::Func(decl) = decl {
                if let Some(body) = decl.body.as_mut() {
                    rewrite_stmts(&mut body.stmts, &req);
                }
            }
        }
        print_file(&file)
    }

    #[test]
    fn stops_at_shadowing_short_declaration() {
        let out = rewritten(
            "package p\n\nfunc f() {\n\tx = 1\n\tx := 2\n\tx = 3\n}\n",
            "x",
            "y",
        );
        assert_eq!(out, "package p\n\nfunc f() {\n\ty = 1\n\tx := 2\n\tx = 3\n}\n");
    }

    #[test]
    fn define_right_hand_side_still_sees_outer_binding() {
        let out = rewritten(
            "package p\n\nfunc f() {\n\tx := g(x)\n\tuse(x)\n}\n",
            "x",
            "y",
        );
        assert_eq!(out, "package p\n\nfunc f() {\n\tx := g(y)\n\tuse(x)\n}\n");
    }

    #[test]
    fn header_init_declaration_owns_whole_construct() {
        let out = rewritten(
            "package p\n\nfunc f() {\n\tx = 0\n\tif x := 1; x > 0 {\n\t\tx = 2\n\t}\n\tx = 3\n}\n",
            "x",
            "y",
        );
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\ty = 0\n\tif x := 1; x > 0 {\n\t\tx = 2\n\t}\n\ty = 3\n}\n"
        );
    }

    #[test]
    fn nested_block_shadow_does_not_escape() {
        let out = rewritten(
            "package p\n\nfunc f() {\n\tx = 1\n\t{\n\t\tx := 2\n\t\tx = 3\n\t}\n\tx = 4\n}\n",
            "x",
            "y",
        );
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\ty = 1\n\t{\n\t\tx := 2\n\t\tx = 3\n\t}\n\ty = 4\n}\n"
        );
    }

    #[test]
    fn select_comm_binding_scopes_to_its_clause() {
        let out = rewritten(
            "package p\n\nfunc f(ch chan int) {\n\tv = 1\n\tselect {\n\tcase v := <-ch:\n\t\tv = 2\n\tdefault:\n\t\tv = 3\n\t}\n}\n",
            "v",
            "w",
        );
        assert_eq!(
            out,
            "package p\n\nfunc f(ch chan int) {\n\tw = 1\n\tselect {\n\tcase v := <-ch:\n\t\tv = 2\n\tdefault:\n\t\tw = 3\n\t}\n}\n"
        );
    }

    #[test]
    fn selector_base_renamed_member_kept() {
        let out = rewritten("package p\n\nfunc f() {\n\tx.x = x\n}\n", "x", "y");
        assert_eq!(out, "package p\n\nfunc f() {\n\ty.x = y\n}\n");
    }

    #[test]
    fn composite_literal_keys_are_use_sites() {
        let out = rewritten(
            "package p\n\nfunc f() {\n\tuse(map[int]string{mode: \"on\"})\n\tuse(t{mode: mode})\n}\n",
            "mode",
            "level",
        );
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\tuse(map[int]string{level: \"on\"})\n\tuse(t{level: level})\n}\n"
        );
    }

    #[test]
    fn func_literal_parameter_shadows_its_body() {
        let out = rewritten(
            "package p\n\nfunc f() {\n\ta = func(x int) int {\n\t\treturn x\n\t}\n\tb = func(n int) int {\n\t\treturn x\n\t}\n}\n",
            "x",
            "y",
        );
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\ta = func(x int) int {\n\t\treturn x\n\t}\n\tb = func(n int) int {\n\t\treturn y\n\t}\n}\n"
        );
    }

    #[test]
    fn range_binding_shadows_body_but_not_subject() {
        let out = rewritten(
            "package p\n\nfunc f() {\n\tfor x := range x {\n\t\tuse(x)\n\t}\n\tuse(x)\n}\n",
            "x",
            "y",
        );
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\tfor x := range y {\n\t\tuse(x)\n\t}\n\tuse(y)\n}\n"
        );
    }

    #[test]
    fn local_declaration_group_cuts_off_following_statements() {
        let out = rewritten(
            "package p\n\nfunc f() {\n\tuse(x)\n\tvar x = x\n\tuse(x)\n}\n",
            "x",
            "y",
        );
        assert_eq!(
            out,
            "package p\n\nfunc f() {\n\tuse(y)\n\tvar x = y\n\tuse(x)\n}\n"
        );
    }

    #[test]
    fn type_switch_binding_shadows_cases() {
        let out = rewritten(
            "package p\n\nfunc f(v interface{}) {\n\tuse(t)\n\tswitch t := v.(type) {\n\tcase int:\n\t\tuse(t)\n\t}\n\tuse(t)\n}\n",
            "t",
            "u",
        );
        assert_eq!(
            out,
            "package p\n\nfunc f(v interface{}) {\n\tuse(u)\n\tswitch t := v.(type) {\n\tcase int:\n\t\tuse(t)\n\t}\n\tuse(u)\n}\n"
        );
    }
}
