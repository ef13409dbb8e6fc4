use crate::parser::parse_file;
use crate::syntax::ast::*;
use rengo_common::Spanned;

fn parse(src: &str) -> File {
    parse_file(src).unwrap_or_else(|e| panic!("parse failed: {e}\nsource:\n{src}"))
}

#[test]
fn parses_package_clause_and_imports() {
    let file = parse("package main\n\nimport (\n\t\"fmt\"\n\tio \"io\"\n)\n");
    assert_eq!(file.package.name, "main");
    assert_eq!(file.decls.len(), 1);
    let Decl::Gen(decl) = &file.decls[0] else {
        panic!("expected gen decl");
    };
    assert_eq!(decl.keyword, DeclKeyword::Import);
    assert!(decl.grouped);
    let Spec::Import(first) = &decl.specs[0] else {
        panic!("expected import spec");
    };
    assert!(first.alias.is_none());
    let Spec::Import(second) = &decl.specs[1] else {
        panic!("expected import spec");
    };
    assert_eq!(second.alias.as_ref().unwrap().name, "io");
}

#[test]
fn parses_var_group_with_multiple_names() {
    let file = parse("package p\n\nvar (\n\ta, b int\n\tc = 1\n)\n");
    let Decl::Gen(decl) = &file.decls[0] else {
        panic!("expected gen decl");
    };
    let Spec::Value(spec) = &decl.specs[0] else {
        panic!("expected value spec");
    };
    assert_eq!(spec.names.len(), 2);
    assert!(spec.ty.is_some());
    assert!(spec.values.is_empty());
    let Spec::Value(spec) = &decl.specs[1] else {
        panic!("expected value spec");
    };
    assert_eq!(spec.names[0].name, "c");
    assert_eq!(spec.values.len(), 1);
}

#[test]
fn parses_method_with_receiver() {
    let file = parse("package p\n\nfunc (c *Counter) Add(n int) int {\n\treturn c.total + n\n}\n");
    let Decl::Func(decl) = &file.decls[0] else {
        panic!("expected func decl");
    };
    let recv = decl.recv.as_ref().unwrap();
    assert_eq!(recv.names[0].name, "c");
    assert_eq!(decl.name.name, "Add");
    assert_eq!(decl.func_type.params.len(), 1);
    assert_eq!(decl.func_type.results.len(), 1);
    let body = decl.body.as_ref().unwrap();
    assert_eq!(body.stmts.len(), 1);
}

#[test]
fn parses_short_declarations_and_shadowing_blocks() {
    let file = parse("package p\n\nfunc f() {\n\tx := 1\n\t{\n\t\tx := 2\n\t\t_ = x\n\t}\n}\n");
    let Decl::Func(decl) = &file.decls[0] else {
        panic!("expected func decl");
    };
    let body = decl.body.as_ref().unwrap();
    let Stmt::Assign(assign) = &body.stmts[0] else {
        panic!("expected assign");
    };
    assert!(assign.is_define());
    let Stmt::Block(inner) = &body.stmts[1] else {
        panic!("expected block");
    };
    assert_eq!(inner.stmts.len(), 2);
}

#[test]
fn parses_range_and_three_clause_for() {
    let file = parse(
        "package p\n\nfunc f(xs []int) {\n\tfor i, v := range xs {\n\t\t_ = i + v\n\t}\n\tfor i := 0; i < 10; i++ {\n\t}\n\tfor {\n\t\tbreak\n\t}\n}\n",
    );
    let Decl::Func(decl) = &file.decls[0] else {
        panic!("expected func decl");
    };
    let body = decl.body.as_ref().unwrap();
    let Stmt::Range(range) = &body.stmts[0] else {
        panic!("expected range");
    };
    assert!(range.define);
    assert!(range.key.is_some() && range.value.is_some());
    let Stmt::For(for_stmt) = &body.stmts[1] else {
        panic!("expected for");
    };
    assert!(for_stmt.init.is_some() && for_stmt.cond.is_some() && for_stmt.post.is_some());
    let Stmt::For(bare) = &body.stmts[2] else {
        panic!("expected for");
    };
    assert!(bare.init.is_none() && bare.cond.is_none() && bare.post.is_none());
}

#[test]
fn parses_switch_and_type_switch() {
    let file = parse(
        "package p\n\nfunc f(v interface{}) {\n\tswitch x := v.(type) {\n\tcase int:\n\t\t_ = x\n\tdefault:\n\t}\n\tswitch n := 1; n {\n\tcase 1, 2:\n\tdefault:\n\t}\n}\n",
    );
    let Decl::Func(decl) = &file.decls[0] else {
        panic!("expected func decl");
    };
    let body = decl.body.as_ref().unwrap();
    let Stmt::TypeSwitch(ts) = &body.stmts[0] else {
        panic!("expected type switch");
    };
    assert_eq!(ts.binding.as_ref().unwrap().name, "x");
    assert_eq!(ts.cases.len(), 2);
    let Stmt::Switch(sw) = &body.stmts[1] else {
        panic!("expected switch");
    };
    assert!(sw.init.is_some() && sw.tag.is_some());
    assert_eq!(sw.cases[0].exprs.len(), 2);
}

#[test]
fn parses_select_send_and_receive() {
    let file = parse(
        "package p\n\nfunc f(ch chan int) {\n\tselect {\n\tcase v := <-ch:\n\t\t_ = v\n\tcase ch <- 1:\n\tdefault:\n\t}\n}\n",
    );
    let Decl::Func(decl) = &file.decls[0] else {
        panic!("expected func decl");
    };
    let Stmt::Select(sel) = &decl.body.as_ref().unwrap().stmts[0] else {
        panic!("expected select");
    };
    assert_eq!(sel.clauses.len(), 3);
    assert!(matches!(sel.clauses[0].comm.as_deref(), Some(Stmt::Assign(_))));
    assert!(matches!(sel.clauses[1].comm.as_deref(), Some(Stmt::Send(_))));
    assert!(sel.clauses[2].comm.is_none());
}

#[test]
fn parses_composite_literals_and_types() {
    let file = parse(
        "package p\n\nvar m = map[string][]int{\n\t\"a\": {1, 2},\n}\n\ntype T struct {\n\tName string\n\tnext *T\n}\n",
    );
    let Decl::Gen(var_decl) = &file.decls[0] else {
        panic!("expected var");
    };
    let Spec::Value(spec) = &var_decl.specs[0] else {
        panic!("expected value spec");
    };
    let Expr::Composite(lit) = &spec.values[0] else {
        panic!("expected composite literal");
    };
    assert!(matches!(lit.ty.as_deref(), Some(Expr::MapType(_))));
    let Decl::Gen(type_decl) = &file.decls[1] else {
        panic!("expected type decl");
    };
    let Spec::Type(spec) = &type_decl.specs[0] else {
        panic!("expected type spec");
    };
    let Expr::StructType(st) = &spec.ty else {
        panic!("expected struct type");
    };
    assert_eq!(st.fields.len(), 2);
}

#[test]
fn no_composite_literal_in_if_header() {
    // `T{}` directly in the header would swallow the block.
    let file = parse("package p\n\nfunc f() {\n\tif x := (T{}); x != nil {\n\t\t_ = x\n\t}\n}\n");
    let Decl::Func(decl) = &file.decls[0] else {
        panic!("expected func decl");
    };
    let Stmt::If(if_stmt) = &decl.body.as_ref().unwrap().stmts[0] else {
        panic!("expected if");
    };
    assert!(if_stmt.init.is_some());
}

#[test]
fn parses_func_literals_go_and_defer() {
    let file = parse(
        "package p\n\nfunc f() {\n\tgo run(1)\n\tdefer close(ch)\n\tg := func(n int) int {\n\t\treturn n\n\t}\n\t_ = g\n}\n",
    );
    let Decl::Func(decl) = &file.decls[0] else {
        panic!("expected func decl");
    };
    let body = decl.body.as_ref().unwrap();
    assert!(matches!(body.stmts[0], Stmt::Go(_)));
    assert!(matches!(body.stmts[1], Stmt::Defer(_)));
    let Stmt::Assign(assign) = &body.stmts[2] else {
        panic!("expected assign");
    };
    assert!(matches!(assign.rhs[0], Expr::FuncLit(_)));
}

#[test]
fn spans_cover_declarations_in_source_order() {
    let src = "package p\n\nvar a int\n\nfunc f() {\n}\n";
    let file = parse(src);
    let first = file.decls[0].span();
    let second = file.decls[1].span();
    assert!(first.end < second.start);
    assert_eq!(&src[first.start.as_usize()..first.end.as_usize()], "var a int");
}

#[test]
fn reports_error_position() {
    let err = parse_file("package p\n\nvar = 3\n").unwrap_err();
    assert!(err.pos.as_usize() >= 11);
}

#[test]
fn labeled_statement_and_goto() {
    let file = parse("package p\n\nfunc f() {\nloop:\n\tfor {\n\t\tgoto loop\n\t}\n}\n");
    let Decl::Func(decl) = &file.decls[0] else {
        panic!("expected func decl");
    };
    let Stmt::Labeled(labeled) = &decl.body.as_ref().unwrap().stmts[0] else {
        panic!("expected labeled statement");
    };
    assert_eq!(labeled.label.name, "loop");
    assert!(matches!(*labeled.stmt, Stmt::For(_)));
}
