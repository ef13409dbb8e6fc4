//! Source printer for the rengo rename engine.
//!
//! Regenerates source text from a (possibly mutated) syntax tree. The
//! printer is the structural inverse of the parser: it renders exactly the
//! shapes the parser produces, so `parse -> print -> parse` is total on
//! well-formed input. Output follows the canonical formatting of the
//! source language: tab indentation, one statement per line, grouped specs
//! in parenthesised blocks.

use rengo_parser::ast::*;

/// Print a whole file back to source text.
pub fn print_file(file: &File) -> String {
    let mut printer = Printer::new();
    printer.file(file);
    printer.out
}

struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn new() -> Printer {
        Printer {
            out: String::new(),
            indent: 0,
        }
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
    }

    fn tabs(&mut self) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    // ---- declarations ----

    fn file(&mut self, file: &File) {
        self.write("package ");
        self.write(&file.package.name);
        self.newline();
        for decl in &file.decls {
            self.newline();
            match decl {
                Decl::Gen(decl) => self.gen_decl(decl),
                Decl::Func(decl) => self.func_decl(decl),
            }
            self.newline();
        }
    }

    fn gen_decl(&mut self, decl: &GenDecl) {
        self.write(decl.keyword.as_str());
        if decl.grouped {
            self.write(" (");
            self.newline();
            self.indent += 1;
            for spec in &decl.specs {
                self.tabs();
                self.spec(spec);
                self.newline();
            }
            self.indent -= 1;
            self.tabs();
            self.write(")");
        } else if let Some(spec) = decl.specs.first() {
            self.write(" ");
            self.spec(spec);
        }
    }

    fn spec(&mut self, spec: &Spec) {
        match spec {
            Spec::Import(spec) => {
                if let Some(alias) = &spec.alias {
                    self.write(&alias.name);
                    self.write(" ");
                }
                self.write(&spec.path.value);
            }
            Spec::Type(spec) => {
                self.write(&spec.name.name);
                self.write(" ");
                self.expr(&spec.ty);
            }
            Spec::Value(spec) => {
                self.ident_list(&spec.names);
                if let Some(ty) = &spec.ty {
                    self.write(" ");
                    self.expr(ty);
                }
                if !spec.values.is_empty() {
                    self.write(" = ");
                    self.expr_list(&spec.values);
                }
            }
        }
    }

    fn func_decl(&mut self, decl: &FuncDecl) {
        self.write("func ");
        if let Some(recv) = &decl.recv {
            self.write("(");
            self.field(recv);
            self.write(") ");
        }
        self.write(&decl.name.name);
        self.signature(&decl.func_type);
        if let Some(body) = &decl.body {
            self.write(" ");
            self.block(body);
        }
    }

    fn signature(&mut self, func_type: &FuncType) {
        self.write("(");
        self.fields(&func_type.params);
        self.write(")");
        match func_type.results.as_slice() {
            [] => {}
            [single] if single.names.is_empty() => {
                self.write(" ");
                self.expr(&single.ty);
            }
            results => {
                self.write(" (");
                self.fields(results);
                self.write(")");
            }
        }
    }

    fn fields(&mut self, fields: &[Field]) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.field(field);
        }
    }

    fn field(&mut self, field: &Field) {
        if !field.names.is_empty() {
            self.ident_list(&field.names);
            self.write(" ");
        }
        self.expr(&field.ty);
    }

    fn ident_list(&mut self, idents: &[Ident]) {
        for (i, ident) in idents.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&ident.name);
        }
    }

    // ---- statements ----

    fn block(&mut self, block: &Block) {
        self.write("{");
        self.newline();
        self.indent += 1;
        self.stmt_list(&block.stmts);
        self.indent -= 1;
        self.tabs();
        self.write("}");
    }

    fn stmt_list(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            if matches!(stmt, Stmt::Empty(_)) {
                continue;
            }
            self.tabs();
            self.stmt(stmt);
            self.newline();
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(s) => self.assign_stmt(s),
            Stmt::Block(block) => self.block(block),
            Stmt::Branch(s) => {
                self.write(s.kind.as_str());
                if let Some(label) = &s.label {
                    self.write(" ");
                    self.write(&label.name);
                }
            }
            Stmt::Decl(decl) => self.gen_decl(decl),
            Stmt::Defer(s) => {
                self.write("defer ");
                self.call(&s.call);
            }
            Stmt::Empty(_) => {}
            Stmt::Expr(s) => self.expr(&s.expr),
            Stmt::For(s) => self.for_stmt(s),
            Stmt::Go(s) => {
                self.write("go ");
                self.call(&s.call);
            }
            Stmt::If(s) => self.if_stmt(s),
            Stmt::IncDec(s) => {
                self.expr(&s.expr);
                self.write(if s.inc { "++" } else { "--" });
            }
            Stmt::Labeled(s) => {
                self.write(&s.label.name);
                self.write(":");
                if !matches!(*s.stmt, Stmt::Empty(_)) {
                    self.newline();
                    self.tabs();
                    self.stmt(&s.stmt);
                }
            }
            Stmt::Range(s) => self.range_stmt(s),
            Stmt::Return(s) => {
                self.write("return");
                if !s.results.is_empty() {
                    self.write(" ");
                    self.expr_list(&s.results);
                }
            }
            Stmt::Select(s) => self.select_stmt(s),
            Stmt::Send(s) => {
                self.expr(&s.chan);
                self.write(" <- ");
                self.expr(&s.value);
            }
            Stmt::Switch(s) => self.switch_stmt(s),
            Stmt::TypeSwitch(s) => self.type_switch_stmt(s),
        }
    }

    fn assign_stmt(&mut self, stmt: &AssignStmt) {
        self.expr_list(&stmt.lhs);
        self.write(" ");
        self.write(stmt.op.as_str());
        self.write(" ");
        self.expr_list(&stmt.rhs);
    }

    fn if_stmt(&mut self, stmt: &IfStmt) {
        self.write("if ");
        if let Some(init) = &stmt.init {
            self.stmt(init);
            self.write("; ");
        }
        self.expr(&stmt.cond);
        self.write(" ");
        self.block(&stmt.then_branch);
        if let Some(else_branch) = &stmt.else_branch {
            self.write(" else ");
            match else_branch.as_ref() {
                Stmt::If(nested) => self.if_stmt(nested),
                Stmt::Block(block) => self.block(block),
                other => self.stmt(other),
            }
        }
    }

    fn for_stmt(&mut self, stmt: &ForStmt) {
        self.write("for ");
        match (&stmt.init, &stmt.cond, &stmt.post) {
            (None, None, None) => {}
            (None, Some(cond), None) => {
                self.expr(cond);
                self.write(" ");
            }
            (init, cond, post) => {
                if let Some(init) = init {
                    self.stmt(init);
                }
                self.write("; ");
                if let Some(cond) = cond {
                    self.expr(cond);
                }
                self.write("; ");
                if let Some(post) = post {
                    self.stmt(post);
                }
                self.write(" ");
            }
        }
        self.block(&stmt.body);
    }

    fn range_stmt(&mut self, stmt: &RangeStmt) {
        self.write("for ");
        if let Some(key) = &stmt.key {
            self.expr(key);
            if let Some(value) = &stmt.value {
                self.write(", ");
                self.expr(value);
            }
            self.write(if stmt.define { " := " } else { " = " });
        }
        self.write("range ");
        self.expr(&stmt.subject);
        self.write(" ");
        self.block(&stmt.body);
    }

    fn switch_stmt(&mut self, stmt: &SwitchStmt) {
        self.write("switch ");
        if let Some(init) = &stmt.init {
            self.stmt(init);
            self.write("; ");
        }
        if let Some(tag) = &stmt.tag {
            self.expr(tag);
            self.write(" ");
        }
        self.case_clauses(&stmt.cases);
    }

    fn type_switch_stmt(&mut self, stmt: &TypeSwitchStmt) {
        self.write("switch ");
        if let Some(init) = &stmt.init {
            self.stmt(init);
            self.write("; ");
        }
        if let Some(binding) = &stmt.binding {
            self.write(&binding.name);
            self.write(" := ");
        }
        self.expr(&stmt.subject);
        self.write(".(type) ");
        self.case_clauses(&stmt.cases);
    }

    fn case_clauses(&mut self, cases: &[CaseClause]) {
        self.write("{");
        self.newline();
        for case in cases {
            self.tabs();
            if case.exprs.is_empty() {
                self.write("default:");
            } else {
                self.write("case ");
                self.expr_list(&case.exprs);
                self.write(":");
            }
            self.newline();
            self.indent += 1;
            self.stmt_list(&case.body);
            self.indent -= 1;
        }
        self.tabs();
        self.write("}");
    }

    fn select_stmt(&mut self, stmt: &SelectStmt) {
        self.write("select {");
        self.newline();
        for clause in &stmt.clauses {
            self.tabs();
            match &clause.comm {
                Some(comm) => {
                    self.write("case ");
                    self.stmt(comm);
                    self.write(":");
                }
                None => self.write("default:"),
            }
            self.newline();
            self.indent += 1;
            self.stmt_list(&clause.body);
            self.indent -= 1;
        }
        self.tabs();
        self.write("}");
    }

    // ---- expressions ----

    fn expr_list(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr(expr);
        }
    }

    fn call(&mut self, call: &CallExpr) {
        self.expr(&call.fun);
        self.write("(");
        self.expr_list(&call.args);
        if call.ellipsis {
            self.write("...");
        }
        self.write(")");
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::ArrayType(e) => {
                self.write("[");
                if let Some(len) = &e.len {
                    self.expr(len);
                }
                self.write("]");
                self.expr(&e.elt);
            }
            Expr::Binary(e) => {
                self.expr(&e.x);
                self.write(" ");
                self.write(e.op.as_str());
                self.write(" ");
                self.expr(&e.y);
            }
            Expr::Call(e) => self.call(e),
            Expr::ChanType(e) => {
                match e.dir {
                    ChanDir::Both => self.write("chan "),
                    ChanDir::SendOnly => self.write("chan<- "),
                    ChanDir::RecvOnly => self.write("<-chan "),
                }
                self.expr(&e.value);
            }
            Expr::Composite(e) => {
                if let Some(ty) = &e.ty {
                    self.expr(ty);
                }
                self.write("{");
                self.expr_list(&e.elts);
                self.write("}");
            }
            Expr::Ellipsis(e) => {
                self.write("...");
                if let Some(elt) = &e.elt {
                    self.expr(elt);
                }
            }
            Expr::FuncLit(e) => {
                self.write("func");
                self.signature(&e.func_type);
                self.write(" ");
                self.block(&e.body);
            }
            Expr::FuncType(e) => {
                self.write("func");
                self.signature(e);
            }
            Expr::Ident(ident) => self.write(&ident.name),
            Expr::Index(e) => {
                self.expr(&e.x);
                self.write("[");
                self.expr(&e.index);
                self.write("]");
            }
            Expr::InterfaceType(e) => self.interface_type(e),
            Expr::KeyValue(e) => {
                self.expr(&e.key);
                self.write(": ");
                self.expr(&e.value);
            }
            Expr::Lit(lit) => self.write(&lit.value),
            Expr::MapType(e) => {
                self.write("map[");
                self.expr(&e.key);
                self.write("]");
                self.expr(&e.value);
            }
            Expr::Paren(e) => {
                self.write("(");
                self.expr(&e.x);
                self.write(")");
            }
            Expr::Selector(e) => {
                self.expr(&e.x);
                self.write(".");
                self.write(&e.sel.name);
            }
            Expr::Slice(e) => {
                self.expr(&e.x);
                self.write("[");
                if let Some(low) = &e.low {
                    self.expr(low);
                }
                self.write(":");
                if let Some(high) = &e.high {
                    self.expr(high);
                }
                self.write("]");
            }
            Expr::Star(e) => {
                self.write("*");
                self.expr(&e.x);
            }
            Expr::StructType(e) => self.struct_type(e),
            Expr::TypeAssert(e) => {
                self.expr(&e.x);
                self.write(".(");
                match &e.ty {
                    Some(ty) => self.expr(ty),
                    None => self.write("type"),
                }
                self.write(")");
            }
            Expr::Unary(e) => {
                self.write(e.op.as_str());
                self.expr(&e.x);
            }
        }
    }

    fn struct_type(&mut self, st: &StructType) {
        if st.fields.is_empty() {
            self.write("struct{}");
            return;
        }
        self.write("struct {");
        self.newline();
        self.indent += 1;
        for field in &st.fields {
            self.tabs();
            self.field(field);
            self.newline();
        }
        self.indent -= 1;
        self.tabs();
        self.write("}");
    }

    fn interface_type(&mut self, it: &InterfaceType) {
        if it.methods.is_empty() {
            self.write("interface{}");
            return;
        }
        self.write("interface {");
        self.newline();
        self.indent += 1;
        for method in &it.methods {
            self.tabs();
            match (method.names.first(), &method.ty) {
                (Some(name), Expr::FuncType(sig)) => {
                    self.write(&name.name);
                    self.signature(sig);
                }
                _ => self.field(method),
            }
            self.newline();
        }
        self.indent -= 1;
        self.tabs();
        self.write("}");
    }
}
