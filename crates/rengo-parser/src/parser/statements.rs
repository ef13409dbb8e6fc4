//! Statement parsing.

use super::expressions::assign_op;
use super::{ParseError, Parser};
use crate::syntax::ast::*;
use rengo_common::{Pos, Spanned};
use rengo_scanner::TokenKind;

/// What a for-loop header turned out to be.
pub(crate) enum ForHeader {
    Simple(Stmt),
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        subject: Expr,
    },
}

impl Parser {
    /// A braced statement list. Composite literals are always legal again
    /// inside the braces, whatever the surrounding header context was.
    pub(crate) fn block(&mut self) -> Result<Block, ParseError> {
        let start = self.here();
        self.expect(TokenKind::LBrace)?;
        let stmts = self.with_composites(|p| {
            let mut stmts = Vec::new();
            while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
                stmts.push(p.stmt()?);
                p.expect_semi()?;
            }
            Ok(stmts)
        })?;
        self.expect(TokenKind::RBrace)?;
        Ok(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    pub(crate) fn stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.kind() {
            TokenKind::Var => Ok(Stmt::Decl(self.gen_decl(DeclKeyword::Var)?)),
            TokenKind::Const => Ok(Stmt::Decl(self.gen_decl(DeclKeyword::Const)?)),
            TokenKind::Type => Ok(Stmt::Decl(self.gen_decl(DeclKeyword::Type)?)),
            TokenKind::LBrace => Ok(Stmt::Block(self.block()?)),
            TokenKind::If => self.if_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Switch => self.switch_stmt(),
            TokenKind::Select => self.select_stmt(),
            TokenKind::Return => self.return_stmt(),
            TokenKind::Go => {
                let start = self.here();
                self.bump();
                let call = self.call_expr("go")?;
                Ok(Stmt::Go(GoStmt {
                    call,
                    span: self.span_from(start),
                }))
            }
            TokenKind::Defer => {
                let start = self.here();
                self.bump();
                let call = self.call_expr("defer")?;
                Ok(Stmt::Defer(DeferStmt {
                    call,
                    span: self.span_from(start),
                }))
            }
            TokenKind::Break => self.branch_stmt(BranchKind::Break),
            TokenKind::Continue => self.branch_stmt(BranchKind::Continue),
            TokenKind::Goto => self.branch_stmt(BranchKind::Goto),
            TokenKind::Fallthrough => self.branch_stmt(BranchKind::Fallthrough),
            TokenKind::Semicolon => Ok(Stmt::Empty(self.current().span)),
            TokenKind::Ident if self.peek_kind(1) == TokenKind::Colon => self.labeled_stmt(),
            _ => self.simple_stmt(),
        }
    }

    fn branch_stmt(&mut self, kind: BranchKind) -> Result<Stmt, ParseError> {
        let start = self.here();
        self.bump();
        let label = if kind != BranchKind::Fallthrough && self.at(TokenKind::Ident) {
            Some(self.ident()?)
        } else {
            None
        };
        Ok(Stmt::Branch(BranchStmt {
            kind,
            label,
            span: self.span_from(start),
        }))
    }

    fn labeled_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.here();
        let label = self.ident()?;
        self.expect(TokenKind::Colon)?;
        let stmt = if self.at(TokenKind::RBrace) || self.at(TokenKind::Semicolon) {
            Stmt::Empty(self.current().span)
        } else {
            self.stmt()?
        };
        Ok(Stmt::Labeled(LabeledStmt {
            label,
            stmt: Box::new(stmt),
            span: self.span_from(start),
        }))
    }

    fn return_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.here();
        self.expect(TokenKind::Return)?;
        let results = if self.at(TokenKind::Semicolon) || self.at(TokenKind::RBrace) {
            Vec::new()
        } else {
            self.expr_list()?
        };
        Ok(Stmt::Return(ReturnStmt {
            results,
            span: self.span_from(start),
        }))
    }

    /// The expression of a `go`/`defer` statement, which must be a call.
    fn call_expr(&mut self, context: &str) -> Result<CallExpr, ParseError> {
        let expr = self.expr()?;
        match expr {
            Expr::Call(call) => Ok(call),
            other => Err(ParseError::new(
                format!("expression in {context} must be a function call"),
                other.span().start,
            )),
        }
    }

    /// A simple statement: assignment, short declaration, send, inc/dec or
    /// a bare expression.
    pub(crate) fn simple_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.for_header_stmt(false)? {
            ForHeader::Simple(stmt) => Ok(stmt),
            ForHeader::Range { .. } => unreachable!("range outside for-loop header"),
        }
    }

    /// A simple statement that may also be a `range` clause when
    /// `allow_range` is set (inside a `for` header).
    fn for_header_stmt(&mut self, allow_range: bool) -> Result<ForHeader, ParseError> {
        let start = self.here();
        let lhs = self.expr_list()?;

        if let Some(op) = assign_op(self.kind()) {
            self.bump();
            if allow_range && self.at(TokenKind::Range) {
                return self.range_clause(lhs, op, start);
            }
            let rhs = self.expr_list()?;
            if op == AssignOp::Define {
                for expr in &lhs {
                    if expr.as_ident().is_none() {
                        return Err(ParseError::new(
                            "left side of := must be an identifier",
                            expr.span().start,
                        ));
                    }
                }
            }
            return Ok(ForHeader::Simple(Stmt::Assign(AssignStmt {
                lhs,
                op,
                rhs,
                span: self.span_from(start),
            })));
        }

        let mut lhs = lhs;
        if lhs.len() != 1 {
            return Err(ParseError::new("expected assignment", self.here()));
        }
        let expr = lhs.remove(0);

        match self.kind() {
            TokenKind::Arrow => {
                self.bump();
                let value = self.expr()?;
                Ok(ForHeader::Simple(Stmt::Send(SendStmt {
                    chan: expr,
                    value,
                    span: self.span_from(start),
                })))
            }
            TokenKind::Inc | TokenKind::Dec => {
                let inc = self.kind() == TokenKind::Inc;
                self.bump();
                Ok(ForHeader::Simple(Stmt::IncDec(IncDecStmt {
                    expr,
                    inc,
                    span: self.span_from(start),
                })))
            }
            _ => Ok(ForHeader::Simple(Stmt::Expr(ExprStmt {
                span: self.span_from(start),
                expr,
            }))),
        }
    }

    fn range_clause(
        &mut self,
        lhs: Vec<Expr>,
        op: AssignOp,
        start: Pos,
    ) -> Result<ForHeader, ParseError> {
        if lhs.len() > 2 {
            return Err(ParseError::new(
                "at most two bindings in a range clause",
                start,
            ));
        }
        if !matches!(op, AssignOp::Define | AssignOp::Assign) {
            return Err(ParseError::new("invalid operator in range clause", start));
        }
        self.expect(TokenKind::Range)?;
        let subject = self.expr()?;
        let mut iter = lhs.into_iter();
        Ok(ForHeader::Range {
            key: iter.next(),
            value: iter.next(),
            define: op == AssignOp::Define,
            subject,
        })
    }

    fn if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.here();
        self.expect(TokenKind::If)?;
        let (init, cond) = self.without_composites(|p| {
            let header = p.simple_stmt()?;
            if p.at(TokenKind::Semicolon) {
                p.bump();
                let cond = p.expr()?;
                Ok((Some(Box::new(header)), cond))
            } else {
                match header {
                    Stmt::Expr(expr_stmt) => Ok((None, expr_stmt.expr)),
                    other => Err(ParseError::new(
                        "missing condition in if statement",
                        other.span().start,
                    )),
                }
            }
        })?;
        let then_branch = self.block()?;
        let else_branch = if self.eat(TokenKind::Else) {
            if self.at(TokenKind::If) {
                Some(Box::new(self.if_stmt()?))
            } else {
                Some(Box::new(Stmt::Block(self.block()?)))
            }
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            init,
            cond,
            then_branch,
            else_branch,
            span: self.span_from(start),
        }))
    }

    fn for_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.here();
        self.expect(TokenKind::For)?;

        if self.at(TokenKind::LBrace) {
            let body = self.block()?;
            return Ok(Stmt::For(ForStmt {
                init: None,
                cond: None,
                post: None,
                body,
                span: self.span_from(start),
            }));
        }

        // `for range subject { ... }` with no bindings at all.
        if self.at(TokenKind::Range) {
            self.bump();
            let subject = self.without_composites(|p| p.expr())?;
            let body = self.block()?;
            return Ok(Stmt::Range(RangeStmt {
                key: None,
                value: None,
                define: false,
                subject,
                body,
                span: self.span_from(start),
            }));
        }

        let header = self.without_composites(|p| p.for_header_stmt(true))?;
        match header {
            ForHeader::Range {
                key,
                value,
                define,
                subject,
            } => {
                let body = self.block()?;
                Ok(Stmt::Range(RangeStmt {
                    key,
                    value,
                    define,
                    subject,
                    body,
                    span: self.span_from(start),
                }))
            }
            ForHeader::Simple(stmt) => {
                if self.at(TokenKind::Semicolon) {
                    // Three-clause form.
                    let (cond, post) = self.without_composites(|p| {
                        p.bump();
                        let cond = if p.at(TokenKind::Semicolon) {
                            None
                        } else {
                            Some(p.expr()?)
                        };
                        p.expect(TokenKind::Semicolon)?;
                        let post = if p.at(TokenKind::LBrace) {
                            None
                        } else {
                            Some(Box::new(p.simple_stmt()?))
                        };
                        Ok((cond, post))
                    })?;
                    let body = self.block()?;
                    Ok(Stmt::For(ForStmt {
                        init: Some(Box::new(stmt)),
                        cond,
                        post,
                        body,
                        span: self.span_from(start),
                    }))
                } else {
                    // Condition-only form.
                    let cond = match stmt {
                        Stmt::Expr(expr_stmt) => expr_stmt.expr,
                        other => {
                            return Err(ParseError::new(
                                "missing loop condition",
                                other.span().start,
                            ));
                        }
                    };
                    let body = self.block()?;
                    Ok(Stmt::For(ForStmt {
                        init: None,
                        cond: Some(cond),
                        post: None,
                        body,
                        span: self.span_from(start),
                    }))
                }
            }
        }
    }

    fn switch_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.here();
        self.expect(TokenKind::Switch)?;

        let (init, guard) = self.without_composites(|p| {
            if p.at(TokenKind::LBrace) {
                return Ok((None, None));
            }
            let first = p.simple_stmt()?;
            if p.at(TokenKind::Semicolon) {
                p.bump();
                if p.at(TokenKind::LBrace) {
                    Ok((Some(Box::new(first)), None))
                } else {
                    let second = p.simple_stmt()?;
                    Ok((Some(Box::new(first)), Some(second)))
                }
            } else {
                Ok((None, Some(first)))
            }
        })?;

        // A guard of the form `x := y.(type)` or `y.(type)` makes this a
        // type switch; anything else is the tag expression.
        match guard {
            Some(Stmt::Expr(expr_stmt)) => match expr_stmt.expr {
                Expr::TypeAssert(assert) if assert.ty.is_none() => {
                    let cases = self.case_clauses()?;
                    Ok(Stmt::TypeSwitch(TypeSwitchStmt {
                        init,
                        binding: None,
                        subject: *assert.x,
                        cases,
                        span: self.span_from(start),
                    }))
                }
                tag => {
                    let cases = self.case_clauses()?;
                    Ok(Stmt::Switch(SwitchStmt {
                        init,
                        tag: Some(tag),
                        cases,
                        span: self.span_from(start),
                    }))
                }
            },
            Some(Stmt::Assign(assign)) => self.type_switch_guard(init, assign, start),
            Some(other) => Err(ParseError::new(
                "invalid switch header",
                other.span().start,
            )),
            None => {
                let cases = self.case_clauses()?;
                Ok(Stmt::Switch(SwitchStmt {
                    init,
                    tag: None,
                    cases,
                    span: self.span_from(start),
                }))
            }
        }
    }

    fn type_switch_guard(
        &mut self,
        init: Option<Box<Stmt>>,
        mut assign: AssignStmt,
        start: Pos,
    ) -> Result<Stmt, ParseError> {
        let valid = assign.op == AssignOp::Define
            && assign.lhs.len() == 1
            && assign.rhs.len() == 1
            && matches!(&assign.rhs[0], Expr::TypeAssert(a) if a.ty.is_none());
        if !valid {
            return Err(ParseError::new(
                "switch guard must be a type-switch binding",
                assign.span.start,
            ));
        }
        let binding = match assign.lhs.remove(0) {
            Expr::Ident(ident) => ident,
            _ => unreachable!("define lhs validated as identifier"),
        };
        let subject = match assign.rhs.remove(0) {
            Expr::TypeAssert(assert) => *assert.x,
            _ => unreachable!(),
        };
        let cases = self.case_clauses()?;
        Ok(Stmt::TypeSwitch(TypeSwitchStmt {
            init,
            binding: Some(binding),
            subject,
            cases,
            span: self.span_from(start),
        }))
    }

    fn case_clauses(&mut self) -> Result<Vec<CaseClause>, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut cases = Vec::new();
        self.with_composites(|p| {
            while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
                let start = p.here();
                let exprs = if p.eat(TokenKind::Case) {
                    p.expr_list()?
                } else {
                    p.expect(TokenKind::Default)?;
                    Vec::new()
                };
                p.expect(TokenKind::Colon)?;
                let body = p.clause_body()?;
                cases.push(CaseClause {
                    exprs,
                    body,
                    span: p.span_from(start),
                });
            }
            Ok(())
        })?;
        self.expect(TokenKind::RBrace)?;
        Ok(cases)
    }

    fn select_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.here();
        self.expect(TokenKind::Select)?;
        self.expect(TokenKind::LBrace)?;
        let mut clauses = Vec::new();
        self.with_composites(|p| {
            while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
                let clause_start = p.here();
                let comm = if p.eat(TokenKind::Case) {
                    Some(Box::new(p.simple_stmt()?))
                } else {
                    p.expect(TokenKind::Default)?;
                    None
                };
                p.expect(TokenKind::Colon)?;
                let body = p.clause_body()?;
                clauses.push(CommClause {
                    comm,
                    body,
                    span: p.span_from(clause_start),
                });
            }
            Ok(())
        })?;
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::Select(SelectStmt {
            clauses,
            span: self.span_from(start),
        }))
    }

    /// Statements of a case/comm clause, up to the next clause or the
    /// closing brace.
    fn clause_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut body = Vec::new();
        while !matches!(
            self.kind(),
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) {
            body.push(self.stmt()?);
            self.expect_semi()?;
        }
        Ok(body)
    }
}
