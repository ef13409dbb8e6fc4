//! Recursive-descent parser for the Go-like source language.
//!
//! The parser state machine lives in this module; statement parsing is in
//! `statements.rs` and expression/type parsing in `expressions.rs`. The
//! parser assumes nothing about who consumes the tree: it stamps a span on
//! every node so the rename engine can work purely positionally.

mod expressions;
mod statements;
#[cfg(test)]
mod tests;

use crate::syntax::ast::*;
use rengo_common::{Pos, Span, Spanned};
use rengo_scanner::{ScanError, Scanner, Token, TokenKind};
use thiserror::Error;
use tracing::trace;

/// A syntax error with the offset it occurred at.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} at offset {pos}")]
pub struct ParseError {
    pub message: String,
    pub pos: Pos,
}

impl ParseError {
    fn new(message: impl Into<String>, pos: Pos) -> ParseError {
        ParseError {
            message: message.into(),
            pos,
        }
    }
}

impl From<ScanError> for ParseError {
    fn from(err: ScanError) -> ParseError {
        ParseError {
            message: err.message,
            pos: err.pos,
        }
    }
}

/// Parse one source file.
pub fn parse_file(source: &str) -> Result<File, ParseError> {
    Parser::new(source)?.file()
}

/// The parser state machine.
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    /// End of the most recently consumed token, for span construction.
    prev_end: Pos,
    /// Whether a `{` after an operand may start a composite literal.
    /// Cleared while parsing if/for/switch headers, restored inside any
    /// parenthesised or bracketed subexpression.
    composite_ok: bool,
}

impl Parser {
    pub fn new(source: &str) -> Result<Parser, ParseError> {
        let tokens = Scanner::tokenize(source)?;
        Ok(Parser {
            tokens,
            index: 0,
            prev_end: Pos::ZERO,
            composite_ok: true,
        })
    }

    // ---- token plumbing ----

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn peek_kind(&self, lookahead: usize) -> TokenKind {
        self.tokens
            .get(self.index + lookahead)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn here(&self) -> Pos {
        self.current().span.start
    }

    pub(crate) fn span_from(&self, start: Pos) -> Span {
        Span::new(start, self.prev_end)
    }

    pub(crate) fn bump(&mut self) -> Token {
        let token = self.tokens[self.index].clone();
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        self.prev_end = token.span.end;
        token
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(ParseError::new(
                format!("expected {:?}, found {:?}", kind, self.kind()),
                self.here(),
            ))
        }
    }

    /// Consume a statement terminator. A closing `)` / `}` or EOF counts as
    /// one without being consumed, matching the semicolon-elision rule.
    pub(crate) fn expect_semi(&mut self) -> Result<(), ParseError> {
        match self.kind() {
            TokenKind::Semicolon => {
                self.bump();
                Ok(())
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => Ok(()),
            other => Err(ParseError::new(
                format!("expected ';', found {:?}", other),
                self.here(),
            )),
        }
    }

    pub(crate) fn ident(&mut self) -> Result<Ident, ParseError> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Ident::new(token.text, token.span))
    }

    pub(crate) fn unexpected(&self, context: &str) -> ParseError {
        ParseError::new(
            format!("unexpected {:?} in {}", self.kind(), context),
            self.here(),
        )
    }

    /// Run `f` with composite literals permitted, restoring the previous
    /// restriction afterwards.
    pub(crate) fn with_composites<T>(
        &mut self,
        f: impl FnOnce(&mut Parser) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = self.composite_ok;
        self.composite_ok = true;
        let result = f(self);
        self.composite_ok = saved;
        result
    }

    pub(crate) fn without_composites<T>(
        &mut self,
        f: impl FnOnce(&mut Parser) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = self.composite_ok;
        self.composite_ok = false;
        let result = f(self);
        self.composite_ok = saved;
        result
    }

    pub(crate) fn composites_allowed(&self) -> bool {
        self.composite_ok
    }

    // ---- file and declarations ----

    pub fn file(&mut self) -> Result<File, ParseError> {
        let start = self.here();
        self.expect(TokenKind::Package)?;
        let package = self.ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        while !self.at(TokenKind::Eof) {
            decls.push(self.declaration()?);
            self.expect_semi()?;
        }
        trace!(package = %package.name, decls = decls.len(), "parsed file");
        Ok(File {
            package,
            decls,
            span: self.span_from(start),
        })
    }

    fn declaration(&mut self) -> Result<Decl, ParseError> {
        match self.kind() {
            TokenKind::Import => Ok(Decl::Gen(self.gen_decl(DeclKeyword::Import)?)),
            TokenKind::Const => Ok(Decl::Gen(self.gen_decl(DeclKeyword::Const)?)),
            TokenKind::Type => Ok(Decl::Gen(self.gen_decl(DeclKeyword::Type)?)),
            TokenKind::Var => Ok(Decl::Gen(self.gen_decl(DeclKeyword::Var)?)),
            TokenKind::Func => Ok(Decl::Func(self.func_decl()?)),
            _ => Err(self.unexpected("top-level declaration")),
        }
    }

    /// An import/const/type/var group, parenthesised or single-spec.
    pub(crate) fn gen_decl(&mut self, keyword: DeclKeyword) -> Result<GenDecl, ParseError> {
        let start = self.here();
        self.bump(); // the keyword itself
        let mut specs = Vec::new();
        let grouped = self.eat(TokenKind::LParen);
        if grouped {
            while !self.at(TokenKind::RParen) {
                specs.push(self.spec(keyword)?);
                self.expect_semi()?;
            }
            self.expect(TokenKind::RParen)?;
        } else {
            specs.push(self.spec(keyword)?);
        }
        Ok(GenDecl {
            keyword,
            grouped,
            specs,
            span: self.span_from(start),
        })
    }

    fn spec(&mut self, keyword: DeclKeyword) -> Result<Spec, ParseError> {
        match keyword {
            DeclKeyword::Import => {
                let start = self.here();
                let alias = if self.at(TokenKind::Ident) {
                    Some(self.ident()?)
                } else {
                    None
                };
                let token = self.expect(TokenKind::StringLit)?;
                Ok(Spec::Import(ImportSpec {
                    alias,
                    path: BasicLit {
                        kind: LitKind::String,
                        value: token.text,
                        span: token.span,
                    },
                    span: self.span_from(start),
                }))
            }
            DeclKeyword::Type => {
                let start = self.here();
                let name = self.ident()?;
                let ty = self.with_composites(|p| p.type_expr())?;
                Ok(Spec::Type(TypeSpec {
                    name,
                    ty,
                    span: self.span_from(start),
                }))
            }
            DeclKeyword::Const | DeclKeyword::Var => {
                let start = self.here();
                let mut names = vec![self.ident()?];
                while self.eat(TokenKind::Comma) {
                    names.push(self.ident()?);
                }
                let ty = if !self.at(TokenKind::Assign)
                    && !self.at(TokenKind::Semicolon)
                    && !self.at(TokenKind::RParen)
                    && !self.at(TokenKind::RBrace)
                {
                    Some(self.with_composites(|p| p.type_expr())?)
                } else {
                    None
                };
                let values = if self.eat(TokenKind::Assign) {
                    self.with_composites(|p| p.expr_list())?
                } else {
                    Vec::new()
                };
                Ok(Spec::Value(ValueSpec {
                    names,
                    ty,
                    values,
                    span: self.span_from(start),
                }))
            }
        }
    }

    fn func_decl(&mut self) -> Result<FuncDecl, ParseError> {
        let start = self.here();
        self.expect(TokenKind::Func)?;

        let recv = if self.at(TokenKind::LParen) {
            let mut fields = self.field_list()?;
            if fields.len() != 1 {
                return Err(ParseError::new(
                    "method receiver must be a single field",
                    start,
                ));
            }
            Some(fields.remove(0))
        } else {
            None
        };

        let name = self.ident()?;
        let func_type = self.signature()?;
        let body = if self.at(TokenKind::LBrace) {
            Some(self.with_composites(|p| p.block())?)
        } else {
            None
        };
        Ok(FuncDecl {
            recv,
            name,
            func_type,
            body,
            span: self.span_from(start),
        })
    }

    /// A function signature: `(params) results`.
    pub(crate) fn signature(&mut self) -> Result<FuncType, ParseError> {
        let start = self.here();
        let params = self.field_list()?;
        let results = self.result_list()?;
        Ok(FuncType {
            params,
            results,
            span: self.span_from(start),
        })
    }

    /// A parenthesised field list: parameters or a method receiver.
    ///
    /// Names and types are disambiguated the way the source grammar does
    /// it: a comma-separated run of expressions followed by a type makes
    /// the run a name list; otherwise every expression is an unnamed type.
    pub(crate) fn field_list(&mut self) -> Result<Vec<Field>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut fields = Vec::new();
        self.with_composites(|p| {
            while !p.at(TokenKind::RParen) {
                p.field_group(&mut fields)?;
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect(TokenKind::RParen)?;
        Ok(fields)
    }

    fn field_group(&mut self, fields: &mut Vec<Field>) -> Result<(), ParseError> {
        let start = self.here();
        let mut exprs = Vec::new();
        loop {
            if self.at(TokenKind::Ellipsis) {
                // `...T` can only be a (possibly named) final parameter type.
                let ty = self.variadic_type()?;
                self.push_field_run(fields, start, exprs, ty)?;
                return Ok(());
            }
            exprs.push(self.type_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if self.at(TokenKind::Comma) || self.at(TokenKind::RParen) {
            // No trailing type: each expression is its own unnamed field.
            for expr in exprs {
                let span = expr.span();
                fields.push(Field {
                    names: Vec::new(),
                    ty: expr,
                    span,
                });
            }
            return Ok(());
        }
        let ty = if self.at(TokenKind::Ellipsis) {
            self.variadic_type()?
        } else {
            self.type_expr()?
        };
        self.push_field_run(fields, start, exprs, ty)
    }

    fn variadic_type(&mut self) -> Result<Expr, ParseError> {
        let start = self.here();
        self.expect(TokenKind::Ellipsis)?;
        let elt = self.type_expr()?;
        Ok(Expr::Ellipsis(EllipsisExpr {
            elt: Some(Box::new(elt)),
            span: self.span_from(start),
        }))
    }

    fn push_field_run(
        &mut self,
        fields: &mut Vec<Field>,
        start: Pos,
        exprs: Vec<Expr>,
        ty: Expr,
    ) -> Result<(), ParseError> {
        let mut names = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                Expr::Ident(ident) => names.push(ident),
                other => {
                    return Err(ParseError::new(
                        "parameter name must be an identifier",
                        other.span().start,
                    ));
                }
            }
        }
        fields.push(Field {
            names,
            ty,
            span: self.span_from(start),
        });
        Ok(())
    }

    /// Function results: absent, a single bare type, or a field list.
    fn result_list(&mut self) -> Result<Vec<Field>, ParseError> {
        if self.at(TokenKind::LParen) {
            return self.field_list();
        }
        if self.starts_type() {
            let ty = self.with_composites(|p| p.type_expr())?;
            let span = ty.span();
            return Ok(vec![Field {
                names: Vec::new(),
                ty,
                span,
            }]);
        }
        Ok(Vec::new())
    }

    /// Whether the current token can begin a type expression.
    pub(crate) fn starts_type(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Ident
                | TokenKind::LBracket
                | TokenKind::Star
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Arrow
                | TokenKind::Func
                | TokenKind::Struct
                | TokenKind::Interface
                | TokenKind::LParen
        )
    }
}
