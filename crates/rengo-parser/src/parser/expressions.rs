//! Expression and type parsing.

use super::{ParseError, Parser};
use crate::syntax::ast::*;
use rengo_common::Spanned;
use rengo_scanner::TokenKind;

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::LogicalOr => BinaryOp::LogicalOr,
        TokenKind::LogicalAnd => BinaryOp::LogicalAnd,
        TokenKind::Eql => BinaryOp::Eql,
        TokenKind::Neq => BinaryOp::Neq,
        TokenKind::Lss => BinaryOp::Lss,
        TokenKind::Leq => BinaryOp::Leq,
        TokenKind::Gtr => BinaryOp::Gtr,
        TokenKind::Geq => BinaryOp::Geq,
        TokenKind::Add => BinaryOp::Add,
        TokenKind::Sub => BinaryOp::Sub,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::Xor => BinaryOp::Xor,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Quo => BinaryOp::Quo,
        TokenKind::Rem => BinaryOp::Rem,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::And => BinaryOp::And,
        TokenKind::AndNot => BinaryOp::AndNot,
        _ => return None,
    };
    Some(op)
}

pub(crate) fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Define => AssignOp::Define,
        TokenKind::Assign => AssignOp::Assign,
        TokenKind::AddAssign => AssignOp::Add,
        TokenKind::SubAssign => AssignOp::Sub,
        TokenKind::MulAssign => AssignOp::Mul,
        TokenKind::QuoAssign => AssignOp::Quo,
        TokenKind::RemAssign => AssignOp::Rem,
        TokenKind::AndAssign => AssignOp::And,
        TokenKind::OrAssign => AssignOp::Or,
        TokenKind::XorAssign => AssignOp::Xor,
        TokenKind::ShlAssign => AssignOp::Shl,
        TokenKind::ShrAssign => AssignOp::Shr,
        TokenKind::AndNotAssign => AssignOp::AndNot,
    _ => return None,
    };
    Some(op)
}

impl Parser {
    pub(crate) fn expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.expr()?];
        while self.eat(TokenKind::Comma) {
            exprs.push(self.expr()?);
        }
        Ok(exprs)
    }

    pub(crate) fn expr(&mut self) -> Result<Expr, ParseError> {
        self.binary_expr(1)
    }

    fn binary_expr(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut x = self.unary_expr()?;
        while let Some(op) = binary_op(self.kind()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.bump();
            let y = self.binary_expr(prec + 1)?;
            let span = x.span().to(y.span());
            x = Expr::Binary(BinaryExpr {
                op,
                x: Box::new(x),
                y: Box::new(y),
                span,
            });
        }
        Ok(x)
    }

    fn unary_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.here();
        let op = match self.kind() {
            TokenKind::Add => UnaryOp::Plus,
            TokenKind::Sub => UnaryOp::Minus,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Xor => UnaryOp::Complement,
            TokenKind::And => UnaryOp::AddrOf,
            TokenKind::Arrow => {
                // `<-chan T` is a type; `<-ch` is a receive.
                if self.peek_kind(1) == TokenKind::Chan {
                    return self.type_expr();
                }
                UnaryOp::Recv
            }
            TokenKind::Star => {
                self.bump();
                let x = self.unary_expr()?;
                return Ok(Expr::Star(StarExpr {
                    span: self.span_from(start),
                    x: Box::new(x),
                }));
            }
            _ => return self.primary_expr(),
        };
        self.bump();
        let x = self.unary_expr()?;
        Ok(Expr::Unary(UnaryExpr {
            op,
            span: self.span_from(start),
            x: Box::new(x),
        }))
    }

    fn primary_expr(&mut self) -> Result<Expr, ParseError> {
        let x = self.operand()?;
        self.postfix(x)
    }

    fn operand(&mut self) -> Result<Expr, ParseError> {
        match self.kind() {
            TokenKind::Ident => {
                let ident = self.ident()?;
                Ok(Expr::Ident(ident))
            }
            TokenKind::Int | TokenKind::Float | TokenKind::StringLit | TokenKind::CharLit => {
                let token = self.bump();
                let kind = match token.kind {
                    TokenKind::Int => LitKind::Int,
                    TokenKind::Float => LitKind::Float,
                    TokenKind::StringLit => LitKind::String,
                    _ => LitKind::Char,
                };
                Ok(Expr::Lit(BasicLit {
                    kind,
                    value: token.text,
                    span: token.span,
                }))
            }
            TokenKind::LParen => {
                let start = self.here();
                self.bump();
                let x = self.with_composites(|p| p.expr())?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Paren(ParenExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }))
            }
            TokenKind::Func => {
                let start = self.here();
                self.bump();
                let func_type = self.signature()?;
                if self.at(TokenKind::LBrace) {
                    let body = self.block()?;
                    Ok(Expr::FuncLit(FuncLit {
                        func_type,
                        body,
                        span: self.span_from(start),
                    }))
                } else {
                    Ok(Expr::FuncType(func_type))
                }
            }
            TokenKind::LBracket
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Struct
            | TokenKind::Interface => self.type_expr(),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn postfix(&mut self, mut x: Expr) -> Result<Expr, ParseError> {
        loop {
            match self.kind() {
                TokenKind::Period => {
                    let start = x.span().start;
                    self.bump();
                    if self.eat(TokenKind::LParen) {
                        let ty = if self.eat(TokenKind::Type) {
                            None
                        } else {
                            Some(Box::new(self.with_composites(|p| p.type_expr())?))
                        };
                        self.expect(TokenKind::RParen)?;
                        x = Expr::TypeAssert(TypeAssertExpr {
                            x: Box::new(x),
                            ty,
                            span: self.span_from(start),
                        });
                    } else {
                        let sel = self.ident()?;
                        x = Expr::Selector(SelectorExpr {
                            x: Box::new(x),
                            sel,
                            span: self.span_from(start),
                        });
                    }
                }
                TokenKind::LParen => {
                    x = Expr::Call(self.call_args(x)?);
                }
                TokenKind::LBracket => {
                    x = self.index_or_slice(x)?;
                }
                TokenKind::LBrace if self.composites_allowed() && can_start_composite(&x) => {
                    x = self.composite_lit(Some(x))?;
                }
                _ => return Ok(x),
            }
        }
    }

    fn call_args(&mut self, fun: Expr) -> Result<CallExpr, ParseError> {
        let start = fun.span().start;
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        let mut ellipsis = false;
        self.with_composites(|p| {
            while !p.at(TokenKind::RParen) {
                args.push(p.expr()?);
                if p.eat(TokenKind::Ellipsis) {
                    ellipsis = true;
                }
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect(TokenKind::RParen)?;
        Ok(CallExpr {
            fun: Box::new(fun),
            args,
            ellipsis,
            span: self.span_from(start),
        })
    }

    fn index_or_slice(&mut self, x: Expr) -> Result<Expr, ParseError> {
        let start = x.span().start;
        self.expect(TokenKind::LBracket)?;
        self.with_composites(|p| {
            let low = if p.at(TokenKind::Colon) {
                None
            } else {
                Some(p.expr()?)
            };
            if p.eat(TokenKind::Colon) {
                let high = if p.at(TokenKind::RBracket) {
                    None
                } else {
                    Some(Box::new(p.expr()?))
                };
                p.expect(TokenKind::RBracket)?;
                Ok(Expr::Slice(SliceExpr {
                    x: Box::new(x),
                    low: low.map(Box::new),
                    high,
                    span: p.span_from(start),
                }))
            } else {
                let index = low.ok_or_else(|| p.unexpected("index expression"))?;
                p.expect(TokenKind::RBracket)?;
                Ok(Expr::Index(IndexExpr {
                    x: Box::new(x),
                    index: Box::new(index),
                    span: p.span_from(start),
                }))
            }
        })
    }

    /// A composite literal body. `ty` is absent for nested untyped
    /// literals inside another composite literal.
    fn composite_lit(&mut self, ty: Option<Expr>) -> Result<Expr, ParseError> {
        let start = ty
            .as_ref()
            .map(|t| t.span().start)
            .unwrap_or_else(|| self.here());
        self.expect(TokenKind::LBrace)?;
        let mut elts = Vec::new();
        self.with_composites(|p| {
            while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
                elts.push(p.composite_elt()?);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            Ok(())
        })?;
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::Composite(CompositeLit {
            ty: ty.map(Box::new),
            elts,
            span: self.span_from(start),
        }))
    }

    fn composite_elt(&mut self) -> Result<Expr, ParseError> {
        let key_or_value = if self.at(TokenKind::LBrace) {
            self.composite_lit(None)?
        } else {
            self.expr()?
        };
        if self.eat(TokenKind::Colon) {
            let value = if self.at(TokenKind::LBrace) {
                self.composite_lit(None)?
            } else {
                self.expr()?
            };
            let span = key_or_value.span().to(value.span());
            return Ok(Expr::KeyValue(KeyValueExpr {
                key: Box::new(key_or_value),
                value: Box::new(value),
                span,
            }));
        }
        Ok(key_or_value)
    }

    // ---- types ----

    /// A type expression. Shares `Expr` with value expressions, the way the
    /// source grammar treats types in expression position.
    pub(crate) fn type_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.here();
        match self.kind() {
            TokenKind::Ident => {
                let ident = self.ident()?;
                if self.at(TokenKind::Period) && self.peek_kind(1) == TokenKind::Ident {
                    self.bump();
                    let sel = self.ident()?;
                    Ok(Expr::Selector(SelectorExpr {
                        x: Box::new(Expr::Ident(ident)),
                        sel,
                        span: self.span_from(start),
                    }))
                } else {
                    Ok(Expr::Ident(ident))
                }
            }
            TokenKind::Star => {
                self.bump();
                let x = self.type_expr()?;
                Ok(Expr::Star(StarExpr {
                    span: self.span_from(start),
                    x: Box::new(x),
                }))
            }
            TokenKind::LBracket => {
                self.bump();
                let len = if self.at(TokenKind::RBracket) {
                    None
                } else {
                    Some(Box::new(self.with_composites(|p| p.expr())?))
                };
                self.expect(TokenKind::RBracket)?;
                let elt = self.type_expr()?;
                Ok(Expr::ArrayType(ArrayType {
                    len,
                    elt: Box::new(elt),
                    span: self.span_from(start),
                }))
            }
            TokenKind::Map => {
                self.bump();
                self.expect(TokenKind::LBracket)?;
                let key = self.type_expr()?;
                self.expect(TokenKind::RBracket)?;
                let value = self.type_expr()?;
                Ok(Expr::MapType(MapType {
                    key: Box::new(key),
                    value: Box::new(value),
                    span: self.span_from(start),
                }))
            }
            TokenKind::Chan => {
                self.bump();
                let dir = if self.eat(TokenKind::Arrow) {
                    ChanDir::SendOnly
                } else {
                    ChanDir::Both
                };
                let value = self.type_expr()?;
                Ok(Expr::ChanType(ChanType {
                    dir,
                    value: Box::new(value),
                    span: self.span_from(start),
                }))
            }
            TokenKind::Arrow => {
                self.bump();
                self.expect(TokenKind::Chan)?;
                let value = self.type_expr()?;
                Ok(Expr::ChanType(ChanType {
                    dir: ChanDir::RecvOnly,
                    value: Box::new(value),
                    span: self.span_from(start),
                }))
            }
            TokenKind::Func => {
                self.bump();
                let func_type = self.signature()?;
                Ok(Expr::FuncType(func_type))
            }
            TokenKind::Struct => self.struct_type(),
            TokenKind::Interface => self.interface_type(),
            TokenKind::LParen => {
                self.bump();
                let x = self.type_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Paren(ParenExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    fn struct_type(&mut self) -> Result<Expr, ParseError> {
        let start = self.here();
        self.expect(TokenKind::Struct)?;
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            fields.push(self.struct_field()?);
            self.expect_semi()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::StructType(StructType {
            fields,
            span: self.span_from(start),
        }))
    }

    fn struct_field(&mut self) -> Result<Field, ParseError> {
        let start = self.here();
        let embedded = match self.kind() {
            TokenKind::Star => true,
            TokenKind::Ident => matches!(
                self.peek_kind(1),
                TokenKind::Period | TokenKind::Semicolon | TokenKind::RBrace
            ),
            _ => return Err(self.unexpected("struct field")),
        };
        if embedded {
            let ty = self.type_expr()?;
            return Ok(Field {
                names: Vec::new(),
                ty,
                span: self.span_from(start),
            });
        }
        let mut names = vec![self.ident()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.ident()?);
        }
        let ty = self.type_expr()?;
        Ok(Field {
            names,
            ty,
            span: self.span_from(start),
        })
    }

    fn interface_type(&mut self) -> Result<Expr, ParseError> {
        let start = self.here();
        self.expect(TokenKind::Interface)?;
        self.expect(TokenKind::LBrace)?;
        let mut methods = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let method_start = self.here();
            if self.at(TokenKind::Ident) && self.peek_kind(1) == TokenKind::LParen {
                let name = self.ident()?;
                let func_type = self.signature()?;
                methods.push(Field {
                    names: vec![name],
                    ty: Expr::FuncType(func_type),
                    span: self.span_from(method_start),
                });
            } else {
                // Embedded interface.
                let ty = self.type_expr()?;
                methods.push(Field {
                    names: Vec::new(),
                    ty,
                    span: self.span_from(method_start),
                });
            }
            self.expect_semi()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::InterfaceType(InterfaceType {
            methods,
            span: self.span_from(start),
        }))
    }
}

fn can_start_composite(x: &Expr) -> bool {
    matches!(
        x,
        Expr::Ident(_)
            | Expr::Selector(_)
            | Expr::ArrayType(_)
            | Expr::MapType(_)
            | Expr::StructType(_)
    )
}
