//! Tokenizer for the Go-like source language handled by rengo.
//!
//! This crate provides the lexical analysis phase:
//! - `TokenKind` - token types, including all declaration/statement keywords
//! - `Token` - a kind, its span, and (for identifiers and literals) its text
//! - `Scanner` - the tokenizer state machine
//!
//! The scanner performs Go's automatic semicolon insertion: a newline
//! terminates a statement when the previous token could end one.

use rengo_common::{Pos, Span};
use thiserror::Error;

/// Token types produced by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,

    // Identifiers and literals
    Ident,
    Int,
    Float,
    StringLit,
    CharLit,

    // Keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    // Operators and delimiters
    Add,        // +
    Sub,        // -
    Star,       // *
    Quo,        // /
    Rem,        // %
    And,        // &
    Or,         // |
    Xor,        // ^
    Shl,        // <<
    Shr,        // >>
    AndNot,     // &^
    LogicalAnd, // &&
    LogicalOr,  // ||
    Arrow,      // <-
    Inc,        // ++
    Dec,        // --
    Eql,        // ==
    Lss,        // <
    Gtr,        // >
    Assign,     // =
    Not,        // !
    Neq,        // !=
    Leq,        // <=
    Geq,        // >=
    Define,     // :=
    Ellipsis,   // ...

    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    QuoAssign,    // /=
    RemAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=

    LParen,    // (
    LBracket,  // [
    LBrace,    // {
    RParen,    // )
    RBracket,  // ]
    RBrace,    // }
    Comma,     // ,
    Period,    // .
    Semicolon, // ; (explicit or inserted)
    Colon,     // :
}

impl TokenKind {
    /// Whether a newline after a token of this kind terminates a statement.
    fn ends_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::StringLit
                | TokenKind::CharLit
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Return
                | TokenKind::Inc
                | TokenKind::Dec
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }
}

/// Map identifier text to its keyword kind, if it is one.
pub fn text_to_keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "break" => TokenKind::Break,
        "case" => TokenKind::Case,
        "chan" => TokenKind::Chan,
        "const" => TokenKind::Const,
        "continue" => TokenKind::Continue,
        "default" => TokenKind::Default,
        "defer" => TokenKind::Defer,
        "else" => TokenKind::Else,
        "fallthrough" => TokenKind::Fallthrough,
        "for" => TokenKind::For,
        "func" => TokenKind::Func,
        "go" => TokenKind::Go,
        "goto" => TokenKind::Goto,
        "if" => TokenKind::If,
        "import" => TokenKind::Import,
        "interface" => TokenKind::Interface,
        "map" => TokenKind::Map,
        "package" => TokenKind::Package,
        "range" => TokenKind::Range,
        "return" => TokenKind::Return,
        "select" => TokenKind::Select,
        "struct" => TokenKind::Struct,
        "switch" => TokenKind::Switch,
        "type" => TokenKind::Type,
        "var" => TokenKind::Var,
        _ => return None,
    };
    Some(kind)
}

/// Check if a character can start an identifier.
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

/// Check if a character can be part of an identifier.
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// A single token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Source text for identifiers and literals; empty for fixed tokens.
    pub text: String,
}

impl Token {
    fn fixed(kind: TokenKind, span: Span) -> Token {
        Token {
            kind,
            span,
            text: String::new(),
        }
    }
}

/// A lexical error with the offset it occurred at.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} at offset {pos}")]
pub struct ScanError {
    pub message: String,
    pub pos: Pos,
}

impl ScanError {
    fn new(message: impl Into<String>, pos: Pos) -> ScanError {
        ScanError {
            message: message.into(),
            pos,
        }
    }
}

/// The tokenizer state machine.
pub struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Kind of the last token handed out, for semicolon insertion.
    last: TokenKind,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Scanner<'a> {
        Scanner {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            last: TokenKind::Semicolon,
        }
    }

    /// Tokenize the whole input, including the trailing `Eof` token.
    pub fn tokenize(src: &'a str) -> Result<Vec<Token>, ScanError> {
        let mut scanner = Scanner::new(src);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn here(&self) -> Pos {
        Pos(self.pos as u32)
    }

    /// Skip whitespace and comments, stopping on a newline that must become
    /// an inserted semicolon.
    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.pos += 1;
                }
                Some(b'\n') => {
                    if self.last.ends_statement() {
                        // Stop here so the caller can insert a semicolon.
                        return Ok(());
                    }
                    self.pos += 1;
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.here();
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                            None => {
                                return Err(ScanError::new("unterminated block comment", start));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Produce the next token, inserting semicolons at newlines where the
    /// language calls for them.
    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        self.skip_trivia()?;
        // skip_trivia leaves us on a '\n' when a semicolon must be inserted.
        if self.peek() == Some(b'\n') && self.last.ends_statement() {
            let span = Span::new(self.here(), self.here());
            self.pos += 1;
            self.last = TokenKind::Semicolon;
            return Ok(Token::fixed(TokenKind::Semicolon, span));
        }

        let start = self.here();
        let Some(b) = self.peek() else {
            // Insert a final semicolon at EOF when the last token needs one.
            if self.last.ends_statement() {
                self.last = TokenKind::Semicolon;
                return Ok(Token::fixed(TokenKind::Semicolon, Span::new(start, start)));
            }
            return Ok(Token::fixed(TokenKind::Eof, Span::new(start, start)));
        };

        let token = match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(),
            _ if b >= 0x80 => self.scan_identifier(),
            b'0'..=b'9' => self.scan_number(),
            b'.' if matches!(self.peek_at(1), Some(b'0'..=b'9')) => self.scan_number(),
            b'"' => self.scan_string(b'"')?,
            b'`' => self.scan_raw_string()?,
            b'\'' => self.scan_string(b'\'')?,
            _ => self.scan_operator()?,
        };
        self.last = token.kind;
        Ok(token)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        let rest = &self.src[self.pos..];
        let mut len = rest.len();
        for (i, ch) in rest.char_indices() {
            if i > 0 && !is_identifier_part(ch) {
                len = i;
                break;
            }
        }
        self.pos = start + len;
        let text = &rest[..len];
        let span = Span::new(Pos(start as u32), Pos(self.pos as u32));
        match text_to_keyword(text) {
            Some(kind) => Token::fixed(kind, span),
            None => Token {
                kind: TokenKind::Ident,
                span,
                text: text.to_string(),
            },
        }
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        let mut is_float = false;
        if self.peek() == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x') | Some(b'X') | Some(b'b') | Some(b'o'))
        {
            self.pos += 2;
            while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
                self.pos += 1;
            }
        } else {
            while matches!(self.peek(), Some(b'0'..=b'9') | Some(b'_')) {
                self.pos += 1;
            }
            if self.peek() == Some(b'.') && !matches!(self.peek_at(1), Some(b'.')) {
                is_float = true;
                self.pos += 1;
                while matches!(self.peek(), Some(b'0'..=b'9') | Some(b'_')) {
                    self.pos += 1;
                }
            }
            if matches!(self.peek(), Some(b'e') | Some(b'E')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                    self.pos += 1;
                }
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            }
        }
        Token {
            kind: if is_float {
                TokenKind::Float
            } else {
                TokenKind::Int
            },
            span: Span::new(Pos(start as u32), Pos(self.pos as u32)),
            text: self.src[start..self.pos].to_string(),
        }
    }

    fn scan_string(&mut self, quote: u8) -> Result<Token, ScanError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.bump() {
                Some(b) if b == quote => break,
                Some(b'\\') => {
                    self.pos += 1;
                }
                Some(b'\n') | None => {
                    return Err(ScanError::new(
                        "unterminated string literal",
                        Pos(start as u32),
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(Token {
            kind: if quote == b'\'' {
                TokenKind::CharLit
            } else {
                TokenKind::StringLit
            },
            span: Span::new(Pos(start as u32), Pos(self.pos as u32)),
            text: self.src[start..self.pos].to_string(),
        })
    }

    fn scan_raw_string(&mut self) -> Result<Token, ScanError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.bump() {
                Some(b'`') => break,
                Some(_) => {}
                None => {
                    return Err(ScanError::new(
                        "unterminated raw string literal",
                        Pos(start as u32),
                    ));
                }
            }
        }
        Ok(Token {
            kind: TokenKind::StringLit,
            span: Span::new(Pos(start as u32), Pos(self.pos as u32)),
            text: self.src[start..self.pos].to_string(),
        })
    }

    fn scan_operator(&mut self) -> Result<Token, ScanError> {
        use TokenKind::*;
        let start = self.here();
        let b = self.bump().unwrap_or(0);
        let peek = self.peek();
        let peek2 = self.peek_at(1);
        let (kind, extra) = match b {
            b'+' => match peek {
                Some(b'+') => (Inc, 1),
                Some(b'=') => (AddAssign, 1),
                _ => (Add, 0),
            },
            b'-' => match peek {
                Some(b'-') => (Dec, 1),
                Some(b'=') => (SubAssign, 1),
                _ => (Sub, 0),
            },
            b'*' => match peek {
                Some(b'=') => (MulAssign, 1),
                _ => (Star, 0),
            },
            b'/' => match peek {
                Some(b'=') => (QuoAssign, 1),
                _ => (Quo, 0),
            },
            b'%' => match peek {
                Some(b'=') => (RemAssign, 1),
                _ => (Rem, 0),
            },
            b'&' => match (peek, peek2) {
                (Some(b'&'), _) => (LogicalAnd, 1),
                (Some(b'^'), Some(b'=')) => (AndNotAssign, 2),
                (Some(b'^'), _) => (AndNot, 1),
                (Some(b'='), _) => (AndAssign, 1),
                _ => (And, 0),
            },
            b'|' => match peek {
                Some(b'|') => (LogicalOr, 1),
                Some(b'=') => (OrAssign, 1),
                _ => (Or, 0),
            },
            b'^' => match peek {
                Some(b'=') => (XorAssign, 1),
                _ => (Xor, 0),
            },
            b'<' => match (peek, peek2) {
                (Some(b'-'), _) => (Arrow, 1),
                (Some(b'<'), Some(b'=')) => (ShlAssign, 2),
                (Some(b'<'), _) => (Shl, 1),
                (Some(b'='), _) => (Leq, 1),
                _ => (Lss, 0),
            },
            b'>' => match (peek, peek2) {
                (Some(b'>'), Some(b'=')) => (ShrAssign, 2),
                (Some(b'>'), _) => (Shr, 1),
                (Some(b'='), _) => (Geq, 1),
                _ => (Gtr, 0),
            },
            b'=' => match peek {
                Some(b'=') => (Eql, 1),
                _ => (Assign, 0),
            },
            b'!' => match peek {
                Some(b'=') => (Neq, 1),
                _ => (Not, 0),
            },
            b':' => match peek {
                Some(b'=') => (Define, 1),
                _ => (Colon, 0),
            },
            b'.' => match (peek, peek2) {
                (Some(b'.'), Some(b'.')) => (Ellipsis, 2),
                _ => (Period, 0),
            },
            b'(' => (LParen, 0),
            b'[' => (LBracket, 0),
            b'{' => (LBrace, 0),
            b')' => (RParen, 0),
            b']' => (RBracket, 0),
            b'}' => (RBrace, 0),
            b',' => (Comma, 0),
            b';' => (Semicolon, 0),
            _ => {
                return Err(ScanError::new(
                    format!("unexpected character {:?}", b as char),
                    start,
                ));
            }
        };
        self.pos += extra;
        Ok(Token::fixed(kind, Span::new(start, self.here())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_keywords_and_identifiers() {
        use TokenKind::*;
        assert_eq!(
            kinds("package main"),
            vec![Package, Ident, Semicolon, Eof]
        );
    }

    #[test]
    fn inserts_semicolons_at_newlines() {
        use TokenKind::*;
        assert_eq!(
            kinds("x := 1\ny := 2\n"),
            vec![Ident, Define, Int, Semicolon, Ident, Define, Int, Semicolon, Eof]
        );
    }

    #[test]
    fn no_semicolon_after_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("x := 1 +\n2\n"),
            vec![Ident, Define, Int, Add, Int, Semicolon, Eof]
        );
    }

    #[test]
    fn scans_compound_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("a &^= b << 2"),
            vec![Ident, AndNotAssign, Ident, Shl, Int, Semicolon, Eof]
        );
        assert_eq!(kinds("ch <- v"), vec![Ident, Arrow, Ident, Semicolon, Eof]);
        assert_eq!(kinds("f(xs...)"), vec![Ident, LParen, Ident, Ellipsis, RParen, Semicolon, Eof]);
    }

    #[test]
    fn skips_comments() {
        use TokenKind::*;
        assert_eq!(
            kinds("// heading\nx /* mid */ = 1\n"),
            vec![Ident, Assign, Int, Semicolon, Eof]
        );
    }

    #[test]
    fn keeps_identifier_text() {
        let tokens = Scanner::tokenize("Count").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "Count");
        assert_eq!(tokens[0].span, Span::new(Pos(0), Pos(5)));
    }

    #[test]
    fn reports_unterminated_string() {
        let err = Scanner::tokenize("\"abc").unwrap_err();
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn string_and_number_literals() {
        use TokenKind::*;
        assert_eq!(
            kinds("s := \"a\\\"b\"; r := `raw`; f := 1.5e3; c := 'x'"),
            vec![
                Ident, Define, StringLit, Semicolon, Ident, Define, StringLit, Semicolon, Ident,
                Define, Float, Semicolon, Ident, Define, CharLit, Semicolon, Eof
            ]
        );
    }
}
