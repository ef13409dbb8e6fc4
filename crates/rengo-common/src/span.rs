//! Byte-offset source positions and spans.
//!
//! The parser stamps a `Span` on every node it builds; the rename engine
//! only ever compares positions, it never re-derives them from text.

use std::fmt;

/// A position in a source file, measured in bytes from the start.
///
/// Positions are totally ordered and compare consistently with source
/// layout: a token that appears earlier in the file has a smaller `Pos`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(pub u32);

impl Pos {
    pub const ZERO: Pos = Pos(0);

    pub fn new(offset: u32) -> Pos {
        Pos(offset)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A half-open byte range `[start, end)` in a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub fn new(start: Pos, end: Pos) -> Span {
        Span { start, end }
    }

    /// Whether `pos` falls on or inside this span.
    ///
    /// The end position is included so that a cursor sitting immediately
    /// after the last character of an identifier still hits it.
    pub fn contains(&self, pos: Pos) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Anything that knows where it lives in the source.
pub trait Spanned {
    fn span(&self) -> Span;

    fn start(&self) -> Pos {
        self.span().start
    }

    fn end(&self) -> Pos {
        self.span().end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_at_both_ends() {
        let span = Span::new(Pos(4), Pos(9));
        assert!(span.contains(Pos(4)));
        assert!(span.contains(Pos(6)));
        assert!(span.contains(Pos(9)));
        assert!(!span.contains(Pos(3)));
        assert!(!span.contains(Pos(10)));
    }

    #[test]
    fn to_covers_both_spans() {
        let a = Span::new(Pos(2), Pos(5));
        let b = Span::new(Pos(7), Pos(11));
        assert_eq!(a.to(b), Span::new(Pos(2), Pos(11)));
        assert_eq!(b.to(a), Span::new(Pos(2), Pos(11)));
    }
}
