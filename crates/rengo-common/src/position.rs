//! Line/column positions and conversion to byte offsets.
//!
//! The engine works exclusively in byte offsets; line/column only exists at
//! the CLI boundary, where users point at an identifier the way an editor
//! displays it.

use crate::span::Pos;

/// A position in a source file (1-indexed line, 1-indexed column), the way
/// editors display it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }
}

/// Line map for line/column -> byte offset conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (`line_starts[0]` is always 0).
    line_starts: Vec<u32>,
    len: u32,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn build(source: &str) -> LineMap {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap {
            line_starts,
            len: source.len() as u32,
        }
    }

    /// Convert a 1-indexed line/column to a byte offset.
    ///
    /// Returns `None` when the line does not exist or the column runs past
    /// the end of the file.
    pub fn offset(&self, position: Position) -> Option<Pos> {
        if position.line == 0 || position.column == 0 {
            return None;
        }
        let start = *self.line_starts.get(position.line as usize - 1)?;
        let offset = start + (position.column - 1);
        if offset > self.len {
            return None;
        }
        Some(Pos(offset))
    }

    /// Convert a byte offset back to a 1-indexed line/column.
    pub fn position(&self, pos: Pos) -> Position {
        let offset = pos.0.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Position {
            line: line as u32 + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_line_starts() {
        let map = LineMap::build("ab\ncd\n\nef");
        assert_eq!(map.offset(Position::new(1, 1)), Some(Pos(0)));
        assert_eq!(map.offset(Position::new(2, 2)), Some(Pos(4)));
        assert_eq!(map.offset(Position::new(3, 1)), Some(Pos(6)));
        assert_eq!(map.offset(Position::new(4, 2)), Some(Pos(8)));
        assert_eq!(map.offset(Position::new(9, 1)), None);
        assert_eq!(map.offset(Position::new(0, 1)), None);
    }

    #[test]
    fn position_round_trips() {
        let source = "package main\n\nvar Count int\n";
        let map = LineMap::build(source);
        for (offset, _) in source.char_indices() {
            let pos = Pos(offset as u32);
            let position = map.position(pos);
            assert_eq!(map.offset(position), Some(pos));
        }
    }
}
