use std::path::PathBuf;

use clap::Parser;
use rengo_common::{LineMap, Pos, Position};

/// CLI arguments for the rengo binary.
#[derive(Parser, Debug)]
#[command(
    name = "rengo",
    version,
    about = "Scope-aware identifier renaming for Go-like source files"
)]
pub struct CliArgs {
    /// Identifier to rename.
    #[arg(long)]
    pub name: String,

    /// Replacement identifier.
    #[arg(long)]
    pub to: String,

    /// Occurrence to resolve, in the first input file: a byte offset, or
    /// line:column as an editor displays it.
    #[arg(long, value_parser = parse_location)]
    pub at: Location,

    /// Rewrite the input files in place instead of printing to stdout.
    #[arg(short = 'w', long)]
    pub write: bool,

    /// Source files forming one package. The first is the file `--at`
    /// points into.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// A user-facing source location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Offset(u32),
    LineColumn(Position),
}

impl Location {
    /// Resolve to a byte offset in the file the location refers to.
    pub fn resolve(self, line_map: &LineMap) -> Option<Pos> {
        match self {
            Location::Offset(offset) => Some(Pos::new(offset)),
            Location::LineColumn(position) => line_map.offset(position),
        }
    }
}

fn parse_location(text: &str) -> Result<Location, String> {
    if let Some((line, column)) = text.split_once(':') {
        let line = line
            .parse()
            .map_err(|_| format!("bad line number in `{text}`"))?;
        let column = column
            .parse()
            .map_err(|_| format!("bad column number in `{text}`"))?;
        return Ok(Location::LineColumn(Position::new(line, column)));
    }
    text.parse()
        .map(Location::Offset)
        .map_err(|_| format!("`{text}` is neither a byte offset nor line:column"))
}

#[cfg(test)]
mod args_tests {
    use super::*;

    #[test]
    fn parses_offsets_and_line_column_pairs() {
        assert_eq!(parse_location("42"), Ok(Location::Offset(42)));
        assert_eq!(
            parse_location("3:7"),
            Ok(Location::LineColumn(Position::new(3, 7)))
        );
        assert!(parse_location("3:").is_err());
        assert!(parse_location("abc").is_err());
    }

    #[test]
    fn resolves_against_a_line_map() {
        let map = LineMap::build("package p\nvar x int\n");
        assert_eq!(
            Location::LineColumn(Position::new(2, 5)).resolve(&map),
            Some(Pos::new(14))
        );
        assert_eq!(Location::Offset(3).resolve(&map), Some(Pos::new(3)));
        assert_eq!(
            Location::LineColumn(Position::new(9, 1)).resolve(&map),
            None
        );
    }
}
