//! Source position tracking shared by every stage.

use std::fmt;

/// A one-based line/column position within the original source text.
///
/// Nodes carry these so that validator findings and evaluator errors can
/// point back at the offending slice of the caller's expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position at the very start of the source (used when the
    /// underlying parser cannot give us anything more precise).
    pub const fn start() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
