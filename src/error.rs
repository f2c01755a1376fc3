//! Recoverable error types
//!
//! Invariant violations (corrupt frame counts, unknown frame identifiers)
//! are not represented here: they panic at the point of detection.

use thiserror::Error;

use crate::board::{CoordError, Pos};

/// Why the board store refused a stone
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("{0} is already occupied")]
    Occupied(Pos),
    #[error("row {row}, column {col} is outside the board")]
    OutOfBounds { row: u8, col: u8 },
    #[error("a move needs a black or white stone")]
    NoColor,
}

/// A saved move log that could not be read back
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: {source}")]
    Coord {
        line: usize,
        #[source]
        source: CoordError,
    },
}
