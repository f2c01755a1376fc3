//! Saved game format
//!
//! One coordinate per line in play order, colors implied by alternation
//! starting with Black. Blank lines are ignored when reading.

use crate::board::Pos;
use crate::error::ParseError;

/// Render moves, one per line with a trailing newline.
pub fn format_moves(moves: &[Pos]) -> String {
    let mut out = String::with_capacity(moves.len() * 4);
    for pos in moves {
        out.push_str(&pos.to_string());
        out.push('\n');
    }
    out
}

/// Parse a move log. Error lines are 1-based.
pub fn parse_moves(text: &str) -> Result<Vec<Pos>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.parse::<Pos>()
                .map_err(|source| ParseError::Coord { line: i + 1, source })
        })
        .collect()
}
