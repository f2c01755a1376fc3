//! Text coordinates
//!
//! Columns are lettered `A`..`T` without `I`, rows are numbered 1..19 from
//! the bottom, so the center of the board reads `K10`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{Pos, BOARD_SIZE};

/// Column letters; `I` is skipped to avoid confusion with `J` and `1`
pub const COLUMN_LETTERS: &[u8; BOARD_SIZE] = b"ABCDEFGHJKLMNOPQRST";

/// Why a coordinate string could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("empty coordinate")]
    Empty,
    #[error("bad column letter `{0}`")]
    BadColumn(char),
    #[error("bad row number `{0}`")]
    BadRow(String),
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = COLUMN_LETTERS
            .get(self.col as usize)
            .map_or('?', |&b| b as char);
        write!(f, "{}{}", letter, self.row as usize + 1)
    }
}

impl FromStr for Pos {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars.next().ok_or(CoordError::Empty)?;
        let upper = first.to_ascii_uppercase();
        let col = COLUMN_LETTERS
            .iter()
            .position(|&b| b as char == upper)
            .ok_or(CoordError::BadColumn(first))?;

        let digits = chars.as_str();
        let row: usize = digits
            .parse()
            .map_err(|_| CoordError::BadRow(digits.to_string()))?;
        if row == 0 || row > BOARD_SIZE {
            return Err(CoordError::BadRow(digits.to_string()));
        }

        Ok(Pos::new((row - 1) as u8, col as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_k10() {
        assert_eq!(Pos::CENTER.to_string(), "K10");
        assert_eq!("K10".parse::<Pos>(), Ok(Pos::CENTER));
    }

    #[test]
    fn test_corners() {
        assert_eq!(Pos::new(0, 0).to_string(), "A1");
        assert_eq!(Pos::new(18, 18).to_string(), "T19");
        assert_eq!("t19".parse::<Pos>(), Ok(Pos::new(18, 18)));
        assert_eq!(" a1 ".parse::<Pos>(), Ok(Pos::new(0, 0)));
    }

    #[test]
    fn test_letter_i_is_skipped() {
        assert_eq!(Pos::new(0, 8).to_string(), "J1");
        assert_eq!("I5".parse::<Pos>(), Err(CoordError::BadColumn('I')));
    }

    #[test]
    fn test_rejects_bad_rows() {
        assert_eq!("A0".parse::<Pos>(), Err(CoordError::BadRow("0".into())));
        assert_eq!("A20".parse::<Pos>(), Err(CoordError::BadRow("20".into())));
        assert_eq!("A".parse::<Pos>(), Err(CoordError::BadRow(String::new())));
        assert_eq!("".parse::<Pos>(), Err(CoordError::Empty));
    }
}
