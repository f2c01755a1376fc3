//! Board representation for Gomoku

pub mod bitboard;
pub mod board;
pub mod coord;

#[cfg(test)]
mod tests;

// Re-exports
pub use bitboard::Bitboard;
pub use board::{Board, Cell, CellValue};
pub use coord::CoordError;

/// Board size (19x19)
pub const BOARD_SIZE: usize = 19;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 361

/// Number of stones in a row needed to win
pub const WIN_LENGTH: usize = 5;

/// Stone colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Slot of a player color in per-color tables (Black = 0, White = 1).
    ///
    /// Panics on `Stone::Empty`, which never owns per-color state.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Stone::Black => 0,
            Stone::White => 1,
            Stone::Empty => panic!("Stone::Empty has no per-color slot"),
        }
    }

    #[inline]
    pub fn is_player(self) -> bool {
        self != Stone::Empty
    }
}

/// The four line directions a frame can run in.
///
/// Ordering matters: frames anchored at the same cell are numbered in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// `-` left to right
    Horizontal,
    /// `\` left to right, moving toward row 1
    DiagonalDown,
    /// `|` bottom to top
    Vertical,
    /// `/` left to right, moving toward row 19
    DiagonalUp,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::DiagonalDown,
        Direction::Vertical,
        Direction::DiagonalUp,
    ];

    /// Row/column step of one cell along this direction
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::DiagonalDown => (-1, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalUp => (1, 1),
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-character symbol used by the debug console
    pub fn symbol(self) -> char {
        match self {
            Direction::Horizontal => '-',
            Direction::DiagonalDown => '\\',
            Direction::Vertical => '|',
            Direction::DiagonalUp => '/',
        }
    }

    pub fn from_symbol(c: char) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.symbol() == c)
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    /// Center of the board
    pub const CENTER: Pos = Pos {
        row: (BOARD_SIZE / 2) as u8,
        col: (BOARD_SIZE / 2) as u8,
    };

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Whether this position lies on the board
    #[inline]
    pub fn in_bounds(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Step `steps` cells along a direction, or `None` when that leaves the board
    #[inline]
    pub fn step(self, dir: Direction, steps: i32) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let r = self.row as i32 + dr * steps;
        let c = self.col as i32 + dc * steps;
        if Pos::is_valid(r, c) {
            Some(Pos::new(r as u8, c as u8))
        } else {
            None
        }
    }

    /// Chebyshev distance to the center, used as a tie-breaker
    #[inline]
    pub fn center_distance(self) -> u8 {
        let dr = (self.row as i32 - Pos::CENTER.row as i32).unsigned_abs();
        let dc = (self.col as i32 - Pos::CENTER.col as i32).unsigned_abs();
        dr.max(dc) as u8
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}
