//! Board store: cell records and the move log
//!
//! The store only holds data. Placing or removing a stone reports which
//! frames were touched; recomputing anything derived from them is the
//! caller's job.

use std::fmt;

use super::coord::COLUMN_LETTERS;
use super::{Pos, Stone, BOARD_SIZE, TOTAL_CELLS};
use crate::error::BoardError;
use crate::frames::{FrameId, FrameTable};

/// Cached threat metrics of one cell for one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellValue {
    /// Composite value of playing here
    pub score: i32,
    /// Fewest moves to completion among combos through this cell (0 = none)
    pub level: u8,
    /// Combos that become unstoppable by playing here
    pub nforce: u8,
}

/// One grid position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub stone: Stone,
    /// Frames anchored at this cell, indexed by direction
    pub frames: [Option<FrameId>; 4],
    /// Cached values, indexed by [`Stone::index`]
    pub values: [CellValue; 2],
}

/// Game board with move log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Cell>,
    /// Cells played, in order
    moves: Vec<Pos>,
}

impl Board {
    pub fn new(table: &FrameTable) -> Self {
        let cells = (0..TOTAL_CELLS)
            .map(|idx| Cell {
                stone: Stone::Empty,
                frames: table.anchored_at(Pos::from_index(idx)),
                values: [CellValue::default(); 2],
            })
            .collect();
        Self {
            cells,
            moves: Vec::with_capacity(TOTAL_CELLS),
        }
    }

    /// Reset every cell to empty and clear the move log
    pub fn initialize(&mut self) {
        for cell in &mut self.cells {
            cell.stone = Stone::Empty;
            cell.values = [CellValue::default(); 2];
        }
        self.moves.clear();
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        self.cells[pos.to_index()].stone
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Stone::Empty
    }

    #[inline]
    pub fn cell(&self, pos: Pos) -> &Cell {
        &self.cells[pos.to_index()]
    }

    /// Cached value of `pos` for `color`
    #[inline]
    pub fn value(&self, pos: Pos, color: Stone) -> CellValue {
        self.cells[pos.to_index()].values[color.index()]
    }

    #[inline]
    pub fn set_value(&mut self, pos: Pos, color: Stone, value: CellValue) {
        self.cells[pos.to_index()].values[color.index()] = value;
    }

    /// Zero the cached values of one color on every cell
    pub fn clear_values(&mut self, color: Stone) {
        let slot = color.index();
        for cell in &mut self.cells {
            cell.values[slot] = CellValue::default();
        }
    }

    /// Place a stone and log the move.
    ///
    /// Returns every frame covering the cell so the caller can refresh
    /// derived state. The board is untouched on error.
    pub fn occupy<'t>(
        &mut self,
        pos: Pos,
        stone: Stone,
        table: &'t FrameTable,
    ) -> Result<&'t [FrameId], BoardError> {
        if !pos.in_bounds() {
            return Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            });
        }
        if !stone.is_player() {
            return Err(BoardError::NoColor);
        }
        let cell = &mut self.cells[pos.to_index()];
        if cell.stone != Stone::Empty {
            return Err(BoardError::Occupied(pos));
        }

        cell.stone = stone;
        self.moves.push(pos);
        Ok(table.frames_covering(pos))
    }

    /// Take back the most recent move.
    ///
    /// Returns the cell, the stone that was there and the frames covering it.
    pub fn rollback<'t>(&mut self, table: &'t FrameTable) -> Option<(Pos, Stone, &'t [FrameId])> {
        let pos = self.moves.pop()?;
        let cell = &mut self.cells[pos.to_index()];
        let stone = cell.stone;
        cell.stone = Stone::Empty;
        Some((pos, stone, table.frames_covering(pos)))
    }

    /// Move log in play order
    #[inline]
    pub fn moves(&self) -> &[Pos] {
        &self.moves
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.moves.len() == TOTAL_CELLS
    }

    /// Empty cells in index order
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.stone == Stone::Empty)
            .map(|(idx, _)| Pos::from_index(idx))
    }
}

impl fmt::Display for Board {
    /// Plain diagram with row 19 on top, `X` for Black and `O` for White
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = COLUMN_LETTERS
            .iter()
            .map(|&b| format!(" {}", b as char))
            .collect();
        writeln!(f, "   {letters}")?;
        for row in (0..BOARD_SIZE).rev() {
            write!(f, "{:2} ", row + 1)?;
            for col in 0..BOARD_SIZE {
                let pos = Pos::new(row as u8, col as u8);
                let ch = match self.get(pos) {
                    Stone::Black => 'X',
                    Stone::White => 'O',
                    Stone::Empty => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f, " {:2}", row + 1)?;
        }
        writeln!(f, "   {letters}")
    }
}
