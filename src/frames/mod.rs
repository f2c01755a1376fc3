//! Frame table: every run of `WIN_LENGTH` cells that fits on the board
//!
//! A frame is the unit the threat engine reasons about. Frames are enumerated
//! once from board geometry and never change; only their per-game derived
//! state (see [`state`]) moves as stones are played.
//!
//! Identifiers are dense (`0..FRAME_COUNT`) and assigned in row-major order of
//! the anchor cell, then in [`Direction`] order. Everything that needs a
//! deterministic tie-break leans on this order.

pub mod overlap;
pub mod state;

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::board::{Direction, Pos, BOARD_SIZE, TOTAL_CELLS, WIN_LENGTH};

pub use overlap::{Overlap, OverlapMatrix};
pub use state::{FrameStates, FrameStatus};

/// Number of frames on the board: 2 * 19 * 15 straight + 2 * 15 * 15 diagonal
pub const FRAME_COUNT: usize =
    2 * BOARD_SIZE * (BOARD_SIZE - WIN_LENGTH + 1) + 2 * (BOARD_SIZE - WIN_LENGTH + 1).pow(2);

/// Stable identifier of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u16);

impl FrameId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A run of `WIN_LENGTH` consecutive cells along one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: FrameId,
    /// First cell of the run
    pub anchor: Pos,
    pub dir: Direction,
    /// Cells in order, starting at the anchor
    pub cells: [Pos; WIN_LENGTH],
}

impl Frame {
    /// Position of `pos` inside this frame, if it is covered
    #[inline]
    pub fn offset_of(&self, pos: Pos) -> Option<usize> {
        self.cells.iter().position(|&c| c == pos)
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        self.offset_of(pos).is_some()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.anchor, self.dir.symbol())
    }
}

/// Immutable table of all frames plus the cell -> frame cross references
#[derive(Debug, Clone)]
pub struct FrameTable {
    frames: Vec<Frame>,
    /// Per cell, the frame anchored there in each direction
    anchored: Vec<[Option<FrameId>; 4]>,
    /// Per cell, every frame covering it, in id order
    covering: Vec<Vec<FrameId>>,
}

impl FrameTable {
    /// Enumerate every frame on the board.
    #[must_use]
    pub fn new() -> Self {
        let mut frames = Vec::with_capacity(FRAME_COUNT);
        let mut anchored = vec![[None; 4]; TOTAL_CELLS];
        let mut covering = vec![Vec::new(); TOTAL_CELLS];

        for idx in 0..TOTAL_CELLS {
            let anchor = Pos::from_index(idx);
            for dir in Direction::ALL {
                if anchor.step(dir, WIN_LENGTH as i32 - 1).is_none() {
                    continue;
                }
                let id = FrameId(frames.len() as u16);
                let mut cells = [anchor; WIN_LENGTH];
                for (i, cell) in cells.iter_mut().enumerate() {
                    // In bounds: the far end was checked above
                    *cell = anchor.step(dir, i as i32).unwrap_or(anchor);
                    covering[cell.to_index()].push(id);
                }
                anchored[idx][dir.index()] = Some(id);
                frames.push(Frame { id, anchor, dir, cells });
            }
        }

        assert_eq!(frames.len(), FRAME_COUNT, "frame enumeration out of sync");
        Self {
            frames,
            anchored,
            covering,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Look up a frame. Panics on an identifier outside the table.
    #[inline]
    pub fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.index()]
    }

    /// All frames in stable identifier order
    #[inline]
    pub fn all_frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The frames anchored at `pos`, at most one per direction
    pub fn frames_through(&self, pos: Pos) -> impl Iterator<Item = FrameId> + '_ {
        self.anchored[pos.to_index()].iter().flatten().copied()
    }

    /// Anchored frame slots of a cell, indexed by [`Direction::index`]
    #[inline]
    pub fn anchored_at(&self, pos: Pos) -> [Option<FrameId>; 4] {
        self.anchored[pos.to_index()]
    }

    /// Every frame that covers `pos` (up to 4 * `WIN_LENGTH`), in id order
    #[inline]
    pub fn frames_covering(&self, pos: Pos) -> &[FrameId] {
        &self.covering[pos.to_index()]
    }
}

impl Default for FrameTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Static board geometry: frames and their overlap relation.
///
/// Built once and shared read-only by every game session.
#[derive(Debug)]
pub struct Geometry {
    pub frames: FrameTable,
    pub overlap: OverlapMatrix,
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        let frames = FrameTable::new();
        let overlap = OverlapMatrix::new(&frames);
        log::debug!(
            "built geometry: {} frames, {} overlapping pairs",
            frames.len(),
            overlap.pair_count()
        );
        Self { frames, overlap }
    }

    /// Process-wide geometry, built on first use
    pub fn shared() -> Arc<Geometry> {
        static SHARED: OnceLock<Arc<Geometry>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Geometry::new())).clone()
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}
