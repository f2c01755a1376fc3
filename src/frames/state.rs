//! Per-game derived frame state
//!
//! The frame table itself is shared and immutable; what changes during a
//! game is how many stones of each color sit in each frame. Those counts are
//! kept here and updated incrementally from the frames a move touches.

use crate::board::{Stone, WIN_LENGTH};

use super::{FrameId, FRAME_COUNT};

/// Stone counts inside one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FrameCount {
    stones: [u8; 2],
}

impl FrameCount {
    #[inline]
    fn empties(self) -> u8 {
        WIN_LENGTH as u8 - self.stones[0] - self.stones[1]
    }
}

/// Whether a frame can still be completed by a given color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Holds at least one opposing stone
    Blocked,
    /// Completable; `cost` empty cells remain and `stones` are already placed
    Open { cost: u8, stones: u8 },
    /// Every cell holds the color
    Won,
}

impl FrameStatus {
    #[inline]
    pub fn is_open(self) -> bool {
        matches!(self, FrameStatus::Open { .. })
    }

    /// Remaining moves for an open frame
    #[inline]
    pub fn cost(self) -> Option<u8> {
        match self {
            FrameStatus::Open { cost, .. } => Some(cost),
            _ => None,
        }
    }
}

/// Derived state of every frame for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStates {
    counts: Vec<FrameCount>,
}

impl FrameStates {
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: vec![FrameCount::default(); FRAME_COUNT],
        }
    }

    /// Forget every stone
    pub fn reset(&mut self) {
        self.counts.fill(FrameCount::default());
    }

    /// Record a stone of `stone` placed in each of `frames`
    pub fn apply(&mut self, frames: &[FrameId], stone: Stone) {
        let slot = stone.index();
        for id in frames {
            let count = &mut self.counts[id.index()];
            assert!(count.empties() > 0, "stone added to full frame {id}");
            count.stones[slot] += 1;
        }
    }

    /// Undo [`FrameStates::apply`]
    pub fn revert(&mut self, frames: &[FrameId], stone: Stone) {
        let slot = stone.index();
        for id in frames {
            let count = &mut self.counts[id.index()];
            assert!(count.stones[slot] > 0, "stone removed from frame {id} that has none");
            count.stones[slot] -= 1;
        }
    }

    /// Classify a frame for `color`.
    ///
    /// A frame that is open yet has no empty cell and is not won cannot exist;
    /// hitting that case means the counts are corrupt and we abort.
    pub fn status(&self, id: FrameId, color: Stone) -> FrameStatus {
        let count = self.counts[id.index()];
        let own = count.stones[color.index()];
        let opp = count.stones[color.opponent().index()];

        if opp > 0 {
            return FrameStatus::Blocked;
        }
        if own as usize == WIN_LENGTH {
            return FrameStatus::Won;
        }
        let cost = count.empties();
        assert!(cost > 0, "frame {id} is open for {color:?} with no empty cell");
        FrameStatus::Open { cost, stones: own }
    }

    /// Number of `color` stones in a frame
    #[inline]
    pub fn stones(&self, id: FrameId, color: Stone) -> u8 {
        self.counts[id.index()].stones[color.index()]
    }
}

impl Default for FrameStates {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_frames_are_open() {
        let states = FrameStates::new();
        assert_eq!(
            states.status(FrameId(0), Stone::Black),
            FrameStatus::Open { cost: 5, stones: 0 }
        );
    }

    #[test]
    fn test_opposing_stone_blocks() {
        let mut states = FrameStates::new();
        states.apply(&[FrameId(3)], Stone::White);

        assert_eq!(states.status(FrameId(3), Stone::Black), FrameStatus::Blocked);
        assert_eq!(
            states.status(FrameId(3), Stone::White),
            FrameStatus::Open { cost: 4, stones: 1 }
        );
    }

    #[test]
    fn test_filled_frame_is_won() {
        let mut states = FrameStates::new();
        for _ in 0..WIN_LENGTH {
            states.apply(&[FrameId(7)], Stone::Black);
        }
        assert_eq!(states.status(FrameId(7), Stone::Black), FrameStatus::Won);
        assert_eq!(states.status(FrameId(7), Stone::White), FrameStatus::Blocked);
    }

    #[test]
    fn test_revert_restores_counts() {
        let mut states = FrameStates::new();
        let frames = [FrameId(1), FrameId(2)];
        states.apply(&frames, Stone::Black);
        states.revert(&frames, Stone::Black);
        assert_eq!(states, FrameStates::new());
    }

    #[test]
    #[should_panic(expected = "has none")]
    fn test_revert_without_stone_panics() {
        let mut states = FrameStates::new();
        states.revert(&[FrameId(0)], Stone::White);
    }
}
