//! Scoring weights for frames and combos
//!
//! Only the relative order of these numbers matters: a completed frame beats
//! any forcing combo, which beats any amount of quiet frame progress.

use crate::board::WIN_LENGTH;

/// Frame and combo weights
pub struct FrameScore;

impl FrameScore {
    /// Value of an open frame by the number of stones already in it.
    /// Index `WIN_LENGTH` is a completed frame.
    pub const STONES: [i32; WIN_LENGTH + 1] = [0, 1, 10, 100, 1_000, 100_000];

    /// Combo that leaves two fours on distinct cells (forced win)
    pub const FORCED: i32 = 50_000;
    /// Combo that leaves two frames within two moves (four-three, double three)
    pub const PRESSING: i32 = 5_000;
}

/// Seed value of an open frame holding `stones` of its color
#[inline]
pub fn frame_value(stones: u8) -> i32 {
    FrameScore::STONES[(stones as usize).min(WIN_LENGTH)]
}

/// Value of adding one more stone to a frame that holds `stones`
#[inline]
pub fn advance_value(stones: u8) -> i32 {
    frame_value(stones.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_values_grow_with_stones() {
        assert!(FrameScore::STONES.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(frame_value(0), 0);
    }

    #[test]
    fn test_completion_outranks_combos() {
        assert!(advance_value(4) > FrameScore::FORCED);
        assert!(FrameScore::FORCED > FrameScore::PRESSING);
        assert!(FrameScore::PRESSING > advance_value(3));
    }
}
