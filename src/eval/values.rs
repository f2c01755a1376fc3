//! Per-cell threat values
//!
//! Folds a color's [`ComboSet`] into the board's per-cell cache so move
//! selection reads one small record per cell instead of walking combos.

use crate::board::{Board, CellValue, Pos};

use super::combo::{ComboSet, Threat};
use super::patterns::advance_value;

/// Value of playing `pos` for the color of `combos`
pub fn cell_value(combos: &ComboSet, pos: Pos) -> CellValue {
    let mut score: i32 = 0;
    let mut level = u8::MAX;
    let mut nforce: u8 = 0;

    for &id in combos.combos_at(pos) {
        let combo = combos.combo(id);
        if let [frame_id] = combo.members.as_slice() {
            let Some(frame) = combos.open_frame(*frame_id) else {
                continue;
            };
            score = score.saturating_add(advance_value(frame.stones));
            level = level.min(frame.cost);
            if frame.cost == 1 {
                nforce = nforce.saturating_add(1);
            }
        } else {
            // A completed member is already counted through its own seed
            let threat = combos.threat_at(id, pos);
            if threat == Threat::Win {
                continue;
            }
            if let Some(l) = threat.level() {
                level = level.min(l);
            }
            if threat == Threat::Forced {
                nforce = nforce.saturating_add(1);
            }
            score = score.saturating_add(threat.bonus());
        }
    }

    CellValue {
        score,
        level: if level == u8::MAX { 0 } else { level },
        nforce,
    }
}

/// Recompute the cached values of every cell for the color of `combos`.
///
/// Occupied cells and cells no combo touches are left at zero, so a color
/// with no open frame ends up with an all-zero cache.
pub fn refresh_cell_values(board: &mut Board, combos: &ComboSet) {
    let color = combos.color();
    board.clear_values(color);
    let values: Vec<(Pos, CellValue)> = board
        .empty_cells()
        .map(|pos| (pos, cell_value(combos, pos)))
        .collect();
    for (pos, value) in values {
        board.set_value(pos, color, value);
    }
}
