//! Combination engine: chains of frames that form compound threats
//!
//! For one color the search runs in three steps:
//!
//! 1. **Classify** every frame against current occupancy. Blocked and won
//!    frames are dropped.
//! 2. **Seed** one single-frame combo per open frame. Its cost is the number
//!    of empty cells left and its value grows with the stones already in it.
//! 3. **Extend** combos breadth first. A combo absorbs an overlapping open
//!    frame when the two share an empty cell (one move advances both). The
//!    result is kept only if its value per cost strictly improves on the
//!    combo it grew from, and growth stops at `max_combo_frames` members.
//!
//! The combos live in a per-turn arena ([`ComboSet`]) indexed by id; every
//! reference between combos, frames and cells is an integer index.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use crate::board::{Bitboard, Board, Pos, Stone, TOTAL_CELLS};
use crate::config::EngineConfig;
use crate::frames::{FrameId, FrameStates, FrameStatus, Geometry, FRAME_COUNT};

use super::patterns::{frame_value, FrameScore};

/// Index of a combo inside its [`ComboSet`]
pub type ComboId = usize;

/// What playing a cell does for a combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Threat {
    None,
    /// Two members end up within two moves of completion
    Pressing,
    /// Two members end up one move from completion on different cells
    Forced,
    /// A member is completed
    Win,
}

impl Threat {
    /// Moves until the color has an unstoppable line, if this is a threat
    #[inline]
    pub fn level(self) -> Option<u8> {
        match self {
            Threat::Win => Some(1),
            Threat::Forced => Some(2),
            Threat::Pressing => Some(3),
            Threat::None => None,
        }
    }

    #[inline]
    pub fn bonus(self) -> i32 {
        match self {
            Threat::Forced => FrameScore::FORCED,
            Threat::Pressing => FrameScore::PRESSING,
            Threat::Win | Threat::None => 0,
        }
    }
}

/// An open frame as seen by the combo search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFrame {
    pub id: FrameId,
    /// Empty cells still to fill
    pub empties: Bitboard,
    pub cost: u8,
    pub stones: u8,
}

impl OpenFrame {
    /// Moves left on this frame after playing `pos`, and the last cell when
    /// exactly one remains
    fn after(&self, pos: Pos) -> (u8, Option<Pos>) {
        let mut rest = self.empties;
        rest.clear(pos);
        let left = rest.count() as u8;
        let last = if left == 1 { rest.iter_ones().next() } else { None };
        (left, last)
    }
}

/// A set of frames of one color that together form a threat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    /// Member frames in id order
    pub members: Vec<FrameId>,
    /// Union of the members' empty cells
    pub empties: Bitboard,
    /// Moves needed to fill every member
    pub cost: u8,
    pub value: i32,
    /// Combo this one was extended from
    pub parent: Option<ComboId>,
}

impl Combo {
    /// Compare by value per cost, higher first
    fn cmp_ratio(&self, other: &Combo) -> Ordering {
        let lhs = self.value as i64 * other.cost.max(1) as i64;
        let rhs = other.value as i64 * self.cost.max(1) as i64;
        rhs.cmp(&lhs)
    }
}

/// All combos of one color for the current position
#[derive(Debug, Clone)]
pub struct ComboSet {
    color: Stone,
    combos: Vec<Combo>,
    /// Open frames by frame id
    open: Vec<Option<OpenFrame>>,
    /// Combos with an empty cell at each board cell
    by_cell: Vec<Vec<ComboId>>,
}

impl ComboSet {
    /// Run the threat search for `color`.
    pub fn build(
        geometry: &Geometry,
        board: &Board,
        states: &FrameStates,
        color: Stone,
        config: &EngineConfig,
    ) -> Self {
        let open = classify(geometry, board, states, color);
        let mut set = Self {
            color,
            combos: Vec::new(),
            open,
            by_cell: vec![Vec::new(); TOTAL_CELLS],
        };

        let frontier = set.seed(config);
        set.extend(geometry, frontier, config);
        set.index_cells();

        log::trace!(
            "{:?}: {} open frames, {} combos",
            color,
            set.open.iter().flatten().count(),
            set.combos.len()
        );
        set
    }

    /// One combo per open frame; returns the seeds worth extending
    fn seed(&mut self, config: &EngineConfig) -> Vec<ComboId> {
        let mut frontier = Vec::new();
        for frame in self.open.iter().flatten() {
            let id = self.combos.len();
            self.combos.push(Combo {
                members: vec![frame.id],
                empties: frame.empties,
                cost: frame.cost,
                value: frame_value(frame.stones),
                parent: None,
            });
            if is_combinable(frame, config) {
                frontier.push(id);
            }
        }
        frontier
    }

    /// Breadth-first growth of the frontier, one member per round
    fn extend(&mut self, geometry: &Geometry, mut frontier: Vec<ComboId>, config: &EngineConfig) {
        let mut seen: FxHashSet<Vec<FrameId>> = FxHashSet::default();

        for _ in 1..config.max_combo_frames {
            let mut next = Vec::new();
            for &base_id in &frontier {
                let base = self.combos[base_id].clone();
                let candidates = self.candidates(geometry, &base, config);
                for frame in candidates {
                    let mut members = base.members.clone();
                    let at = members.partition_point(|&m| m < frame.id);
                    members.insert(at, frame.id);
                    if !seen.insert(members.clone()) {
                        continue;
                    }

                    let empties = base.empties.union(&frame.empties);
                    let mut combo = Combo {
                        members,
                        empties,
                        cost: empties.count() as u8,
                        value: 0,
                        parent: Some(base_id),
                    };
                    combo.value = self.combo_value(&combo);

                    if combo.cmp_ratio(&base) == Ordering::Less {
                        next.push(self.combos.len());
                        self.combos.push(combo);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
    }

    /// Open frames that overlap a member of `base` on one of its empty cells
    fn candidates(
        &self,
        geometry: &Geometry,
        base: &Combo,
        config: &EngineConfig,
    ) -> Vec<OpenFrame> {
        let mut found: Vec<OpenFrame> = Vec::new();
        for &member in &base.members {
            for &partner in geometry.overlap.partners(member) {
                if base.members.binary_search(&partner).is_ok()
                    || found.iter().any(|f| f.id == partner)
                {
                    continue;
                }
                let Some(frame) = self.open[partner.index()] else {
                    continue;
                };
                if is_combinable(&frame, config) && frame.empties.intersects(&base.empties) {
                    found.push(frame);
                }
            }
        }
        found.sort_by_key(|f| f.id);
        found
    }

    /// Sum of member values plus the bonus of the best threat the combo can make
    fn combo_value(&self, combo: &Combo) -> i32 {
        let base: i32 = combo
            .members
            .iter()
            .map(|&m| self.open_frame(m).map_or(0, |f| frame_value(f.stones)))
            .sum();
        let best = combo
            .empties
            .iter_ones()
            .map(|pos| self.threat_of(combo, pos))
            .max()
            .unwrap_or(Threat::None);
        base.saturating_add(best.bonus())
    }

    fn index_cells(&mut self) {
        for (id, combo) in self.combos.iter().enumerate() {
            for pos in combo.empties.iter_ones() {
                self.by_cell[pos.to_index()].push(id);
            }
        }
    }

    /// What playing `pos` does for the combo `id`
    pub fn threat_at(&self, id: ComboId, pos: Pos) -> Threat {
        self.threat_of(&self.combos[id], pos)
    }

    fn threat_of(&self, combo: &Combo, pos: Pos) -> Threat {
        let mut last_cells = Bitboard::new();
        let mut near = 0;
        for &m in &combo.members {
            let Some(frame) = self.open_frame(m) else {
                continue;
            };
            match frame.after(pos) {
                (0, _) => return Threat::Win,
                (1, last) => {
                    if let Some(cell) = last {
                        last_cells.set(cell);
                    }
                    near += 1;
                }
                (2, _) => near += 1,
                _ => {}
            }
        }

        if last_cells.count() >= 2 {
            Threat::Forced
        } else if near >= 2 {
            Threat::Pressing
        } else {
            Threat::None
        }
    }

    #[inline]
    pub fn color(&self) -> Stone {
        self.color
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    #[inline]
    pub fn combo(&self, id: ComboId) -> &Combo {
        &self.combos[id]
    }

    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    /// Open-frame view of a frame, `None` if blocked or won
    #[inline]
    pub fn open_frame(&self, id: FrameId) -> Option<&OpenFrame> {
        self.open[id.index()].as_ref()
    }

    /// Combos that playing `pos` would advance
    #[inline]
    pub fn combos_at(&self, pos: Pos) -> &[ComboId] {
        &self.by_cell[pos.to_index()]
    }

    /// Combo ids, strongest first.
    ///
    /// Value per cost descending, then fewer members, then the members that
    /// come first in frame order.
    pub fn ranked(&self) -> Vec<ComboId> {
        let mut ids: Vec<ComboId> = (0..self.combos.len()).collect();
        ids.sort_by(|&a, &b| {
            let (ca, cb) = (&self.combos[a], &self.combos[b]);
            ca.cmp_ratio(cb)
                .then_with(|| ca.members.len().cmp(&cb.members.len()))
                .then_with(|| ca.members.cmp(&cb.members))
        });
        ids
    }
}

/// Open frames for `color`, indexed by frame id
fn classify(
    geometry: &Geometry,
    board: &Board,
    states: &FrameStates,
    color: Stone,
) -> Vec<Option<OpenFrame>> {
    let mut open = vec![None; FRAME_COUNT];
    for frame in geometry.frames.all_frames() {
        if let FrameStatus::Open { cost, stones } = states.status(frame.id, color) {
            let empties: Bitboard = frame
                .cells
                .iter()
                .copied()
                .filter(|&c| board.is_empty(c))
                .collect();
            debug_assert_eq!(empties.count(), cost as u32, "frame {} out of sync", frame.id);
            open[frame.id.index()] = Some(OpenFrame {
                id: frame.id,
                empties,
                cost,
                stones,
            });
        }
    }
    open
}

/// Frames close enough to completion to take part in a multi-frame combo
#[inline]
fn is_combinable(frame: &OpenFrame, config: &EngineConfig) -> bool {
    frame.stones > 0 && frame.cost <= config.max_combine_cost
}
