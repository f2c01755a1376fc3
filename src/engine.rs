//! Game session and move selection
//!
//! [`Engine`] owns everything that changes during one game: the board store,
//! the derived frame state and the latest combo sets for both colors. The
//! frame table and overlap matrix are shared, read-only [`Geometry`].
//!
//! Every mutation (`apply_move`, `undo`, `redo`, `new_game`) ends with a full
//! refresh of the combo sets and per-cell cache, so a decision is never made
//! from stale values.
//!
//! # Move selection
//!
//! Each empty cell is ranked by, in order:
//! 1. **Urgency**: own completion, blocking the opponent's completion, own
//!    forcing combo, blocking the opponent's forcing combo
//! 2. **Score**: own cached value plus the opponent's (build and block)
//! 3. Membership in either side's top-ranked combo
//! 4. Proximity to the center, then cell order
//!
//! # Example
//!
//! ```
//! use gomoku::{Engine, MoveResult, Pos, Stone};
//!
//! let mut engine = Engine::new();
//! assert_eq!(engine.apply_move(Stone::Black, Pos::CENTER), MoveResult::Continue);
//!
//! let reply = engine.pick_move(Stone::White).expect("board has room");
//! assert_ne!(reply, Pos::CENTER);
//! ```

use std::cmp::Reverse;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use crate::board::{Bitboard, Board, CellValue, Pos, Stone};
use crate::config::EngineConfig;
use crate::error::ParseError;
use crate::eval::{refresh_cell_values, ComboSet};
use crate::frames::{FrameStates, FrameStatus, Geometry};
use crate::movelog;

/// Outcome of applying one move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// Game goes on
    Continue,
    /// The mover completed a frame
    Win,
    /// Board is full with no winner
    Tie,
    /// Move rejected; nothing changed
    Illegal,
}

/// Where the game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Stone),
    Tie,
}

/// Why the selector picked a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PickReason {
    /// Highest combined score, nothing urgent on the board
    Heuristic,
    /// Breaks up an opponent double threat before it is made
    BlockForce,
    /// Creates a double threat
    Force,
    /// Stops the opponent completing a frame
    Block,
    /// Completes a frame
    Win,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveChoice {
    /// Best move found; `None` only when the board is full
    pub best_move: Option<Pos>,
    pub reason: PickReason,
    /// Own plus opponent cached score at the chosen cell
    pub score: i64,
    /// Combos considered for both colors
    pub combos: usize,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

/// One game of five-in-a-row with a built-in opponent.
pub struct Engine {
    geometry: Arc<Geometry>,
    config: EngineConfig,
    board: Board,
    states: FrameStates,
    /// Latest combo sets, indexed by [`Stone::index`]
    combos: [ComboSet; 2],
    /// Move count the combo sets were built for
    built_at: usize,
    status: GameStatus,
    /// Moves taken back by `undo`, most recent last
    redo: Vec<(Pos, Stone)>,
}

impl Engine {
    /// Create an engine with default settings on the shared geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_geometry(Geometry::shared(), config)
    }

    /// Create an engine on an explicit geometry.
    #[must_use]
    pub fn with_geometry(geometry: Arc<Geometry>, config: EngineConfig) -> Self {
        let board = Board::new(&geometry.frames);
        let states = FrameStates::new();
        let combos = [
            ComboSet::build(&geometry, &board, &states, Stone::Black, &config),
            ComboSet::build(&geometry, &board, &states, Stone::White, &config),
        ];
        let mut engine = Self {
            geometry,
            config,
            board,
            states,
            combos,
            built_at: 0,
            status: GameStatus::InProgress,
            redo: Vec::new(),
        };
        engine.refresh();
        engine
    }

    /// Reset board, frame state and move log.
    pub fn new_game(&mut self) {
        self.board.initialize();
        self.states.reset();
        self.status = GameStatus::InProgress;
        self.redo.clear();
        self.refresh();
    }

    /// Apply a move from a human or a replay file.
    ///
    /// Illegal moves (occupied or off-board cell, no color, game already
    /// over) leave every piece of state untouched.
    pub fn apply_move(&mut self, color: Stone, pos: Pos) -> MoveResult {
        let result = self.play(color, pos);
        if result != MoveResult::Illegal {
            self.redo.clear();
        }
        result
    }

    fn play(&mut self, color: Stone, pos: Pos) -> MoveResult {
        if self.status != GameStatus::InProgress {
            log::warn!("move {:?} by {:?} after the game ended", pos, color);
            return MoveResult::Illegal;
        }

        let geometry = Arc::clone(&self.geometry);
        let frames = match self.board.occupy(pos, color, &geometry.frames) {
            Ok(frames) => frames,
            Err(err) => {
                log::warn!("illegal move by {:?}: {}", color, err);
                return MoveResult::Illegal;
            }
        };
        self.states.apply(frames, color);

        let won = frames
            .iter()
            .any(|&id| self.states.status(id, color) == FrameStatus::Won);
        let result = if won {
            self.status = GameStatus::Won(color);
            MoveResult::Win
        } else if self.board.is_full() {
            self.status = GameStatus::Tie;
            MoveResult::Tie
        } else {
            MoveResult::Continue
        };

        self.refresh();
        log::debug!(
            "move {} {:?} {} -> {:?}",
            self.board.stone_count(),
            color,
            pos,
            result
        );
        result
    }

    /// Take back the last move. Returns the cell that was emptied.
    pub fn undo(&mut self) -> Option<Pos> {
        let geometry = Arc::clone(&self.geometry);
        let (pos, stone, frames) = self.board.rollback(&geometry.frames)?;
        self.states.revert(frames, stone);
        self.status = GameStatus::InProgress;
        self.redo.push((pos, stone));
        self.refresh();
        log::debug!("undo {:?} {}", stone, pos);
        Some(pos)
    }

    /// Replay the last move taken back by [`Engine::undo`].
    pub fn redo(&mut self) -> Option<MoveResult> {
        let (pos, stone) = self.redo.pop()?;
        Some(self.play(stone, pos))
    }

    /// Choose a move for `color`.
    ///
    /// Deterministic for a given position. Returns `None` only when no
    /// empty cell is left.
    #[must_use]
    pub fn pick_move(&self, color: Stone) -> Option<Pos> {
        self.pick_move_with_stats(color).best_move
    }

    /// Choose a move for `color` and report why.
    #[must_use]
    pub fn pick_move_with_stats(&self, color: Stone) -> MoveChoice {
        let start = Instant::now();
        assert_eq!(
            self.built_at,
            self.board.stone_count(),
            "combo cache is stale"
        );

        let opponent = color.opponent();
        let top = self.top_combo_cells(color).union(&self.top_combo_cells(opponent));

        let best = self
            .board
            .empty_cells()
            .map(|pos| {
                let own = self.board.value(pos, color);
                let theirs = self.board.value(pos, opponent);
                let reason = urgency(own, theirs);
                let score = own.score as i64 + theirs.score as i64;
                let key = (
                    reason,
                    score,
                    top.get(pos),
                    Reverse(pos.center_distance()),
                    Reverse(pos.to_index()),
                );
                (key, pos)
            })
            .max_by(|a, b| a.0.cmp(&b.0));

        let choice = MoveChoice {
            best_move: best.map(|(_, pos)| pos),
            reason: best.map_or(PickReason::Heuristic, |(key, _)| key.0),
            score: best.map_or(0, |(key, _)| key.1),
            combos: self.combos[0].len() + self.combos[1].len(),
            time_ms: start.elapsed().as_millis() as u64,
        };
        log::debug!(
            "{:?} picks {:?} ({:?}, score {})",
            color,
            choice.best_move.map(|p| p.to_string()),
            choice.reason,
            choice.score
        );
        choice
    }

    /// Empty cells of the strongest multi-frame combo of `color`
    fn top_combo_cells(&self, color: Stone) -> Bitboard {
        let set = &self.combos[color.index()];
        set.ranked()
            .into_iter()
            .map(|id| set.combo(id))
            .find(|combo| combo.members.len() > 1)
            .map_or_else(Bitboard::new, |combo| combo.empties)
    }

    /// Rebuild both combo sets and the per-cell cache from current state
    fn refresh(&mut self) {
        for color in [Stone::Black, Stone::White] {
            let set = ComboSet::build(
                &self.geometry,
                &self.board,
                &self.states,
                color,
                &self.config,
            );
            refresh_cell_values(&mut self.board, &set);
            self.combos[color.index()] = set;
        }
        self.built_at = self.board.stone_count();
    }

    /// Move log in play order.
    #[must_use]
    pub fn serialize_move_log(&self) -> Vec<Pos> {
        self.board.moves().to_vec()
    }

    /// Write the move log, one coordinate per line.
    pub fn write_move_log<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(movelog::format_moves(self.board.moves()).as_bytes())
    }

    /// Parse a saved move log.
    pub fn deserialize(text: &str) -> Result<Vec<Pos>, ParseError> {
        movelog::parse_moves(text)
    }

    /// Apply a sequence of moves, alternating colors from the side to move.
    ///
    /// Stops at the first move that does not continue the game and returns
    /// its result.
    pub fn replay(&mut self, moves: &[Pos]) -> MoveResult {
        for &pos in moves {
            let result = self.apply_move(self.to_move(), pos);
            if result != MoveResult::Continue {
                return result;
            }
        }
        MoveResult::Continue
    }

    /// Color whose turn it is when colors alternate from Black
    #[must_use]
    pub fn to_move(&self) -> Stone {
        if self.board.stone_count() % 2 == 0 {
            Stone::Black
        } else {
            Stone::White
        }
    }

    #[must_use]
    pub fn outcome(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn frame_states(&self) -> &FrameStates {
        &self.states
    }

    /// Combo set of `color` for the current position
    #[must_use]
    pub fn combos(&self, color: Stone) -> &ComboSet {
        &self.combos[color.index()]
    }

    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Most pressing reason to play a cell, own threats first at equal rank
fn urgency(own: CellValue, theirs: CellValue) -> PickReason {
    let forcing = |v: CellValue| v.level == 2 && v.nforce > 0;
    if own.level == 1 {
        PickReason::Win
    } else if theirs.level == 1 {
        PickReason::Block
    } else if forcing(own) {
        PickReason::Force
    } else if forcing(theirs) {
        PickReason::BlockForce
    } else {
        PickReason::Heuristic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_SIZE, TOTAL_CELLS, WIN_LENGTH};
    use pretty_assertions::assert_eq;

    fn play_all(engine: &mut Engine, color: Stone, cells: &[(u8, u8)]) -> MoveResult {
        let mut last = MoveResult::Continue;
        for &(r, c) in cells {
            last = engine.apply_move(color, Pos::new(r, c));
        }
        last
    }

    #[test]
    fn test_engine_empty_board() {
        let engine = Engine::new();
        assert_eq!(engine.pick_move(Stone::Black), Some(Pos::CENTER));
        assert_eq!(engine.to_move(), Stone::Black);
        assert_eq!(engine.outcome(), GameStatus::InProgress);
    }

    #[test]
    fn test_engine_blocks_open_four() {
        let mut engine = Engine::new();
        play_all(&mut engine, Stone::Black, &[(9, 5), (9, 6), (9, 7), (9, 8)]);

        let choice = engine.pick_move_with_stats(Stone::White);
        let m = choice.best_move.expect("board has room");
        assert!(m == Pos::new(9, 4) || m == Pos::new(9, 9), "picked {m}");
        assert_eq!(choice.reason, PickReason::Block);
    }

    #[test]
    fn test_engine_prefers_win_over_block() {
        let mut engine = Engine::new();
        play_all(&mut engine, Stone::White, &[(3, 3), (4, 3), (5, 3), (6, 3)]);
        play_all(&mut engine, Stone::Black, &[(12, 5), (12, 6), (12, 7), (12, 8)]);

        let choice = engine.pick_move_with_stats(Stone::White);
        assert_eq!(choice.reason, PickReason::Win);
        let m = choice.best_move.unwrap();
        assert!(m == Pos::new(2, 3) || m == Pos::new(7, 3), "picked {m}");
        assert_eq!(engine.apply_move(Stone::White, m), MoveResult::Win);
    }

    #[test]
    fn test_engine_blocks_open_three() {
        let mut engine = Engine::new();
        play_all(&mut engine, Stone::Black, &[(9, 6), (9, 7), (9, 8)]);
        engine.apply_move(Stone::White, Pos::new(3, 3));

        let choice = engine.pick_move_with_stats(Stone::White);
        assert_eq!(choice.reason, PickReason::BlockForce);
        let m = choice.best_move.unwrap();
        assert_eq!(m.row, 9, "picked {m}");
        assert!((4..=10).contains(&m.col), "picked {m}");
    }

    #[test]
    fn test_engine_makes_double_threat() {
        let mut engine = Engine::new();
        // Two open threes meeting at an empty cell
        play_all(&mut engine, Stone::Black, &[(9, 6), (9, 7), (9, 8), (6, 9), (7, 9), (8, 9)]);
        play_all(&mut engine, Stone::White, &[(0, 0), (0, 18)]);

        let choice = engine.pick_move_with_stats(Stone::Black);
        assert!(choice.reason >= PickReason::Force, "{:?}", choice.reason);
    }

    #[test]
    fn test_every_frame_sample_wins_on_last_cell() {
        let geo = Geometry::shared();
        for frame in geo.frames.all_frames().iter().step_by(41) {
            let mut engine = Engine::new();
            for (i, &cell) in frame.cells.iter().enumerate() {
                let expected = if i + 1 == WIN_LENGTH {
                    MoveResult::Win
                } else {
                    MoveResult::Continue
                };
                assert_eq!(engine.apply_move(Stone::Black, cell), expected, "frame {frame}");
            }
            assert_eq!(engine.outcome(), GameStatus::Won(Stone::Black));
        }
    }

    #[test]
    fn test_full_board_without_five_is_tie() {
        let mut engine = Engine::new();
        let mut last = MoveResult::Continue;
        for idx in 0..TOTAL_CELLS {
            let pos = Pos::from_index(idx);
            // Runs of at most two in every direction
            let color = if (pos.row as usize + 2 * pos.col as usize) % 4 < 2 {
                Stone::Black
            } else {
                Stone::White
            };
            last = engine.apply_move(color, pos);
            if idx + 1 < TOTAL_CELLS {
                assert_eq!(last, MoveResult::Continue, "at {pos}");
            }
        }
        assert_eq!(last, MoveResult::Tie);
        assert_eq!(engine.outcome(), GameStatus::Tie);
        assert_eq!(engine.pick_move(Stone::Black), None);
    }

    #[test]
    fn test_occupied_move_is_illegal_and_changes_nothing() {
        let mut engine = Engine::new();
        engine.apply_move(Stone::Black, Pos::CENTER);
        engine.apply_move(Stone::White, Pos::new(9, 10));

        let board = engine.board().clone();
        let states = engine.frame_states().clone();

        assert_eq!(engine.apply_move(Stone::Black, Pos::new(9, 10)), MoveResult::Illegal);
        assert_eq!(engine.apply_move(Stone::White, Pos::CENTER), MoveResult::Illegal);
        assert_eq!(
            engine.apply_move(Stone::White, Pos { row: 19, col: 2 }),
            MoveResult::Illegal
        );
        assert_eq!(engine.apply_move(Stone::Empty, Pos::new(0, 0)), MoveResult::Illegal);

        assert_eq!(engine.board(), &board);
        assert_eq!(engine.frame_states(), &states);
    }

    #[test]
    fn test_moves_after_win_are_illegal() {
        let mut engine = Engine::new();
        let result = play_all(&mut engine, Stone::White, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        assert_eq!(result, MoveResult::Win);
        assert_eq!(engine.apply_move(Stone::Black, Pos::CENTER), MoveResult::Illegal);
        assert_eq!(engine.board().stone_count(), 5);
    }

    #[test]
    fn test_pick_move_is_deterministic_and_legal() {
        let mut engine = Engine::new();
        for _ in 0..24 {
            let color = engine.to_move();
            let first = engine.pick_move(color).expect("room left");
            assert_eq!(engine.pick_move(color), Some(first));
            assert!(engine.board().is_empty(first));
            if engine.apply_move(color, first) != MoveResult::Continue {
                break;
            }
        }
    }

    #[test]
    fn test_two_engines_play_identically() {
        let mut a = Engine::new();
        let mut b = Engine::new();
        for _ in 0..12 {
            let color = a.to_move();
            let ma = a.pick_move(color).unwrap();
            let mb = b.pick_move(color).unwrap();
            assert_eq!(ma, mb);
            a.apply_move(color, ma);
            b.apply_move(color, mb);
        }
    }

    #[test]
    fn test_undo_restores_fresh_state() {
        let fresh = Engine::new();
        let mut engine = Engine::new();
        let pos = Pos::new(4, 11);

        engine.apply_move(Stone::Black, pos);
        assert_eq!(engine.undo(), Some(pos));

        assert_eq!(engine.board(), fresh.board());
        assert_eq!(engine.frame_states(), fresh.frame_states());
        for color in [Stone::Black, Stone::White] {
            assert_eq!(engine.board().value(pos, color), fresh.board().value(pos, color));
        }
        assert_eq!(engine.undo(), None);
    }

    #[test]
    fn test_undo_after_win_reopens_game() {
        let mut engine = Engine::new();
        play_all(&mut engine, Stone::Black, &[(5, 5), (6, 6), (7, 7), (8, 8), (9, 9)]);
        assert_eq!(engine.outcome(), GameStatus::Won(Stone::Black));

        engine.undo();
        assert_eq!(engine.outcome(), GameStatus::InProgress);
        assert_eq!(engine.board().stone_count(), 4);
        assert_eq!(engine.redo(), Some(MoveResult::Win));
        assert_eq!(engine.redo(), None);
    }

    #[test]
    fn test_new_move_clears_redo() {
        let mut engine = Engine::new();
        engine.apply_move(Stone::Black, Pos::CENTER);
        engine.undo();
        engine.apply_move(Stone::Black, Pos::new(0, 0));
        assert_eq!(engine.redo(), None);
    }

    #[test]
    fn test_move_log_round_trip() {
        let mut engine = Engine::new();
        for _ in 0..10 {
            let color = engine.to_move();
            let m = engine.pick_move(color).unwrap();
            engine.apply_move(color, m);
        }

        let mut saved = Vec::new();
        engine.write_move_log(&mut saved).unwrap();
        let text = String::from_utf8(saved).unwrap();
        assert_eq!(text.lines().count(), 10);

        let moves = Engine::deserialize(&text).unwrap();
        assert_eq!(moves, engine.serialize_move_log());

        let mut replayed = Engine::new();
        assert_eq!(replayed.replay(&moves), MoveResult::Continue);
        for idx in 0..BOARD_SIZE * BOARD_SIZE {
            let pos = Pos::from_index(idx);
            assert_eq!(replayed.board().get(pos), engine.board().get(pos));
        }
    }

    #[test]
    fn test_new_game_resets() {
        let mut engine = Engine::new();
        engine.apply_move(Stone::Black, Pos::CENTER);
        engine.new_game();
        let fresh = Engine::new();
        assert_eq!(engine.board(), fresh.board());
        assert_eq!(engine.outcome(), GameStatus::InProgress);
    }

    #[test]
    fn test_depth_one_still_picks_legal_moves() {
        let mut engine = Engine::with_config(EngineConfig::with_depth(1));
        play_all(&mut engine, Stone::Black, &[(9, 5), (9, 6), (9, 7), (9, 8)]);
        let m = engine.pick_move(Stone::White).unwrap();
        assert!(m == Pos::new(9, 4) || m == Pos::new(9, 9));
    }
}
