//! Five-in-a-row engine built on frames and combos
//!
//! Rules are the plain ones: 19x19 board, Black moves first, the first
//! player with five stones in a row wins (overlines count), and a full board
//! with no winner is a tie.
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board store, coordinates and the per-cell value cache
//! - [`frames`]: Every five-cell window on the board, their overlap matrix
//!   and per-game stone counts
//! - [`eval`]: Combination engine that finds threats built from frames
//! - [`engine`]: Game session and move selection
//! - [`console`]: Line-oriented text driver used by the binary
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{Engine, MoveResult, Pos, Stone};
//!
//! let mut engine = Engine::new();
//! let opening = engine.pick_move(Stone::Black).unwrap();
//! assert_eq!(opening, Pos::CENTER);
//! assert_eq!(engine.apply_move(Stone::Black, opening), MoveResult::Continue);
//!
//! let reply = engine.pick_move(Stone::White).unwrap();
//! println!("White plays {reply}");
//! ```
//!
//! # Move Priority
//!
//! The selector ranks empty cells by:
//! 1. Completing a frame
//! 2. Blocking the opponent's completion
//! 3. Creating a double threat
//! 4. Breaking up the opponent's double threat
//! 5. Combined build and block score

pub mod board;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod eval;
pub mod frames;
pub mod movelog;

// Re-export commonly used types for convenience
pub use board::{Board, Direction, Pos, Stone, BOARD_SIZE, WIN_LENGTH};
pub use config::EngineConfig;
pub use engine::{Engine, GameStatus, MoveChoice, MoveResult, PickReason};
pub use error::{BoardError, ParseError};
pub use frames::{FrameId, FrameTable, Geometry};
