//! Threat evaluation for Gomoku positions
//!
//! This module turns frame state into move values:
//! - Combo search over open frames (single frames, double threats, four-threes)
//! - Per-cell aggregation into the board's value cache
//! - Scoring weights

pub mod combo;
pub mod patterns;
pub mod values;

pub use combo::{Combo, ComboId, ComboSet, OpenFrame, Threat};
pub use patterns::{advance_value, frame_value, FrameScore};
pub use values::{cell_value, refresh_cell_values};
