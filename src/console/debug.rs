//! Debug commands for the text console
//!
//! Entered at the move prompt with a leading `:`:
//!
//! | command               | effect                                      |
//! |-----------------------|---------------------------------------------|
//! | `b`                   | take back the last move                     |
//! | `f`                   | replay a taken-back move                    |
//! | `s[b\|w]`             | suggest a move (default: side to move)      |
//! | `p<cell>`             | print cached values at a cell               |
//! | `o<cell><d>,<cell><d>`| overlap of two frames, `d` one of `- \ \| /`|
//! | `e[n]<cell>`          | combos using a cell, optionally `n` frames  |
//! | `l[file]`             | list moves, or dump moves and board to file |
//! | `d<n>`                | set debug level                             |
//! | `q`                   | quit                                        |

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use thiserror::Error;

use crate::board::{CoordError, Direction, Pos, Stone};
use crate::engine::Engine;
use crate::eval::ComboSet;
use crate::frames::{Frame, FrameStatus};

/// A parsed debug command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugCommand {
    Back,
    Forward,
    Suggest(Option<Stone>),
    Values(Pos),
    Overlap((Pos, Direction), (Pos, Direction)),
    Combos { frames: Option<usize>, pos: Pos },
    List(Option<PathBuf>),
    Level(u8),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error(transparent)]
    Coord(#[from] CoordError),
    #[error("expected a direction (one of - \\ | /) after `{0}`")]
    Direction(String),
    #[error("expected `<cell><dir>,<cell><dir>`")]
    OverlapSyntax,
    #[error("bad debug level `{0}`")]
    Level(String),
    #[error("bad frame count `{0}`")]
    FrameCount(String),
}

impl FromStr for DebugCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let Some(head) = chars.next() else {
            return Err(CommandError::Unknown(String::new()));
        };
        let rest = chars.as_str().trim();

        match head {
            'b' if rest.is_empty() => Ok(Self::Back),
            'f' if rest.is_empty() => Ok(Self::Forward),
            'q' if rest.is_empty() => Ok(Self::Quit),
            's' => match rest {
                "" => Ok(Self::Suggest(None)),
                "b" => Ok(Self::Suggest(Some(Stone::Black))),
                "w" => Ok(Self::Suggest(Some(Stone::White))),
                _ => Err(CommandError::Unknown(s.to_string())),
            },
            'p' => Ok(Self::Values(rest.parse()?)),
            'o' => {
                let (a, b) = rest.split_once(',').ok_or(CommandError::OverlapSyntax)?;
                Ok(Self::Overlap(frame_ref(a)?, frame_ref(b)?))
            }
            'e' => {
                let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
                let frames = match &rest[..digits] {
                    "" => None,
                    n => Some(
                        n.parse()
                            .map_err(|_| CommandError::FrameCount(n.to_string()))?,
                    ),
                };
                Ok(Self::Combos {
                    frames,
                    pos: rest[digits..].parse()?,
                })
            }
            'l' => Ok(Self::List((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            'd' => rest
                .parse()
                .map(Self::Level)
                .map_err(|_| CommandError::Level(rest.to_string())),
            _ => Err(CommandError::Unknown(s.to_string())),
        }
    }
}

/// `K10|` style reference to the frame anchored at a cell
fn frame_ref(s: &str) -> Result<(Pos, Direction), CommandError> {
    let s = s.trim();
    let dir = s
        .chars()
        .last()
        .and_then(Direction::from_symbol)
        .ok_or_else(|| CommandError::Direction(s.to_string()))?;
    let cell = &s[..s.len() - 1];
    Ok((cell.parse()?, dir))
}

/// Log filter for a debug level
pub fn level_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logger that lets every record through.
///
/// Verbosity is left to `log::max_level`, which `d<n>` changes at run time.
/// `RUST_LOG` directives still apply on top.
pub fn logger() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Trace).parse_default_env();
    builder
}

/// Run an inspection command and write its report.
///
/// `Back`, `Forward` and `Level` change state; `Quit` is left to the caller.
pub fn execute<W: Write>(engine: &mut Engine, cmd: &DebugCommand, out: &mut W) -> io::Result<()> {
    match cmd {
        DebugCommand::Back => match engine.undo() {
            Some(pos) => writeln!(out, "took back {pos}")?,
            None => writeln!(out, "no move to take back")?,
        },
        DebugCommand::Forward => match engine.redo() {
            Some(result) => writeln!(out, "forward: {result:?}")?,
            None => writeln!(out, "no move to replay")?,
        },
        DebugCommand::Suggest(color) => {
            let color = color.unwrap_or_else(|| engine.to_move());
            let choice = engine.pick_move_with_stats(color);
            let cell = choice.best_move.map_or_else(|| "none".to_string(), |p| p.to_string());
            writeln!(
                out,
                "suggest {} {} ({:?}, score {}, {} combos, {}ms)",
                stone_letter(color),
                cell,
                choice.reason,
                choice.score,
                choice.combos,
                choice.time_ms
            )?;
        }
        DebugCommand::Values(pos) => write_values(engine, *pos, out)?,
        DebugCommand::Overlap(a, b) => {
            let frames = &engine.geometry().frames;
            let fa = frames.anchored_at(a.0)[a.1.index()];
            let fb = frames.anchored_at(b.0)[b.1.index()];
            let (Some(fa), Some(fb)) = (fa, fb) else {
                writeln!(out, "no such frame")?;
                return Ok(());
            };
            let overlap = engine.geometry().overlap.get(fa, fb);
            write!(out, "overlap {}{},{}{} = ", a.0, a.1.symbol(), b.0, b.1.symbol())?;
            if overlap.shared == 0 {
                writeln!(out, "none")?;
            } else {
                let cells: Vec<String> = engine
                    .geometry()
                    .overlap
                    .shared_cells(frames, fa, fb)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                writeln!(out, "{} shared ({})", overlap.shared, cells.join(" "))?;
            }
        }
        DebugCommand::Combos { frames, pos } => {
            for color in [Stone::Black, Stone::White] {
                let set = engine.combos(color);
                for &id in set.combos_at(*pos) {
                    let size = set.combo(id).members.len();
                    if frames.map_or(true, |n| n == size) {
                        writeln!(out, "{}", describe_combo(engine, set, id, *pos))?;
                    }
                }
            }
        }
        DebugCommand::List(None) => {
            for (i, pos) in engine.board().moves().iter().enumerate() {
                writeln!(out, "{:3} {}", i + 1, pos)?;
            }
        }
        DebugCommand::List(Some(path)) => match File::create(path) {
            Ok(mut file) => {
                for pair in engine.board().moves().chunks(2) {
                    match pair {
                        [b, w] => writeln!(file, "{b} {w}")?,
                        [b] => writeln!(file, "{b}")?,
                        _ => {}
                    }
                }
                write!(file, "{}", engine.board())?;
            }
            Err(err) => writeln!(out, "cannot create {}: {}", path.display(), err)?,
        },
        DebugCommand::Level(level) => {
            log::set_max_level(level_filter(*level));
            writeln!(out, "Debug set to {level}")?;
        }
        DebugCommand::Quit => {}
    }
    Ok(())
}

fn stone_letter(color: Stone) -> char {
    match color {
        Stone::Black => 'B',
        Stone::White => 'W',
        Stone::Empty => '.',
    }
}

fn write_values<W: Write>(engine: &Engine, pos: Pos, out: &mut W) -> io::Result<()> {
    let board = engine.board();
    let b = board.value(pos, Stone::Black);
    let w = board.value(pos, Stone::White);
    writeln!(
        out,
        "V {} {}/{} {} {}/{} {}",
        pos, b.score, b.level, b.nforce, w.score, w.level, w.nforce
    )?;

    let anchored = engine.geometry().frames.anchored_at(pos);
    for color in [Stone::Black, Stone::White] {
        let mut line = format!("F{} {}", stone_letter(color), pos);
        for id in anchored {
            let status = match id.map(|id| engine.frame_states().status(id, color)) {
                None => "-".to_string(),
                Some(FrameStatus::Blocked) => "x".to_string(),
                Some(FrameStatus::Won) => "5".to_string(),
                Some(FrameStatus::Open { cost, stones }) => format!("{stones}/{cost}"),
            };
            let _ = write!(line, " {status}");
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn describe_combo(engine: &Engine, set: &ComboSet, id: usize, pos: Pos) -> String {
    let combo = set.combo(id);
    let frames: Vec<String> = combo
        .members
        .iter()
        .map(|&f| {
            let frame: &Frame = engine.geometry().frames.frame(f);
            frame.to_string()
        })
        .collect();
    format!(
        "{} {} cost {} value {} threat {:?}",
        stone_letter(set.color()),
        frames.join(","),
        combo.cost,
        combo.value,
        set.threat_at(id, pos)
    )
}
