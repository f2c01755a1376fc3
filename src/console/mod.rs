//! Line-oriented text driver
//!
//! Plays one or more games between users on the input stream and the
//! engine. Interactive mode prompts, prints the board after every move and
//! accepts debug commands; background mode speaks a bare protocol (a color
//! line, then one coordinate per move) so another program can drive it.

pub mod debug;

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};

use crate::board::{Pos, Stone};
use crate::engine::{Engine, MoveResult};

pub use debug::{level_filter, logger, CommandError, DebugCommand};

/// Who plays whom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    #[default]
    UserVsProgram,
    UserVsUser,
    ProgramVsProgram,
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleOptions {
    /// Bare protocol instead of prompts
    pub background: bool,
    pub mode: PlayMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Player {
    User,
    Program,
}

/// What a turn produced
enum Turn {
    Play(Pos),
    Resign,
    Quit,
    /// Board changed under the prompt (back/forward), re-read whose turn it is
    Rewound,
}

/// How a game ended
enum GameEnd {
    Over(MoveResult, Player),
    Resigned,
    Quit,
}

pub struct Console<R, W> {
    engine: Engine,
    input: R,
    out: W,
    options: ConsoleOptions,
    /// Moves from a saved game, played before anyone is asked
    replay: VecDeque<Pos>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(engine: Engine, input: R, out: W, options: ConsoleOptions) -> Self {
        Self {
            engine,
            input,
            out,
            options,
            replay: VecDeque::new(),
        }
    }

    /// Queue moves of a saved game for the first game played.
    pub fn with_replay(mut self, moves: Vec<Pos>) -> Self {
        self.replay = moves.into();
        self
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Play games until the user quits or declines a replay.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.engine.new_game();
            let Some(user_color) = self.choose_color()? else {
                return Ok(());
            };
            let players = self.players(user_color);

            if !self.options.background {
                writeln!(self.out, "{}", self.engine.board())?;
            }
            match self.play_game(players)? {
                GameEnd::Quit | GameEnd::Resigned => return Ok(()),
                GameEnd::Over(result, mover) => {
                    if self.options.background {
                        return Ok(());
                    }
                    match result {
                        MoveResult::Win if mover == Player::Program => {
                            writeln!(self.out, "Ha ha, I won")?
                        }
                        MoveResult::Win => writeln!(self.out, "Rats! you won")?,
                        MoveResult::Tie => writeln!(self.out, "Wow! it's a tie")?,
                        MoveResult::Illegal => writeln!(self.out, "Illegal move")?,
                        MoveResult::Continue => {}
                    }
                }
            }
            if !self.ask_replay()? {
                return Ok(());
            }
        }
    }

    /// Color the user plays in user-vs-program games. `None` on end of input.
    fn choose_color(&mut self) -> Result<Option<Stone>> {
        if self.options.background {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            return match line.as_str() {
                "black" => Ok(Some(Stone::Black)),
                "white" => Ok(Some(Stone::White)),
                other => {
                    writeln!(self.out, "resign")?;
                    bail!("Huh?  Expected `black' or `white', got `{other}'")
                }
            };
        }

        if !self.replay.is_empty() || self.options.mode != PlayMode::UserVsProgram {
            return Ok(Some(Stone::Black));
        }
        loop {
            self.ask("black or white? ")?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.chars().next() {
                Some('b' | 'B') => return Ok(Some(Stone::Black)),
                Some('w' | 'W') => return Ok(Some(Stone::White)),
                _ => writeln!(self.out, "Black moves first. Please enter `black' or `white'")?,
            }
        }
    }

    /// Players indexed by [`Stone::index`]
    fn players(&self, user: Stone) -> [Player; 2] {
        match self.options.mode {
            PlayMode::UserVsUser => [Player::User; 2],
            PlayMode::ProgramVsProgram => [Player::Program; 2],
            PlayMode::UserVsProgram if user == Stone::Black => [Player::User, Player::Program],
            PlayMode::UserVsProgram => [Player::Program, Player::User],
        }
    }

    fn play_game(&mut self, mut players: [Player; 2]) -> Result<GameEnd> {
        let mut from_file = !self.replay.is_empty();
        loop {
            let color = self.engine.to_move();
            // The user takes over whichever side is to move once the saved game runs out
            if from_file && self.replay.is_empty() {
                from_file = false;
                if self.options.mode == PlayMode::UserVsProgram {
                    players = self.players(color);
                }
            }
            let player = players[color.index()];

            let turn = if let Some(pos) = self.replay.pop_front() {
                Turn::Play(pos)
            } else {
                match player {
                    Player::User => self.user_turn()?,
                    Player::Program => match self.engine.pick_move(color) {
                        Some(pos) => Turn::Play(pos),
                        None => Turn::Resign,
                    },
                }
            };

            let pos = match turn {
                Turn::Play(pos) => pos,
                Turn::Resign => {
                    if player == Player::Program && self.options.background {
                        writeln!(self.out, "resign")?;
                    }
                    return Ok(GameEnd::Resigned);
                }
                Turn::Quit => return Ok(GameEnd::Quit),
                Turn::Rewound => continue,
            };

            if self.options.background {
                if player == Player::Program {
                    writeln!(self.out, "{pos}")?;
                    self.out.flush()?;
                }
            } else {
                let movenum = self.engine.board().stone_count() + 1;
                match color {
                    Stone::White => writeln!(self.out, "{movenum:3}        {pos}")?,
                    _ => writeln!(self.out, "{movenum:3} {pos}")?,
                }
            }

            let result = self.engine.apply_move(color, pos);
            if !self.options.background && result != MoveResult::Illegal {
                writeln!(self.out, "{}", self.engine.board())?;
            }
            if result != MoveResult::Continue {
                return Ok(GameEnd::Over(result, player));
            }
        }
    }

    fn user_turn(&mut self) -> Result<Turn> {
        loop {
            if !self.options.background {
                self.ask("move? ")?;
            }
            let Some(line) = self.read_line()? else {
                return Ok(Turn::Resign);
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "resign" {
                return Ok(Turn::Resign);
            }
            if self.options.background {
                return match line.parse() {
                    Ok(pos) => Ok(Turn::Play(pos)),
                    Err(err) => bail!("bad move `{line}`: {err}"),
                };
            }

            if line == "save" {
                self.save()?;
                continue;
            }
            if let Some(cmd) = line.strip_prefix(':') {
                match cmd.parse::<DebugCommand>() {
                    Ok(DebugCommand::Quit) => return Ok(Turn::Quit),
                    Ok(cmd) => {
                        debug::execute(&mut self.engine, &cmd, &mut self.out)?;
                        if matches!(cmd, DebugCommand::Back | DebugCommand::Forward) {
                            writeln!(self.out, "{}", self.engine.board())?;
                            return Ok(Turn::Rewound);
                        }
                    }
                    Err(err) => writeln!(self.out, "{err}")?,
                }
                continue;
            }

            match line.parse::<Pos>() {
                Ok(pos) if self.engine.board().is_empty(pos) => return Ok(Turn::Play(pos)),
                Ok(_) => writeln!(self.out, "Illegal move")?,
                Err(err) => writeln!(self.out, "{err}")?,
            }
        }
    }

    /// "replay?" prompt; `save` writes the finished game and asks again.
    fn ask_replay(&mut self) -> Result<bool> {
        loop {
            self.ask("replay? ")?;
            let Some(line) = self.read_line()? else {
                return Ok(false);
            };
            if line == "save" {
                self.save()?;
                continue;
            }
            return Ok(matches!(line.chars().next(), Some('y' | 'Y')));
        }
    }

    fn save(&mut self) -> Result<()> {
        self.ask("save file name? ")?;
        let Some(name) = self.read_line()? else {
            return Ok(());
        };
        match File::create(name.trim()) {
            Ok(mut file) => self.engine.write_move_log(&mut file)?,
            Err(err) => {
                log::warn!("cannot create {}: {}", name, err);
                writeln!(self.out, "cannot create save file")?;
            }
        }
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> io::Result<()> {
        write!(self.out, "{prompt}")?;
        self.out.flush()
    }

    /// Next input line without its line ending, `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str, options: ConsoleOptions) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(
            Engine::new(),
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            options,
        )
    }

    fn output(console: &Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.out.clone()).unwrap()
    }

    #[test]
    fn test_background_program_answers_each_move() {
        let options = ConsoleOptions {
            background: true,
            mode: PlayMode::UserVsProgram,
        };
        let mut c = console("white\nA1\n", options);
        c.run().unwrap();

        let out = output(&c);
        let lines: Vec<&str> = out.lines().collect();
        // Program opens as Black, answers A1, then the user runs out of input
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "K10");
        assert_eq!(c.engine().board().stone_count(), 3);
        assert_eq!(c.engine().board().get(Pos::new(0, 0)), Stone::White);
    }

    #[test]
    fn test_background_rejects_bad_color() {
        let options = ConsoleOptions {
            background: true,
            ..Default::default()
        };
        let mut c = console("purple\n", options);
        assert!(c.run().is_err());
        assert_eq!(output(&c), "resign\n");
    }

    #[test]
    fn test_user_vs_user_win() {
        let options = ConsoleOptions {
            background: false,
            mode: PlayMode::UserVsUser,
        };
        let moves = "A1\nA2\nB1\nB2\nC1\nC2\nD1\nD2\nE1\nn\n";
        let mut c = console(moves, options);
        c.run().unwrap();

        let out = output(&c);
        assert!(out.contains("Rats! you won"));
        assert!(out.contains("replay? "));
        assert_eq!(c.engine().board().stone_count(), 9);
    }

    #[test]
    fn test_occupied_cell_is_reprompted() {
        let options = ConsoleOptions {
            background: false,
            mode: PlayMode::UserVsUser,
        };
        let mut c = console("K10\nK10\nK11\nresign\n", options);
        c.run().unwrap();

        assert!(output(&c).contains("Illegal move"));
        assert_eq!(c.engine().board().stone_count(), 2);
    }

    #[test]
    fn test_debug_back_and_quit() {
        let options = ConsoleOptions {
            background: false,
            mode: PlayMode::UserVsUser,
        };
        let mut c = console("K10\nK11\n:b\n:sb\n:q\n", options);
        c.run().unwrap();

        let out = output(&c);
        assert!(out.contains("took back K11"));
        assert!(out.contains("suggest B"));
        assert_eq!(c.engine().board().stone_count(), 1);
    }

    #[test]
    fn test_replay_then_program_plays() {
        let options = ConsoleOptions {
            background: false,
            mode: PlayMode::ProgramVsProgram,
        };
        let saved = Engine::deserialize("A1\nT19\nA2\nT18\n").unwrap();
        let mut c = console("n\n", options).with_replay(saved);
        c.run().unwrap();

        let board = c.engine().board();
        assert_eq!(board.moves()[..4], [
            Pos::new(0, 0),
            Pos::new(18, 18),
            Pos::new(1, 0),
            Pos::new(17, 18),
        ]);
        assert!(board.stone_count() > 4);
        assert!(output(&c).contains("replay? "));
    }

    #[test]
    fn test_user_takes_side_to_move_after_saved_game() {
        let options = ConsoleOptions::default();
        let saved = Engine::deserialize("A1\nT19\nA2\n").unwrap();
        let mut c = console("B5\nresign\n", options).with_replay(saved);
        c.run().unwrap();

        let board = c.engine().board();
        assert_eq!(board.moves()[3], Pos::new(4, 1));
        assert_eq!(board.get(Pos::new(4, 1)), Stone::White);
        assert_eq!(board.stone_count(), 5);
        assert!(!output(&c).contains("black or white? "));
    }

    #[test]
    fn test_color_prompt_repeats() {
        let options = ConsoleOptions::default();
        let mut c = console("green\nblack\nresign\n", options);
        c.run().unwrap();

        let out = output(&c);
        assert!(out.contains("Please enter `black' or `white'"));
        assert_eq!(out.matches("black or white? ").count(), 2);
        assert_eq!(c.engine().board().stone_count(), 0);
    }
}
