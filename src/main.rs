//! Five-in-a-row on the terminal
//!
//! Plays against the frame/combo engine, or watches it play itself.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gomoku::console::{level_filter, logger, Console, ConsoleOptions, PlayMode};
use gomoku::{Engine, EngineConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play five-in-a-row against the computer", long_about = None)]
struct Args {
    /// Background mode: no prompts, read "black"/"white" then one move per line
    #[arg(short = 'b')]
    background: bool,

    /// Raise the debug level (repeat for more)
    #[arg(short = 'd', action = clap::ArgAction::Count)]
    debug: u8,

    /// Write debug output to this file
    #[arg(short = 'D', value_name = "FILE")]
    debug_log: Option<PathBuf>,

    /// User versus user
    #[arg(short = 'u', conflicts_with = "computer")]
    users: bool,

    /// Program versus program
    #[arg(short = 'c')]
    computer: bool,

    /// Largest number of frames combined into one threat
    #[arg(long, default_value_t = EngineConfig::default().max_combo_frames)]
    depth: usize,

    /// Saved game to replay before play starts
    input: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Result<()> {
    let mut builder = logger();
    if let Some(path) = &args.debug_log {
        let file = File::create(path)
            .with_context(|| format!("failed to open debug log {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    log::set_max_level(level_filter(args.debug));
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mode = if args.users {
        PlayMode::UserVsUser
    } else if args.computer {
        PlayMode::ProgramVsProgram
    } else {
        PlayMode::UserVsProgram
    };

    let replay = match &args.input {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to open input file {}", path.display()))?;
            Engine::deserialize(&text).with_context(|| format!("bad saved game {}", path.display()))?
        }
        None => Vec::new(),
    };

    let engine = Engine::with_config(EngineConfig::with_depth(args.depth));
    let options = ConsoleOptions {
        background: args.background,
        mode,
    };

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    let mut console = Console::new(engine, stdin, stdout, options).with_replay(replay);
    console.run()
}
