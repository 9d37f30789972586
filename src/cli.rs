//! Command-line front end.
//!
//! A game crate only needs a two-line `main`:
//!
//! ```no_run
//! # struct YourEngine;
//! # struct YourState;
//! # impl duel_arbiter::game_interface::GameState for YourState {
//! #     type Move = u32;
//! #     fn is_over(&self) -> bool { true }
//! #     fn next_player(&self) -> usize { 0 }
//! #     fn legal_moves(&self) -> Vec<u32> { vec![] }
//! #     fn apply_move(&mut self, _mv: &u32) -> duel_arbiter::anyhow::Result<()> { Ok(()) }
//! #     fn scores(&self) -> [i32; 2] { [0, 0] }
//! #     fn write_log(&self, _w: &mut dyn std::io::Write) -> std::io::Result<()> { Ok(()) }
//! # }
//! # impl duel_arbiter::game_interface::Engine for YourEngine {
//! #     type Move = u32;
//! #     type State = YourState;
//! #     fn create_state(&self) -> YourState { YourState }
//! #     fn parse_move(&self, text: &str) -> Option<u32> { text.parse().ok() }
//! #     fn format_move(&self, mv: &u32) -> String { mv.to_string() }
//! # }
//! fn main() -> std::process::ExitCode {
//!     duel_arbiter::cli::run(YourEngine)
//! }
//! ```
//!
//! which accepts:
//!
//! ```text
//! arbiter [--rounds N] [--single] [--quiet] [--msg PREFIX|-] [--log PREFIX] PLAYER PLAYER...
//! ```

use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::warn;

use crate::arbiter::{Arbiter, TournamentReport};
use crate::configuration::{Configuration, MessageLog};
use crate::game_interface::Engine;
use crate::logger::init_stderr_logger;

/// Options of the arbiter command line.
#[derive(Parser, Debug, Clone)]
#[command(about = "Referee a round-robin tournament between player programs")]
pub struct Cli {
    /// Player commands, at least two. Arguments are separated by spaces.
    players: Vec<String>,

    /// Number of rounds to play
    #[arg(long, default_value_t = 1)]
    rounds: usize,

    /// Play only a single game
    #[arg(long)]
    single: bool,

    /// Print only plain-text results
    #[arg(long)]
    quiet: bool,

    /// Path prefix of player message log files ('-' for stderr)
    #[arg(long, value_name = "PREFIX")]
    msg: Option<String>,

    /// Path prefix of game log files
    #[arg(long, value_name = "PREFIX")]
    log: Option<PathBuf>,

    /// Path to CPU profile (not supported, accepted for compatibility)
    #[arg(long, value_name = "PATH")]
    cpuprofile: Option<PathBuf>,

    /// Seed for the random moves of failed players
    #[arg(long)]
    seed: Option<u64>,

    /// Write the arbiter's own trace log to this file
    #[arg(long, value_name = "PATH")]
    trace: Option<PathBuf>,

    /// Print debug information to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Player commands, in order.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// The [`Configuration`] these options describe.
    pub fn configuration(&self) -> Configuration {
        let mut config = Configuration::new()
            .with_rounds(self.rounds)
            .with_single(self.single)
            .with_quiet(self.quiet);
        if let Some(msg) = &self.msg {
            config = config.with_message_log(MessageLog::from_arg(msg));
        }
        if let Some(prefix) = &self.log {
            config = config.with_game_log(prefix);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(path) = &self.trace {
            config = config.with_log(path);
        }
        config
    }
}

/// Why [`try_run`] did not complete a tournament.
#[derive(Debug)]
pub enum CliError {
    /// The options do not describe a valid tournament. Nothing was run.
    Usage(String),
    /// The tournament stopped early.
    Failed(anyhow::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Failed(e) => write!(f, "{e:#}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Parse the process arguments and run the tournament they describe, printing to stdout.
pub fn run<E: Engine>(engine: E) -> ExitCode {
    let cli = Cli::parse();
    match try_run(engine, &cli, std::io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            eprintln!("{}", Cli::command().render_help());
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the tournament described by `cli`, writing the report to `out`.
///
/// # Errors
/// [`CliError::Usage`] when the options are inconsistent (fewer than two players, zero
/// rounds, single game with more than two players or rounds), [`CliError::Failed`] when the
/// report cannot be written.
pub fn try_run<E: Engine>(
    engine: E,
    cli: &Cli,
    out: impl Write,
) -> Result<TournamentReport, CliError> {
    let config = cli.configuration();
    config
        .validate(cli.players.len())
        .map_err(|e| CliError::Usage(e.to_string()))?;

    if config.log.is_none() {
        init_stderr_logger(cli.verbose);
    }
    if let Some(path) = &cli.cpuprofile {
        warn!(
            "CPU profiling is not supported, '{}' will not be written",
            path.display()
        );
    }

    Arbiter::new(engine, config)
        .run(&cli.players, out)
        .map_err(CliError::Failed)
}
