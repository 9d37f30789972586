//! Runs a single match between two player programs.
//!
//! The runner launches both players, sends [`START`](crate::player_slot::START) to the first
//! one, then alternates strictly: read the mover's line, apply it, forward its canonical text
//! to the opponent. There is no timeout on reads.
//!
//! A player that fails (see [`Failure`]) is never asked again. The turn on which the failure
//! is detected applies no move; every later turn of that player is played by picking a
//! uniformly random legal move on its behalf.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, instrument, trace, warn};

use crate::configuration::MessageSink;
use crate::game_interface::{Engine, GameState};
use crate::player_slot::{Failure, Launcher, PlayerSlot, START};

/// Everything needed to run one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSettings {
    /// 1-based position of the match in the tournament.
    pub number: usize,
    /// Indices into the tournament's player list. `players[0]` moves first.
    pub players: [usize; 2],
    /// Command lines, in seat order.
    pub commands: [String; 2],
    /// Where to write the game log, if anywhere.
    pub game_log: Option<PathBuf>,
    /// Stderr destination of each seat.
    pub messages: [MessageSink; 2],
}

impl Display for MatchSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{:04} [{} VS {}]",
            self.number, self.commands[0], self.commands[1]
        )
    }
}

/// Who won a match, by strict comparison of the game scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The first mover scored strictly more.
    FirstWon,
    /// The second mover scored strictly more.
    SecondWon,
    /// Equal scores.
    Tie,
}

impl Outcome {
    /// Compare final game scores, first mover first.
    pub fn from_scores(scores: [i32; 2]) -> Outcome {
        match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Outcome::FirstWon,
            std::cmp::Ordering::Less => Outcome::SecondWon,
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::FirstWon => write!(f, "Player 1 won!"),
            Outcome::SecondWon => write!(f, "Player 2 won!"),
            Outcome::Tie => write!(f, "It's a tie!"),
        }
    }
}

/// Final record of a match. Index 0 is the first mover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Indices into the tournament's player list.
    pub players: [usize; 2],
    /// Game scores reported by the engine once the game was over.
    pub scores: [i32; 2],
    /// First failure of each seat, if any.
    pub failures: [Option<Failure>; 2],
    /// Competition points, see [`competition_points`].
    pub points: [u32; 2],
    /// Total time spent waiting for each seat's moves.
    pub elapsed: [Duration; 2],
}

impl MatchResult {
    /// Which seats failed during the match.
    pub fn failed(&self) -> [bool; 2] {
        [self.failures[0].is_some(), self.failures[1].is_some()]
    }

    /// Winner by game score, failures notwithstanding.
    pub fn outcome(&self) -> Outcome {
        Outcome::from_scores(self.scores)
    }
}

/// Competition points: a player that did not fail earns 1, plus 1 if its score is strictly
/// higher than its opponent's. A failed player earns nothing.
pub fn competition_points(scores: [i32; 2], failed: [bool; 2]) -> [u32; 2] {
    let mut points = [0; 2];
    for i in 0..2 {
        if !failed[i] {
            points[i] = 1;
            if scores[i] > scores[1 - i] {
                points[i] += 1;
            }
        }
    }
    points
}

/// Play one match from `Start` to `Quit`.
///
/// Both players are shut down before scores are read, on every path.
///
/// # Panics
/// If the engine breaks its contract: no legal move in a non-final state, a listed legal move
/// rejected, or a player index other than 0 or 1.
#[instrument(skip_all, fields(number = settings.number))]
pub fn run_match<E, L, R>(
    engine: &E,
    launcher: &mut L,
    settings: &MatchSettings,
    rng: &mut R,
) -> MatchResult
where
    E: Engine,
    L: Launcher + ?Sized,
    R: Rng + ?Sized,
{
    debug!("starting {settings}");
    let first = {
        let mut slot = launcher.launch(&settings.commands[0], settings.messages[0].clone());
        if !slot.is_failed() {
            slot.send(START);
        }
        slot
    };
    let second = launcher.launch(&settings.commands[1], settings.messages[1].clone());
    let mut slots = [first, second];

    let mut state = engine.create_state();
    play(engine, &mut state, &mut slots, rng);

    for slot in slots.iter_mut() {
        slot.close_input();
    }
    for slot in slots.iter_mut() {
        slot.wait();
    }

    let scores = state.scores();
    let failures = [slots[0].failure().cloned(), slots[1].failure().cloned()];
    let failed = [failures[0].is_some(), failures[1].is_some()];
    let result = MatchResult {
        players: settings.players,
        scores,
        points: competition_points(scores, failed),
        failures,
        elapsed: [slots[0].elapsed(), slots[1].elapsed()],
    };
    info!(scores = ?result.scores, points = ?result.points, ?failed, "match over");

    if let Some(path) = &settings.game_log {
        if let Err(e) = write_game_log(path, settings, &state, &result) {
            warn!("could not write game log: {e:#}");
        }
    }
    result
}

fn play<E, R>(engine: &E, state: &mut E::State, slots: &mut [PlayerSlot; 2], rng: &mut R)
where
    E: Engine,
    R: Rng + ?Sized,
{
    while !state.is_over() {
        let p = state.next_player();
        assert!(p < 2, "engine returned player index {p} in a two-player game");
        trace!("player to play: {p}");

        let played = if slots[p].is_failed() {
            Some(play_random(engine, state, rng))
        } else {
            read_move(engine, state, &mut slots[p])
        };

        let Some(text) = played else {
            continue;
        };
        let opponent = &mut slots[1 - p];
        if !state.is_over() && !opponent.is_failed() {
            opponent.send(&text);
        }
    }
}

/// Play a random legal move for a failed player and return its text.
fn play_random<E, R>(engine: &E, state: &mut E::State, rng: &mut R) -> String
where
    E: Engine,
    R: Rng + ?Sized,
{
    let moves = state.legal_moves();
    let Some(mv) = moves.choose(rng) else {
        panic!("engine offered no legal move in an unfinished game");
    };
    if let Err(e) = state.apply_move(mv) {
        panic!("engine rejected a move it listed as legal: {e:#}");
    }
    let text = engine.format_move(mv);
    trace!(text, "random move");
    text
}

/// Read, parse and apply the mover's next line. Returns the canonical text of the applied
/// move, or `None` if the mover failed this turn.
fn read_move<E: Engine>(
    engine: &E,
    state: &mut E::State,
    mover: &mut PlayerSlot,
) -> Option<String> {
    let line = mover.receive()?;
    let Some(mv) = engine.parse_move(&line) else {
        mover.mark_failed(Failure::Parse(line));
        return None;
    };
    if let Err(e) = state.apply_move(&mv) {
        mover.mark_failed(Failure::IllegalMove(format!("{line} ({e:#})")));
        return None;
    }
    Some(engine.format_move(&mv))
}

fn write_game_log<S: GameState>(
    path: &Path,
    settings: &MatchSettings,
    state: &S,
    result: &MatchResult,
) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("could not create '{}'", path.display()))?;
    let mut w = BufWriter::new(file);
    for (i, command) in settings.commands.iter().enumerate() {
        writeln!(w, "# Player {}: {command}", i + 1)?;
    }
    state.write_log(&mut w)?;
    for (i, failed) in result.failed().iter().enumerate() {
        if *failed {
            writeln!(w, "# Player {} failed!", i + 1)?;
        }
    }
    writeln!(
        w,
        "# Score: {} - {}. Time: {:.3}s - {:.3}s. {}",
        result.scores[0],
        result.scores[1],
        result.elapsed[0].as_secs_f64(),
        result.elapsed[1].as_secs_f64(),
        result.outcome()
    )?;
    w.flush()?;
    debug!("game log written to '{}'", path.display());
    Ok(())
}
