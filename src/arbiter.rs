//! Core tournament loop.
//!
//! This module defines the [`Arbiter`] type, which orchestrates a tournament:
//!
//! - Enumerating pairings with a [`RoundRobinTournament`]
//! - Running each match, one at a time, with fresh player processes
//! - Folding every result into the [`Statistics`]
//! - Reporting match rows and final standings
//!
//! # Behavior & Configuration
//!
//! Behavior is controlled by a [`Configuration`] object, see its documentation for the
//! available options.
//!
//! Matches never run concurrently, and no player process outlives its match: a crashed or
//! confused player cannot affect the next match. A player that never answers stalls the
//! tournament, as there is no timeout.
//!
//! If the engine breaks its contract (see [`run_match`]) the panic propagates out of
//! [`Arbiter::run`].

use std::io::Write;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, instrument, trace};

use crate::configuration::Configuration;
use crate::game_interface::Engine;
use crate::logger::init_logger;
use crate::match_runner::{run_match, MatchResult, MatchSettings};
use crate::player_slot::{Launcher, ProcessLauncher};
use crate::reporter::Reporter;
use crate::statistics::Statistics;
use crate::tournament_strategy::{Pairing, RoundRobinTournament};

/// Everything a finished tournament produced.
#[derive(Debug, Clone)]
pub struct TournamentReport {
    /// Results in play order.
    pub results: Vec<MatchResult>,
    /// Standings after the last match.
    pub statistics: Statistics,
}

/// The main type for refereeing tournaments.
///
/// # Type Parameters
/// - `E`: The game engine implementing [`Engine`]
/// - `L`: How player slots are created, [`ProcessLauncher`] by default
pub struct Arbiter<E: Engine, L: Launcher = ProcessLauncher> {
    engine: E,
    launcher: L,
    config: Configuration,
}

impl<E: Engine> Arbiter<E> {
    /// Create an [`Arbiter`] launching players as child processes.
    pub fn new(engine: E, config: Configuration) -> Self {
        Self::with_launcher(engine, ProcessLauncher, config)
    }
}

impl<E: Engine, L: Launcher> Arbiter<E, L> {
    /// Create an [`Arbiter`] with a custom [`Launcher`].
    #[instrument(skip_all)]
    pub fn with_launcher(engine: E, launcher: L, config: Configuration) -> Self {
        if let Some(path) = &config.log {
            if let Err(e) = init_logger(path) {
                eprintln!("{e:#}");
            }
        }
        trace!(?config);

        Self {
            engine,
            launcher,
            config,
        }
    }

    /// Configuration used for every tournament run by this arbiter.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Run the whole tournament between `commands`, writing the report to `out`.
    ///
    /// # Errors
    /// Returns an error if the configuration does not allow a tournament between these
    /// players, or if the report cannot be written. Player failures are not errors.
    pub fn run(
        &mut self,
        commands: &[String],
        out: impl Write,
    ) -> anyhow::Result<TournamentReport> {
        self.config.validate(commands.len())?;

        let tournament = RoundRobinTournament::from_config(commands.len(), &self.config);
        info!(
            players = commands.len(),
            rounds = tournament.rounds(),
            matches = tournament.num_matches(),
            "tournament start"
        );

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut statistics = Statistics::new(commands.len());
        let mut results = Vec::new();
        let mut reporter = Reporter::new(out, self.config.quiet, commands);

        reporter.begin().context("could not write report")?;
        for pairing in tournament.pairings() {
            let settings = self.match_settings(&pairing, commands);
            let result = run_match(&self.engine, &mut self.launcher, &settings, &mut rng);
            statistics.record(&result);
            reporter
                .match_row(pairing.number, &result)
                .context("could not write report")?;
            results.push(result);
        }
        reporter.end().context("could not write report")?;
        reporter
            .summary(&statistics)
            .context("could not write report")?;

        info!("tournament over");
        Ok(TournamentReport {
            results,
            statistics,
        })
    }

    fn match_settings(&self, pairing: &Pairing, commands: &[String]) -> MatchSettings {
        MatchSettings {
            number: pairing.number,
            players: [pairing.first, pairing.second],
            commands: [
                commands[pairing.first].clone(),
                commands[pairing.second].clone(),
            ],
            game_log: self.config.game_log_path(pairing.number),
            messages: [
                self.config.message_log.for_slot(pairing.number, 0),
                self.config.message_log.for_slot(pairing.number, 1),
            ],
        }
    }
}
