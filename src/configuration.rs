//! Defines arbiter configuration options.
//!
//! This module provides the [`Configuration`] struct, which controls how a tournament is run:
//! how many rounds, whether to stop after a single game, what gets printed, and where match
//! logs and player messages are written.
//!
//! # Overview
//!
//! - `rounds` — Number of full passes over all ordered player pairs (default: `1`)
//! - `single` — Play only the first pairing (default: `false`)
//! - `quiet` — Print one machine-parsable line per player instead of tables (default: `false`)
//! - `game_log_prefix` — Write one game log per match to `<prefix><NNNN>.log` (default: none)
//! - `message_log` — Where player stderr goes (default: discarded)
//! - `seed` — Seed for the random moves played on behalf of failed players (default: entropy)
//! - `log` — Trace log file for the arbiter itself (default: none)
//!
//! # Environment Variables
//!
//! Values can also be configured with [`Configuration::from_env`]:
//!
//! - `ARBITER_ROUNDS` — Number of rounds (default: `1`)
//! - `ARBITER_SINGLE` — Single game mode (default: `false`)
//! - `ARBITER_QUIET` — Quiet output (default: `false`)
//! - `ARBITER_SEED` — Fallback move seed (default: unset)

use std::path::{Path, PathBuf};

use anyhow::bail;

/// Destination of the players' stderr streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MessageLog {
    /// Player messages are thrown away.
    #[default]
    Discard,
    /// Both players write to the arbiter's own stderr.
    Inherit,
    /// One file per player and match: `<prefix><NNNN>.1.log` and `<prefix><NNNN>.2.log`.
    Prefix(PathBuf),
}

impl MessageLog {
    /// Parse the command-line form: `-` shares the arbiter's stderr, anything else is a prefix.
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "" => MessageLog::Discard,
            "-" => MessageLog::Inherit,
            prefix => MessageLog::Prefix(PathBuf::from(prefix)),
        }
    }

    /// Stderr destination for player `slot` (0 or 1) of match number `match_number`.
    pub(crate) fn for_slot(&self, match_number: usize, slot: usize) -> MessageSink {
        match self {
            MessageLog::Discard => MessageSink::Discard,
            MessageLog::Inherit => MessageSink::Inherit,
            MessageLog::Prefix(prefix) => MessageSink::File(numbered_path(
                prefix,
                &format!("{match_number:04}.{}.log", slot + 1),
            )),
        }
    }
}

/// Stderr destination of a single player process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSink {
    /// Null device.
    Discard,
    /// The arbiter's stderr.
    Inherit,
    /// Created (truncated) when the player is launched.
    File(PathBuf),
}

/// Configuration for arbiter behaviors.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) rounds: usize,
    pub(crate) single: bool,
    pub(crate) quiet: bool,
    pub(crate) game_log_prefix: Option<PathBuf>,
    pub(crate) message_log: MessageLog,
    pub(crate) seed: Option<u64>,
    pub(crate) log: Option<PathBuf>,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - One round is played.
    /// - Every pairing of the round is played.
    /// - Match rows and ranking tables are printed.
    /// - No game log and no message log are written.
    /// - Fallback moves are seeded from entropy.
    pub fn new() -> Self {
        Self {
            rounds: 1,
            single: false,
            quiet: false,
            game_log_prefix: None,
            message_log: MessageLog::Discard,
            seed: None,
            log: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// The following environment variables are recognized:
    /// - `ARBITER_ROUNDS`: a positive integer (default: `1`)
    /// - `ARBITER_SINGLE`: if set to `"true"`, enables single game mode (default: `false`)
    /// - `ARBITER_QUIET`: if set to `"true"`, enables quiet output (default: `false`)
    /// - `ARBITER_SEED`: an unsigned integer seeding fallback moves (default: unset)
    ///
    /// Unparsable values fall back to the default.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_number<T: std::str::FromStr>(var: &str) -> Option<T> {
            std::env::var(var).ok()?.trim().parse().ok()
        }

        Self {
            rounds: get_env_number("ARBITER_ROUNDS").unwrap_or(1),
            single: get_env_flag("ARBITER_SINGLE", false),
            quiet: get_env_flag("ARBITER_QUIET", false),
            seed: get_env_number("ARBITER_SEED"),
            ..Self::new()
        }
    }

    /// Set the number of rounds.
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Enable or disable single game mode.
    ///
    /// When enabled, only the first pairing is played. Requires two players and one round.
    pub fn with_single(mut self, value: bool) -> Self {
        self.single = value;
        self
    }

    /// Enable or disable quiet (machine-parsable) output.
    pub fn with_quiet(mut self, value: bool) -> Self {
        self.quiet = value;
        self
    }

    /// Write one game log per match, at `<prefix><NNNN>.log`.
    pub fn with_game_log(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.game_log_prefix = Some(prefix.into());
        self
    }

    /// Choose where player stderr goes.
    pub fn with_message_log(mut self, value: MessageLog) -> Self {
        self.message_log = value;
        self
    }

    /// Seed the generator used for fallback moves, making tournaments reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Write the arbiter's own trace log to `path`.
    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log = Some(path.into());
        self
    }

    /// Number of rounds.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Single game mode.
    pub fn single(&self) -> bool {
        self.single
    }

    /// Quiet output.
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Check that a tournament between `num_players` players can be run with this configuration.
    ///
    /// # Errors
    /// Returns a message suitable for the user when fewer than two players are given, the
    /// round count is zero, or single game mode is combined with more than two players or
    /// more than one round, or when the number of matches does not fit in a `usize`.
    pub fn validate(&self, num_players: usize) -> anyhow::Result<()> {
        if num_players < 2 {
            bail!("Too few player commands passed!");
        }
        if self.rounds < 1 {
            bail!("Invalid number of rounds passed!");
        }
        let matches = self
            .rounds
            .checked_mul(num_players)
            .and_then(|m| m.checked_mul(num_players - 1));
        if matches.is_none() {
            bail!("Too many rounds passed!");
        }
        if self.single && (num_players > 2 || self.rounds > 1) {
            bail!("Single game requires two players and one round!");
        }
        Ok(())
    }

    pub(crate) fn game_log_path(&self, match_number: usize) -> Option<PathBuf> {
        self.game_log_prefix
            .as_ref()
            .map(|prefix| numbered_path(prefix, &format!("{match_number:04}.log")))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefixes are glued to the suffix as plain text (`logs/game` + `0001.log`), not joined as
/// path components.
fn numbered_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let config = Configuration::new();
        assert!(config.validate(2).is_ok());
        assert!(config.validate(5).is_ok());
        assert!(config.validate(1).is_err());
        assert!(config.validate(0).is_err());

        assert!(Configuration::new().with_rounds(0).validate(3).is_err());

        let single = Configuration::new().with_single(true);
        assert!(single.validate(2).is_ok());
        assert!(single.validate(3).is_err());
        assert!(single.clone().with_rounds(2).validate(2).is_err());

        let huge = Configuration::new().with_rounds(usize::MAX / 2 + 1);
        assert!(huge.validate(2).is_err());
        assert!(huge.validate(3).is_err());
        assert!(Configuration::new()
            .with_rounds(usize::MAX / 2)
            .with_single(true)
            .validate(2)
            .is_err());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("ARBITER_ROUNDS", "3");
        std::env::set_var("ARBITER_QUIET", "TRUE");
        std::env::set_var("ARBITER_SEED", " 42 ");
        std::env::remove_var("ARBITER_SINGLE");
        let config = Configuration::from_env();
        assert_eq!(config.rounds(), 3);
        assert!(config.quiet());
        assert!(!config.single());
        assert_eq!(config.seed, Some(42));

        std::env::set_var("ARBITER_ROUNDS", "0");
        std::env::set_var("ARBITER_SEED", "not a number");
        let config = Configuration::from_env();
        let err = config.validate(2).unwrap_err();
        assert_eq!(err.to_string(), "Invalid number of rounds passed!");
        assert_eq!(config.seed, None);

        std::env::set_var("ARBITER_ROUNDS", "many");
        assert_eq!(Configuration::from_env().rounds(), 1);

        for var in ["ARBITER_ROUNDS", "ARBITER_QUIET", "ARBITER_SEED"] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_log_paths() {
        let config = Configuration::new().with_game_log("logs/game");
        assert_eq!(
            config.game_log_path(7),
            Some(PathBuf::from("logs/game0007.log"))
        );
        assert_eq!(Configuration::new().game_log_path(1), None);

        let messages = MessageLog::from_arg("msg/m");
        assert_eq!(
            messages.for_slot(12, 0),
            MessageSink::File(PathBuf::from("msg/m0012.1.log"))
        );
        assert_eq!(
            messages.for_slot(12, 1),
            MessageSink::File(PathBuf::from("msg/m0012.2.log"))
        );
        assert_eq!(MessageLog::from_arg("-").for_slot(1, 1), MessageSink::Inherit);
        assert_eq!(MessageLog::from_arg("").for_slot(1, 0), MessageSink::Discard);
    }
}
