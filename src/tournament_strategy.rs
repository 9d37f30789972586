//! Enumeration of the matches of a tournament.
//!
//! A [`RoundRobinTournament`] plays every ordered pair of distinct players once per round:
//! each unordered pair meets twice per round, once with each player moving first. Matches
//! come out in a fixed order (round, then first mover, then second mover), which also fixes
//! the match numbers used for log files.

use crate::configuration::Configuration;

/// One scheduled match: `first` moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    /// 1-based match number.
    pub number: usize,
    /// 0-based round.
    pub round: usize,
    /// Index of the first mover.
    pub first: usize,
    /// Index of the second mover.
    pub second: usize,
}

/// A round-robin tournament where each player plays against every other player, in both
/// seat orders, `rounds` times.
///
/// In single mode only the very first pairing is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRobinTournament {
    num_players: usize,
    rounds: usize,
    single: bool,
}

impl RoundRobinTournament {
    /// Creates a new Round Robin tournament.
    pub fn new(num_players: usize, rounds: usize) -> Self {
        Self {
            num_players,
            rounds,
            single: false,
        }
    }

    /// Only play the first pairing (player 0 against player 1).
    pub fn single(num_players: usize) -> Self {
        Self {
            num_players,
            rounds: 1,
            single: true,
        }
    }

    /// The tournament described by `config` for `num_players` players.
    pub fn from_config(num_players: usize, config: &Configuration) -> Self {
        if config.single {
            Self::single(num_players)
        } else {
            Self::new(num_players, config.rounds)
        }
    }

    /// Number of players.
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Number of rounds.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Total number of matches: `rounds · n · (n - 1)`, or 1 in single mode.
    pub fn num_matches(&self) -> usize {
        let n = self.num_players;
        if n < 2 {
            0
        } else if self.single {
            1
        } else {
            self.rounds.saturating_mul(n).saturating_mul(n - 1)
        }
    }

    /// Number of matches each player takes part in.
    pub fn games_per_player(&self) -> usize {
        if self.num_players < 2 {
            0
        } else if self.single {
            1
        } else {
            self.rounds
                .saturating_mul(self.num_players - 1)
                .saturating_mul(2)
        }
    }

    /// All pairings, in play order.
    pub fn pairings(&self) -> impl Iterator<Item = Pairing> {
        let n = self.num_players;
        (0..self.rounds)
            .flat_map(move |round| {
                (0..n).flat_map(move |i| {
                    (0..n)
                        .filter(move |&j| j != i)
                        .map(move |j| (round, i, j))
                })
            })
            .take(self.num_matches())
            .enumerate()
            .map(|(k, (round, first, second))| Pairing {
                number: k + 1,
                round,
                first,
                second,
            })
    }
}
