//! # Duel Arbiter
//!
//! A Rust crate for refereeing two-player, turn-based, perfect-information games played by
//! external programs, and for ranking those programs in a round-robin tournament.
//!
//! It provides:
//! - Match execution with rule enforcement and a fallback policy for misbehaving players
//!   ([`run_match`](crate::match_runner::run_match))
//! - Round-robin scheduling ([`RoundRobinTournament`](crate::tournament_strategy::RoundRobinTournament))
//! - Standings and rankings ([`Statistics`](crate::statistics::Statistics))
//! - Human and machine-readable reports ([`Reporter`](crate::reporter::Reporter))
//! - A ready-made command line ([`cli::run`])
//!
//! Each player is an executable started afresh for every match. The arbiter talks to it
//! through its stdin/stdout, one line per message, strictly alternating between the two
//! players. Rules are enforced, time and memory are not: a slow player is only slow, never
//! disqualified.
//!
//! # Documentation Overview
//!
//! - For the turn protocol and what happens when a player fails, see [`match_runner`].
//! - For tournament options, see [`Configuration`](crate::configuration::Configuration).
//! - For plugging in a game, implement the [`Engine`] and [`GameState`] traits.
//!
//! # Usage Example
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
//! use duel_arbiter::prelude::*;
//!
//! fn main() -> duel_arbiter::anyhow::Result<()> {
//!     let config = Configuration::new()
//!         .with_rounds(2)
//!         .with_game_log("logs/game");
//!
//!     let mut arbiter = Arbiter::new(YourEngine, config);
//!     let players = vec!["./player_a".to_string(), "./player_b --level 3".to_string()];
//!     let report = arbiter.run(&players, std::io::stdout())?;
//!
//!     for p in report.statistics.ranking() {
//!         println!("{}: {} points", players[p], report.statistics.standings()[p].points);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Player Protocol
//!
//! - Arbiter -> first player: `Start`, once, before its first move
//! - Player -> Arbiter: one move per line, when it is its turn
//! - Arbiter -> other player: the move, in the engine's canonical text form
//! - Arbiter -> both players: `Quit`, then stdin is closed
#![warn(missing_docs)]

pub use anyhow;

pub mod arbiter;
pub mod cli;
pub mod configuration;
pub mod game_interface;
mod logger;
pub mod match_runner;
pub mod player_slot;
pub mod reporter;
pub mod statistics;
pub mod tournament_strategy;

pub use game_interface::{Engine, GameState};

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use duel_arbiter::prelude::*;
/// ```
///
/// Includes:
/// - [`Arbiter`](crate::arbiter::Arbiter)
/// - [`Configuration`](crate::configuration::Configuration)
/// - the [`Engine`](crate::game_interface::Engine) and [`GameState`](crate::game_interface::GameState) traits
pub mod prelude {
    pub use crate::arbiter::{Arbiter, TournamentReport};
    pub use crate::configuration::{Configuration, MessageLog};
    pub use crate::game_interface::{Engine, GameState};
    pub use crate::match_runner::MatchResult;
    pub use crate::statistics::Statistics;
}
