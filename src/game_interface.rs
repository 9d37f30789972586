//! Traits a game must implement to be refereed by the arbiter.
//!
//! The arbiter never looks inside a game: it only creates states, asks whose turn it is,
//! lists legal moves, applies moves and reads final scores. Moves travel over the player
//! pipes as single lines of text, produced by [`Engine::format_move`] and read back by
//! [`Engine::parse_move`].

use std::io::Write;

/// State of one running game.
///
/// Created by [`Engine::create_state`] at the start of a match and dropped when the match ends.
pub trait GameState {
    /// A single move. Same type as [`Engine::Move`].
    type Move;

    /// True once the game has ended.
    fn is_over(&self) -> bool;

    /// Index (0 or 1) of the player that should move now.
    fn next_player(&self) -> usize;

    /// Every move the current player may make.
    ///
    /// Must not be empty while [`is_over`](GameState::is_over) returns false.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Apply `mv` for the current player.
    ///
    /// # Error
    /// Returned when `mv` is not allowed in this state. The state must be left untouched.
    fn apply_move(&mut self, mv: &Self::Move) -> anyhow::Result<()>;

    /// Final scores of player 1 and player 2.
    fn scores(&self) -> [i32; 2];

    /// Human-readable record of the game, written into per-match logs.
    fn write_log(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// What will be given to the arbiter to create games and (de)serialize moves.
pub trait Engine {
    /// A single move.
    type Move;
    /// The game state this engine creates.
    type State: GameState<Move = Self::Move>;

    /// Returns an initialized game
    fn create_state(&self) -> Self::State;

    /// Decode one line of player output. `None` if the text is not a move at all.
    ///
    /// Must accept everything [`format_move`](Engine::format_move) produces.
    fn parse_move(&self, text: &str) -> Option<Self::Move>;

    /// Canonical text form of `mv`, forwarded to the opponent.
    fn format_move(&self, mv: &Self::Move) -> String;
}

#[cfg(test)]
pub(crate) mod take_away {
    //! Tiny deterministic game used by the unit tests.
    //!
    //! A pile of stones; each turn the mover takes 1 to 3. Whoever takes the last stone
    //! scores 1, the other 0.

    use super::*;

    pub struct TakeAway {
        pub pile: u32,
    }

    pub struct Pile {
        pub stones: u32,
        pub mover: usize,
        pub history: Vec<u32>,
        pub last_taker: Option<usize>,
    }

    impl Engine for TakeAway {
        type Move = u32;
        type State = Pile;

        fn create_state(&self) -> Pile {
            Pile {
                stones: self.pile,
                mover: 0,
                history: vec![],
                last_taker: None,
            }
        }

        fn parse_move(&self, text: &str) -> Option<u32> {
            text.trim().parse().ok()
        }

        fn format_move(&self, mv: &u32) -> String {
            mv.to_string()
        }
    }

    impl GameState for Pile {
        type Move = u32;

        fn is_over(&self) -> bool {
            self.stones == 0
        }

        fn next_player(&self) -> usize {
            self.mover
        }

        fn legal_moves(&self) -> Vec<u32> {
            (1..=self.stones.min(3)).collect()
        }

        fn apply_move(&mut self, mv: &u32) -> anyhow::Result<()> {
            if *mv == 0 || *mv > 3 || *mv > self.stones {
                anyhow::bail!("cannot take {mv} stones from {}", self.stones);
            }
            self.stones -= mv;
            self.history.push(*mv);
            self.last_taker = Some(self.mover);
            self.mover = 1 - self.mover;
            Ok(())
        }

        fn scores(&self) -> [i32; 2] {
            match self.last_taker {
                Some(0) if self.stones == 0 => [1, 0],
                Some(1) if self.stones == 0 => [0, 1],
                _ => [0, 0],
            }
        }

        fn write_log(&self, w: &mut dyn Write) -> std::io::Result<()> {
            for mv in &self.history {
                writeln!(w, "{mv}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod interface_tests {
    use super::take_away::TakeAway;
    use super::*;

    fn make_state<E: Engine>(engine: &E) -> E::State {
        engine.create_state()
    }

    #[test]
    fn test_generic_engine() {
        let engine = TakeAway { pile: 5 };
        let state = make_state(&engine);
        assert!(!state.is_over());
        assert_eq!(state.next_player(), 0);
        assert_eq!(state.legal_moves(), vec![1, 2, 3]);
    }

    #[test]
    fn test_move_text_round_trip() {
        let engine = TakeAway { pile: 5 };
        let state = engine.create_state();
        for mv in state.legal_moves() {
            let text = engine.format_move(&mv);
            assert_eq!(engine.parse_move(&text), Some(mv));
        }
        assert_eq!(engine.parse_move("two"), None);
    }

    #[test]
    fn test_rejected_move_leaves_state() {
        let engine = TakeAway { pile: 2 };
        let mut state = engine.create_state();
        assert!(state.apply_move(&3).is_err());
        assert_eq!(state.stones, 2);
        assert_eq!(state.next_player(), 0);
        state.apply_move(&2).unwrap();
        assert!(state.is_over());
        assert_eq!(state.scores(), [1, 0]);
    }
}
