#![allow(dead_code)]

//! Games and players shared by the integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use duel_arbiter::anyhow::{self, bail};
use duel_arbiter::{Engine, GameState};

/// A pile of stones; each turn the mover takes 1 to 3. Taking the last stone scores 1.
pub struct TakeAway {
    pub pile: u32,
}

pub struct Pile {
    stones: u32,
    mover: usize,
    history: Vec<u32>,
}

impl Engine for TakeAway {
    type Move = u32;
    type State = Pile;

    fn create_state(&self) -> Pile {
        Pile {
            stones: self.pile,
            mover: 0,
            history: vec![],
        }
    }

    fn parse_move(&self, text: &str) -> Option<u32> {
        text.parse().ok()
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
        if !(1..=3).contains(mv) || *mv > self.stones {
            bail!("cannot take {mv} stones from {}", self.stones);
        }
        self.stones -= mv;
        self.history.push(*mv);
        self.mover = 1 - self.mover;
        Ok(())
    }

    fn scores(&self) -> [i32; 2] {
        if self.stones > 0 {
            return [0, 0];
        }
        // the player who just moved took the last stone
        let mut scores = [0, 0];
        scores[1 - self.mover] = 1;
        scores
    }

    fn write_log(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let moves = self
            .history
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>();
        writeln!(w, "{}", moves.join(" "))
    }
}

/// Takes one stone whenever asked. Records every line it receives in `$1` if given.
pub const STEADY: &str = r#"
while read line; do
    if [ -n "$1" ]; then echo "$line" >> "$1"; fi
    if [ "$line" = "Quit" ]; then exit 0; fi
    echo "thinking" >&2
    echo 1
done
"#;

/// Answers with something that is not a move.
pub const GARBAGE: &str = r#"
while read line; do
    if [ "$line" = "Quit" ]; then exit 0; fi
    echo "take one please"
done
"#;

/// Always tries to take more stones than allowed.
pub const GREEDY: &str = r#"
while read line; do
    if [ "$line" = "Quit" ]; then exit 0; fi
    echo 7
done
"#;

/// Exits before playing.
pub const CRASH: &str = "exit 0\n";

/// Appends its pid to `$1`, then plays like `STEADY`.
pub const COUNTING: &str = r#"
echo $$ >> "$1"
while read line; do
    if [ "$line" = "Quit" ]; then exit 0; fi
    echo 1
done
"#;

/// Write `script` to `dir/name.sh` and return the command running it with `args`.
pub fn player(dir: &Path, name: &str, script: &str, args: &[&Path]) -> String {
    let path: PathBuf = dir.join(format!("{name}.sh"));
    std::fs::write(&path, script).expect("could not write player script");
    let mut command = format!("sh {}", path.display());
    for arg in args {
        command.push(' ');
        command.push_str(&arg.display().to_string());
    }
    command
}
