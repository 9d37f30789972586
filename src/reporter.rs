//! Text output of a tournament.
//!
//! In human mode the reporter prints one row per finished match, then a ranking table and,
//! for more than two players, a win-count matrix. In quiet mode it prints nothing while
//! matches run, then one tab-separated line per player in original order:
//! `points wins ties losses fails avg_time max_time` (times in seconds).

use std::io::{self, Write};

use crate::match_runner::MatchResult;
use crate::statistics::Statistics;

const NAME_WIDTH: usize = 30;
const MATCH_HEADER: &str = " Id             Player 1                       Player 2             Score   Points  Failed       Time used";
const MATCH_RULE: &str = "---- ------------------------------ ------------------------------  -----  -------  -------  -----------------";
const RANKING_HEADER: &str = "No Player                         Points  Won Tied Lost Fail Avg Time Max Time";
const RANKING_RULE: &str = "-- ------------------------------ ------ ---- ---- ---- ---- -------- --------";

/// Writes tournament progress and final standings to `out`.
pub struct Reporter<W: Write> {
    out: W,
    quiet: bool,
    commands: Vec<String>,
}

impl<W: Write> Reporter<W> {
    /// `commands` are the player commands, indexed like the results' player indices.
    pub fn new(out: W, quiet: bool, commands: &[String]) -> Self {
        Self {
            out,
            quiet,
            commands: commands.to_vec(),
        }
    }

    /// Give back the output.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Header of the match table.
    pub fn begin(&mut self) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.out, "{MATCH_HEADER}")?;
        writeln!(self.out, "{MATCH_RULE}")
    }

    /// One row per finished match. The winner's name is upper-cased.
    pub fn match_row(&mut self, number: usize, result: &MatchResult) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut names = result.players.map(|p| shorten(&self.commands[p], NAME_WIDTH));
        if result.scores[0] > result.scores[1] {
            names[0] = names[0].to_uppercase();
        } else if result.scores[1] > result.scores[0] {
            names[1] = names[1].to_uppercase();
        }
        let failed = result.failed().map(yes_no);
        writeln!(
            self.out,
            "{number:4} {:<30} {:<30}  {:2} {:2}  {:3} {:3}  {:<3} {:<3}  {:7.3}s {:7.3}s",
            names[0],
            names[1],
            result.scores[0],
            result.scores[1],
            result.points[0],
            result.points[1],
            failed[0],
            failed[1],
            result.elapsed[0].as_secs_f64(),
            result.elapsed[1].as_secs_f64(),
        )?;
        self.out.flush()
    }

    /// Closing rule of the match table.
    pub fn end(&mut self) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.out, "{MATCH_RULE}")
    }

    /// Final standings.
    pub fn summary(&mut self, stats: &Statistics) -> io::Result<()> {
        if self.quiet {
            self.quiet_rows(stats)
        } else {
            self.ranking_table(stats)?;
            if self.commands.len() > 2 {
                self.win_matrix(stats)?;
            }
            Ok(())
        }
    }

    fn quiet_rows(&mut self, stats: &Statistics) -> io::Result<()> {
        for s in stats.standings() {
            writeln!(
                self.out,
                "{}\t{}\t{}\t{}\t{}\t{:.6}\t{:.6}",
                s.points,
                s.wins,
                s.ties,
                s.losses,
                s.fails,
                s.average_time().as_secs_f64(),
                s.max_time.as_secs_f64()
            )?;
        }
        Ok(())
    }

    fn ranking_table(&mut self, stats: &Statistics) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{RANKING_HEADER}")?;
        writeln!(self.out, "{RANKING_RULE}")?;
        for (rank, p) in stats.ranking().into_iter().enumerate() {
            let s = &stats.standings()[p];
            writeln!(
                self.out,
                "{:2} {:<30} {:6} {:4} {:4} {:4} {:4} {:7.3}s {:7.3}s",
                rank + 1,
                shorten(&self.commands[p], NAME_WIDTH),
                s.points,
                s.wins,
                s.ties,
                s.losses,
                s.fails,
                s.average_time().as_secs_f64(),
                s.max_time.as_secs_f64()
            )?;
        }
        writeln!(self.out, "{RANKING_RULE}")
    }

    fn win_matrix(&mut self, stats: &Statistics) -> io::Result<()> {
        let ranking = stats.ranking();
        writeln!(self.out)?;
        write!(self.out, "{:34}", "")?;
        for i in 0..ranking.len() {
            write!(self.out, " {:2} ", i + 1)?;
        }
        writeln!(self.out)?;
        write!(self.out, "{:34}", "")?;
        for _ in &ranking {
            write!(self.out, " ---")?;
        }
        writeln!(self.out)?;
        for (rank, &p) in ranking.iter().enumerate() {
            write!(
                self.out,
                "{:2} {:>30} ",
                rank + 1,
                shorten(&self.commands[p], NAME_WIDTH)
            )?;
            for &q in &ranking {
                if p == q {
                    write!(self.out, "    ")?;
                } else {
                    write!(self.out, " {:3}", stats.standings()[p].wins_against[q])?;
                }
            }
            writeln!(self.out)?;
        }
        writeln!(
            self.out,
            "Win count of player 1 (row) against player 2 (column)"
        )
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Fit `s` in `n` characters by cutting out its middle.
pub fn shorten(s: &str, n: usize) -> String {
    let chars = s.chars().collect::<Vec<_>>();
    if chars.len() <= n {
        return s.to_owned();
    }
    if n < 5 {
        return chars[..n].iter().collect();
    }
    let head = (n - 2) / 2;
    let tail = (n - 2) - head;
    let mut out = chars[..head].iter().collect::<String>();
    out.push_str("..");
    out.extend(&chars[chars.len() - tail..]);
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::player_slot::Failure;

    fn commands(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("./player{i}")).collect()
    }

    fn result(players: [usize; 2], scores: [i32; 2], fail_first: bool) -> MatchResult {
        let failed = [fail_first, false];
        MatchResult {
            players,
            scores,
            points: crate::match_runner::competition_points(scores, failed),
            failures: [
                fail_first.then(|| Failure::Parse("?".to_owned())),
                None,
            ],
            elapsed: [Duration::from_millis(1500), Duration::from_millis(250)],
        }
    }

    fn render(quiet: bool, n: usize, results: &[MatchResult]) -> String {
        let mut stats = Statistics::new(n);
        let mut reporter = Reporter::new(Vec::new(), quiet, &commands(n));
        reporter.begin().unwrap();
        for (k, r) in results.iter().enumerate() {
            stats.record(r);
            reporter.match_row(k + 1, r).unwrap();
        }
        reporter.end().unwrap();
        reporter.summary(&stats).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("short", 30), "short");
        assert_eq!(shorten("abcdefgh", 4), "abcd");
        assert_eq!(shorten("abcdefghij", 8), "abc..hij");
        assert_eq!(shorten("abcdefghijk", 9), "abc..hijk");
        assert_eq!(shorten(&"x".repeat(40), 30).chars().count(), 30);
    }

    #[test]
    fn test_quiet_field_order() {
        let results = [result([0, 1], [3, 1], false), result([1, 0], [2, 2], true)];
        let out = render(true, 2, &results);
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        // player 0: 2 + 1 points, 1 win, 1 tie, no loss, no fail, (1.5 + 0.25) / 2, 1.5
        assert_eq!(lines[0], "3\t1\t1\t0\t0\t0.875000\t1.500000");
        // player 1: 1 + 0 points (failed in the second match)
        assert_eq!(lines[1], "1\t0\t1\t1\t1\t0.875000\t1.500000");
    }

    #[test]
    fn test_human_report() {
        let results = [
            result([0, 1], [1, 0], false),
            result([0, 2], [0, 1], false),
            result([1, 2], [0, 1], true),
        ];
        let out = render(false, 3, &results);
        let lines = out.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], MATCH_HEADER);
        assert_eq!(lines[1], MATCH_RULE);
        assert!(lines[2].starts_with("   1 ./PLAYER0 "), "{}", lines[2]);
        assert!(lines[4].contains("yes no "), "{}", lines[4]);
        assert_eq!(lines[5], MATCH_RULE);
        assert!(out.contains(RANKING_HEADER));
        // player 2 leads with 2 wins
        let first_rank = lines
            .iter()
            .position(|l| *l == RANKING_HEADER)
            .map(|i| lines[i + 2])
            .unwrap();
        assert!(first_rank.starts_with(" 1 ./player2 "), "{first_rank}");
        assert!(out.ends_with("Win count of player 1 (row) against player 2 (column)\n"));
    }

    #[test]
    fn test_no_matrix_for_two_players() {
        let out = render(false, 2, &[result([0, 1], [1, 0], false)]);
        assert!(!out.contains("Win count"));
    }
}
