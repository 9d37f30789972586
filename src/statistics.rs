//! Aggregation of match results into per-player standings.

use std::time::Duration;

use tracing::trace;

use crate::match_runner::MatchResult;

/// Tournament totals of one player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    /// Competition points.
    pub points: u32,
    /// Matches with a strictly higher game score than the opponent.
    pub wins: u32,
    /// Matches with an equal game score.
    pub ties: u32,
    /// Matches with a strictly lower game score.
    pub losses: u32,
    /// Matches in which the player failed.
    pub fails: u32,
    /// Matches played.
    pub games: u32,
    /// Think time over all matches.
    pub total_time: Duration,
    /// Longest total think time in a single match.
    pub max_time: Duration,
    /// `wins_against[q]`: matches won against player `q`.
    pub wins_against: Vec<u32>,
    /// `score_diff_against[q]`: sum of (own score - opponent score) over matches against `q`.
    pub score_diff_against: Vec<i64>,
}

impl Standings {
    fn new(num_players: usize) -> Self {
        Self {
            wins_against: vec![0; num_players],
            score_diff_against: vec![0; num_players],
            ..Default::default()
        }
    }

    /// Think time per match played.
    pub fn average_time(&self) -> Duration {
        if self.games == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.games
        }
    }
}

/// Standings of every player, updated after each match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    standings: Vec<Standings>,
}

impl Statistics {
    /// Empty standings for `num_players` players.
    pub fn new(num_players: usize) -> Self {
        Self {
            standings: (0..num_players).map(|_| Standings::new(num_players)).collect(),
        }
    }

    /// Fold one finished match into both players' standings.
    ///
    /// # Panics
    /// If the result names a player index outside the tournament.
    pub fn record(&mut self, result: &MatchResult) {
        for i in 0..2 {
            let player = result.players[i];
            let opponent = result.players[1 - i];
            let (score, other) = (result.scores[i], result.scores[1 - i]);
            let elapsed = result.elapsed[i];

            let entry = &mut self.standings[player];
            entry.games += 1;
            entry.points += result.points[i];
            if result.failures[i].is_some() {
                entry.fails += 1;
            }
            match score.cmp(&other) {
                std::cmp::Ordering::Greater => {
                    entry.wins += 1;
                    entry.wins_against[opponent] += 1;
                }
                std::cmp::Ordering::Equal => entry.ties += 1,
                std::cmp::Ordering::Less => entry.losses += 1,
            }
            entry.score_diff_against[opponent] += i64::from(score) - i64::from(other);
            entry.total_time += elapsed;
            entry.max_time = entry.max_time.max(elapsed);
        }
        trace!(players = ?result.players, "standings updated");
    }

    /// Standings in original player order.
    pub fn standings(&self) -> &[Standings] {
        &self.standings
    }

    /// Player indices from best to worst: most points first, then lowest index.
    pub fn ranking(&self) -> Vec<usize> {
        let mut order = (0..self.standings.len()).collect::<Vec<_>>();
        // stable: equal points keep ascending index order
        order.sort_by(|&a, &b| self.standings[b].points.cmp(&self.standings[a].points));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player_slot::Failure;

    fn result(
        players: [usize; 2],
        scores: [i32; 2],
        failed: [bool; 2],
        secs: [u64; 2],
    ) -> MatchResult {
        let failures = failed.map(|f| f.then(|| Failure::Read("eof".to_owned())));
        MatchResult {
            players,
            scores,
            points: crate::match_runner::competition_points(scores, failed),
            failures,
            elapsed: secs.map(Duration::from_secs),
        }
    }

    #[test]
    fn test_record_is_symmetric() {
        let mut stats = Statistics::new(3);
        stats.record(&result([0, 2], [5, 3], [false, false], [4, 2]));

        let s = stats.standings();
        assert_eq!(s[0].points, 2);
        assert_eq!(s[2].points, 1);
        assert_eq!((s[0].wins, s[0].ties, s[0].losses), (1, 0, 0));
        assert_eq!((s[2].wins, s[2].ties, s[2].losses), (0, 0, 1));
        assert_eq!(s[0].wins_against, vec![0, 0, 1]);
        assert_eq!(s[2].wins_against, vec![0, 0, 0]);
        assert_eq!(s[0].score_diff_against[2], 2);
        assert_eq!(s[2].score_diff_against[0], -2);
        assert_eq!(s[1], Standings::new(3));
    }

    #[test]
    fn test_ties_fails_and_times() {
        let mut stats = Statistics::new(2);
        stats.record(&result([0, 1], [1, 1], [false, true], [3, 0]));
        stats.record(&result([1, 0], [2, 0], [false, false], [1, 5]));

        let s = stats.standings();
        assert_eq!(s[0].ties, 1);
        assert_eq!(s[0].losses, 1);
        assert_eq!(s[1].ties, 1);
        assert_eq!(s[1].wins, 1);
        assert_eq!(s[1].fails, 1);
        assert_eq!(s[0].fails, 0);
        // failed player scores no points even on a tie
        assert_eq!(s[1].points, 2);
        assert_eq!(s[0].points, 2);

        assert_eq!(s[0].games, 2);
        assert_eq!(s[0].total_time, Duration::from_secs(8));
        assert_eq!(s[0].max_time, Duration::from_secs(5));
        assert_eq!(s[0].average_time(), Duration::from_secs(4));
        assert_eq!(s[1].max_time, Duration::from_secs(1));
    }

    #[test]
    fn test_ranking_is_stable() {
        let mut stats = Statistics::new(4);
        stats.record(&result([3, 1], [1, 0], [false, false], [0, 0]));
        stats.record(&result([0, 2], [0, 0], [false, false], [0, 0]));
        // points: p0 1, p1 1, p2 1, p3 2
        assert_eq!(stats.ranking(), vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_empty_average() {
        let stats = Statistics::new(2);
        assert_eq!(stats.standings()[0].average_time(), Duration::ZERO);
        assert_eq!(stats.ranking(), vec![0, 1]);
    }
}
