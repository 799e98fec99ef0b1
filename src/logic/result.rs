//! Match result evaluation: sets and games won per side from the set scores.

use crate::models::Match;
use serde::Serialize;

/// Sets and games per side over the decided sets of one match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SetResult {
    pub team1_sets: u32,
    pub team2_sets: u32,
    pub team1_games: u32,
    pub team2_games: u32,
    /// Sets with both game counts present (a tied set counts here but awards no set).
    pub decided_sets: u32,
}

/// How a match ended, judged by sets won.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Team1Win,
    Team2Win,
    /// Both sides won the same number of sets (e.g. 1-1 with the decider unplayed).
    DrawnSets,
}

impl SetResult {
    /// `(team1_sets, team2_sets)`.
    pub fn sets(&self) -> (u32, u32) {
        (self.team1_sets, self.team2_sets)
    }

    /// None while no set has been won by either side; such a match is treated as not yet played.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.team1_sets == 0 && self.team2_sets == 0 {
            return None;
        }
        Some(match self.team1_sets.cmp(&self.team2_sets) {
            std::cmp::Ordering::Greater => Outcome::Team1Win,
            std::cmp::Ordering::Less => Outcome::Team2Win,
            std::cmp::Ordering::Equal => Outcome::DrawnSets,
        })
    }
}

/// Evaluate every set where both sides have a game count. Half-filled sets are skipped.
/// Game totals saturate instead of overflowing.
pub fn evaluate_sets(m: &Match) -> SetResult {
    m.sets
        .iter()
        .filter_map(|s| s.games())
        .fold(SetResult::default(), |acc, (a, b)| SetResult {
            team1_sets: acc.team1_sets + u32::from(a > b),
            team2_sets: acc.team2_sets + u32::from(b > a),
            team1_games: acc.team1_games.saturating_add(a),
            team2_games: acc.team2_games.saturating_add(b),
            decided_sets: acc.decided_sets + 1,
        })
}
