//! Standing rows: derived per-team statistics, never persisted.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Points awarded to the side that wins more sets.
pub const POINTS_FOR_WIN: u32 = 3;

/// Cumulative statistics for one team.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub points: u32,
}

impl TeamStats {
    pub fn sets_diff(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    pub fn games_diff(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }

    /// Sum of two records. Folding matches is just repeated `combine`, so order does not matter.
    pub fn combine(self, other: TeamStats) -> TeamStats {
        TeamStats {
            played: self.played.saturating_add(other.played),
            wins: self.wins.saturating_add(other.wins),
            losses: self.losses.saturating_add(other.losses),
            sets_won: self.sets_won.saturating_add(other.sets_won),
            sets_lost: self.sets_lost.saturating_add(other.sets_lost),
            games_won: self.games_won.saturating_add(other.games_won),
            games_lost: self.games_lost.saturating_add(other.games_lost),
            points: self.points.saturating_add(other.points),
        }
    }
}

/// One row of a standings table (API / display).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub team_id: TeamId,
    pub team_name: String,
    pub group: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub points: u32,
    pub sets_diff: i64,
    pub games_diff: i64,
}

impl Standing {
    pub fn from_stats(
        team_id: TeamId,
        team_name: impl Into<String>,
        group: impl Into<String>,
        stats: TeamStats,
    ) -> Self {
        Self {
            team_id,
            team_name: team_name.into(),
            group: group.into(),
            played: stats.played,
            wins: stats.wins,
            losses: stats.losses,
            sets_won: stats.sets_won,
            sets_lost: stats.sets_lost,
            games_won: stats.games_won,
            games_lost: stats.games_lost,
            points: stats.points,
            sets_diff: stats.sets_diff(),
            games_diff: stats.games_diff(),
        }
    }
}

/// A standings row with its overall rank (winner board).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// 1-based.
    pub rank: usize,
    #[serde(flatten)]
    pub standing: Standing,
}
