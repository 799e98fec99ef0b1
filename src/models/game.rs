//! Match, MatchStatus and per-set scores for best-of-three padel matches.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a match (unique within a tournament).
pub type MatchId = u32;

/// Number of sets a match can hold.
pub const SETS_PER_MATCH: usize = 3;

/// Advisory match status; never derived from the scores.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 3] = [Self::Scheduled, Self::InProgress, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "Scheduled",
            MatchStatus::InProgress => "In Progress",
            MatchStatus::Completed => "Completed",
        }
    }

    /// Parse a display string; anything unknown (or empty) becomes `Scheduled`.
    pub fn parse_lenient(s: &str) -> Self {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game counts of one set. Both present means played; anything else is not yet played.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub team1: Option<u32>,
    pub team2: Option<u32>,
}

impl SetScore {
    pub fn played(team1: u32, team2: u32) -> Self {
        Self {
            team1: Some(team1),
            team2: Some(team2),
        }
    }

    pub fn unplayed() -> Self {
        Self::default()
    }

    /// Both game counts, or None if either side is missing.
    pub fn games(&self) -> Option<(u32, u32)> {
        Some((self.team1?, self.team2?))
    }

    pub fn is_empty(&self) -> bool {
        self.team1.is_none() && self.team2.is_none()
    }

    /// Drop a lone game count so both sides are present or both absent.
    pub fn normalized(self) -> Self {
        match self.games() {
            Some((a, b)) => Self::played(a, b),
            None => Self::unplayed(),
        }
    }
}

/// A single match between two teams of one group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: MatchId,
    pub group: String,
    /// None when the slot has not been assigned a team.
    pub team1_id: Option<TeamId>,
    pub team2_id: Option<TeamId>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub sets: [SetScore; SETS_PER_MATCH],
}

impl Match {
    /// A freshly scheduled match with no set scores.
    pub fn scheduled(match_id: MatchId, group: impl Into<String>, team1: TeamId, team2: TeamId) -> Self {
        Self {
            match_id,
            group: group.into(),
            team1_id: Some(team1),
            team2_id: Some(team2),
            status: MatchStatus::Scheduled,
            sets: [SetScore::unplayed(); SETS_PER_MATCH],
        }
    }

    /// Builder-style helper used by organizers entering results.
    pub fn with_sets(mut self, sets: [SetScore; SETS_PER_MATCH]) -> Self {
        self.sets = sets;
        self
    }

    /// True if any game count has been entered, even on a half-filled set.
    pub fn has_score(&self) -> bool {
        self.sets.iter().any(|s| !s.is_empty())
    }

    /// Both team references, if set.
    pub fn teams(&self) -> Option<(TeamId, TeamId)> {
        Some((self.team1_id?, self.team2_id?))
    }

    /// Enforce the both-or-neither rule on every set.
    pub fn normalize_sets(&mut self) {
        for s in &mut self.sets {
            *s = s.normalized();
        }
    }

    pub fn clear_scores(&mut self) {
        self.sets = [SetScore::unplayed(); SETS_PER_MATCH];
    }
}
