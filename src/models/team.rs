//! Team (a padel pair) data structure.

use serde::{Deserialize, Serialize};

/// Unique identifier for a team within a tournament.
pub type TeamId = u32;

/// A team of two players, placed in one group.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,
    pub team_name: String,
    #[serde(default)]
    pub player1: String,
    #[serde(default)]
    pub player2: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub seed: Option<u32>,
}

impl Team {
    pub fn new(team_id: TeamId, team_name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            team_id,
            team_name: team_name.into(),
            group: group.into(),
            ..Self::default()
        }
    }

    pub fn with_players(mut self, player1: impl Into<String>, player2: impl Into<String>) -> Self {
        self.player1 = player1.into();
        self.player2 = player2.into();
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Display label: the team name, or "player1 vs player2" when the name is blank.
    pub fn label(&self) -> String {
        if self.team_name.trim().is_empty() {
            format!("{} vs {}", self.player1, self.player2)
        } else {
            self.team_name.clone()
        }
    }

    /// Both players joined for roster display.
    pub fn players(&self) -> String {
        format!("{}, {}", self.player1, self.player2)
    }
}
