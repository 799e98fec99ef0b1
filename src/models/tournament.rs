//! Tournament metadata, scope and the domain error type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{MatchId, TeamId};

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Missing sheet/column, duplicate id, empty required field.
    #[error("{0}")]
    Validation(String),
    /// Bad password or token.
    #[error("Invalid password")]
    AuthenticationFailure,
    /// Organizer action attempted without logging in.
    #[error("Login required")]
    Unauthorized,
    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),
    #[error("Team {0} not found")]
    TeamNotFound(TeamId),
    #[error("Match {0} not found")]
    MatchNotFound(MatchId),
    /// Snapshot file or hashing failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl TournamentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = u32;

/// Partition of teams/matches. `None` is the legacy global scope.
pub type Scope = Option<TournamentId>;

/// A tournament: scopes teams and matches.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub tournament_id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    /// Path (under the media dir) or absolute URL of the tournament image.
    #[serde(default)]
    pub icon_path: Option<String>,
}

impl Tournament {
    pub fn new(tournament_id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            tournament_id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// "name @ location", or just the name.
    pub fn title(&self) -> String {
        if self.location.is_empty() {
            self.name.clone()
        } else {
            format!("{} @ {}", self.name, self.location)
        }
    }
}
