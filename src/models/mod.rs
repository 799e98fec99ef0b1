//! Data structures for the padel tournament: teams, matches, tournaments, settings.

mod game;
mod settings;
mod standing;
mod team;
mod tournament;

pub use game::{Match, MatchId, MatchStatus, SetScore, SETS_PER_MATCH};
pub use settings::{DisplaySettings, DisplayTable, Settings, TableSettings};
pub use standing::{LeaderboardRow, Standing, TeamStats, POINTS_FOR_WIN};
pub use team::{Team, TeamId};
pub use tournament::{Scope, Tournament, TournamentError, TournamentId};
