//! Padel tournament web app: library with models, scoring/scheduling logic, storage and rendering.

pub mod config;
pub mod import_export;
pub mod logic;
pub mod models;
pub mod render;
pub mod store;

pub use import_export::{export_workbook, parse_workbook, template, Workbook};
pub use logic::{
    compute_standings, evaluate_sets, generate_round_robin, leaderboard, played_matches, AuthState,
    Outcome, SetResult, WritePolicy,
};
pub use models::{
    LeaderboardRow, Match, MatchId, MatchStatus, Scope, SetScore, Settings, Standing, Team, TeamId,
    Tournament, TournamentError, TournamentId,
};
pub use store::{MemoryStore, Overview, Store};
