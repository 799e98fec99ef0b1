//! Tournament business logic: results, standings, fixtures, catalogue, auth.

mod auth;
mod catalogue;
mod played;
mod result;
mod round_robin;
mod setup;
mod standings;

pub use auth::{
    hash_secret, issue_remember_token, set_initial_password, verify_secret, AuthState, Credentials,
};
pub use catalogue::{held, is_held, is_upcoming, upcoming, MAX_HELD, MAX_UPCOMING};
pub use played::{clear_scores, played_matches, PlayedMatchRow};
pub use result::{evaluate_sets, Outcome, SetResult};
pub use round_robin::{
    apply_generated, fixture_ids_fit, generate_round_robin, manual_match, next_match_id, WritePolicy,
};
pub use setup::{
    add_team, add_tournament, validate_matches, validate_teams, validate_tournaments,
    MAX_GAMES_PER_SET,
};
pub use standings::{aggregate_stats, compare_rank, compute_standings, group_tables, leaderboard};
