//! Played matches summary and bulk score maintenance.

use crate::logic::result::evaluate_sets;
use crate::models::{Match, MatchId, MatchStatus, Team, TeamId};
use serde::Serialize;
use std::collections::HashMap;

/// One row of the "Played Matches" table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayedMatchRow {
    pub match_id: MatchId,
    /// The match's group (shown as the court).
    pub court: String,
    /// "team1 vs team2"; "?" for an unset or unknown team.
    pub players: String,
    /// "a - b"
    pub sets: String,
    /// "x : y"
    pub games: String,
    pub status: MatchStatus,
}

/// Rows for every match that is Completed or has any score entered, in match order.
pub fn played_matches(teams: &[Team], matches: &[Match]) -> Vec<PlayedMatchRow> {
    let labels: HashMap<TeamId, String> = teams.iter().map(|t| (t.team_id, t.label())).collect();
    let label = |id: Option<TeamId>| {
        id.and_then(|id| labels.get(&id).cloned())
            .unwrap_or_else(|| "?".to_string())
    };

    matches
        .iter()
        .filter(|m| m.status == MatchStatus::Completed || m.has_score())
        .map(|m| {
            let r = evaluate_sets(m);
            PlayedMatchRow {
                match_id: m.match_id,
                court: m.group.clone(),
                players: format!("{} vs {}", label(m.team1_id), label(m.team2_id)),
                sets: format!("{} - {}", r.team1_sets, r.team2_sets),
                games: format!("{} : {}", r.team1_games, r.team2_games),
                status: m.status,
            }
        })
        .collect()
}

/// Clear set scores of matches (restricted to `groups` when non-empty), optionally resetting
/// status to Scheduled. Returns how many matches were touched.
pub fn clear_scores(matches: &mut [Match], groups: &[String], reset_status: bool) -> usize {
    let mut cleared = 0;
    for m in matches
        .iter_mut()
        .filter(|m| groups.is_empty() || groups.iter().any(|g| *g == m.group))
    {
        m.clear_scores();
        if reset_status {
            m.status = MatchStatus::Scheduled;
        }
        cleared += 1;
    }
    cleared
}
