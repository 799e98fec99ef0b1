//! Fixture generation: round-robin per group, manual match maker, write policies.

use crate::models::{Match, MatchId, Team, TeamId, TournamentError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to do with matches already stored for the scope.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Discard the scope's existing matches.
    #[default]
    ReplaceAll,
    /// Keep existing matches; pairings may end up duplicated.
    Append,
}

/// Generate every pairing within each group.
///
/// 1. Partition teams by group (groups in ascending label order; `groups` filters when non-empty).
/// 2. Within a group, keep team input order: pair position i with every j > i.
/// 3. Number matches sequentially from `start_id`, all Scheduled with no scores.
///
/// Ids saturate at `u32::MAX`; callers check the range with `fixture_ids_fit`.
pub fn generate_round_robin(teams: &[Team], groups: &[String], start_id: MatchId) -> Vec<Match> {
    let mut by_group: BTreeMap<&str, Vec<TeamId>> = BTreeMap::new();
    for t in teams {
        if !groups.is_empty() && !groups.iter().any(|g| *g == t.group) {
            continue;
        }
        by_group.entry(t.group.as_str()).or_default().push(t.team_id);
    }

    let mut next_id = start_id;
    let mut matches = Vec::new();
    for (group, ids) in by_group {
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                matches.push(Match::scheduled(next_id, group, a, b));
                next_id = next_id.saturating_add(1);
            }
        }
    }
    matches
}

/// True if `count` sequential ids starting at `start_id` stay within `MatchId`.
pub fn fixture_ids_fit(start_id: MatchId, count: usize) -> bool {
    match count.checked_sub(1) {
        None => true,
        Some(last) => u64::from(start_id) + last as u64 <= u64::from(MatchId::MAX),
    }
}

/// Merge generated matches into the scope's existing matches.
pub fn apply_generated(existing: Vec<Match>, generated: Vec<Match>, policy: WritePolicy) -> Vec<Match> {
    match policy {
        WritePolicy::ReplaceAll => generated,
        WritePolicy::Append => existing.into_iter().chain(generated).collect(),
    }
}

/// Next free match id in a scope: max + 1, or 1 when there are no matches.
/// None once the largest id is `MatchId::MAX`.
pub fn next_match_id(existing: &[Match]) -> Option<MatchId> {
    match existing.iter().map(|m| m.match_id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Build a single scheduled match between two distinct teams of `group`.
///
/// Uses `custom_id` when given (and non-zero), otherwise the next free id.
/// A custom id already used in the scope is rejected.
pub fn manual_match(
    teams: &[Team],
    existing: &[Match],
    group: &str,
    team1: TeamId,
    team2: TeamId,
    custom_id: Option<MatchId>,
) -> Result<Match, TournamentError> {
    if group.trim().is_empty() {
        return Err(TournamentError::validation("Please select a group."));
    }
    if team1 == team2 {
        return Err(TournamentError::validation("Team 1 and Team 2 must be different."));
    }
    for id in [team1, team2] {
        let team = teams
            .iter()
            .find(|t| t.team_id == id)
            .ok_or(TournamentError::TeamNotFound(id))?;
        if team.group != group {
            return Err(TournamentError::validation(format!(
                "Team {} is not in group {}",
                id, group
            )));
        }
    }
    let match_id = match custom_id {
        Some(id) if id > 0 => {
            if existing.iter().any(|m| m.match_id == id) {
                return Err(TournamentError::validation("Match ID already exists."));
            }
            id
        }
        _ => next_match_id(existing)
            .ok_or_else(|| TournamentError::validation("No free match ID left."))?,
    };
    Ok(Match::scheduled(match_id, group, team1, team2))
}
