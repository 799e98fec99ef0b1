//! Setup: validated edits to teams, matches and tournaments before they are stored.

use crate::models::{Match, Team, Tournament, TournamentError};
use std::collections::HashSet;
use std::hash::Hash;

fn first_duplicate<T, K: Copy + Eq + Hash>(rows: &[T], key: impl Fn(&T) -> K) -> Option<K> {
    let mut seen = HashSet::new();
    rows.iter().map(key).find(|k| !seen.insert(*k))
}

/// Add a team to the scope's roster. Team name required, id unique.
pub fn add_team(teams: &mut Vec<Team>, team: Team) -> Result<(), TournamentError> {
    if team.team_name.trim().is_empty() {
        return Err(TournamentError::validation("Team name is required."));
    }
    if teams.iter().any(|t| t.team_id == team.team_id) {
        return Err(TournamentError::validation("Team ID already exists."));
    }
    teams.push(team);
    Ok(())
}

/// Check a full team table before it replaces the scope's roster.
pub fn validate_teams(teams: &[Team]) -> Result<(), TournamentError> {
    if let Some(id) = first_duplicate(teams, |t| t.team_id) {
        return Err(TournamentError::validation(format!("Duplicate team ID {}", id)));
    }
    Ok(())
}

/// Largest game count accepted for one side of a set.
pub const MAX_GAMES_PER_SET: u32 = 99;

/// Check a full match table before it replaces the scope's matches.
pub fn validate_matches(matches: &[Match]) -> Result<(), TournamentError> {
    if let Some(id) = first_duplicate(matches, |m| m.match_id) {
        return Err(TournamentError::validation(format!("Duplicate match ID {}", id)));
    }
    for m in matches {
        let too_many = m
            .sets
            .iter()
            .flat_map(|s| [s.team1, s.team2])
            .flatten()
            .find(|&g| g > MAX_GAMES_PER_SET);
        if let Some(games) = too_many {
            return Err(TournamentError::validation(format!(
                "Match {}: game count {} is out of range (0-{})",
                m.match_id, games, MAX_GAMES_PER_SET
            )));
        }
    }
    Ok(())
}

/// Add a tournament. Name required, id unique.
pub fn add_tournament(
    tournaments: &mut Vec<Tournament>,
    tournament: Tournament,
) -> Result<(), TournamentError> {
    if tournament.name.trim().is_empty() {
        return Err(TournamentError::validation("Name is required."));
    }
    if tournaments
        .iter()
        .any(|t| t.tournament_id == tournament.tournament_id)
    {
        return Err(TournamentError::validation("ID already exists."));
    }
    tournaments.push(tournament);
    Ok(())
}

/// Check a full tournament table before it is saved.
pub fn validate_tournaments(tournaments: &[Tournament]) -> Result<(), TournamentError> {
    if let Some(id) = first_duplicate(tournaments, |t| t.tournament_id) {
        return Err(TournamentError::validation(format!("Duplicate tournament ID {}", id)));
    }
    if tournaments.iter().any(|t| t.name.trim().is_empty()) {
        return Err(TournamentError::validation("Name is required."));
    }
    Ok(())
}
