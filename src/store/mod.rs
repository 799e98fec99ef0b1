//! Persistence: the `Store` trait and scoped workflows built on it.
//!
//! Every call takes the tournament scope explicitly. `None` is the legacy global
//! partition (rows with no tournament), not "all rows".

mod memory;

pub use memory::MemoryStore;

use crate::import_export::{self, Workbook};
use crate::logic::{self, PlayedMatchRow, WritePolicy};
use crate::models::{
    LeaderboardRow, Match, MatchId, MatchStatus, Scope, Settings, Standing, Team, TeamId,
    Tournament, TournamentError, TournamentId,
};
use serde::Serialize;

/// Everything the overview page shows for one scope.
#[derive(Clone, Debug, Serialize)]
pub struct Overview {
    pub tournament: Option<Tournament>,
    pub played: Vec<PlayedMatchRow>,
    pub leaderboard: Vec<LeaderboardRow>,
    /// Group-sorted standings (one row per team).
    pub standings: Vec<Standing>,
    /// The same rows split into per-group tables.
    pub group_tables: Vec<(String, Vec<Standing>)>,
    pub teams: Vec<Team>,
}

/// Teams, matches, tournaments and settings storage.
///
/// Reads are snapshots; `replace_*` swaps a whole scope at once. Concurrent writers to the
/// same scope are not coordinated: the last write wins.
pub trait Store {
    fn tournaments(&self) -> Result<Vec<Tournament>, TournamentError>;
    fn replace_tournaments(&self, rows: Vec<Tournament>) -> Result<(), TournamentError>;
    /// Remove a tournament, and its teams and matches when `cascade`. Clears it as active selection.
    fn delete_tournament(&self, id: TournamentId, cascade: bool) -> Result<(), TournamentError>;

    fn teams(&self, scope: Scope) -> Result<Vec<Team>, TournamentError>;
    fn replace_teams(&self, scope: Scope, rows: Vec<Team>) -> Result<(), TournamentError>;
    fn matches(&self, scope: Scope) -> Result<Vec<Match>, TournamentError>;
    fn replace_matches(&self, scope: Scope, rows: Vec<Match>) -> Result<(), TournamentError>;
    /// Replace teams and matches of a scope in one write.
    fn replace_scope(
        &self,
        scope: Scope,
        teams: Vec<Team>,
        matches: Vec<Match>,
    ) -> Result<(), TournamentError>;

    fn settings(&self) -> Result<Settings, TournamentError>;
    fn update_settings(&self, f: &mut dyn FnMut(&mut Settings)) -> Result<(), TournamentError>;

    // ---- tournaments ----

    fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.tournaments()?
            .into_iter()
            .find(|t| t.tournament_id == id)
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    fn add_tournament(&self, tournament: Tournament) -> Result<(), TournamentError> {
        let mut rows = self.tournaments()?;
        logic::add_tournament(&mut rows, tournament)?;
        self.replace_tournaments(rows)
    }

    fn save_tournaments(&self, rows: Vec<Tournament>) -> Result<(), TournamentError> {
        logic::validate_tournaments(&rows)?;
        self.replace_tournaments(rows)
    }

    fn set_tournament_icon(&self, id: TournamentId, icon_path: String) -> Result<(), TournamentError> {
        let mut rows = self.tournaments()?;
        let t = rows
            .iter_mut()
            .find(|t| t.tournament_id == id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        t.icon_path = Some(icon_path);
        self.replace_tournaments(rows)
    }

    /// Delete every tournament, and all scoped teams/matches when `cascade`.
    fn delete_all_tournaments(&self, cascade: bool) -> Result<(), TournamentError> {
        for t in self.tournaments()? {
            self.delete_tournament(t.tournament_id, cascade)?;
        }
        self.update_settings(&mut |s: &mut Settings| s.active_tournament_id = None)
    }

    // ---- active selection ----

    fn active_scope(&self) -> Result<Scope, TournamentError> {
        Ok(self.settings()?.active_tournament_id)
    }

    /// Select the tournament viewers see. The id must exist.
    fn set_active_tournament(&self, id: Option<TournamentId>) -> Result<(), TournamentError> {
        if let Some(id) = id {
            self.tournament(id)?;
        }
        self.update_settings(&mut |s: &mut Settings| s.active_tournament_id = id)
    }

    // ---- teams ----

    fn add_team(&self, scope: Scope, team: Team) -> Result<(), TournamentError> {
        let mut rows = self.teams(scope)?;
        logic::add_team(&mut rows, team)?;
        self.replace_teams(scope, rows)
    }

    fn save_teams(&self, scope: Scope, rows: Vec<Team>) -> Result<(), TournamentError> {
        logic::validate_teams(&rows)?;
        self.replace_teams(scope, rows)
    }

    /// Returns false when no such team existed.
    fn delete_team(&self, scope: Scope, id: TeamId) -> Result<bool, TournamentError> {
        let mut rows = self.teams(scope)?;
        let before = rows.len();
        rows.retain(|t| t.team_id != id);
        let removed = rows.len() != before;
        if removed {
            self.replace_teams(scope, rows)?;
        }
        Ok(removed)
    }

    // ---- matches ----

    fn save_matches(&self, scope: Scope, mut rows: Vec<Match>) -> Result<(), TournamentError> {
        logic::validate_matches(&rows)?;
        rows.iter_mut().for_each(Match::normalize_sets);
        self.replace_matches(scope, rows)
    }

    /// Returns false when no such match existed.
    fn delete_match(&self, scope: Scope, id: MatchId) -> Result<bool, TournamentError> {
        let mut rows = self.matches(scope)?;
        let before = rows.len();
        rows.retain(|m| m.match_id != id);
        let removed = rows.len() != before;
        if removed {
            self.replace_matches(scope, rows)?;
        }
        Ok(removed)
    }

    /// Round-robin fixtures for the scope's teams. Returns how many matches were generated.
    ///
    /// Fails without writing when the ids would run past `MatchId::MAX` or, on append,
    /// collide with ids already in the scope.
    fn generate_fixtures(
        &self,
        scope: Scope,
        groups: &[String],
        start_id: MatchId,
        policy: WritePolicy,
    ) -> Result<usize, TournamentError> {
        let teams = self.teams(scope)?;
        let generated = logic::generate_round_robin(&teams, groups, start_id);
        let count = generated.len();
        if !logic::fixture_ids_fit(start_id, count) {
            return Err(TournamentError::validation(format!(
                "{} matches starting at ID {} exceed the largest match ID",
                count, start_id
            )));
        }
        let existing = self.matches(scope)?;
        let merged = logic::apply_generated(existing, generated, policy);
        logic::validate_matches(&merged)?;
        self.replace_matches(scope, merged)?;
        log::info!("Generated {} matches for scope {:?} ({:?})", count, scope, policy);
        Ok(count)
    }

    /// Append one hand-made match.
    fn add_manual_match(
        &self,
        scope: Scope,
        group: &str,
        team1: TeamId,
        team2: TeamId,
        custom_id: Option<MatchId>,
        status: MatchStatus,
    ) -> Result<Match, TournamentError> {
        let teams = self.teams(scope)?;
        let mut rows = self.matches(scope)?;
        let mut m = logic::manual_match(&teams, &rows, group, team1, team2, custom_id)?;
        m.status = status;
        rows.push(m.clone());
        self.replace_matches(scope, rows)?;
        Ok(m)
    }

    fn clear_scores(
        &self,
        scope: Scope,
        groups: &[String],
        reset_status: bool,
    ) -> Result<usize, TournamentError> {
        let mut rows = self.matches(scope)?;
        let cleared = logic::clear_scores(&mut rows, groups, reset_status);
        self.replace_matches(scope, rows)?;
        Ok(cleared)
    }

    // ---- import / export ----

    /// Replace the scope's teams and matches with a parsed workbook. Nothing is written on error.
    fn import_workbook(&self, scope: Scope, workbook: &Workbook) -> Result<(usize, usize), TournamentError> {
        let (teams, matches) = import_export::parse_workbook(workbook)?;
        logic::validate_teams(&teams)?;
        logic::validate_matches(&matches)?;
        let counts = (teams.len(), matches.len());
        self.replace_scope(scope, teams, matches)?;
        log::info!("Imported {} teams and {} matches into scope {:?}", counts.0, counts.1, scope);
        Ok(counts)
    }

    fn export_workbook(&self, scope: Scope) -> Result<Workbook, TournamentError> {
        import_export::export_workbook(&self.teams(scope)?, &self.matches(scope)?)
    }

    // ---- views ----

    fn standings(&self, scope: Scope) -> Result<Vec<Standing>, TournamentError> {
        Ok(logic::compute_standings(&self.teams(scope)?, &self.matches(scope)?))
    }

    fn overview(&self, scope: Scope) -> Result<Overview, TournamentError> {
        let teams = self.teams(scope)?;
        let matches = self.matches(scope)?;
        let tournament = match scope {
            Some(id) => self.tournaments()?.into_iter().find(|t| t.tournament_id == id),
            None => None,
        };
        let standings = logic::compute_standings(&teams, &matches);
        Ok(Overview {
            tournament,
            played: logic::played_matches(&teams, &matches),
            leaderboard: logic::leaderboard(&standings),
            group_tables: logic::group_tables(&standings),
            standings,
            teams,
        })
    }
}
