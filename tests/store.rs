//! Integration tests for the scoped store: partitions, cascades, persistence, workflows.

use padel_tournament_web::{
    Match, MatchStatus, MemoryStore, SetScore, Settings, Store, Team, Tournament, TournamentError,
    WritePolicy, Workbook,
};

fn store_with_two_tournaments() -> MemoryStore {
    let store = MemoryStore::new();
    store.add_tournament(Tournament::new(1, "Spring Open")).unwrap();
    store.add_tournament(Tournament::new(2, "Summer Cup")).unwrap();
    store
}

fn roster(group: &str) -> Vec<Team> {
    vec![
        Team::new(1, "A", group),
        Team::new(2, "B", group),
        Team::new(3, "C", group),
    ]
}

#[test]
fn scopes_are_isolated() {
    let store = store_with_two_tournaments();
    store.save_teams(Some(1), roster("G1")).unwrap();
    store.save_teams(Some(2), vec![Team::new(1, "Other", "G1")]).unwrap();
    store.save_teams(None, vec![Team::new(7, "Legacy", "G1")]).unwrap();

    assert_eq!(store.teams(Some(1)).unwrap().len(), 3);
    assert_eq!(store.teams(Some(2)).unwrap()[0].team_name, "Other");
    let global = store.teams(None).unwrap();
    assert_eq!(global.len(), 1);
    assert_eq!(global[0].team_id, 7);

    store.generate_fixtures(Some(1), &[], 1, WritePolicy::ReplaceAll).unwrap();
    assert_eq!(store.matches(Some(1)).unwrap().len(), 3);
    assert!(store.matches(Some(2)).unwrap().is_empty());
    assert!(store.matches(None).unwrap().is_empty());
}

#[test]
fn same_ids_in_different_scopes_do_not_collide() {
    let store = store_with_two_tournaments();
    store.add_team(Some(1), Team::new(1, "A", "G")).unwrap();
    store.add_team(Some(2), Team::new(1, "A", "G")).unwrap();
    assert_eq!(
        store.add_team(Some(1), Team::new(1, "Again", "G")),
        Err(TournamentError::Validation("Team ID already exists.".into()))
    );
}

#[test]
fn invalid_table_save_writes_nothing() {
    let store = store_with_two_tournaments();
    store.save_teams(Some(1), roster("G1")).unwrap();
    let dup = vec![Team::new(1, "X", "G1"), Team::new(1, "Y", "G1")];
    assert_eq!(
        store.save_teams(Some(1), dup),
        Err(TournamentError::Validation("Duplicate team ID 1".into()))
    );
    assert_eq!(store.teams(Some(1)).unwrap(), roster("G1"));

    let dup = vec![Match::scheduled(4, "G1", 1, 2), Match::scheduled(4, "G1", 2, 3)];
    assert!(store.save_matches(Some(1), dup).is_err());
    assert!(store.matches(Some(1)).unwrap().is_empty());
}

#[test]
fn save_matches_normalizes_half_filled_sets() {
    let store = MemoryStore::new();
    let mut m = Match::scheduled(1, "G1", 1, 2);
    m.sets[0] = SetScore {
        team1: Some(6),
        team2: None,
    };
    m.sets[1] = SetScore::played(6, 2);
    store.save_matches(None, vec![m]).unwrap();
    let saved = &store.matches(None).unwrap()[0];
    assert_eq!(saved.sets[0], SetScore::unplayed());
    assert_eq!(saved.sets[1], SetScore::played(6, 2));
}

#[test]
fn cascade_delete_removes_rows_and_active_selection() {
    let store = store_with_two_tournaments();
    store.save_teams(Some(1), roster("G1")).unwrap();
    store.save_teams(Some(2), roster("G1")).unwrap();
    store.set_active_tournament(Some(1)).unwrap();

    store.delete_tournament(1, true).unwrap();
    assert!(store.teams(Some(1)).unwrap().is_empty());
    assert_eq!(store.teams(Some(2)).unwrap().len(), 3);
    assert_eq!(store.active_scope().unwrap(), None);
    assert_eq!(store.tournament(1), Err(TournamentError::TournamentNotFound(1)));
    assert_eq!(
        store.delete_tournament(1, true),
        Err(TournamentError::TournamentNotFound(1))
    );
}

#[test]
fn delete_without_cascade_keeps_rows() {
    let store = store_with_two_tournaments();
    store.save_teams(Some(2), roster("G1")).unwrap();
    store.delete_all_tournaments(false).unwrap();
    assert!(store.tournaments().unwrap().is_empty());
    assert_eq!(store.teams(Some(2)).unwrap().len(), 3);
}

#[test]
fn active_tournament_must_exist() {
    let store = store_with_two_tournaments();
    assert_eq!(
        store.set_active_tournament(Some(9)),
        Err(TournamentError::TournamentNotFound(9))
    );
    store.set_active_tournament(Some(2)).unwrap();
    assert_eq!(store.active_scope().unwrap(), Some(2));
}

#[test]
fn tournament_add_rules() {
    let store = store_with_two_tournaments();
    assert_eq!(
        store.add_tournament(Tournament::new(3, "  ")),
        Err(TournamentError::Validation("Name is required.".into()))
    );
    assert_eq!(
        store.add_tournament(Tournament::new(1, "Dup")),
        Err(TournamentError::Validation("ID already exists.".into()))
    );
    store.set_tournament_icon(2, "t_2.png".to_string()).unwrap();
    assert_eq!(store.tournament(2).unwrap().icon_path.as_deref(), Some("t_2.png"));
}

#[test]
fn append_policy_keeps_existing_matches() {
    let store = MemoryStore::new();
    store.save_teams(None, roster("G1")).unwrap();
    store.generate_fixtures(None, &[], 1, WritePolicy::ReplaceAll).unwrap();
    let added = store.generate_fixtures(None, &[], 10, WritePolicy::Append).unwrap();
    assert_eq!(added, 3);
    let ids: Vec<_> = store.matches(None).unwrap().iter().map(|m| m.match_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 10, 11, 12]);

    store.generate_fixtures(None, &[], 1, WritePolicy::ReplaceAll).unwrap();
    assert_eq!(store.matches(None).unwrap().len(), 3);
}

#[test]
fn fixture_ids_past_the_largest_id_are_rejected() {
    let store = MemoryStore::new();
    store.save_teams(None, roster("G1")).unwrap();
    let err = store
        .generate_fixtures(None, &[], u32::MAX - 1, WritePolicy::ReplaceAll)
        .unwrap_err();
    assert!(matches!(err, TournamentError::Validation(_)));
    assert!(store.matches(None).unwrap().is_empty());
    assert_eq!(
        store.generate_fixtures(None, &[], u32::MAX - 2, WritePolicy::ReplaceAll),
        Ok(3)
    );
}

#[test]
fn match_ids_stay_unique_in_a_scope() {
    let store = MemoryStore::new();
    store.save_teams(None, roster("G1")).unwrap();
    store.generate_fixtures(None, &[], 1, WritePolicy::ReplaceAll).unwrap();

    assert_eq!(
        store.add_manual_match(None, "G1", 1, 2, Some(1), MatchStatus::Scheduled),
        Err(TournamentError::Validation("Match ID already exists.".into()))
    );
    assert_eq!(
        store.generate_fixtures(None, &[], 1, WritePolicy::Append),
        Err(TournamentError::Validation("Duplicate match ID 1".into()))
    );
    let ids: Vec<_> = store.matches(None).unwrap().iter().map(|m| m.match_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    // Same pairings under fresh ids are fine.
    assert_eq!(store.generate_fixtures(None, &[], 4, WritePolicy::Append), Ok(3));
    let rows = store.matches(None).unwrap();
    store.save_matches(None, rows).unwrap();
    assert!(store.delete_match(None, 1).unwrap());
    assert_eq!(store.matches(None).unwrap().len(), 5);
}

#[test]
fn manual_match_and_deletes() {
    let store = MemoryStore::new();
    store.save_teams(None, roster("G1")).unwrap();
    store.generate_fixtures(None, &[], 1, WritePolicy::ReplaceAll).unwrap();
    let m = store
        .add_manual_match(None, "G1", 3, 1, None, MatchStatus::InProgress)
        .unwrap();
    assert_eq!(m.match_id, 4);
    assert_eq!(m.status, MatchStatus::InProgress);
    assert_eq!(store.matches(None).unwrap().len(), 4);

    assert!(store.delete_match(None, 4).unwrap());
    assert!(!store.delete_match(None, 4).unwrap());
    assert!(store.delete_team(None, 3).unwrap());
    assert!(!store.delete_team(None, 3).unwrap());
}

#[test]
fn clear_scores_by_group() {
    let store = MemoryStore::new();
    let mut a = Match::scheduled(1, "G1", 1, 2);
    a.sets[0] = SetScore::played(6, 1);
    a.status = MatchStatus::Completed;
    let mut b = Match::scheduled(2, "G2", 3, 4);
    b.sets[0] = SetScore::played(6, 2);
    store.save_matches(None, vec![a, b]).unwrap();

    let cleared = store.clear_scores(None, &["G1".to_string()], true).unwrap();
    assert_eq!(cleared, 1);
    let rows = store.matches(None).unwrap();
    assert!(!rows[0].has_score());
    assert_eq!(rows[0].status, MatchStatus::Scheduled);
    assert!(rows[1].has_score());
}

#[test]
fn import_replaces_scope_and_bad_workbook_changes_nothing() {
    let store = store_with_two_tournaments();
    store.save_teams(Some(1), roster("G1")).unwrap();

    let mut bad = store.export_workbook(Some(1)).unwrap();
    bad.sheets.remove("Matches");
    assert!(store.import_workbook(Some(1), &bad).is_err());
    assert_eq!(store.teams(Some(1)).unwrap().len(), 3);

    let source = MemoryStore::new();
    source.save_teams(None, vec![Team::new(5, "Solo", "G9")]).unwrap();
    let wb: Workbook = source.export_workbook(None).unwrap();
    assert_eq!(store.import_workbook(Some(1), &wb).unwrap(), (1, 0));
    assert_eq!(store.teams(Some(1)).unwrap()[0].team_name, "Solo");
    assert!(store.teams(Some(2)).unwrap().is_empty());
}

#[test]
fn overview_collects_scope_views() {
    let store = store_with_two_tournaments();
    store.save_teams(Some(1), roster("G1")).unwrap();
    let mut m = Match::scheduled(1, "G1", 1, 2);
    m.sets = [SetScore::played(6, 3), SetScore::played(6, 4), SetScore::unplayed()];
    store.save_matches(Some(1), vec![m, Match::scheduled(2, "G1", 1, 3)]).unwrap();

    let overview = store.overview(Some(1)).unwrap();
    assert_eq!(overview.tournament.unwrap().name, "Spring Open");
    assert_eq!(overview.played.len(), 1);
    assert_eq!(overview.played[0].players, "A vs B");
    assert_eq!(overview.played[0].sets, "2 - 0");
    assert_eq!(overview.played[0].games, "12 : 7");
    assert_eq!(overview.leaderboard[0].standing.team_name, "A");
    assert_eq!(overview.group_tables.len(), 1);
    assert_eq!(overview.teams.len(), 3);

    assert!(store.overview(None).unwrap().tournament.is_none());
}

#[test]
fn snapshot_survives_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    {
        let store = MemoryStore::open(path.clone()).unwrap();
        assert!(!store.is_dirty());
        store.add_tournament(Tournament::new(1, "Spring Open")).unwrap();
        store.save_teams(Some(1), roster("G1")).unwrap();
        store.save_teams(None, vec![Team::new(9, "Legacy", "G1")]).unwrap();
        store
            .update_settings(&mut |s: &mut Settings| s.active_tournament_id = Some(1))
            .unwrap();
        assert!(store.is_dirty());
        store.save().unwrap();
        assert!(!store.is_dirty());
    }
    let reopened = MemoryStore::open(path).unwrap();
    assert_eq!(reopened.tournaments().unwrap().len(), 1);
    assert_eq!(reopened.teams(Some(1)).unwrap(), roster("G1"));
    assert_eq!(reopened.teams(None).unwrap()[0].team_id, 9);
    assert_eq!(reopened.active_scope().unwrap(), Some(1));
}

#[test]
fn failed_save_keeps_changes_pending() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::open(dir.path().join("missing").join("data.json")).unwrap();
    store.add_tournament(Tournament::new(1, "X")).unwrap();
    assert!(store.save().is_err());
    assert!(store.is_dirty());
}

#[test]
fn writes_after_a_save_are_pending_again() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::open(dir.path().join("data.json")).unwrap();
    store.add_tournament(Tournament::new(1, "X")).unwrap();
    store.save().unwrap();
    assert!(!store.is_dirty());
    store.save_teams(Some(1), roster("G1")).unwrap();
    assert!(store.is_dirty());
    store.save().unwrap();

    let reopened = MemoryStore::open(dir.path().join("data.json")).unwrap();
    assert_eq!(reopened.teams(Some(1)).unwrap().len(), 3);
}

#[test]
fn store_without_path_saves_nothing() {
    let store = MemoryStore::new();
    store.add_tournament(Tournament::new(1, "X")).unwrap();
    assert!(store.path().is_none());
    store.save().unwrap();
    assert!(store.to_json().unwrap().contains("\"X\""));
}
