//! Integration tests for result evaluation, standings aggregation and ranking.

use padel_tournament_web::logic::{aggregate_stats, group_tables};
use padel_tournament_web::{
    compute_standings, evaluate_sets, leaderboard, Match, Outcome, SetScore, Team,
};

fn sets(scores: &[(u32, u32)]) -> [SetScore; 3] {
    let mut out = [SetScore::unplayed(); 3];
    for (slot, &(a, b)) in out.iter_mut().zip(scores) {
        *slot = SetScore::played(a, b);
    }
    out
}

fn teams_ab() -> Vec<Team> {
    vec![Team::new(1, "A", "G1"), Team::new(2, "B", "G1")]
}

#[test]
fn three_set_win_counts_sets_and_games() {
    let m = Match::scheduled(1, "G1", 1, 2).with_sets(sets(&[(6, 4), (4, 6), (6, 2)]));
    let r = evaluate_sets(&m);
    assert_eq!(r.sets(), (2, 1));
    assert_eq!((r.team1_games, r.team2_games), (16, 12));
    assert_eq!(r.decided_sets, 3);
    assert_eq!(r.outcome(), Some(Outcome::Team1Win));

    let standings = compute_standings(&teams_ab(), &[m]);
    let a = standings.iter().find(|s| s.team_id == 1).unwrap();
    let b = standings.iter().find(|s| s.team_id == 2).unwrap();
    assert_eq!((a.played, a.wins, a.losses, a.points), (1, 1, 0, 3));
    assert_eq!((b.played, b.wins, b.losses, b.points), (1, 0, 1, 0));
    assert_eq!(a.sets_diff, 1);
    assert_eq!(a.games_diff, 4);
    assert_eq!(b.games_diff, -4);
}

#[test]
fn half_filled_set_is_ignored() {
    let mut m = Match::scheduled(1, "G1", 1, 2).with_sets(sets(&[(6, 3)]));
    m.sets[1] = SetScore {
        team1: Some(6),
        team2: None,
    };
    let r = evaluate_sets(&m);
    assert_eq!(r.sets(), (1, 0));
    assert_eq!(r.decided_sets, 1);
    assert_eq!((r.team1_games, r.team2_games), (6, 3));
}

#[test]
fn tied_set_awards_no_set_but_counts_games() {
    let m = Match::scheduled(1, "G1", 1, 2).with_sets(sets(&[(6, 6)]));
    let r = evaluate_sets(&m);
    assert_eq!(r.sets(), (0, 0));
    assert_eq!((r.team1_games, r.team2_games), (6, 6));
    assert_eq!(r.outcome(), None);
}

#[test]
fn huge_game_counts_saturate() {
    let m = Match::scheduled(1, "G1", 1, 2).with_sets(sets(&[(u32::MAX, 0), (1, 0)]));
    let r = evaluate_sets(&m);
    assert_eq!(r.team1_games, u32::MAX);
    assert_eq!(r.sets(), (2, 0));

    let again = Match::scheduled(2, "G1", 1, 2).with_sets(sets(&[(u32::MAX, 0), (6, 0)]));
    let stats = aggregate_stats(&teams_ab(), &[m, again]);
    assert_eq!(stats[&1].games_won, u32::MAX);
    assert_eq!(stats[&1].wins, 2);
}

#[test]
fn team_without_matches_has_zero_row() {
    let teams = vec![Team::new(1, "A", "G1"), Team::new(2, "B", "G1"), Team::new(3, "C", "G1")];
    let m = Match::scheduled(1, "G1", 1, 2).with_sets(sets(&[(6, 0), (6, 0)]));
    let standings = compute_standings(&teams, &[m]);
    assert_eq!(standings.len(), 3);
    let c = standings.iter().find(|s| s.team_id == 3).unwrap();
    assert_eq!((c.played, c.wins, c.losses, c.points), (0, 0, 0, 0));
    assert_eq!((c.sets_diff, c.games_diff), (0, 0));
}

#[test]
fn unscored_match_is_not_counted_as_played() {
    let m = Match::scheduled(1, "G1", 1, 2);
    let stats = aggregate_stats(&teams_ab(), &[m]);
    assert_eq!(stats[&1].played, 0);
    assert_eq!(stats[&2].played, 0);
}

#[test]
fn drawn_sets_count_as_played_without_points() {
    let m = Match::scheduled(1, "G1", 1, 2).with_sets(sets(&[(6, 3), (2, 6)]));
    assert_eq!(evaluate_sets(&m).outcome(), Some(Outcome::DrawnSets));
    let stats = aggregate_stats(&teams_ab(), &[m]);
    for id in [1, 2] {
        let s = stats[&id];
        assert_eq!((s.played, s.wins, s.losses, s.points), (1, 0, 0, 0));
        assert_eq!((s.sets_won, s.sets_lost), (1, 1));
    }
    assert_eq!(stats[&1].games_diff(), 1);
}

#[test]
fn match_with_unknown_team_is_skipped() {
    let m = Match::scheduled(1, "G1", 1, 99).with_sets(sets(&[(6, 0), (6, 0)]));
    let mut unset = Match::scheduled(2, "G1", 1, 2).with_sets(sets(&[(6, 0), (6, 0)]));
    unset.team2_id = None;
    let stats = aggregate_stats(&teams_ab(), &[m, unset]);
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[&1].played, 0);
}

#[test]
fn aggregation_is_independent_of_match_order() {
    let teams = vec![Team::new(1, "A", "G1"), Team::new(2, "B", "G1"), Team::new(3, "C", "G1")];
    let matches = vec![
        Match::scheduled(1, "G1", 1, 2).with_sets(sets(&[(6, 4), (6, 4)])),
        Match::scheduled(2, "G1", 1, 3).with_sets(sets(&[(3, 6), (6, 1), (7, 5)])),
        Match::scheduled(3, "G1", 2, 3).with_sets(sets(&[(2, 6), (2, 6)])),
    ];
    let mut reversed = matches.clone();
    reversed.reverse();
    assert_eq!(compute_standings(&teams, &matches), compute_standings(&teams, &reversed));
}

#[test]
fn ranking_uses_points_then_wins_then_sets_then_games() {
    let teams = vec![
        Team::new(1, "A", "G1"),
        Team::new(2, "B", "G1"),
        Team::new(3, "C", "G1"),
        Team::new(4, "D", "G1"),
    ];
    // A and C both win once; C wins in straight sets, A needs three.
    let matches = vec![
        Match::scheduled(1, "G1", 1, 2).with_sets(sets(&[(6, 4), (4, 6), (6, 4)])),
        Match::scheduled(2, "G1", 3, 4).with_sets(sets(&[(6, 4), (6, 4)])),
    ];
    let standings = compute_standings(&teams, &matches);
    let order: Vec<_> = standings.iter().map(|s| s.team_name.as_str()).collect();
    assert_eq!(order, vec!["C", "A", "B", "D"]);
}

#[test]
fn games_diff_breaks_equal_sets_diff() {
    let teams = vec![
        Team::new(1, "A", "G1"),
        Team::new(2, "B", "G1"),
        Team::new(3, "C", "G1"),
        Team::new(4, "D", "G1"),
    ];
    let matches = vec![
        Match::scheduled(1, "G1", 1, 2).with_sets(sets(&[(6, 4), (6, 4)])),
        Match::scheduled(2, "G1", 3, 4).with_sets(sets(&[(6, 0), (6, 0)])),
    ];
    let standings = compute_standings(&teams, &matches);
    assert_eq!(standings[0].team_name, "C");
    assert_eq!(standings[1].team_name, "A");
}

#[test]
fn full_ties_keep_team_input_order() {
    let teams = vec![Team::new(5, "E", "G1"), Team::new(2, "B", "G1"), Team::new(9, "Z", "G1")];
    let standings = compute_standings(&teams, &[]);
    let ids: Vec<_> = standings.iter().map(|s| s.team_id).collect();
    assert_eq!(ids, vec![5, 2, 9]);
}

#[test]
fn standings_sort_by_group_first_and_split_into_tables() {
    let teams = vec![
        Team::new(1, "A", "G2"),
        Team::new(2, "B", "G2"),
        Team::new(3, "C", "G1"),
        Team::new(4, "D", "G1"),
    ];
    let matches = vec![Match::scheduled(1, "G2", 1, 2).with_sets(sets(&[(6, 1), (6, 1)]))];
    let standings = compute_standings(&teams, &matches);
    let groups: Vec<_> = standings.iter().map(|s| s.group.as_str()).collect();
    assert_eq!(groups, vec!["G1", "G1", "G2", "G2"]);

    let tables = group_tables(&standings);
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].0, "G1");
    assert_eq!(tables[1].1[0].team_name, "A");
}

#[test]
fn leaderboard_ranks_across_groups() {
    let teams = vec![
        Team::new(1, "A", "G1"),
        Team::new(2, "B", "G1"),
        Team::new(3, "C", "G2"),
        Team::new(4, "D", "G2"),
    ];
    let matches = vec![Match::scheduled(1, "G2", 3, 4).with_sets(sets(&[(6, 1), (6, 1)]))];
    let board = leaderboard(&compute_standings(&teams, &matches));
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].standing.team_name, "C");
    let ranks: Vec<_> = board.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}
