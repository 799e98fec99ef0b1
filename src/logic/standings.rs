//! Standings: fold match results into per-team statistics and rank the teams.
//!
//! Ranking (descending): points, wins, sets difference, games difference.
//! Group tables sort by group label (ascending) first. Ties keep team input order.

use crate::logic::result::{evaluate_sets, Outcome, SetResult};
use crate::models::{LeaderboardRow, Match, Standing, Team, TeamId, TeamStats, POINTS_FOR_WIN};
use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;

/// Statistics contributed by one match, for team 1 and team 2.
fn match_contribution(result: &SetResult, outcome: Outcome) -> (TeamStats, TeamStats) {
    let team1 = TeamStats {
        played: 1,
        sets_won: result.team1_sets,
        sets_lost: result.team2_sets,
        games_won: result.team1_games,
        games_lost: result.team2_games,
        ..TeamStats::default()
    };
    let team2 = TeamStats {
        played: 1,
        sets_won: result.team2_sets,
        sets_lost: result.team1_sets,
        games_won: result.team2_games,
        games_lost: result.team1_games,
        ..TeamStats::default()
    };
    let win = TeamStats {
        wins: 1,
        points: POINTS_FOR_WIN,
        ..TeamStats::default()
    };
    let loss = TeamStats {
        losses: 1,
        ..TeamStats::default()
    };
    match outcome {
        Outcome::Team1Win => (team1.combine(win), team2.combine(loss)),
        Outcome::Team2Win => (team1.combine(loss), team2.combine(win)),
        Outcome::DrawnSets => (team1, team2),
    }
}

/// Fold all matches into a map of team id -> statistics. Every known team starts zeroed.
///
/// Matches with an unset or unknown team reference, or with no set won by either side, are skipped.
pub fn aggregate_stats(teams: &[Team], matches: &[Match]) -> BTreeMap<TeamId, TeamStats> {
    let initial: BTreeMap<TeamId, TeamStats> = teams
        .iter()
        .map(|t| (t.team_id, TeamStats::default()))
        .collect();

    matches.iter().fold(initial, |mut stats, m| {
        let Some((t1, t2)) = m.teams() else {
            return stats;
        };
        if !stats.contains_key(&t1) || !stats.contains_key(&t2) {
            return stats;
        }
        let result = evaluate_sets(m);
        let Some(outcome) = result.outcome() else {
            return stats;
        };
        let (add1, add2) = match_contribution(&result, outcome);
        for (id, add) in [(t1, add1), (t2, add2)] {
            stats.entry(id).and_modify(|s| *s = s.combine(add));
        }
        stats
    })
}

fn rank_key(s: &Standing) -> (Reverse<u32>, Reverse<u32>, Reverse<i64>, Reverse<i64>) {
    (
        Reverse(s.points),
        Reverse(s.wins),
        Reverse(s.sets_diff),
        Reverse(s.games_diff),
    )
}

/// Compare by the tie-break chain only (no group key).
pub fn compare_rank(a: &Standing, b: &Standing) -> Ordering {
    rank_key(a).cmp(&rank_key(b))
}

/// Compute one standings row per team, sorted by group then rank.
pub fn compute_standings(teams: &[Team], matches: &[Match]) -> Vec<Standing> {
    let stats = aggregate_stats(teams, matches);
    let mut rows: Vec<Standing> = teams
        .iter()
        .map(|t| {
            let s = stats.get(&t.team_id).copied().unwrap_or_default();
            Standing::from_stats(t.team_id, t.team_name.clone(), t.group.clone(), s)
        })
        .collect();
    rows.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| compare_rank(a, b)));
    rows
}

/// Overall winner board: all teams ranked by the tie-break chain regardless of group.
pub fn leaderboard(standings: &[Standing]) -> Vec<LeaderboardRow> {
    let mut rows = standings.to_vec();
    rows.sort_by(compare_rank);
    rows.into_iter()
        .enumerate()
        .map(|(i, standing)| LeaderboardRow { rank: i + 1, standing })
        .collect()
}

/// Split group-sorted standings into one table per group, in group order.
pub fn group_tables(standings: &[Standing]) -> Vec<(String, Vec<Standing>)> {
    let mut tables: Vec<(String, Vec<Standing>)> = Vec::new();
    for s in standings {
        match tables.last_mut() {
            Some((group, rows)) if *group == s.group => rows.push(s.clone()),
            _ => tables.push((s.group.clone(), vec![s.clone()])),
        }
    }
    tables
}
