//! HTML rendering of the overview: played matches, winner board, team roster, tournament cards.

use crate::logic::PlayedMatchRow;
use crate::models::{
    DisplaySettings, DisplayTable, LeaderboardRow, Standing, TableSettings, Team, TeamId,
    Tournament,
};
use crate::store::Overview;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Escape text for HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Generic table. `cell(row, column)` supplies each value.
fn table<R>(
    table: DisplayTable,
    settings: &TableSettings,
    rows: &[R],
    cell: impl Fn(&R, &str) -> String,
) -> String {
    let columns = settings.columns(table);
    let mut html = String::from("<div class='table-wrap'><table class='custom'><thead><tr>");
    for c in &columns {
        let _ = write!(html, "<th>{}</th>", escape(&settings.header(c)));
    }
    html.push_str("</tr></thead><tbody>");
    for r in rows {
        html.push_str("<tr>");
        for c in &columns {
            let _ = write!(html, "<td>{}</td>", escape(&cell(r, c)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
    html
}

pub fn played_table(rows: &[PlayedMatchRow], settings: &TableSettings) -> String {
    table(DisplayTable::Played, settings, rows, |r, c| match c {
        "MatchId" => r.match_id.to_string(),
        "Court" => r.court.clone(),
        "Players" => r.players.clone(),
        "Sets" => r.sets.clone(),
        "Games" => r.games.clone(),
        "Status" => r.status.to_string(),
        _ => String::new(),
    })
}

pub fn standings_table(rows: &[LeaderboardRow], settings: &TableSettings) -> String {
    table(DisplayTable::Standings, settings, rows, |r, c| {
        let s = &r.standing;
        match c {
            "Rank" => r.rank.to_string(),
            "Team" => s.team_name.clone(),
            "MatchesPlayed" => s.played.to_string(),
            "MatchesWon" => s.wins.to_string(),
            "MatchesLost" => s.losses.to_string(),
            "Points" => s.points.to_string(),
            _ => String::new(),
        }
    })
}

/// Team roster joined with each team's standing (zeros when it has none).
pub fn teams_table(teams: &[Team], standings: &[Standing], settings: &TableSettings) -> String {
    let by_id: HashMap<TeamId, &Standing> = standings.iter().map(|s| (s.team_id, s)).collect();
    table(DisplayTable::Teams, settings, teams, |t, c| {
        let s = by_id.get(&t.team_id);
        let stat = |f: fn(&Standing) -> u32| s.map_or(0, |st| f(st)).to_string();
        match c {
            "Team" => t.team_name.clone(),
            "Players" => t.players(),
            "MatchesPlayed" => stat(|s| s.played),
            "MatchesWon" => stat(|s| s.wins),
            "MatchesLost" => stat(|s| s.losses),
            "Points" => stat(|s| s.points),
            _ => String::new(),
        }
    })
}

fn date_or_tbd(d: Option<chrono::NaiveDate>) -> String {
    d.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "TBD".to_string())
}

/// Image source for a tournament icon: URLs as-is, local paths served under /media.
fn icon_src(icon: &str) -> String {
    let icon = icon.replace('\\', "/");
    if icon.starts_with("http://") || icon.starts_with("https://") {
        icon
    } else {
        format!("/media/{}", icon.trim_start_matches('/'))
    }
}

/// Card grid; each card links to `/?tid=<id>`.
pub fn tournament_cards(tournaments: &[Tournament], badge: &str) -> String {
    let mut html = String::from("<div class='grid'>");
    for t in tournaments {
        let img = t
            .icon_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("<img src=\"{}\">", escape(&icon_src(p))))
            .unwrap_or_default();
        let name: &str = if t.name.is_empty() { "Tournament" } else { &t.name };
        let _ = write!(
            html,
            "<div class='card'><a href='/?tid={}'><div class='thumb'>{}</div><div class='body'>\
             <span class='badge'>{}</span><div class='title'>{}</div>\
             <div class='meta'>{}</div><div class='meta'>{} - {}</div>\
             <div class='meta'>{}</div></div></a></div>",
            t.tournament_id,
            img,
            escape(badge),
            escape(name),
            escape(&t.location),
            date_or_tbd(t.start_date),
            date_or_tbd(t.end_date),
            escape(&t.description),
        );
    }
    html.push_str("</div>");
    html
}

const STYLE: &str = "<style>\
body{font-family:sans-serif;background:#1b1b1b;color:#f0f0f0;max-width:1200px;margin:0 auto;padding:12px}\
.table-wrap{border:1px solid #1f7a1f;border-radius:4px;overflow-x:auto;margin-bottom:18px}\
table.custom{min-width:100%;border-collapse:collapse}\
table.custom thead tr{background:#1f7a1f;color:#fff}\
table.custom th,table.custom td{padding:8px 10px;border-bottom:1px solid #2e2e2e;text-align:left;white-space:nowrap}\
table.custom tbody tr{background:#3a3a3a}table.custom tbody tr:nth-child(even){background:#2f2f2f}\
.section-title{color:#1f7a1f;font-weight:700;margin:10px 0 6px}\
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(280px,1fr));gap:18px}\
.card{background:#0f160f;border:1px solid #2a5f2a;border-radius:18px;overflow:hidden}\
.card a{color:#e8f6e8;text-decoration:none;display:block}\
.thumb{height:180px;background:#122012}.thumb img{width:100%;height:100%;object-fit:cover}\
.body{padding:16px 18px}.title{font-weight:800;color:#9be37a}.meta{color:#b9d0b9}\
.badge{background:#204b20;color:#bff3b7;padding:3px 8px;border-radius:999px;font-size:.8rem}\
</style>";

fn page(title: &str, head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset='utf-8'>\
         <meta name='viewport' content='width=device-width, initial-scale=1'>\
         <title>{}</title>{}{}</head><body>{}</body></html>",
        escape(title),
        STYLE,
        head,
        body
    )
}

/// Overview page for one scope. `refresh_secs` adds a meta refresh so standings stay live.
pub fn overview_page(
    overview: &Overview,
    display: &DisplaySettings,
    now: NaiveDateTime,
    refresh_secs: u32,
) -> String {
    let title = overview
        .tournament
        .as_ref()
        .map(|t| format!("{} - Overview", t.title()))
        .unwrap_or_else(|| "Overview".to_string());

    let head = if refresh_secs > 0 {
        format!("<meta http-equiv='refresh' content='{}'>", refresh_secs)
    } else {
        String::new()
    };
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>{}</h1><div>Last updated: {}</div>",
        escape(&title),
        now.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(t) = &overview.tournament {
        body.push_str(&tournament_cards(std::slice::from_ref(t), "Selected"));
    }
    body.push_str("<div class='section-title'>Played Matches</div>");
    body.push_str(&played_table(&overview.played, display.table(DisplayTable::Played)));
    body.push_str("<div class='section-title'>Winner Board / Standings</div>");
    body.push_str(&standings_table(
        &overview.leaderboard,
        display.table(DisplayTable::Standings),
    ));
    body.push_str("<div class='section-title'>Teams</div>");
    body.push_str(&teams_table(
        &overview.teams,
        &overview.standings,
        display.table(DisplayTable::Teams),
    ));
    page(&title, &head, &body)
}

/// Landing page: upcoming and held tournament cards.
pub fn home_page(upcoming: &[Tournament], held: &[Tournament]) -> String {
    let mut body = String::from("<h1>Padel Tournament App</h1>\
        <p>Scoring and scheduling dashboard. Pick a tournament to see its overview.</p>");
    if !upcoming.is_empty() {
        body.push_str("<h2>Upcoming Tournaments</h2>");
        body.push_str(&tournament_cards(upcoming, "Upcoming"));
    }
    if !held.is_empty() {
        body.push_str("<h2>Held Tournaments</h2>");
        body.push_str(&tournament_cards(held, "Held"));
    }
    page("Padel Tournament App", "", &body)
}
