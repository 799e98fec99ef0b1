//! Import/export of teams and matches as a two-sheet workbook ("Teams", "Matches").
//!
//! Each sheet is CSV text with a fixed header row. The workbook itself travels as a JSON
//! object mapping sheet name to CSV body.

use crate::models::{Match, MatchStatus, SetScore, Team, TournamentError, SETS_PER_MATCH};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const TEAMS_SHEET: &str = "Teams";
pub const MATCHES_SHEET: &str = "Matches";

pub const TEAMS_COLUMNS: [&str; 6] = ["team_id", "team_name", "player1", "player2", "group", "seed"];
pub const MATCHES_COLUMNS: [&str; 11] = [
    "match_id", "group", "team1_id", "team2_id", "status", "set1_t1", "set1_t2", "set2_t1",
    "set2_t2", "set3_t1", "set3_t2",
];

/// Named sheets of CSV text.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: BTreeMap<String, String>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&str> {
        self.sheets.get(name).map(String::as_str)
    }
}

fn write_sheet<I>(columns: &[&str], rows: I) -> Result<String, TournamentError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let err = |e: csv::Error| TournamentError::Storage(e.to_string());
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(columns).map_err(err)?;
    for row in rows {
        w.write_record(&row).map_err(err)?;
    }
    let bytes = w
        .into_inner()
        .map_err(|e| TournamentError::Storage(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TournamentError::Storage(e.to_string()))
}

fn opt_cell(v: Option<u32>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Empty workbook with just the header rows.
pub fn template() -> Result<Workbook, TournamentError> {
    export_workbook(&[], &[])
}

/// Serialize teams and matches into the two-sheet schema.
pub fn export_workbook(teams: &[Team], matches: &[Match]) -> Result<Workbook, TournamentError> {
    let team_rows = teams.iter().map(|t| {
        vec![
            t.team_id.to_string(),
            t.team_name.clone(),
            t.player1.clone(),
            t.player2.clone(),
            t.group.clone(),
            opt_cell(t.seed),
        ]
    });
    let match_rows = matches.iter().map(|m| {
        let mut row = vec![
            m.match_id.to_string(),
            m.group.clone(),
            opt_cell(m.team1_id),
            opt_cell(m.team2_id),
            m.status.as_str().to_string(),
        ];
        for s in &m.sets {
            row.push(opt_cell(s.team1));
            row.push(opt_cell(s.team2));
        }
        row
    });

    let mut sheets = BTreeMap::new();
    sheets.insert(TEAMS_SHEET.to_string(), write_sheet(&TEAMS_COLUMNS, team_rows)?);
    sheets.insert(MATCHES_SHEET.to_string(), write_sheet(&MATCHES_COLUMNS, match_rows)?);
    Ok(Workbook { sheets })
}

/// Numeric cell: blank or non-numeric becomes None. Accepts "6" and "6.0".
fn coerce_number(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<u32>() {
        return Some(v);
    }
    let f = cell.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u32::MAX)).then(|| f as u32)
}

/// A parsed sheet: header positions plus the non-blank records.
struct Sheet {
    name: &'static str,
    index: HashMap<String, usize>,
    records: Vec<csv::StringRecord>,
}

impl Sheet {
    fn parse(name: &'static str, body: &str, required: &[&str]) -> Result<Self, TournamentError> {
        let err = |e: csv::Error| TournamentError::validation(format!("{} sheet: {}", name, e));
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(body.as_bytes());
        let index: HashMap<String, usize> = reader
            .headers()
            .map_err(err)?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|c| !index.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            return Err(TournamentError::validation(format!(
                "{} sheet missing columns: {:?}",
                name, missing
            )));
        }
        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(err)?;
            if record.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            records.push(record);
        }
        Ok(Self {
            name,
            index,
            records,
        })
    }

    fn cell<'r>(&self, record: &'r csv::StringRecord, column: &str) -> &'r str {
        self.index
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    /// Required id column: a row without a usable id cannot be stored.
    fn id(&self, record: &csv::StringRecord, row: usize, column: &str) -> Result<u32, TournamentError> {
        coerce_number(self.cell(record, column)).ok_or_else(|| {
            TournamentError::validation(format!(
                "{} sheet row {}: invalid {} '{}'",
                self.name,
                row + 2,
                column,
                self.cell(record, column)
            ))
        })
    }
}

/// Parse an uploaded workbook. Nothing is returned unless both sheets are valid.
pub fn parse_workbook(workbook: &Workbook) -> Result<(Vec<Team>, Vec<Match>), TournamentError> {
    let teams_body = workbook
        .sheet(TEAMS_SHEET)
        .ok_or_else(|| TournamentError::validation(format!("Missing '{}' sheet", TEAMS_SHEET)))?;
    let matches_body = workbook
        .sheet(MATCHES_SHEET)
        .ok_or_else(|| TournamentError::validation(format!("Missing '{}' sheet", MATCHES_SHEET)))?;

    let teams_sheet = Sheet::parse(TEAMS_SHEET, teams_body, &TEAMS_COLUMNS)?;
    let matches_sheet = Sheet::parse(MATCHES_SHEET, matches_body, &MATCHES_COLUMNS)?;

    let mut teams = Vec::with_capacity(teams_sheet.records.len());
    for (row, r) in teams_sheet.records.iter().enumerate() {
        let s = &teams_sheet;
        teams.push(Team {
            team_id: s.id(r, row, "team_id")?,
            team_name: s.cell(r, "team_name").to_string(),
            player1: s.cell(r, "player1").to_string(),
            player2: s.cell(r, "player2").to_string(),
            group: s.cell(r, "group").to_string(),
            seed: coerce_number(s.cell(r, "seed")),
        });
    }

    let mut matches = Vec::with_capacity(matches_sheet.records.len());
    for (row, r) in matches_sheet.records.iter().enumerate() {
        let s = &matches_sheet;
        let mut sets = [SetScore::unplayed(); SETS_PER_MATCH];
        for (i, set) in sets.iter_mut().enumerate() {
            set.team1 = coerce_number(s.cell(r, &format!("set{}_t1", i + 1)));
            set.team2 = coerce_number(s.cell(r, &format!("set{}_t2", i + 1)));
            *set = set.normalized();
        }
        matches.push(Match {
            match_id: s.id(r, row, "match_id")?,
            group: s.cell(r, "group").to_string(),
            team1_id: coerce_number(s.cell(r, "team1_id")),
            team2_id: coerce_number(s.cell(r, "team2_id")),
            status: MatchStatus::parse_lenient(s.cell(r, "status")),
            sets,
        });
    }

    log::debug!("Parsed workbook: {} teams, {} matches", teams.len(), matches.len());
    Ok((teams, matches))
}
