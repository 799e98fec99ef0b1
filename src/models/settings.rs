//! Typed settings: active tournament, organizer credentials, display preferences.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tables shown on the overview page.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayTable {
    Played,
    Standings,
    Teams,
}

impl DisplayTable {
    /// Every column the table can show, in display order.
    pub fn all_columns(self) -> &'static [&'static str] {
        match self {
            DisplayTable::Played => &["MatchId", "Court", "Players", "Sets", "Games", "Status"],
            DisplayTable::Standings => &["Rank", "Team", "MatchesPlayed", "MatchesWon", "MatchesLost", "Points"],
            DisplayTable::Teams => &["Team", "Players", "MatchesPlayed", "MatchesWon", "MatchesLost", "Points"],
        }
    }
}

/// Column visibility and header labels for one table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TableSettings {
    /// Empty means all columns.
    #[serde(default)]
    pub visible_columns: Vec<String>,
    /// Column name -> header label. Missing entries show the column name.
    #[serde(default)]
    pub header_labels: BTreeMap<String, String>,
}

impl TableSettings {
    /// Visible columns in the order chosen, dropping unknown names; all columns if none remain.
    pub fn columns(&self, table: DisplayTable) -> Vec<&'static str> {
        let all = table.all_columns();
        let chosen: Vec<&'static str> = self
            .visible_columns
            .iter()
            .filter_map(|c| all.iter().copied().find(|a| *a == c.as_str()))
            .collect();
        if chosen.is_empty() {
            all.to_vec()
        } else {
            chosen
        }
    }

    pub fn header(&self, column: &str) -> String {
        self.header_labels
            .get(column)
            .filter(|l| !l.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| column.to_string())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub played: TableSettings,
    #[serde(default)]
    pub standings: TableSettings,
    #[serde(default)]
    pub teams: TableSettings,
}

impl DisplaySettings {
    pub fn table(&self, table: DisplayTable) -> &TableSettings {
        match table {
            DisplayTable::Played => &self.played,
            DisplayTable::Standings => &self.standings,
            DisplayTable::Teams => &self.teams,
        }
    }

    pub fn table_mut(&mut self, table: DisplayTable) -> &mut TableSettings {
        match table {
            DisplayTable::Played => &mut self.played,
            DisplayTable::Standings => &mut self.standings,
            DisplayTable::Teams => &mut self.teams,
        }
    }
}

/// All process-wide settings, serialized as one value by the store.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Tournament viewers see by default. None shows the global scope.
    #[serde(default)]
    pub active_tournament_id: Option<TournamentId>,
    /// argon2 PHC string of the organizer password.
    #[serde(default)]
    pub admin_password_hash: Option<String>,
    /// argon2 PHC string of the current "remember me" token.
    #[serde(default)]
    pub admin_token_hash: Option<String>,
    #[serde(default)]
    pub display: DisplaySettings,
}
