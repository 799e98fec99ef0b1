//! In-memory store with JSON snapshot file.

use crate::models::{Match, Scope, Settings, Team, Tournament, TournamentError, TournamentId};
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A row tagged with the tournament it belongs to (None = global scope).
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Scoped<T> {
    #[serde(default)]
    tournament_id: Option<TournamentId>,
    #[serde(flatten)]
    row: T,
}

/// Everything the app persists.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    tournaments: Vec<Tournament>,
    #[serde(default)]
    teams: Vec<Scoped<Team>>,
    #[serde(default)]
    matches: Vec<Scoped<Match>>,
    #[serde(default)]
    settings: Settings,
}

fn rows_in<T: Clone>(rows: &[Scoped<T>], scope: Scope) -> Vec<T> {
    rows.iter()
        .filter(|r| r.tournament_id == scope)
        .map(|r| r.row.clone())
        .collect()
}

/// Keep other scopes' rows (in place), then append the new rows for `scope`.
fn replace_in<T>(rows: &mut Vec<Scoped<T>>, scope: Scope, new_rows: Vec<T>) {
    rows.retain(|r| r.tournament_id != scope);
    rows.extend(new_rows.into_iter().map(|row| Scoped {
        tournament_id: scope,
        row,
    }));
}

/// Store backed by a `RwLock`; `save` writes the whole snapshot as JSON.
pub struct MemoryStore {
    state: RwLock<Snapshot>,
    /// Where `save` writes. None keeps everything in memory only.
    path: Option<PathBuf>,
    dirty: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with no backing file.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Snapshot::default()),
            path: None,
            dirty: AtomicBool::new(false),
        }
    }

    /// Load the snapshot at `path` if it exists, otherwise start empty. Saves go to `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TournamentError> {
        let path = path.into();
        let snapshot = if path.exists() {
            let data = std::fs::read_to_string(&path)
                .map_err(|e| TournamentError::Storage(format!("{}: {}", path.display(), e)))?;
            serde_json::from_str(&data)
                .map_err(|e| TournamentError::Storage(format!("{}: {}", path.display(), e)))?
        } else {
            log::info!("No data file at {}, starting empty", path.display());
            Snapshot::default()
        };
        Ok(Self {
            state: RwLock::new(snapshot),
            path: Some(path),
            dirty: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True if something changed since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Serialize the current snapshot (the bytes `save` would write).
    pub fn to_json(&self) -> Result<String, TournamentError> {
        let state = self.read()?;
        serde_json::to_string_pretty(&*state).map_err(|e| TournamentError::Storage(e.to_string()))
    }

    /// Write the snapshot to the backing file (temp file + rename). No-op without a path.
    pub fn save(&self) -> Result<(), TournamentError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        // Cleared before the snapshot is taken so writes made meanwhile stay dirty.
        self.dirty.store(false, Ordering::SeqCst);
        let result = self.to_json().and_then(|json| {
            let tmp = path.with_extension("json.tmp");
            std::fs::write(&tmp, json)
                .and_then(|()| std::fs::rename(&tmp, path))
                .map_err(|e| TournamentError::Storage(format!("{}: {}", path.display(), e)))
        });
        if result.is_err() {
            self.dirty.store(true, Ordering::SeqCst);
        }
        result
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>, TournamentError> {
        self.state
            .read()
            .map_err(|_| TournamentError::Storage("lock error".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Snapshot>, TournamentError> {
        let guard = self
            .state
            .write()
            .map_err(|_| TournamentError::Storage("lock error".to_string()))?;
        self.dirty.store(true, Ordering::SeqCst);
        Ok(guard)
    }
}

impl Store for MemoryStore {
    fn tournaments(&self) -> Result<Vec<Tournament>, TournamentError> {
        Ok(self.read()?.tournaments.clone())
    }

    fn replace_tournaments(&self, rows: Vec<Tournament>) -> Result<(), TournamentError> {
        self.write()?.tournaments = rows;
        Ok(())
    }

    fn delete_tournament(&self, id: TournamentId, cascade: bool) -> Result<(), TournamentError> {
        let mut state = self.write()?;
        let before = state.tournaments.len();
        state.tournaments.retain(|t| t.tournament_id != id);
        if state.tournaments.len() == before {
            return Err(TournamentError::TournamentNotFound(id));
        }
        if cascade {
            state.teams.retain(|r| r.tournament_id != Some(id));
            state.matches.retain(|r| r.tournament_id != Some(id));
        }
        if state.settings.active_tournament_id == Some(id) {
            state.settings.active_tournament_id = None;
        }
        Ok(())
    }

    fn teams(&self, scope: Scope) -> Result<Vec<Team>, TournamentError> {
        Ok(rows_in(&self.read()?.teams, scope))
    }

    fn replace_teams(&self, scope: Scope, rows: Vec<Team>) -> Result<(), TournamentError> {
        replace_in(&mut self.write()?.teams, scope, rows);
        Ok(())
    }

    fn matches(&self, scope: Scope) -> Result<Vec<Match>, TournamentError> {
        Ok(rows_in(&self.read()?.matches, scope))
    }

    fn replace_matches(&self, scope: Scope, rows: Vec<Match>) -> Result<(), TournamentError> {
        replace_in(&mut self.write()?.matches, scope, rows);
        Ok(())
    }

    fn replace_scope(
        &self,
        scope: Scope,
        teams: Vec<Team>,
        matches: Vec<Match>,
    ) -> Result<(), TournamentError> {
        let mut state = self.write()?;
        replace_in(&mut state.teams, scope, teams);
        replace_in(&mut state.matches, scope, matches);
        Ok(())
    }

    fn settings(&self) -> Result<Settings, TournamentError> {
        Ok(self.read()?.settings.clone())
    }

    fn update_settings(&self, f: &mut dyn FnMut(&mut Settings)) -> Result<(), TournamentError> {
        f(&mut self.write()?.settings);
        Ok(())
    }
}
