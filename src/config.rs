//! Server configuration from environment variables.
//!
//! HOST (default 0.0.0.0), PORT (8080), DATA_FILE (padel.json), MEDIA_DIR (tournament_media),
//! SESSION_KEY (64+ bytes; random per start when unset, which logs everyone out on restart),
//! AUTOSAVE_SECS (30), REFRESH_SECS (10, 0 disables the overview auto-refresh).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    pub media_dir: PathBuf,
    pub session_key: Option<Vec<u8>>,
    pub autosave_secs: u64,
    pub refresh_secs: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_file: PathBuf::from("padel.json"),
            media_dir: PathBuf::from("tournament_media"),
            session_key: None,
            autosave_secs: 30,
            refresh_secs: 10,
        }
    }
}

impl ServerConfig {
    /// Read from the process environment; unset or unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let session_key = lookup("SESSION_KEY").and_then(|k| {
            if k.len() >= 64 {
                Some(k.into_bytes())
            } else {
                log::warn!("SESSION_KEY shorter than 64 bytes, using a random key");
                None
            }
        });
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            data_file: lookup("DATA_FILE").map(PathBuf::from).unwrap_or(defaults.data_file),
            media_dir: lookup("MEDIA_DIR").map(PathBuf::from).unwrap_or(defaults.media_dir),
            session_key,
            autosave_secs: parse_var(&lookup, "AUTOSAVE_SECS")
                .filter(|s: &u64| *s > 0)
                .unwrap_or(defaults.autosave_secs),
            refresh_secs: parse_var(&lookup, "REFRESH_SECS").unwrap_or(defaults.refresh_secs),
        }
    }
}
