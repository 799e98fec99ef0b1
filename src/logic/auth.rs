//! Organizer authentication: password or "remember me" token, both ending in `LoggedIn`.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::models::{Settings, TournamentError};

/// Session-level auth state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    LoggedOut,
    LoggedIn,
}

/// Stored organizer credentials (argon2 PHC strings).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Credentials {
    pub password_hash: Option<String>,
    pub token_hash: Option<String>,
}

impl Credentials {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            password_hash: settings.admin_password_hash.clone(),
            token_hash: settings.admin_token_hash.clone(),
        }
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

pub fn hash_secret(secret: &str) -> Result<String, TournamentError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| TournamentError::Storage(e.to_string()))
}

/// False for a wrong secret and for an unparseable hash.
pub fn verify_secret(secret: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored credential hash is unreadable: {}", e);
            false
        }
    }
}

/// A fresh url-safe token and its hash. Only the hash is stored.
pub fn issue_remember_token() -> Result<(String, String), TournamentError> {
    let mut buf = [0u8; 24];
    OsRng.fill_bytes(&mut buf);
    let token = URL_SAFE_NO_PAD.encode(buf);
    let hash = hash_secret(&token)?;
    Ok((token, hash))
}

/// Hash for the first organizer password. Only valid while no password is stored.
pub fn set_initial_password(
    credentials: &Credentials,
    password: &str,
    confirm: &str,
) -> Result<String, TournamentError> {
    if credentials.has_password() {
        return Err(TournamentError::validation("Admin password is already set"));
    }
    if password.is_empty() {
        return Err(TournamentError::validation("Password cannot be empty"));
    }
    if password != confirm {
        return Err(TournamentError::validation("Passwords do not match"));
    }
    hash_secret(password)
}

impl AuthState {
    pub fn is_logged_in(self) -> bool {
        self == AuthState::LoggedIn
    }

    /// Password check. A failed attempt leaves the caller's state as it was.
    pub fn login_with_password(
        self,
        credentials: &Credentials,
        password: &str,
    ) -> Result<AuthState, TournamentError> {
        match &credentials.password_hash {
            Some(hash) if verify_secret(password, hash) => Ok(AuthState::LoggedIn),
            _ => Err(TournamentError::AuthenticationFailure),
        }
    }

    /// Long-lived token check ("remember this session").
    pub fn login_with_token(
        self,
        credentials: &Credentials,
        token: &str,
    ) -> Result<AuthState, TournamentError> {
        match &credentials.token_hash {
            Some(hash) if !token.is_empty() && verify_secret(token, hash) => Ok(AuthState::LoggedIn),
            _ => Err(TournamentError::AuthenticationFailure),
        }
    }

    pub fn logout(self) -> AuthState {
        AuthState::LoggedOut
    }
}
