//! Integration tests for organizer authentication.

use padel_tournament_web::logic::{
    hash_secret, issue_remember_token, set_initial_password, verify_secret, Credentials,
};
use padel_tournament_web::{AuthState, TournamentError};

fn credentials(password: &str) -> Credentials {
    Credentials {
        password_hash: Some(set_initial_password(&Credentials::default(), password, password).unwrap()),
        token_hash: None,
    }
}

#[test]
fn starts_logged_out() {
    assert_eq!(AuthState::default(), AuthState::LoggedOut);
    assert!(!AuthState::default().is_logged_in());
}

#[test]
fn password_login_and_logout() {
    let creds = credentials("s3cret");
    let state = AuthState::LoggedOut.login_with_password(&creds, "s3cret").unwrap();
    assert!(state.is_logged_in());
    assert_eq!(state.logout(), AuthState::LoggedOut);
}

#[test]
fn wrong_password_fails() {
    let creds = credentials("s3cret");
    assert_eq!(
        AuthState::LoggedOut.login_with_password(&creds, "nope"),
        Err(TournamentError::AuthenticationFailure)
    );
    assert_eq!(
        AuthState::LoggedOut.login_with_password(&Credentials::default(), ""),
        Err(TournamentError::AuthenticationFailure)
    );
}

#[test]
fn remember_token_logs_in_until_revoked() {
    let (token, hash) = issue_remember_token().unwrap();
    assert!(!token.is_empty());
    assert_ne!(token, hash);
    let mut creds = credentials("pw");
    creds.token_hash = Some(hash);

    let state = AuthState::LoggedOut.login_with_token(&creds, &token).unwrap();
    assert_eq!(state, AuthState::LoggedIn);
    assert!(AuthState::LoggedOut.login_with_token(&creds, "other").is_err());
    assert!(AuthState::LoggedOut.login_with_token(&creds, "").is_err());

    creds.token_hash = None;
    assert_eq!(
        AuthState::LoggedOut.login_with_token(&creds, &token),
        Err(TournamentError::AuthenticationFailure)
    );
}

#[test]
fn unreadable_hash_never_matches() {
    let creds = Credentials {
        password_hash: Some("not-a-phc-string".to_string()),
        token_hash: None,
    };
    assert!(AuthState::LoggedOut.login_with_password(&creds, "not-a-phc-string").is_err());
}

#[test]
fn hashes_are_salted_and_verifiable() {
    let a = hash_secret("pw").unwrap();
    let b = hash_secret("pw").unwrap();
    assert_ne!(a, b);
    assert!(verify_secret("pw", &a));
    assert!(!verify_secret("pw2", &b));
}

#[test]
fn initial_password_rules() {
    let empty = Credentials::default();
    assert_eq!(
        set_initial_password(&empty, "", ""),
        Err(TournamentError::Validation("Password cannot be empty".into()))
    );
    assert_eq!(
        set_initial_password(&empty, "abc", "abd"),
        Err(TournamentError::Validation("Passwords do not match".into()))
    );
    let set = credentials("abc");
    assert!(set.has_password());
    assert_eq!(
        set_initial_password(&set, "new", "new"),
        Err(TournamentError::Validation("Admin password is already set".into()))
    );
}
