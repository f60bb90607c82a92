//! Local username/password authentication strategy.

use crate::accounts::{User, UserStore};
use crate::observability::metrics;

/// Result of an authentication attempt.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Authenticated(User),
    /// Rejected, with the message shown to the user.
    Rejected(&'static str),
}

/// Verify `username` and `password` against `store`.
pub fn authenticate(store: &UserStore, username: &str, password: &str) -> AuthOutcome {
    let Some(user) = store.find_by_username(username) else {
        tracing::info!(username = %username, "Login rejected: unknown user");
        metrics::record_login("unknown_user");
        return AuthOutcome::Rejected("Incorrect username.");
    };

    if !user.valid_password(password) {
        tracing::info!(user_id = %user.id, "Login rejected: bad password");
        metrics::record_login("bad_password");
        return AuthOutcome::Rejected("Incorrect password.");
    }

    tracing::info!(user_id = %user.id, "Login accepted");
    metrics::record_login("success");
    AuthOutcome::Authenticated(user)
}
