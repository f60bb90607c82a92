//! Session cookie parsing and formatting.

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Session id from the `Cookie` headers, if present and well formed.
pub fn session_id(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim_matches('"')).ok())
}

/// `Set-Cookie` value for session `id`.
pub fn set_cookie(config: &SessionConfig, id: Uuid) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name, id, config.ttl_secs
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}
