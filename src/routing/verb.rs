//! Protocol verbs accepted by route declarations.
//!
//! # Design Decisions
//! - Fixed table, parsed case-insensitively
//! - `del` is accepted as an alias for `delete`
//! - Extension verbs (WebDAV, `m-search`, ...) are kept so that any method an
//!   HTTP server can receive can also be routed

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::routing::RoutingError;

/// A recognised protocol verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Post,
    Put,
    Head,
    Delete,
    Options,
    Trace,
    Copy,
    Lock,
    Mkcol,
    Move,
    Purge,
    Propfind,
    Proppatch,
    Unlock,
    Report,
    Mkactivity,
    Checkout,
    Merge,
    #[serde(rename = "m-search")]
    MSearch,
    Notify,
    Subscribe,
    Unsubscribe,
    Patch,
    Search,
    Connect,
}

impl Verb {
    /// Every verb, in the order the table is matched against input.
    pub const ALL: [Verb; 26] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Head,
        Verb::Delete,
        Verb::Options,
        Verb::Trace,
        Verb::Copy,
        Verb::Lock,
        Verb::Mkcol,
        Verb::Move,
        Verb::Purge,
        Verb::Propfind,
        Verb::Proppatch,
        Verb::Unlock,
        Verb::Report,
        Verb::Mkactivity,
        Verb::Checkout,
        Verb::Merge,
        Verb::MSearch,
        Verb::Notify,
        Verb::Subscribe,
        Verb::Unsubscribe,
        Verb::Patch,
        Verb::Search,
        Verb::Connect,
    ];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Head => "head",
            Verb::Delete => "delete",
            Verb::Options => "options",
            Verb::Trace => "trace",
            Verb::Copy => "copy",
            Verb::Lock => "lock",
            Verb::Mkcol => "mkcol",
            Verb::Move => "move",
            Verb::Purge => "purge",
            Verb::Propfind => "propfind",
            Verb::Proppatch => "proppatch",
            Verb::Unlock => "unlock",
            Verb::Report => "report",
            Verb::Mkactivity => "mkactivity",
            Verb::Checkout => "checkout",
            Verb::Merge => "merge",
            Verb::MSearch => "m-search",
            Verb::Notify => "notify",
            Verb::Subscribe => "subscribe",
            Verb::Unsubscribe => "unsubscribe",
            Verb::Patch => "patch",
            Verb::Search => "search",
            Verb::Connect => "connect",
        }
    }

    /// True if an incoming request method is this verb.
    pub fn is(&self, method: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(method)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower == "del" {
            return Ok(Verb::Delete);
        }
        Verb::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == lower)
            .ok_or(RoutingError::UnsupportedMethod { method: lower })
    }
}
