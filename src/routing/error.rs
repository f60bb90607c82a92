//! Routing error definitions.
//!
//! Every variant is a programmer error in route declarations or helper calls.
//! None of them are retried; they abort whatever triggered them.

use thiserror::Error;

/// Errors raised while drawing routes or building paths from them.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A `via` value is not a recognised protocol verb.
    #[error("Method \"{method}\" is not supported by protocol")]
    UnsupportedMethod { method: String },

    /// Reverse routing was asked for a path without a required placeholder.
    #[error("Unable to substitute value for \":{name}\" in URL pattern \"{pattern}\"")]
    MissingParameter { name: String, pattern: String },

    /// A route was declared before a definer was registered.
    #[error("Router is unable to define routes")]
    RouterNotConfigured,

    /// The compiled expression for a pattern was rejected by the regex engine.
    #[error("Invalid URL pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The same placeholder name appears twice in one pattern.
    #[error("Placeholder \":{name}\" appears more than once in URL pattern \"{pattern}\"")]
    DuplicatePlaceholder { name: String, pattern: String },

    /// A `controller#action` shorthand that names no controller or no action.
    #[error("Invalid route target \"{target}\", expected \"controller#action\"")]
    InvalidTarget { target: String },

    /// A helper name that no route announced.
    #[error("No routing helper named \"{name}\"")]
    UnknownHelper { name: String },
}
