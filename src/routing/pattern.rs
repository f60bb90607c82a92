//! Path pattern compilation.
//!
//! # Responsibilities
//! - Compile declarative patterns (`/bands/:id.:format?`) into an anchored regex
//! - Record placeholders in declaration order for reverse substitution
//! - Extract named parameters from matched request paths
//! - Build concrete paths from parameter values
//!
//! # Pattern Syntax
//! ```text
//! :name        required segment            ([^/]+?)
//! :name?       optional segment, drops its leading separator when absent
//! .:name       format position             ([^/.]+?)
//! :name(re)    custom capture body
//! :name*       trailing capture of the rest of the path
//! *            bare wildcard, captured positionally as `0`, `1`, ...
//! /( ... )     literal alternation group   (?:/ ... )
//! ```
//!
//! # Design Decisions
//! - Trailing slash tolerated unless strict
//! - Case-insensitive unless configured otherwise
//! - Regex groups get generated names (`p0`, `w0`), so any `\w+` placeholder
//!   name is accepted
//! - A duplicated placeholder name fails at declaration time

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};

use crate::routing::{Params, RoutingError};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(/)?(\.)?:(\w+)(\(.*?\))?(\?)?(\*)?").expect("placeholder grammar is valid")
});

/// Compilation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternOptions {
    /// Match letter case exactly.
    pub case_sensitive: bool,
    /// Do not tolerate a trailing slash.
    pub strict: bool,
}

/// A placeholder declared in a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub optional: bool,
}

/// A compiled URL pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    placeholders: Vec<Placeholder>,
    wildcards: usize,
    regex: Regex,
}

fn placeholder_group(index: usize) -> String {
    format!("p{index}")
}

fn wildcard_group(index: usize) -> String {
    format!("w{index}")
}

/// One `PLACEHOLDER` match, decoded.
struct Token<'a> {
    slash: &'a str,
    format: bool,
    name: &'a str,
    capture: Option<&'a str>,
    optional: bool,
    star: bool,
}

impl<'a> Token<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        Some(Self {
            slash: caps.get(1).map_or("", |m| m.as_str()),
            format: caps.get(2).is_some(),
            name: caps.get(3)?.as_str(),
            capture: caps.get(4).map(|m| m.as_str()),
            optional: caps.get(5).is_some(),
            star: caps.get(6).is_some(),
        })
    }

    fn write_expr(&self, expr: &mut String, group: &str) {
        let body = match self.capture {
            Some(capture) => &capture[1..capture.len() - 1],
            None if self.format => "[^/.]+?",
            None => "[^/]+?",
        };

        if !self.optional {
            expr.push_str(self.slash);
        }
        expr.push_str("(?:");
        if self.optional {
            expr.push_str(self.slash);
        }
        if self.format {
            expr.push_str(r"\.");
        }
        expr.push_str("(?P<");
        expr.push_str(group);
        expr.push('>');
        expr.push_str(body);
        if self.star {
            expr.push_str("(?:/.*)?");
        }
        expr.push_str("))");
        if self.optional {
            expr.push('?');
        }
    }
}

/// Writes a literal run, turning each bare `*` into a named wildcard group.
fn write_literal(expr: &mut String, literal: &str, wildcards: &mut usize) {
    for c in literal.chars() {
        match c {
            '.' => expr.push_str(r"\."),
            '*' => {
                expr.push_str("(?P<");
                expr.push_str(&wildcard_group(*wildcards));
                expr.push_str(">.*)");
                *wildcards += 1;
            }
            _ => expr.push(c),
        }
    }
}

impl RoutePattern {
    /// Compile `pattern`.
    pub fn compile(pattern: &str, options: PatternOptions) -> Result<Self, RoutingError> {
        let mut source = pattern.to_string();
        if !options.strict {
            source.push_str("/?");
        }
        let source = source.replace("/(", "(?:/");

        let mut expr = String::with_capacity(source.len() * 2);
        let mut placeholders: Vec<Placeholder> = Vec::new();
        let mut wildcards = 0;
        let mut last = 0;

        expr.push('^');
        for caps in PLACEHOLDER.captures_iter(&source) {
            let (Some(whole), Some(token)) = (caps.get(0), Token::from_captures(&caps)) else {
                continue;
            };
            write_literal(&mut expr, &source[last..whole.start()], &mut wildcards);
            last = whole.end();

            if placeholders.iter().any(|p| p.name == token.name) {
                return Err(RoutingError::DuplicatePlaceholder {
                    name: token.name.to_string(),
                    pattern: pattern.to_string(),
                });
            }
            token.write_expr(&mut expr, &placeholder_group(placeholders.len()));
            placeholders.push(Placeholder {
                name: token.name.to_string(),
                optional: token.optional,
            });
        }
        write_literal(&mut expr, &source[last..], &mut wildcards);
        expr.push('$');

        let regex = RegexBuilder::new(&expr)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|source| RoutingError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            source: pattern.to_string(),
            placeholders,
            wildcards,
            regex,
        })
    }

    /// The pattern as declared.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Match a request path, returning the placeholder values on success.
    ///
    /// Bare `*` wildcards are reported under their position: `0`, `1`, ...
    pub fn matches(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let mut params = Params::new();
        for (index, placeholder) in self.placeholders.iter().enumerate() {
            if let Some(m) = caps.name(&placeholder_group(index)) {
                params.insert(placeholder.name.clone(), m.as_str());
            }
        }
        for index in 0..self.wildcards {
            if let Some(m) = caps.name(&wildcard_group(index)) {
                params.insert(index.to_string(), m.as_str());
            }
        }
        Some(params)
    }

    /// Build a concrete path by substituting placeholders from `params`.
    ///
    /// Optional placeholders without a value are removed together with their
    /// leading separator. A required placeholder without a value is an error.
    /// Bare wildcards take the positional values `0`, `1`, ... and are left
    /// empty without one.
    pub fn path(&self, params: &Params) -> Result<String, RoutingError> {
        let mut out = String::with_capacity(self.source.len());
        let mut wildcards = 0;
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(&self.source) {
            let (Some(whole), Some(token)) = (caps.get(0), Token::from_captures(&caps)) else {
                continue;
            };
            push_literal(&mut out, &self.source[last..whole.start()], params, &mut wildcards);
            last = whole.end();

            match params.present(token.name) {
                Some(value) => {
                    out.push_str(token.slash);
                    if token.format {
                        out.push('.');
                    }
                    out.push_str(value);
                }
                None if token.optional => {}
                None => {
                    return Err(RoutingError::MissingParameter {
                        name: token.name.to_string(),
                        pattern: self.source.clone(),
                    });
                }
            }
        }
        push_literal(&mut out, &self.source[last..], params, &mut wildcards);
        Ok(out)
    }
}

fn push_literal(out: &mut String, literal: &str, params: &Params, wildcards: &mut usize) {
    for c in literal.chars() {
        if c == '*' {
            if let Some(value) = params.present(&wildcards.to_string()) {
                out.push_str(value);
            }
            *wildcards += 1;
        } else {
            out.push(c);
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> RoutePattern {
        RoutePattern::compile(pattern, PatternOptions::default()).unwrap()
    }

    #[test]
    fn test_required_placeholder_expression() {
        let pattern = compile("/bands/:id");
        assert_eq!(pattern.regex().as_str(), "^/bands/(?:(?P<p0>[^/]+?))/?$");
        assert_eq!(
            pattern.placeholders(),
            &[Placeholder { name: "id".into(), optional: false }]
        );
    }

    #[test]
    fn test_optional_format_expression() {
        let pattern = compile("/photos.:format?");
        assert_eq!(
            pattern.regex().as_str(),
            r"^/photos(?:\.(?P<p0>[^/.]+?))?/?$"
        );
        assert!(pattern.placeholders()[0].optional);
    }

    #[test]
    fn test_matches_extracts_params() {
        let pattern = compile("/photos/:id/edit.:format?");
        let params = pattern.matches("/photos/42/edit.json").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("format"), Some("json"));

        let params = pattern.matches("/photos/42/edit/").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("format"), None);

        assert!(pattern.matches("/photos/42").is_none());
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(compile("/Dashboard").matches("/dashboard").is_some());

        let strict_case = RoutePattern::compile(
            "/Dashboard",
            PatternOptions { case_sensitive: true, strict: false },
        )
        .unwrap();
        assert!(strict_case.matches("/dashboard").is_none());
    }

    #[test]
    fn test_strict_rejects_trailing_slash() {
        let pattern = RoutePattern::compile(
            "/login",
            PatternOptions { case_sensitive: false, strict: true },
        )
        .unwrap();
        assert!(pattern.matches("/login").is_some());
        assert!(pattern.matches("/login/").is_none());
    }

    #[test]
    fn test_wildcard_and_custom_capture() {
        let files = compile("/files/*");
        let params = files.matches("/files/a/b/c.txt").unwrap();
        assert_eq!(params.get("0"), Some("a/b/c.txt"));
        assert_eq!(
            files.path(&Params::new().with("0", "docs/readme.md")).unwrap(),
            "/files/docs/readme.md"
        );

        let pair = compile("/mirror/*/to/*");
        let params = pair.matches("/mirror/a/b/to/c").unwrap();
        assert_eq!(params.get("0"), Some("a/b"));
        assert_eq!(params.get("1"), Some("c"));

        let numeric = compile("/songs/:id(\\d+)");
        assert!(numeric.matches("/songs/12").is_some());
        assert!(numeric.matches("/songs/abc").is_none());
        assert_eq!(numeric.path(&Params::new().with("id", 12)).unwrap(), "/songs/12");
    }

    #[test]
    fn test_alternation_group() {
        let pattern = compile("/export/(csv|json)");
        assert!(pattern.matches("/export/csv").is_some());
        assert!(pattern.matches("/export/xml").is_none());
    }

    #[test]
    fn test_path_substitutes_required() {
        let pattern = compile("/bands/:id");
        let path = pattern.path(&Params::new().with("id", 101)).unwrap();
        assert_eq!(path, "/bands/101");
    }

    #[test]
    fn test_path_omits_optional_without_artifact() {
        let pattern = compile("/profile/:format?");
        assert_eq!(pattern.path(&Params::new()).unwrap(), "/profile");
        assert_eq!(
            pattern.path(&Params::new().with("format", "json")).unwrap(),
            "/profile/json"
        );

        let format = compile("/photos/:id.:format?");
        let params = Params::new().with("id", 7).with("format", "xml");
        assert_eq!(format.path(&params).unwrap(), "/photos/7.xml");
    }

    #[test]
    fn test_path_missing_required_fails() {
        let pattern = compile("/songs/:title");
        let err = pattern.path(&Params::new()).unwrap_err();
        match err {
            RoutingError::MissingParameter { name, pattern } => {
                assert_eq!(name, "title");
                assert_eq!(pattern, "/songs/:title");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let pattern = compile("/songs/:title");
        let err = pattern.path(&Params::new().with("title", "")).unwrap_err();
        assert!(matches!(err, RoutingError::MissingParameter { .. }));
    }

    #[test]
    fn test_star_placeholder_captures_rest_of_path() {
        let pattern = compile("/files/:path*");
        let params = pattern.matches("/files/a/b/c").unwrap();
        assert_eq!(params.get("path"), Some("a/b/c"));
        assert_eq!(pattern.matches("/files/a").unwrap().get("path"), Some("a"));
        assert!(pattern.matches("/files").is_none());

        let path = pattern.path(&Params::new().with("path", "a/b")).unwrap();
        assert_eq!(path, "/files/a/b");
        assert_eq!(pattern.matches(&path).unwrap().get("path"), Some("a/b"));
    }

    #[test]
    fn test_numeric_placeholder_name() {
        let pattern = compile("/files/:0");
        assert_eq!(pattern.matches("/files/x").unwrap().get("0"), Some("x"));
        assert_eq!(pattern.path(&Params::new().with("0", "y")).unwrap(), "/files/y");
    }

    #[test]
    fn test_duplicate_placeholder_is_invalid() {
        let err = RoutePattern::compile("/a/:id/b/:id", PatternOptions::default()).unwrap_err();
        assert!(matches!(err, RoutingError::DuplicatePlaceholder { ref name, .. } if name == "id"));
    }
}
