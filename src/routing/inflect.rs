//! Identifier normalisation for controllers, actions and helpers.
//!
//! Route declarations take names straight from application code
//! (`"Admin::Posts"`, `"posts_controller"`, `"bands"`). These helpers bring
//! them into the canonical forms used as table keys:
//!
//! | input                 | function        | output         |
//! |-----------------------|-----------------|----------------|
//! | `Fulano::FooBar`      | `moduleize`     | `fulano/fooBar`|
//! | `foo_bar_controller`  | `controllerize` | `fooBar`       |
//! | `new`, `band_album`   | `functionize`   | `newBandAlbum` |
//! | `SSLError`            | `underscore`    | `ssl_error`    |
//! | `bands`               | `singularize`   | `band`         |

use heck::ToSnakeCase;
use once_cell::sync::Lazy;
use regex::Regex;

const CONTROLLER_SUFFIX: &str = "controller";

/// Joins the `_`/`-` separated words of `s`, capitalising every word after
/// the first. Only first letters change case; acronyms and other
/// punctuation survive as written (`foo_URL` -> `fooURL`).
fn camelize(s: &str, upper_first: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, word) in s.split(['_', '-']).enumerate() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i > 0 || upper_first {
                out.extend(first.to_uppercase());
            } else {
                out.extend(first.to_lowercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Splits on `/` or `::` and camelizes every segment.
pub fn moduleize(s: &str) -> String {
    s.split("::")
        .flat_map(|part| part.split('/'))
        .map(|segment| camelize(segment, false))
        .collect::<Vec<_>>()
        .join("/")
}

/// Module form with any trailing `controller` suffix removed.
pub fn controllerize(s: &str) -> String {
    let mut module = moduleize(s);
    if module.to_ascii_lowercase().ends_with(CONTROLLER_SUFFIX) {
        module.truncate(module.len() - CONTROLLER_SUFFIX.len());
    }
    module
}

/// Concatenates `parts`, the first camelized with a lowercase initial and
/// the rest with an uppercase one. Returns `None` when the leading part is
/// empty.
pub fn functionize<S: AsRef<str>>(parts: &[S]) -> Option<String> {
    let (first, rest) = parts.split_first()?;
    if first.as_ref().is_empty() {
        return None;
    }
    let mut out = camelize(first.as_ref(), false);
    for part in rest {
        out.push_str(&camelize(part.as_ref(), true));
    }
    Some(out)
}

/// Snake case, splitting before uppercase runs (`SSLError` -> `ssl_error`).
pub fn underscore(s: &str) -> String {
    s.to_snake_case()
}

static UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "news",
];

static IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("sexes", "sex"),
    ("moves", "move"),
    ("movies", "movie"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("oxen", "ox"),
];

// Checked in order; first match wins.
static SINGULAR_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)(quiz)zes$", "$1"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)^(ox)en", "$1"),
        (r"(?i)(alias|status)es$", "$1"),
        (r"(?i)(octop|vir)i$", "${1}us"),
        (r"(?i)(cris|ax|test)es$", "${1}is"),
        (r"(?i)(shoe)s$", "$1"),
        (r"(?i)(o)es$", "$1"),
        (r"(?i)(bus)es$", "$1"),
        (r"(?i)([ml])ice$", "${1}ouse"),
        (r"(?i)(x|ch|ss|sh)es$", "$1"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)(s)eries$", "${1}eries"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(tive)s$", "$1"),
        (r"(?i)(hive)s$", "$1"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)(^analy)ses$", "${1}sis"),
        (r"(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)ses$", "${1}sis"),
        (r"(?i)([ti])a$", "${1}um"),
        (r"(?i)(n)ews$", "${1}ews"),
        (r"(?i)(ss)$", "$1"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// English singular form of a resource name (`bands` -> `band`).
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if UNCOUNTABLE.iter().any(|u| lower.ends_with(u)) {
        return word.to_string();
    }
    for (plural, singular) in IRREGULAR {
        if lower == *plural || lower.ends_with(&format!("_{plural}")) {
            let stem = &word[..word.len() - plural.len()];
            return format!("{stem}{singular}");
        }
    }
    for (rule, replacement) in SINGULAR_RULES.iter() {
        if rule.is_match(word) {
            return rule.replace(word, *replacement).into_owned();
        }
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moduleize() {
        assert_eq!(moduleize("Foo"), "foo");
        assert_eq!(moduleize("fulano/foo_bar"), "fulano/fooBar");
        assert_eq!(moduleize("Fulano::FooBar"), "fulano/fooBar");
        assert_eq!(moduleize("api.v1"), "api.v1");
        assert_eq!(moduleize("admin-area/band_members"), "adminArea/bandMembers");
    }

    #[test]
    fn test_controllerize_strips_suffix() {
        assert_eq!(controllerize("foo_bar"), "fooBar");
        assert_eq!(controllerize("foo_bar_controller"), "fooBar");
        assert_eq!(controllerize("PagesController"), "pages");
        assert_eq!(controllerize("admin/posts"), "admin/posts");
        assert_eq!(controllerize("APIController"), "aPI");
    }

    #[test]
    fn test_functionize() {
        assert_eq!(functionize(&["FooBar", "URL"]).as_deref(), Some("fooBarURL"));
        assert_eq!(functionize(&["new", "HTTPProxy"]).as_deref(), Some("newHTTPProxy"));
        assert_eq!(functionize(&["new", "band_album"]).as_deref(), Some("newBandAlbum"));
        assert_eq!(functionize(&["edit", "photo"]).as_deref(), Some("editPhoto"));
        assert_eq!(functionize(&["dashboard"]).as_deref(), Some("dashboard"));
        assert_eq!(functionize::<&str>(&[]), None);
        assert_eq!(functionize(&["", "photo"]), None);
    }

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("FooBar"), "foo_bar");
        assert_eq!(underscore("SSLError"), "ssl_error");
        assert_eq!(underscore("band"), "band");
        assert_eq!(underscore("band-member"), "band_member");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("bands"), "band");
        assert_eq!(singularize("photos"), "photo");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("sheep"), "sheep");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("profile"), "profile");
    }
}
