//! Named routing helpers.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::routing::{Assistant, HelperTarget, Params, RoutingError};

/// Helper registry, filled by the router while routes are drawn.
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    helpers: BTreeMap<String, HelperTarget>,
}

/// Serializable view of one helper, used for route listings.
#[derive(Debug, Clone, Serialize)]
pub struct HelperSummary {
    pub name: String,
    pub pattern: String,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path for helper `name`. Literal-path helpers ignore `params`.
    pub fn path(&self, name: &str, params: &Params) -> Result<String, RoutingError> {
        match self.lookup(name)? {
            HelperTarget::Entry(entry) => entry.path(params),
            HelperTarget::Path(path) => Ok(if path.is_empty() { "/".to_string() } else { path.clone() }),
        }
    }

    /// Absolute URL for helper `name` under `base`.
    pub fn url(&self, name: &str, base: &Url, params: &Params) -> Result<Url, RoutingError> {
        match self.lookup(name)? {
            HelperTarget::Entry(entry) => entry.url(base, params),
            HelperTarget::Path(_) => {
                let mut url = base.clone();
                url.set_path(&self.path(name, params)?);
                url.set_query(None);
                Ok(url)
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    pub fn summaries(&self) -> Vec<HelperSummary> {
        self.helpers
            .iter()
            .map(|(name, target)| HelperSummary {
                name: name.clone(),
                pattern: match target {
                    HelperTarget::Entry(entry) => entry.pattern().as_str().to_string(),
                    HelperTarget::Path(path) => path.clone(),
                },
            })
            .collect()
    }

    fn lookup(&self, name: &str) -> Result<&HelperTarget, RoutingError> {
        self.helpers
            .get(name)
            .ok_or_else(|| RoutingError::UnknownHelper { name: name.to_string() })
    }
}

impl Assistant for HelperRegistry {
    fn assist(&mut self, name: &str, target: HelperTarget) {
        if self.helpers.contains_key(name) {
            tracing::debug!(helper = %name, "Helper already registered, keeping first");
            return;
        }
        self.helpers.insert(name.to_string(), target);
    }
}
