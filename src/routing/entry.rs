//! Reverse routing entries.
//!
//! An entry maps a controller action back to the pattern used to generate
//! links to it. Entries are created once while drawing and never change.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use url::Url;

use crate::routing::{Params, RoutePattern, RoutingError};

/// Reverse route from `controller#action` to a URL pattern.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    controller: String,
    action: String,
    pattern: RoutePattern,
}

impl RouteEntry {
    pub fn new(controller: impl Into<String>, action: impl Into<String>, pattern: RoutePattern) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            pattern,
        }
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Routing key, `controller#action`.
    pub fn key(&self) -> String {
        routing_key(&self.controller, &self.action)
    }

    /// Path for this entry with placeholders substituted from `params`.
    pub fn path(&self, params: &Params) -> Result<String, RoutingError> {
        self.pattern.path(params)
    }

    /// Absolute URL for this entry, rooted at `base`.
    pub fn url(&self, base: &Url, params: &Params) -> Result<Url, RoutingError> {
        let path = self.path(params)?;
        let mut url = base.clone();
        url.set_path(&path);
        url.set_query(None);
        Ok(url)
    }
}

pub(crate) fn routing_key(controller: &str, action: &str) -> String {
    format!("{controller}#{action}")
}

/// Serializable view of an entry, used for route listings.
#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub controller: String,
    pub action: String,
    pub pattern: String,
}

impl From<&RouteEntry> for EntrySummary {
    fn from(entry: &RouteEntry) -> Self {
        Self {
            controller: entry.controller.clone(),
            action: entry.action.clone(),
            pattern: entry.pattern.as_str().to_string(),
        }
    }
}

/// Frozen reverse-routing table.
///
/// Produced once drawing completes; safe to share across request handlers
/// without synchronisation.
#[derive(Debug, Clone, Default)]
pub struct ReverseRoutes {
    entries: HashMap<String, Arc<RouteEntry>>,
}

impl ReverseRoutes {
    pub(crate) fn new(entries: HashMap<String, Arc<RouteEntry>>) -> Self {
        Self { entries }
    }

    /// Entry for `controller#action`, if one was drawn.
    pub fn find(&self, controller: &str, action: &str) -> Option<&RouteEntry> {
        self.entries
            .get(&routing_key(controller, action))
            .map(Arc::as_ref)
    }

    /// Path to `controller#action`; `None` when no route leads there.
    pub fn path_for(
        &self,
        controller: &str,
        action: &str,
        params: &Params,
    ) -> Option<Result<String, RoutingError>> {
        self.find(controller, action).map(|entry| entry.path(params))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries sorted by routing key.
    pub fn summaries(&self) -> Vec<EntrySummary> {
        let mut out: Vec<EntrySummary> = self.entries.values().map(|e| e.as_ref().into()).collect();
        out.sort_by(|a, b| (&a.controller, &a.action).cmp(&(&b.controller, &b.action)));
        out
    }
}
