//! Namespace scopes for route declarations.
//!
//! # Responsibilities
//! - Track the scopes opened by `namespace`, `resource` and `resources` blocks
//! - Qualify raw paths, controller identifiers and helper names against the
//!   active scope chain
//!
//! # Design Decisions
//! - Scopes live in an append-only arena; a record refers to its parent by
//!   index, and the parent index is always lower than the record's own, so the
//!   chain cannot cycle
//! - The active chain is a stack of arena indices, pushed on block entry and
//!   popped on block exit
//! - The separator is fixed by the root and inherited by every descendant

use crate::routing::inflect::{controllerize, functionize, moduleize};

/// One scope record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Raw path segment(s), empty for the root.
    pub name: String,
    /// Qualifier applied to controller identifiers.
    pub module: String,
    /// Qualifier applied to helper names.
    pub method: String,
    pub separator: char,
    pub parent: Option<usize>,
}

/// Arena of scope records plus the stack of currently open scopes.
#[derive(Debug, Clone)]
pub struct NamespaceStack {
    records: Vec<Namespace>,
    open: Vec<usize>,
}

impl NamespaceStack {
    /// A stack holding only the root scope.
    pub fn new(separator: char) -> Self {
        Self {
            records: vec![Namespace {
                name: String::new(),
                module: String::new(),
                method: String::new(),
                separator,
                parent: None,
            }],
            open: vec![0],
        }
    }

    /// Index of the innermost open scope.
    pub fn current(&self) -> usize {
        self.open.last().copied().unwrap_or(0)
    }

    /// Number of open scopes, including the root.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn get(&self, index: usize) -> Option<&Namespace> {
        self.records.get(index)
    }

    /// Open a child of the current scope.
    ///
    /// `module` and `method` are normalised here; `None` leaves the
    /// corresponding qualifier empty.
    pub fn push(&mut self, name: &str, module: Option<&str>, method: Option<&str>) -> usize {
        let parent = self.current();
        let separator = self.records[parent].separator;
        let index = self.records.len();
        self.records.push(Namespace {
            name: name.to_string(),
            module: module.map(moduleize).unwrap_or_default(),
            method: method.and_then(|m| functionize(&[m])).unwrap_or_default(),
            separator,
            parent: Some(parent),
        });
        self.open.push(index);
        index
    }

    /// Close the innermost scope. The root is never popped.
    pub fn pop(&mut self) {
        if self.open.len() > 1 {
            self.open.pop();
        }
    }

    /// Scopes from the current one up to the root.
    fn ancestors(&self) -> impl Iterator<Item = &Namespace> {
        let mut next = Some(self.current());
        std::iter::from_fn(move || {
            let ns = &self.records[next?];
            next = ns.parent;
            Some(ns)
        })
    }

    /// Prefix `raw` with every enclosing scope name.
    ///
    /// The result always starts with exactly one separator, and no separator
    /// is doubled at scope boundaries.
    pub fn qualify_path(&self, raw: &str) -> String {
        let sep = self.records[self.current()].separator;
        let mut qual = raw.to_string();
        for ns in self.ancestors() {
            if ns.name.is_empty() {
                continue;
            }
            qual = if ns.name.ends_with(sep) || qual.is_empty() || qual.starts_with(sep) {
                format!("{}{}", ns.name, qual)
            } else {
                format!("{}{}{}", ns.name, sep, qual)
            };
        }
        if qual.starts_with(sep) {
            qual
        } else {
            format!("{sep}{qual}")
        }
    }

    /// Canonical controller identifier prefixed with enclosing modules,
    /// e.g. `posts` inside `admin` becomes `admin/posts`.
    pub fn qualify_controller(&self, raw: &str) -> String {
        let mut qual = controllerize(raw);
        for ns in self.ancestors() {
            if !ns.module.is_empty() {
                qual = format!("{}/{}", ns.module, qual);
            }
        }
        qual
    }

    /// Helper name composed from enclosing methods, e.g. `album` inside a
    /// `bands` resource becomes `bandAlbum`.
    pub fn qualify_helper(&self, raw: &str) -> Option<String> {
        let mut comps: Vec<&str> = self
            .ancestors()
            .filter(|ns| !ns.method.is_empty())
            .map(|ns| ns.method.as_str())
            .collect();
        comps.reverse();
        comps.push(raw);
        functionize(&comps)
    }
}

impl Default for NamespaceStack {
    fn default() -> Self {
        Self::new('/')
    }
}
