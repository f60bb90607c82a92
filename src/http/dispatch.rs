//! Request dispatch over the drawn route table.
//!
//! # Responsibilities
//! - Receive concrete routes from the router (the definer)
//! - Match an incoming verb and path against them in declaration order
//! - Run the matched handler chain, falling through when it yields
//!
//! # Design Decisions
//! - First match wins; a chain that hands the request back lets the next
//!   matching route try
//! - `HEAD` is served by `GET` routes when no `HEAD` route accepts it
//! - The table is immutable once drawn and shared behind `Arc`

use serde::Serialize;

use crate::app::{run_chain, ActionContext, Endpoint, Flow};
use crate::routing::{Definer, RoutePattern, Verb};

/// One concrete route.
pub struct DispatchRoute {
    verb: Verb,
    pattern: RoutePattern,
    handlers: Vec<Endpoint>,
}

impl DispatchRoute {
    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}

/// Serializable view of a route, used for route listings.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub verb: Verb,
    pub pattern: String,
    pub handlers: usize,
}

/// Ordered list of concrete routes.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<DispatchRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DispatchRoute> {
        self.routes.iter()
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes
            .iter()
            .map(|r| RouteSummary {
                verb: r.verb,
                pattern: r.pattern.as_str().to_string(),
                handlers: r.handlers.len(),
            })
            .collect()
    }

    /// Run the request through every matching route until one responds.
    /// Returns `Flow::Next` when none did.
    pub async fn dispatch(&self, mut ctx: ActionContext) -> Flow {
        let verb = ctx.verb;
        for pass in self.passes(verb) {
            for route in self.routes.iter().filter(|r| r.verb == pass) {
                let Some(params) = route.pattern.matches(&ctx.path) else {
                    continue;
                };
                tracing::debug!(
                    request_id = %ctx.request_id,
                    verb = %route.verb,
                    pattern = %route.pattern,
                    "Route matched"
                );
                ctx.params = params;
                match run_chain(&route.handlers, ctx).await {
                    Flow::Next(next) => ctx = next,
                    done @ Flow::Done(_) => return done,
                }
            }
        }
        Flow::Next(ctx)
    }

    fn passes(&self, verb: Verb) -> Vec<Verb> {
        if verb == Verb::Head {
            vec![Verb::Head, Verb::Get]
        } else {
            vec![verb]
        }
    }
}

impl Definer<Endpoint> for RouteTable {
    fn define(&mut self, verb: Verb, pattern: &RoutePattern, handlers: Vec<Endpoint>) {
        self.routes.push(DispatchRoute {
            verb,
            pattern: pattern.clone(),
            handlers,
        });
    }
}
