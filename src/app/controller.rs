//! Controllers, actions and the handler chain.
//!
//! # Responsibilities
//! - Define the per-request `ActionContext` handed to every handler
//! - Group actions and before filters into named controllers
//! - Build the handler for a `controller#action` pair (the router's
//!   handler factory)
//!
//! # Design Decisions
//! - Every handler returns a `Flow`: either a finished response, or the
//!   context back so the next handler (or next matching route) runs
//! - Before filters run in declaration order ahead of the action
//! - A route naming a missing controller or action still draws; it answers
//!   500 at request time and logs the miss

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use futures_util::future::BoxFuture;
use url::Url;

use crate::accounts::User;
use crate::http::AppState;
use crate::routing::{HandlerFactory, Params, RoutingError, Verb};
use crate::session::Session;

/// Outcome of one handler.
pub enum Flow {
    /// Hand the request on.
    Next(ActionContext),
    /// Stop and send this response.
    Done(Response),
}

/// A request handler: filter, action or inline route handler.
pub type Endpoint = Arc<dyn Fn(ActionContext) -> BoxFuture<'static, Flow> + Send + Sync>;

/// Wrap an async function as an `Endpoint`.
pub fn endpoint<F, Fut>(f: F) -> Endpoint
where
    F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Flow> + Send + 'static,
{
    Arc::new(move |ctx: ActionContext| -> BoxFuture<'static, Flow> { Box::pin(f(ctx)) })
}

/// Run `handlers` in order until one finishes the request.
pub async fn run_chain(handlers: &[Endpoint], mut ctx: ActionContext) -> Flow {
    for handler in handlers {
        match handler(ctx).await {
            Flow::Next(next) => ctx = next,
            done @ Flow::Done(_) => return done,
        }
    }
    Flow::Next(ctx)
}

/// Everything a handler knows about the request in flight.
pub struct ActionContext {
    pub state: AppState,
    pub request_id: String,
    pub verb: Verb,
    pub path: String,
    pub headers: HeaderMap,
    /// Placeholder values from the matched route.
    pub params: Params,
    /// Decoded `application/x-www-form-urlencoded` body.
    pub form: Params,
    pub session: Session,
}

impl ActionContext {
    /// Route parameter, falling back to the form body.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).or_else(|| self.form.get(name))
    }

    /// Form field, empty when absent.
    pub fn field(&self, name: &str) -> String {
        self.form.get(name).unwrap_or_default().to_string()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session
            .user_id()
            .and_then(|id| self.state.users.find_by_id(id))
    }

    /// Path of a named helper, or `#` if it cannot be built.
    pub fn link(&self, helper: &str) -> String {
        match self.state.helpers.path(helper, &Params::new()) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(request_id = %self.request_id, error = %e, "Unresolvable link");
                "#".to_string()
            }
        }
    }

    /// Absolute URL of a named helper, rooted at `listener.public_url`.
    pub fn url_for(&self, helper: &str, params: &Params) -> Result<Url, RoutingError> {
        self.state.helpers.url(helper, &self.state.public_url, params)
    }

    pub fn next(self) -> Flow {
        Flow::Next(self)
    }

    pub fn render(&self, html: String) -> Flow {
        Flow::Done(Html(html).into_response())
    }

    /// Redirect to the reverse route of `controller#action`.
    pub fn redirect_to(&self, controller: &str, action: &str, params: &Params) -> Flow {
        let path = self
            .state
            .reverse
            .path_for(controller, action, params)
            .unwrap_or_else(|| {
                Err(RoutingError::InvalidTarget {
                    target: format!("{controller}#{action}"),
                })
            });
        match path {
            Ok(path) => Flow::Done(Redirect::to(&path).into_response()),
            Err(e) => self.fail(e),
        }
    }

    /// Answer 500 for a failure that is a bug rather than bad input.
    pub fn fail(&self, error: impl std::fmt::Display) -> Flow {
        tracing::error!(request_id = %self.request_id, path = %self.path, error = %error, "Handler failed");
        Flow::Done((StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response())
    }
}

/// Which actions a before filter guards.
#[derive(Debug, Clone)]
pub enum FilterScope {
    All,
    Only(Vec<String>),
}

impl FilterScope {
    fn covers(&self, action: &str) -> bool {
        match self {
            FilterScope::All => true,
            FilterScope::Only(actions) => actions.iter().any(|a| a == action),
        }
    }
}

impl From<&str> for FilterScope {
    /// `"*"` for every action, otherwise a single action name.
    fn from(scope: &str) -> Self {
        if scope == "*" {
            FilterScope::All
        } else {
            FilterScope::Only(vec![scope.to_string()])
        }
    }
}

/// Named set of actions plus their before filters.
#[derive(Clone, Default)]
pub struct Controller {
    actions: HashMap<String, Endpoint>,
    before: Vec<(FilterScope, Endpoint)>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action<F, Fut>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Flow> + Send + 'static,
    {
        self.actions.insert(name.to_string(), endpoint(f));
        self
    }

    pub fn before<F, Fut>(mut self, scope: impl Into<FilterScope>, f: F) -> Self
    where
        F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Flow> + Send + 'static,
    {
        self.before.push((scope.into(), endpoint(f)));
        self
    }

    /// Filters covering `action`, followed by the action itself.
    fn chain(&self, action: &str) -> Option<Vec<Endpoint>> {
        let handler = self.actions.get(action)?;
        let mut chain: Vec<Endpoint> = self
            .before
            .iter()
            .filter(|(scope, _)| scope.covers(action))
            .map(|(_, filter)| Arc::clone(filter))
            .collect();
        chain.push(Arc::clone(handler));
        Some(chain)
    }
}

/// All controllers, keyed by qualified controller name.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Controller>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: &str, controller: Controller) -> Self {
        self.controllers.insert(name.to_string(), controller);
        self
    }
}

impl HandlerFactory<Endpoint> for ControllerRegistry {
    fn handler(&self, controller: &str, action: &str) -> Endpoint {
        let chain = self
            .controllers
            .get(controller)
            .and_then(|c| c.chain(action));

        match chain {
            Some(chain) => {
                let chain = Arc::new(chain);
                Arc::new(move |ctx: ActionContext| -> BoxFuture<'static, Flow> {
                    let chain = Arc::clone(&chain);
                    Box::pin(async move { run_chain(&chain, ctx).await })
                })
            }
            None => {
                tracing::warn!(controller = %controller, action = %action, "Route target has no handler");
                let target = format!("{controller}#{action}");
                endpoint(move |ctx| {
                    let target = target.clone();
                    async move { ctx.fail(format!("No action for {target}")) }
                })
            }
        }
    }
}
