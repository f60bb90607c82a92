//! The web application: controllers, views and the route map.
//!
//! # Data Flow
//! ```text
//! build(config)
//!     → registry() (controllers by name: the handler factory)
//!     → Router::draw(draw_routes)
//!         → RouteTable (definer, consulted per request)
//!         → HelperRegistry (assistant, named links in views)
//!     → ReverseRoutes (redirect targets)
//!     → AppState (+ listener.public_url as the absolute link base)
//! ```

pub mod auth;
pub mod controller;
pub mod dashboard;
pub mod helpers;
pub mod pages;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::accounts::UserStore;
use crate::config::AppConfig;
use crate::http::dispatch::RouteTable;
use crate::http::AppState;
use crate::observability::metrics;
use crate::routing::{MatchOptions, Router, RoutingError};
use crate::session::SessionStore;

pub use controller::{endpoint, run_chain, ActionContext, Controller, ControllerRegistry, Endpoint, Flow};
pub use helpers::HelperRegistry;

/// Failure to assemble the application.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("listener.public_url \"{url}\" is not usable: {source}")]
    PublicUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Every controller the application serves.
pub fn registry() -> ControllerRegistry {
    ControllerRegistry::new()
        .register("pages", pages::controller())
        .register("auth", auth::controller())
        .register("dashboard", dashboard::controller())
}

/// The application's route map.
pub fn draw_routes(r: &mut Router<'_, Endpoint>) -> Result<(), RoutingError> {
    r.root("pages#main", MatchOptions::new().helper("root"))?;

    r.match_route("/register", "pages#register", MatchOptions::new().helper("register"))?;
    r.match_route("/login", "pages#login", MatchOptions::new().helper("login"))?;

    r.match_route("/dashboard", "dashboard#dashboard", MatchOptions::new().helper("dashboard"))?;

    r.match_route("/auth/register", "auth#register", MatchOptions::new().via("post").helper("authRegister"))?;
    r.match_route("/auth/login", "auth#login", MatchOptions::new().via("post").helper("authLogin"))?;
    r.match_route("/auth/logout", "auth#logout", MatchOptions::new().via("post").helper("authLogout"))?;
    Ok(())
}

/// Draw the routes and assemble shared state.
pub fn build(config: AppConfig) -> Result<AppState, BuildError> {
    build_with(config, draw_routes)
}

/// Like `build`, with a custom route map.
pub fn build_with<F>(config: AppConfig, draw: F) -> Result<AppState, BuildError>
where
    F: FnOnce(&mut Router<'_, Endpoint>) -> Result<(), RoutingError>,
{
    let public_url = Url::parse(&config.listener.public_url).map_err(|source| BuildError::PublicUrl {
        url: config.listener.public_url.clone(),
        source,
    })?;
    let controllers = registry();
    let mut table = RouteTable::new();
    let mut helpers = HelperRegistry::new();

    let reverse = {
        let mut router = Router::<Endpoint>::new(&controllers)
            .settings((&config.routing).into())
            .definer(&mut table)
            .assistant(&mut helpers);
        router.draw(draw)?;
        router.into_reverse_routes()
    };
    metrics::record_routes(table.len(), reverse.len());

    Ok(AppState {
        routes: Arc::new(table),
        reverse: Arc::new(reverse),
        helpers: Arc::new(helpers),
        users: UserStore::new(config.accounts.min_password_length),
        sessions: SessionStore::new(Duration::from_secs(config.session.ttl_secs)),
        public_url,
        config: Arc::new(config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Params, Verb};

    #[test]
    fn test_application_routes() {
        let state = build(AppConfig::default()).unwrap();
        let routes: Vec<(Verb, &str)> = state
            .routes
            .iter()
            .map(|r| (r.verb(), r.pattern().as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![
                (Verb::Get, "/"),
                (Verb::Get, "/register"),
                (Verb::Get, "/login"),
                (Verb::Get, "/dashboard"),
                (Verb::Post, "/auth/register"),
                (Verb::Post, "/auth/login"),
                (Verb::Post, "/auth/logout"),
            ]
        );
        assert_eq!(state.reverse.len(), 7);
    }

    #[test]
    fn test_application_helpers() {
        let state = build(AppConfig::default()).unwrap();
        let none = Params::new();
        assert_eq!(state.helpers.path("root", &none).unwrap(), "/");
        assert_eq!(state.helpers.path("login", &none).unwrap(), "/login");
        assert_eq!(state.helpers.path("authRegister", &none).unwrap(), "/auth/register");
        assert_eq!(
            state.reverse.path_for("dashboard", "dashboard", &none).unwrap().unwrap(),
            "/dashboard"
        );
    }

    #[test]
    fn test_public_url_parsed_into_state() {
        let mut config = AppConfig::default();
        config.listener.public_url = "https://accounts.example.com".into();
        let state = build(config).unwrap();
        assert_eq!(
            state.helpers.url("login", &state.public_url, &Params::new()).unwrap().as_str(),
            "https://accounts.example.com/login"
        );

        let mut config = AppConfig::default();
        config.listener.public_url = "not a url".into();
        assert!(matches!(build(config), Err(BuildError::PublicUrl { .. })));
    }
}
