//! Switchyard: declarative URL routing with reverse routing, and the small
//! account web app drawn with it.

pub mod accounts;
pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod session;

pub use config::schema::AppConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{Router, RoutingError};
