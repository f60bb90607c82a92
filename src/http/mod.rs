//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers)
//!     → request.rs (request ID, form body, method override)
//!     → session cookie → Session
//!     → dispatch.rs (match route table, run handler chain)
//!     → response.rs (404, session cookie)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::{RouteSummary, RouteTable};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
