//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Drawing (at startup):
//!     draw(|r| ...) declarations
//!     → router.rs (expand match / verb / resource / resources / namespace)
//!     → namespace.rs (qualify path, controller, helper name)
//!     → pattern.rs (compile pattern, record placeholders)
//!     → Definer (register verb + pattern + handlers for dispatch)
//!     → entry.rs (reverse entry, first declaration wins)
//!     → Assistant (install named helper)
//!
//! Reverse Routing (per request):
//!     controller#action + Params
//!     → ReverseRoutes::find
//!     → RouteEntry::path / RouteEntry::url
//! ```
//!
//! # Design Decisions
//! - Routes drawn once at startup, immutable afterwards
//! - Declaration order is significant for dispatch and reverse routing alike
//! - Dispatch itself belongs to the server; this module only compiles patterns
//!   and hands them over

pub mod entry;
pub mod error;
pub mod inflect;
pub mod namespace;
pub mod params;
pub mod pattern;
pub mod router;
pub mod verb;

pub use entry::{EntrySummary, ReverseRoutes, RouteEntry};
pub use error::RoutingError;
pub use namespace::{Namespace, NamespaceStack};
pub use params::Params;
pub use pattern::{PatternOptions, Placeholder, RoutePattern};
pub use router::{
    Assistant, Definer, HandlerFactory, HelperTarget, MatchOptions, NamespaceOptions,
    ResourceAction, ResourceOptions, Router, RouterSettings, Target,
};
pub use verb::Verb;
