//! User accounts.
//!
//! # Data Flow
//! ```text
//! POST /auth/register → UserStore::register_user (hash, insert)
//! POST /auth/login    → strategy::authenticate (lookup, verify) → session login
//! ```
//!
//! # Design Decisions
//! - Users live in memory for the life of the process
//! - Passwords are stored as argon2 PHC strings, never in clear

pub mod strategy;
pub mod user;

pub use strategy::{authenticate, AuthOutcome};
pub use user::{AccountError, NewUser, User, UserStore};
