//! Server-side sessions.
//!
//! # Responsibilities
//! - Issue and resolve session ids carried in a cookie
//! - Hold login state and queued flash messages per session
//! - Expire idle sessions
//!
//! # Design Decisions
//! - Session data never leaves the process; the cookie holds only a UUID
//! - Flash messages are consumed when read, so each shows once
//! - An unknown or expired cookie silently starts a fresh session

pub mod cookie;
pub mod store;

pub use store::{Flash, Session, SessionStore};
