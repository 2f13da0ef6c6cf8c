//! Domain layer for Taskdeck
//!
//! Models, credentials, and database plumbing live here, apart from the HTTP
//! surface, so they can be tested without a running server.

pub mod auth;
pub mod db;
pub mod models;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
