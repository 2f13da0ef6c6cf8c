//! HTTP server for Taskdeck
//!
//! Library form of the server so integration tests can build the router
//! without spawning the binary. The binary in `main.rs` is a thin wrapper
//! around [`app::build_router`].

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
