//! Yemenpedia HTTP API library.
//!
//! Exposes configuration, state, error handling, the AI provider clients and
//! the routers so integration tests and the binaries share one code path.

pub mod ai;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
