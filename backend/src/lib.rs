//! Telegram Mini App backend service
//!
//! Verifies the launch data Telegram hands to the Mini App, then resolves the
//! launching user to a stored account or registers a new one.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Telegram init data authentication
pub mod middleware;

/// HTTP routes
pub mod routes;

/// Server setup and startup
pub mod server;

/// Shared types: environment, errors, extractors
pub mod types;
