/// Mini App launch resolution
pub mod launch;
/// Profile response shared by v1 routes
pub mod profile;
/// Account registration
pub mod register;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};
use axum::middleware;

use crate::middleware::init_data_middleware;

/// Creates the v1 API router with all v1 handler routes
///
/// Every v1 route requires Telegram init data.
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .api_route("/launch", get(launch::launch))
        .api_route("/register", post(register::register))
        .layer(middleware::from_fn(init_data_middleware))
}
