//! HTTP front end for the saferouting engine.
//!
//! - [`AppState`]: the shared router behind a mutex
//! - [`health`]: liveness and readiness probes
//! - [`ProblemDetails`]: RFC 9457 error bodies
//! - [`logging`]: JSON or text structured logging
//! - [`config`]: environment-driven service configuration
//!
//! Handlers only parse and validate parameters; every routing decision lives
//! in `saferouting-lib`.

#![deny(warnings)]

pub mod config;
mod handlers;
mod health;
pub mod logging;
mod problem;
mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub use config::ServiceConfig;
pub use handlers::{RouteParams, route_handler};
pub use health::{HealthStatus, health_live, health_ready};
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use problem::{
    PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST, PROBLEM_SERVICE_UNAVAILABLE, ProblemDetails,
};
pub use state::AppState;

/// Build the HTTP application over `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/route", get(route_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
