//! Walking-route query HTTP microservice.
//!
//! # Endpoints
//!
//! - `GET /api/v1/route?x0=&y0=&x1=&y1=` - Route between two coordinates
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `SAFEROUTING_STATE_PATH` - Persisted router state (default: `.serialized_routes`)
//! - `SAFEROUTING_GRAPH_PATH` - Graph input used when the state does not exist yet
//! - `SAFEROUTING_BOUNDS` - Query bounds as `x0,y0,x1,y1` for a freshly built state
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::net::SocketAddr;

use saferouting_lib::{HookRegistry, ensure_router};
use saferouting_service::{AppState, LoggingConfig, ServiceConfig, app, init_logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("route");
    init_logging(&logging_config);

    let config = ServiceConfig::from_env().inspect_err(|e| {
        error!(error = %e, "invalid service configuration");
    })?;

    info!(
        state_path = %config.state_path.display(),
        graph_path = ?config.graph_path,
        port = config.port,
        "starting route service"
    );

    let router = ensure_router(&config.bootstrap_options(), &HookRegistry::default())
        .inspect_err(|e| {
            error!(error = %e, path = %config.state_path.display(), "failed to load router state");
        })?;

    info!(
        nodes = router.graph().len(),
        cached_routes = router.cache().len(),
        "router state loaded"
    );

    let app = app(AppState::new(router));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
