//! Health check handlers for Kubernetes probes.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes_loaded: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_routes: Option<usize>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            nodes_loaded: None,
            cached_routes: None,
        }
    }

    pub fn ready(service: &str, version: &str, nodes: usize, cached_routes: usize) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            nodes_loaded: Some(nodes),
            cached_routes: Some(cached_routes),
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {reason}"),
            service: service.to_string(),
            version: version.to_string(),
            nodes_loaded: None,
            cached_routes: None,
        }
    }
}

/// Liveness probe: 200 while the process is serving.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe: 200 with graph and cache sizes once the router can be
/// locked, 503 otherwise.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let counts = state
        .lock()
        .map(|engine| (engine.graph().len(), engine.cache().len()));

    match counts {
        Some((nodes, cached)) if nodes > 0 => {
            let status = HealthStatus::ready(service, version, nodes, cached);
            (StatusCode::OK, Json(status)).into_response()
        }
        Some(_) => {
            let status = HealthStatus::not_ready(service, version, "no nodes loaded");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
        None => {
            let status = HealthStatus::not_ready(service, version, "router state poisoned");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alive_omits_counts() {
        let json = serde_json::to_string(&HealthStatus::alive("route", "0.1.0")).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(!json.contains("nodes_loaded"));
    }

    #[test]
    fn ready_reports_counts() {
        let status = HealthStatus::ready("route", "0.1.0", 4, 2);
        assert_eq!(status.nodes_loaded, Some(4));
        assert_eq!(status.cached_routes, Some(2));
    }

    #[test]
    fn not_ready_carries_reason() {
        let status = HealthStatus::not_ready("route", "0.1.0", "no nodes loaded");
        assert_eq!(status.status, "not_ready: no nodes loaded");
    }
}
