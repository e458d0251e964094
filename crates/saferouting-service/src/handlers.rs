//! Route query handler.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use saferouting_lib::{Coordinate, Route};
use serde::Deserialize;
use tracing::{error, info};

use crate::problem::ProblemDetails;
use crate::state::AppState;

/// Raw query parameters of `GET /api/v1/route`.
///
/// Kept as strings so missing and malformed values can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteParams {
    pub x0: Option<String>,
    pub y0: Option<String>,
    pub x1: Option<String>,
    pub y1: Option<String>,
}

impl RouteParams {
    /// Parse the four coordinates, or describe what is wrong with them.
    pub fn coordinates(&self) -> Result<(Coordinate, Coordinate), String> {
        let fields = [
            ("x0", self.x0.as_deref()),
            ("y0", self.y0.as_deref()),
            ("x1", self.x1.as_deref()),
            ("y1", self.y1.as_deref()),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing parameters {}", missing.join(", ")));
        }

        let mut values = [0.0; 4];
        let mut invalid = Vec::new();
        for (slot, (name, value)) in values.iter_mut().zip(fields) {
            match value.map(|v| v.trim().parse::<f64>()) {
                Some(Ok(parsed)) if parsed.is_finite() => *slot = parsed,
                _ => invalid.push(name),
            }
        }
        if !invalid.is_empty() {
            return Err(format!("invalid numeric parameters {}", invalid.join(", ")));
        }

        let [x0, y0, x1, y1] = values;
        Ok((Coordinate::new(x0, y0), Coordinate::new(x1, y1)))
    }
}

/// Handle `GET /api/v1/route`.
pub async fn route_handler(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> Response {
    let request_id = generate_request_id();

    let (source, destination) = match params.coordinates() {
        Ok(points) => points,
        Err(detail) => {
            info!(request_id = %request_id, detail = %detail, "rejecting route request");
            return ProblemDetails::bad_request(detail, request_id).into_response();
        }
    };

    info!(
        request_id = %request_id,
        x0 = source.x,
        y0 = source.y,
        x1 = destination.x,
        y1 = destination.y,
        "handling route request"
    );

    let outcome = tokio::task::spawn_blocking(move || -> Result<Route, String> {
        let mut engine = state
            .lock()
            .ok_or_else(|| "router state is unavailable".to_string())?;
        engine
            .get_path(source, destination)
            .map_err(|e| e.to_string())
    })
    .await;

    match outcome {
        Ok(Ok(route)) => {
            info!(
                request_id = %request_id,
                nodes = route.len(),
                cost = route.cost,
                time_ms = route.time,
                "route computed"
            );
            Json(route.document()).into_response()
        }
        Ok(Err(detail)) => {
            error!(request_id = %request_id, error = %detail, "route query failed");
            ProblemDetails::internal_error(detail, request_id).into_response()
        }
        Err(join_error) => {
            error!(request_id = %request_id, error = %join_error, "route task aborted");
            ProblemDetails::internal_error("route computation aborted", request_id).into_response()
        }
    }
}

/// Generate a request ID for tracing.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    format!("req-{timestamp:x}")
}
