//! Output formatting for route rendering.

use std::fmt::Write as _;

use clap::ValueEnum;
use saferouting_lib::Route;

/// How the `route` command prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// The route document as a single JSON line.
    #[default]
    Json,
    /// Human-readable summary with one line per node.
    Text,
}

/// Render `route` in the requested format.
pub fn render_route(route: &Route, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(route.to_json()?),
        OutputFormat::Text => Ok(render_text(route)),
    }
}

/// Human-friendly route view.
pub fn render_text(route: &Route) -> String {
    let mut out = String::new();
    let cost = if route.cost.is_finite() {
        format!("{:.3}", route.cost)
    } else {
        "unreachable".to_string()
    };
    let _ = writeln!(
        out,
        "Route: {} nodes, cost {}, {:.2}ms",
        route.len(),
        cost,
        route.time
    );
    for (node, point) in route.nodes.iter().zip(&route.path) {
        let _ = writeln!(out, "- {node} ({:.6}, {:.6})", point.x, point.y);
    }
    if let Some(error) = route.error() {
        let _ = writeln!(out, "warning: {error}");
    }
    out
}
