//! Route command handler for answering one query against a persisted state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use saferouting_lib::{AvoidNodes, Coordinate, HookRegistry, NodeId, Router};
use tracing::debug;

use saferouting_cli::output::{render_route, OutputFormat};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    pub state: PathBuf,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    /// Nodes to avoid for this query only.
    pub avoid: Vec<NodeId>,
    pub format: OutputFormat,
    /// Persist the updated cache after answering.
    pub save: bool,
}

/// Handle the route subcommand.
pub fn handle_route(args: &RouteCommandArgs) -> Result<()> {
    let mut router = Router::load(&args.state, &HookRegistry::default())
        .with_context(|| format!("failed to load state from {}", args.state.display()))?;

    // An avoidance hook is anonymous; restore the persisted hook before saving.
    let persisted_hook = if args.avoid.is_empty() {
        None
    } else {
        debug!(avoid = ?args.avoid, "applying node avoidance");
        let previous = HookRegistry::default().resolve(router.hook_name());
        router.set_hook(Arc::new(AvoidNodes::new(args.avoid.iter().copied())));
        Some(previous)
    };

    let route = router
        .get_path(
            Coordinate::new(args.x0, args.y0),
            Coordinate::new(args.x1, args.y1),
        )
        .context("route query failed")?;

    println!("{}", render_route(&route, args.format)?.trim_end());

    if args.save {
        if let Some(hook) = persisted_hook {
            router.set_hook(hook);
        }
        router
            .save(&args.state)
            .with_context(|| format!("failed to write state to {}", args.state.display()))?;
    }
    Ok(())
}
