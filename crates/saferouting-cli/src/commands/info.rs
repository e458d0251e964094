//! Info command handler.

use std::path::Path;

use anyhow::{Context, Result};
use saferouting_lib::{HookRegistry, Router};

/// Handle the info subcommand.
pub fn handle_info(state: &Path) -> Result<()> {
    let router = Router::load(state, &HookRegistry::default())
        .with_context(|| format!("failed to load state from {}", state.display()))?;

    println!("State: {}", state.display());
    println!("Nodes: {}", router.graph().len());
    println!("Edges: {}", router.graph().edge_count());
    println!("Cached routes: {}", router.cache().len());
    match router.bounds() {
        Some(bounds) => println!("Bounds: {bounds}"),
        None => println!("Bounds: none"),
    }
    println!("Hook: {}", router.hook_name().unwrap_or("anonymous"));
    Ok(())
}
