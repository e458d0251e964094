//! Build command handler: graph input to persisted router state.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use saferouting_lib::{build_graph, Bounds, GraphDocument, Router};

/// Arguments for the build command.
#[derive(Debug, Clone)]
pub struct BuildCommandArgs {
    pub graph: Option<PathBuf>,
    pub nodes: Option<PathBuf>,
    pub edges: Option<PathBuf>,
    pub state: PathBuf,
    pub bounds: Option<Bounds>,
}

/// Handle the build subcommand.
pub fn handle_build(args: &BuildCommandArgs) -> Result<()> {
    let document = match (&args.graph, &args.nodes, &args.edges) {
        (Some(graph), _, _) => GraphDocument::from_path(graph)
            .with_context(|| format!("failed to load graph from {}", graph.display()))?,
        (None, Some(nodes), Some(edges)) => GraphDocument::from_csv_paths(nodes, edges)
            .with_context(|| {
                format!(
                    "failed to load graph from {} and {}",
                    nodes.display(),
                    edges.display()
                )
            })?,
        _ => bail!("either --graph or both --nodes and --edges are required"),
    };

    let graph = build_graph(&document);
    let router = Router::new(graph, args.bounds, None).context("failed to build router")?;
    router
        .save(&args.state)
        .with_context(|| format!("failed to write state to {}", args.state.display()))?;

    println!(
        "Built router with {} nodes and {} edges at {}",
        router.graph().len(),
        router.graph().edge_count(),
        args.state.display()
    );
    Ok(())
}
