//! Start-up helper shared by the binaries: reuse a persisted router when one
//! exists, otherwise build it from the graph input and persist it.

use std::path::PathBuf;

use tracing::info;

use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::graph::build_graph;
use crate::hook::HookRegistry;
use crate::input::GraphDocument;
use crate::router::Router;

/// Where to find (or create) the router state.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub state_path: PathBuf,
    /// JSON graph document, or a directory with `nodes.csv` and `edges.csv`.
    pub graph_path: Option<PathBuf>,
    /// Bounds for a freshly built router. Ignored when the state exists.
    pub bounds: Option<Bounds>,
}

impl BootstrapOptions {
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
            graph_path: None,
            bounds: None,
        }
    }

    pub fn with_graph(mut self, graph_path: impl Into<PathBuf>) -> Self {
        self.graph_path = Some(graph_path.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Load the router from `options.state_path`, building and saving it from
/// the graph input when the state file does not exist yet.
pub fn ensure_router(options: &BootstrapOptions, registry: &HookRegistry) -> Result<Router> {
    if options.state_path.is_file() {
        return Router::load(&options.state_path, registry);
    }

    let Some(graph_path) = options.graph_path.as_deref() else {
        return Err(Error::PathNotFound {
            path: options.state_path.clone(),
        });
    };

    info!(
        state = %options.state_path.display(),
        graph = %graph_path.display(),
        "no persisted router; building from graph input"
    );
    let document = GraphDocument::from_path(graph_path)?;
    let router = Router::new(build_graph(&document), options.bounds, None)?;
    router.save(&options.state_path)?;
    Ok(router)
}
