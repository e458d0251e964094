use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::bounds::Bounds;
use crate::cache::RouteCache;
use crate::error::{Error, Result};
use crate::graph::{Coordinate, Graph};
use crate::hook::{HookRegistry, IdentityHook, PruningHook};
use crate::path::{modified_a_star, SearchContext};
use crate::persist::{decode_state, encode_state, read_state_file, write_state_file};
use crate::route::{Diagnostic, Route};

/// Inputs for [`Router::from_config`].
///
/// When both a graph and a state path are supplied the persisted state wins.
#[derive(Default)]
pub struct RouterConfig {
    pub graph: Option<Graph>,
    pub state_path: Option<PathBuf>,
    pub bounds: Option<Bounds>,
    pub hook: Option<Arc<dyn PruningHook>>,
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("graph_nodes", &self.graph.as_ref().map(Graph::len))
            .field("state_path", &self.state_path)
            .field("bounds", &self.bounds)
            .field("hook", &self.hook.as_ref().map(|hook| hook.name()))
            .finish()
    }
}

/// The routing engine: a graph, optional query bounds, the route cache and
/// the active pruning hook.
///
/// Queries mutate the cache, so a shared router must be wrapped in a lock by
/// the caller.
pub struct Router {
    graph: Graph,
    bounds: Option<Bounds>,
    cache: RouteCache,
    hook: Arc<dyn PruningHook>,
}

impl Router {
    /// Build a router with an empty cache. `hook` defaults to
    /// [`IdentityHook`].
    pub fn new(
        graph: Graph,
        bounds: Option<Bounds>,
        hook: Option<Arc<dyn PruningHook>>,
    ) -> Result<Self> {
        if graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        info!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            bounded = bounds.is_some(),
            "router initialised"
        );
        Ok(Self {
            graph,
            bounds,
            cache: RouteCache::new(),
            hook: hook.unwrap_or_else(|| Arc::new(IdentityHook)),
        })
    }

    /// Build a router from a persisted state or a graph.
    ///
    /// A state path takes precedence over a supplied graph; bounds and hook in
    /// the config then override the persisted ones only when given.
    pub fn from_config(config: RouterConfig, registry: &HookRegistry) -> Result<Self> {
        let RouterConfig {
            graph,
            state_path,
            bounds,
            hook,
        } = config;

        if let Some(path) = state_path {
            if graph.is_some() {
                debug!(path = %path.display(), "state path supplied; ignoring graph");
            }
            let mut router = Self::load(&path, registry)?;
            if bounds.is_some() {
                router.bounds = bounds;
            }
            if let Some(hook) = hook {
                router.hook = hook;
            }
            return Ok(router);
        }

        match graph {
            Some(graph) => Self::new(graph, bounds, hook),
            None => Err(Error::Configuration {
                message: "either a graph or a state path must be provided".to_string(),
            }),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    /// Name of the active hook, `None` for anonymous hooks.
    pub fn hook_name(&self) -> Option<&str> {
        self.hook.name()
    }

    /// Replace the pruning hook used by subsequent queries.
    pub fn set_hook(&mut self, hook: Arc<dyn PruningHook>) {
        self.hook = hook;
    }

    /// `true` when `point` is inside the bounds, or no bounds are configured.
    pub fn in_bounds(&self, point: Coordinate) -> bool {
        self.bounds
            .is_none_or(|bounds| bounds.contains_coordinate(point))
    }

    /// Answer a query between two coordinates.
    ///
    /// Both points snap to their nearest node. The computed route is always
    /// cached, diagnostics included, and returned with its latency in
    /// milliseconds.
    pub fn get_path(&mut self, source: Coordinate, destination: Coordinate) -> Result<Route> {
        let mut diagnostics = Vec::new();
        if !self.in_bounds(source) || !self.in_bounds(destination) {
            warn!(
                x0 = source.x,
                y0 = source.y,
                x1 = destination.x,
                y1 = destination.y,
                "query outside configured bounds"
            );
            diagnostics.push(Diagnostic::OutOfBounds);
        }

        let started = Instant::now();
        let source_id = self
            .graph
            .nearest_node(source.x, source.y)
            .ok_or(Error::EmptyGraph)?;
        let destination_id = self
            .graph
            .nearest_node(destination.x, destination.y)
            .ok_or(Error::EmptyGraph)?;

        let outcome = modified_a_star(
            SearchContext {
                graph: &self.graph,
                cache: &self.cache,
                hook: self.hook.as_ref(),
            },
            source_id,
            destination_id,
        )?;
        diagnostics.extend(outcome.diagnostics);

        let route = Route {
            path: outcome.path,
            nodes: outcome.nodes,
            cost: outcome.cost,
            time: started.elapsed().as_secs_f64() * 1000.0,
            diagnostics,
            extras: BTreeMap::new(),
        };

        info!(
            source = source_id,
            destination = destination_id,
            nodes = route.len(),
            cost = route.cost,
            time_ms = route.time,
            settled = outcome.settled,
            clean = route.is_clean(),
            "route computed"
        );

        self.cache.record(route.clone());
        Ok(route)
    }

    /// Encode the router state. Anonymous hooks are not persisted and load
    /// back as identity.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let hook = self.hook.name();
        if hook.is_none() {
            warn!("active pruning hook is anonymous; it will load back as identity");
        }
        encode_state(&self.graph, self.bounds, &self.cache, hook)
    }

    /// Decode a router from [`Router::to_bytes`] output, resolving the stored
    /// hook name through `registry`.
    pub fn from_bytes(bytes: &[u8], registry: &HookRegistry) -> Result<Self> {
        let state = decode_state(bytes)?;
        if state.graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        Ok(Self {
            hook: registry.resolve(state.hook.as_deref()),
            graph: state.graph,
            bounds: state.bounds,
            cache: state.cache,
        })
    }

    /// Persist the router to `path`, replacing any existing file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        write_state_file(path, &bytes)
    }

    /// Load a router previously written by [`Router::save`].
    pub fn load(path: &Path, registry: &HookRegistry) -> Result<Self> {
        let bytes = read_state_file(path)?;
        let router = Self::from_bytes(&bytes, registry)?;
        info!(
            path = %path.display(),
            nodes = router.graph.len(),
            cached_routes = router.cache.len(),
            hook = router.hook_name().unwrap_or("anonymous"),
            "router state loaded"
        );
        Ok(router)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("nodes", &self.graph.len())
            .field("edges", &self.graph.edge_count())
            .field("bounds", &self.bounds)
            .field("cached_routes", &self.cache.len())
            .field("hook", &self.hook.name())
            .finish()
    }
}
