use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::graph::NodeId;
use crate::route::Route;

/// Previously computed routes keyed by source node, then destination node.
///
/// Entries are only ever added or overwritten; the cache lives as long as
/// the router that owns it and is persisted with it. Ordered maps keep
/// shortcut enumeration deterministic across save/load cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteCache {
    routes: BTreeMap<NodeId, BTreeMap<NodeId, Route>>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `route` by its first and last node, replacing any earlier route
    /// for the same pair. Empty routes are ignored.
    pub fn record(&mut self, route: Route) {
        let (Some(source), Some(destination)) = (route.source(), route.destination()) else {
            return;
        };
        trace!(source, destination, cost = route.cost, "caching route");
        self.routes
            .entry(source)
            .or_default()
            .insert(destination, route);
    }

    /// Every cached destination reachable from `from`, in ascending id order.
    pub fn lookup_shortcuts(&self, from: NodeId) -> impl Iterator<Item = (NodeId, &Route)> + '_ {
        self.routes
            .get(&from)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(&target, route)| (target, route)))
    }

    /// Cached route for an exact pair.
    pub fn get(&self, from: NodeId, to: NodeId) -> Option<&Route> {
        self.routes.get(&from).and_then(|targets| targets.get(&to))
    }

    /// Total number of cached routes.
    pub fn len(&self) -> usize {
        self.routes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.values().all(BTreeMap::is_empty)
    }
}
