//! Per-query neighbour pruning ("point avoidance").
//!
//! Every expansion step hands its candidate neighbours, real edges and cached
//! shortcuts alike, to a [`PruningHook`] which may drop or reorder them. The
//! default hook accepts everything.
//!
//! # Persistence
//!
//! Only hooks with a stable [`name`](PruningHook::name) survive a save/load
//! cycle: the name is stored and resolved again through a [`HookRegistry`].
//! Closures ([`FnHook`]) and hooks carrying their own state ([`AvoidNodes`])
//! are anonymous and revert to [`IdentityHook`] after loading. Register a
//! [`NamedHook`] wrapping a plain `fn` when the hook must be restorable.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::RouteCache;
use crate::graph::{Graph, NodeId};

/// Search-phase weight given to cached shortcuts.
///
/// Deliberately below any real edge so the search favours reusing cached
/// routes. The true cost of the cached segment is only added back during
/// reconstruction, so search-phase costs differ from the reported cost
/// whenever a shortcut is taken.
pub const CACHED_SHORTCUT_WEIGHT: f64 = -1.0;

/// Name under which [`IdentityHook`] is registered.
pub const IDENTITY_HOOK_NAME: &str = "identity";

/// How a candidate neighbour is reached from the node being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Link {
    /// A direct graph edge with its real weight.
    Edge(f64),
    /// A shortcut through a previously cached route.
    Cached,
}

impl Link {
    /// Weight added to the tentative cost during search.
    pub fn search_weight(self) -> f64 {
        match self {
            Link::Edge(weight) => weight,
            Link::Cached => CACHED_SHORTCUT_WEIGHT,
        }
    }

    pub fn is_cached(self) -> bool {
        matches!(self, Link::Cached)
    }
}

/// A neighbour offered to the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub node: NodeId,
    pub link: Link,
}

impl Candidate {
    pub fn edge(node: NodeId, weight: f64) -> Self {
        Self {
            node,
            link: Link::Edge(weight),
        }
    }

    pub fn cached(node: NodeId) -> Self {
        Self {
            node,
            link: Link::Cached,
        }
    }
}

/// Query state visible to a hook.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Node currently being expanded.
    pub current: NodeId,
    pub source: NodeId,
    pub destination: NodeId,
    pub graph: &'a Graph,
    /// Routes behind [`Link::Cached`] candidates, keyed from `current`.
    pub cache: &'a RouteCache,
}

/// Filter over the candidate neighbours of one expansion step.
pub trait PruningHook: Send + Sync {
    /// Return the accepted subset of `candidates`, in the order they should be
    /// relaxed.
    fn prune(&self, candidates: Vec<Candidate>, context: &HookContext<'_>) -> Vec<Candidate>;

    /// Stable name used to restore the hook after loading. Anonymous hooks
    /// return `None`.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Signature of a stateless hook function.
pub type HookFn = fn(Vec<Candidate>, &HookContext<'_>) -> Vec<Candidate>;

/// Accepts every candidate unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHook;

impl PruningHook for IdentityHook {
    fn prune(&self, candidates: Vec<Candidate>, _context: &HookContext<'_>) -> Vec<Candidate> {
        candidates
    }

    fn name(&self) -> Option<&str> {
        Some(IDENTITY_HOOK_NAME)
    }
}

/// A plain function paired with a stable name, restorable after loading.
#[derive(Clone, Copy)]
pub struct NamedHook {
    name: &'static str,
    func: HookFn,
}

impl NamedHook {
    pub const fn new(name: &'static str, func: HookFn) -> Self {
        Self { name, func }
    }
}

impl PruningHook for NamedHook {
    fn prune(&self, candidates: Vec<Candidate>, context: &HookContext<'_>) -> Vec<Candidate> {
        (self.func)(candidates, context)
    }

    fn name(&self) -> Option<&str> {
        Some(self.name)
    }
}

impl fmt::Debug for NamedHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedHook").field("name", &self.name).finish()
    }
}

/// Anonymous hook wrapping a closure. Reverts to identity after loading.
pub struct FnHook<F>(F);

/// Wrap a closure as an anonymous pruning hook.
pub fn from_fn<F>(func: F) -> FnHook<F>
where
    F: Fn(Vec<Candidate>, &HookContext<'_>) -> Vec<Candidate> + Send + Sync,
{
    FnHook(func)
}

impl<F> PruningHook for FnHook<F>
where
    F: Fn(Vec<Candidate>, &HookContext<'_>) -> Vec<Candidate> + Send + Sync,
{
    fn prune(&self, candidates: Vec<Candidate>, context: &HookContext<'_>) -> Vec<Candidate> {
        (self.0)(candidates, context)
    }
}

impl<F> fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHook")
    }
}

/// Drops a fixed set of nodes from every candidate list.
///
/// Cached shortcuts are dropped when any node of the cached route is avoided,
/// or when the route is no longer in the cache. The source and destination
/// are never treated as avoided so a query can still start and finish on one.
/// Anonymous: the avoided set is not persisted.
#[derive(Debug, Clone, Default)]
pub struct AvoidNodes {
    avoided: HashSet<NodeId>,
}

impl AvoidNodes {
    pub fn new(avoided: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            avoided: avoided.into_iter().collect(),
        }
    }

    pub fn avoided(&self) -> &HashSet<NodeId> {
        &self.avoided
    }

    fn blocks(&self, node: NodeId, context: &HookContext<'_>) -> bool {
        node != context.source && node != context.destination && self.avoided.contains(&node)
    }
}

impl PruningHook for AvoidNodes {
    fn prune(&self, mut candidates: Vec<Candidate>, context: &HookContext<'_>) -> Vec<Candidate> {
        candidates.retain(|candidate| {
            if self.blocks(candidate.node, context) {
                return false;
            }
            match candidate.link {
                Link::Edge(_) => true,
                Link::Cached => context
                    .cache
                    .get(context.current, candidate.node)
                    .is_some_and(|segment| {
                        !segment.nodes.iter().any(|&node| self.blocks(node, context))
                    }),
            }
        });
        candidates
    }
}

/// Named hooks that can be restored from a persisted router.
#[derive(Clone)]
pub struct HookRegistry {
    hooks: BTreeMap<&'static str, Arc<dyn PruningHook>>,
}

impl HookRegistry {
    /// Registry with no entries; names resolve to identity.
    pub fn empty() -> Self {
        Self {
            hooks: BTreeMap::new(),
        }
    }

    /// Registry containing the identity hook.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry
            .hooks
            .insert(IDENTITY_HOOK_NAME, Arc::new(IdentityHook));
        registry
    }

    /// Register a named hook, replacing any previous hook with that name.
    pub fn register(&mut self, hook: NamedHook) -> &mut Self {
        self.hooks.insert(hook.name, Arc::new(hook));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PruningHook>> {
        self.hooks.get(name).cloned()
    }

    /// Resolve a persisted hook name. A missing or unknown name yields the
    /// identity hook.
    pub fn resolve(&self, name: Option<&str>) -> Arc<dyn PruningHook> {
        let Some(name) = name else {
            return Arc::new(IdentityHook);
        };
        match self.get(name) {
            Some(hook) => hook,
            None if name == IDENTITY_HOOK_NAME => Arc::new(IdentityHook),
            None => {
                warn!(hook = name, "pruning hook not registered; falling back to identity");
                Arc::new(IdentityHook)
            }
        }
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.hooks.keys().copied()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Coordinate, Node};
    use crate::route::Route;

    fn context<'a>(graph: &'a Graph, cache: &'a RouteCache) -> HookContext<'a> {
        HookContext {
            current: 1,
            source: 1,
            destination: 4,
            graph,
            cache,
        }
    }

    fn cached_route(nodes: &[NodeId]) -> Route {
        let path = nodes
            .iter()
            .map(|&id| Coordinate::new(id as f64, 0.0))
            .collect();
        Route::new(path, nodes.to_vec(), nodes.len() as f64)
    }

    fn tiny_graph() -> Graph {
        Graph::from_parts(
            (1..=4).map(|id| Node {
                id,
                position: Coordinate::new(id as f64, 0.0),
            }),
            Vec::new(),
        )
    }

    fn drop_odd(candidates: Vec<Candidate>, _context: &HookContext<'_>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|candidate| candidate.node % 2 == 0)
            .collect()
    }

    #[test]
    fn cached_links_use_sentinel_weight() {
        assert_eq!(Link::Cached.search_weight(), CACHED_SHORTCUT_WEIGHT);
        assert_eq!(Link::Edge(2.5).search_weight(), 2.5);
        assert!(Link::Cached.is_cached());
    }

    #[test]
    fn identity_keeps_everything() {
        let graph = tiny_graph();
        let cache = RouteCache::new();
        let candidates = vec![Candidate::edge(2, 1.0), Candidate::cached(4)];
        let kept = IdentityHook.prune(candidates.clone(), &context(&graph, &cache));
        assert_eq!(kept, candidates);
        assert_eq!(IdentityHook.name(), Some(IDENTITY_HOOK_NAME));
    }

    #[test]
    fn avoid_nodes_spares_endpoints() {
        let graph = tiny_graph();
        let mut cache = RouteCache::new();
        cache.record(cached_route(&[1, 4]));
        let hook = AvoidNodes::new([2, 3, 4]);
        let kept = hook.prune(
            vec![
                Candidate::edge(2, 1.0),
                Candidate::edge(3, 4.0),
                Candidate::cached(4),
            ],
            &context(&graph, &cache),
        );
        assert_eq!(kept, vec![Candidate::cached(4)]);
        assert!(hook.name().is_none());
    }

    #[test]
    fn avoid_nodes_checks_cached_routes() {
        let graph = tiny_graph();
        let mut cache = RouteCache::new();
        cache.record(cached_route(&[1, 2, 4]));
        cache.record(cached_route(&[1, 3]));

        let kept = AvoidNodes::new([2]).prune(
            vec![
                Candidate::cached(3),
                Candidate::cached(4),
                Candidate::cached(2),
            ],
            &context(&graph, &cache),
        );
        assert_eq!(kept, vec![Candidate::cached(3)]);

        // Shortcuts whose route has left the cache are dropped too.
        let kept = AvoidNodes::new([2]).prune(
            vec![Candidate::cached(3)],
            &context(&graph, &RouteCache::new()),
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn closures_are_anonymous() {
        let graph = tiny_graph();
        let cache = RouteCache::new();
        let hook = from_fn(|mut candidates, _context| {
            candidates.reverse();
            candidates
        });
        let kept = hook.prune(
            vec![Candidate::edge(2, 1.0), Candidate::edge(3, 1.0)],
            &context(&graph, &cache),
        );
        assert_eq!(kept[0].node, 3);
        assert!(hook.name().is_none());
    }

    #[test]
    fn registry_resolves_named_hooks() {
        let graph = tiny_graph();
        let cache = RouteCache::new();
        let mut registry = HookRegistry::with_defaults();
        registry.register(NamedHook::new("even-only", drop_odd));

        let hook = registry.resolve(Some("even-only"));
        assert_eq!(hook.name(), Some("even-only"));
        let kept = hook.prune(
            vec![Candidate::edge(2, 1.0), Candidate::edge(3, 1.0)],
            &context(&graph, &cache),
        );
        assert_eq!(kept, vec![Candidate::edge(2, 1.0)]);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["even-only", "identity"]);
    }

    #[test]
    fn registry_falls_back_to_identity() {
        let registry = HookRegistry::empty();
        assert_eq!(registry.resolve(None).name(), Some(IDENTITY_HOOK_NAME));
        assert_eq!(
            registry.resolve(Some("unknown")).name(),
            Some(IDENTITY_HOOK_NAME)
        );
        assert_eq!(
            registry.resolve(Some(IDENTITY_HOOK_NAME)).name(),
            Some(IDENTITY_HOOK_NAME)
        );
    }
}
