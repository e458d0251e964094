//! Modified A* search over the graph plus cached-route shortcuts.
//!
//! Each expansion offers the hook both the real outgoing edges of the current
//! node and one shortcut per cached route starting there. Shortcuts enter the
//! tentative cost with [`CACHED_SHORTCUT_WEIGHT`] and are replaced by the
//! cached route's nodes and true cost during reconstruction.
//!
//! [`CACHED_SHORTCUT_WEIGHT`]: crate::hook::CACHED_SHORTCUT_WEIGHT

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::cache::RouteCache;
use crate::error::Result;
use crate::frontier::Frontier;
use crate::graph::{Coordinate, Graph, NodeId};
use crate::hook::{Candidate, HookContext, Link, PruningHook};
use crate::route::Diagnostic;

/// Predecessor link recorded for a reached node.
pub type Predecessors = HashMap<NodeId, (NodeId, Link)>;

/// Path assembled by [`modified_a_star`] before latency and bounds are known.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub path: Vec<Coordinate>,
    pub nodes: Vec<NodeId>,
    pub cost: f64,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of nodes settled before the search stopped.
    pub settled: usize,
}

/// Read-only inputs of one search.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub graph: &'a Graph,
    pub cache: &'a RouteCache,
    pub hook: &'a dyn PruningHook,
}

/// Great-circle heuristic between two nodes.
pub fn heuristic(graph: &Graph, from: NodeId, to: NodeId) -> Result<f64> {
    let from = graph.coordinate(from)?;
    let to = graph.coordinate(to)?;
    Ok(from.haversine_km(&to))
}

/// Real neighbours of `node` followed by one cached shortcut per cached
/// destination.
pub fn expansion_candidates(graph: &Graph, cache: &RouteCache, node: NodeId) -> Vec<Candidate> {
    graph
        .neighbours(node)
        .iter()
        .map(|edge| Candidate::edge(edge.target, edge.weight))
        .chain(cache.lookup_shortcuts(node).map(|(target, _)| Candidate::cached(target)))
        .collect()
}

/// Run the search from `source` to `destination` and reconstruct the path.
///
/// An unreachable destination does not fail: the destination is linked to the
/// last settled node with an infinite-cost edge and an
/// [`UnreachableDestination`](Diagnostic::UnreachableDestination) diagnostic
/// is attached. Candidates naming nodes absent from the graph, which a hook
/// can invent, are skipped with a warning. Errors are only returned when the
/// source or destination itself is missing.
pub fn modified_a_star(
    context: SearchContext<'_>,
    source: NodeId,
    destination: NodeId,
) -> Result<SearchOutcome> {
    let SearchContext { graph, cache, hook } = context;

    let mut frontier = Frontier::new();
    let mut settled: HashSet<NodeId> = HashSet::new();
    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut predecessors: Predecessors = HashMap::new();
    let mut diagnostics = Vec::new();

    g_score.insert(source, 0.0);
    frontier.insert_or_improve(source, heuristic(graph, source, destination)?);

    let mut last_settled = source;
    let mut reached = false;

    while let Some(current) = frontier.extract_min() {
        settled.insert(current);
        last_settled = current;

        if current == destination {
            reached = true;
            break;
        }

        let current_score = g_score.get(&current).copied().unwrap_or(0.0);
        let candidates = expansion_candidates(graph, cache, current);
        let hook_context = HookContext {
            current,
            source,
            destination,
            graph,
            cache,
        };

        for candidate in hook.prune(candidates, &hook_context) {
            let next = candidate.node;
            if settled.contains(&next) {
                continue;
            }

            let tentative = current_score + candidate.link.search_weight();
            if tentative < g_score.get(&next).copied().unwrap_or(f64::INFINITY) {
                let remaining = match heuristic(graph, next, destination) {
                    Ok(remaining) => remaining,
                    Err(err) => {
                        warn!(
                            current,
                            candidate = next,
                            error = %err,
                            "skipping unknown candidate"
                        );
                        continue;
                    }
                };
                g_score.insert(next, tentative);
                predecessors.insert(next, (current, candidate.link));
                frontier.insert_or_improve(next, tentative + remaining);
            }
        }

        if settled.len() % 1000 == 0 {
            trace!(
                current,
                settled = settled.len(),
                open = frontier.len(),
                "search progress"
            );
        }
    }

    if !reached {
        predecessors.insert(destination, (last_settled, Link::Edge(f64::INFINITY)));
        let diagnostic = Diagnostic::UnreachableDestination {
            source_node: source,
            destination,
        };
        warn!(source, destination, last_settled, "{diagnostic}");
        diagnostics.push(diagnostic);
    }

    let reconstruction = reconstruct(graph, cache, &predecessors, source, destination)?;
    for diagnostic in reconstruction.diagnostics {
        if !diagnostics.contains(&diagnostic) {
            diagnostics.push(diagnostic);
        }
    }

    debug!(
        source,
        destination,
        settled = settled.len(),
        nodes = reconstruction.nodes.len(),
        cost = reconstruction.cost,
        "search finished"
    );

    Ok(SearchOutcome {
        path: reconstruction.path,
        nodes: reconstruction.nodes,
        cost: reconstruction.cost,
        diagnostics,
        settled: settled.len(),
    })
}

/// Path rebuilt from predecessor links, in source-to-destination order.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub path: Vec<Coordinate>,
    pub nodes: Vec<NodeId>,
    pub cost: f64,
    /// Failures of this walk plus those inherited from spliced segments.
    pub diagnostics: Vec<Diagnostic>,
}

/// Walk predecessor links from `destination` back to `source`.
///
/// Real links contribute their weight; cached links splice in the cached
/// route (minus its final node, already present), its recorded cost and any
/// unreachable or reconstruction diagnostics it was cached with.
/// Every link can be used at most once, so the walk is bounded by the number
/// of recorded links. Exceeding that bound, or meeting a node without a link,
/// stops the walk with a
/// [`ReconstructionFailure`](Diagnostic::ReconstructionFailure) and returns
/// the partial path assembled so far.
pub fn reconstruct(
    graph: &Graph,
    cache: &RouteCache,
    predecessors: &Predecessors,
    source: NodeId,
    destination: NodeId,
) -> Result<Reconstruction> {
    let max_steps = predecessors.len();

    let mut nodes = vec![destination];
    let mut path = vec![graph.coordinate(destination)?];
    let mut cost = 0.0;
    let mut diagnostics = Vec::new();
    let mut failed = false;

    let mut current = destination;
    let mut steps = 0;
    while current != source {
        let link = if steps < max_steps {
            predecessors.get(&current).copied()
        } else {
            None
        };
        let Some((previous, link)) = link else {
            failed = true;
            break;
        };

        match link {
            Link::Edge(weight) => {
                nodes.push(previous);
                path.push(graph.coordinate(previous)?);
                cost += weight;
            }
            Link::Cached => {
                let Some(segment) = cache.get(previous, current) else {
                    failed = true;
                    break;
                };
                debug!(
                    from = previous,
                    to = current,
                    cost = segment.cost,
                    "splicing cached route"
                );
                let head = segment.nodes.len().saturating_sub(1);
                nodes.extend(segment.nodes[..head].iter().rev());
                path.extend(segment.path[..head.min(segment.path.len())].iter().rev());
                cost += segment.cost;
                for inherited in segment.diagnostics.iter().filter(|d| is_path_defect(d)) {
                    if !diagnostics.contains(inherited) {
                        diagnostics.push(inherited.clone());
                    }
                }
            }
        }

        current = previous;
        steps += 1;
    }

    if failed {
        let diagnostic = Diagnostic::ReconstructionFailure { links: max_steps };
        warn!(source, destination, steps, "{diagnostic}");
        if !diagnostics.contains(&diagnostic) {
            diagnostics.push(diagnostic);
        }
    }

    nodes.reverse();
    path.reverse();

    Ok(Reconstruction {
        path,
        nodes,
        cost,
        diagnostics,
    })
}

/// Diagnostics describing the path itself rather than the query that found it.
fn is_path_defect(diagnostic: &Diagnostic) -> bool {
    matches!(
        diagnostic,
        Diagnostic::UnreachableDestination { .. } | Diagnostic::ReconstructionFailure { .. }
    )
}
