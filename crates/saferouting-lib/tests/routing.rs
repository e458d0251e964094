mod common;

use std::sync::Arc;

use common::{diamond_graph, is_walkable, position};
use saferouting_lib::{
    from_fn, AvoidNodes, Bounds, Candidate, Coordinate, Diagnostic, HookContext, Router,
};

fn diamond_router() -> Router {
    Router::new(diamond_graph(), None, None).expect("router builds")
}

#[test]
fn diamond_prefers_cheaper_branch() {
    let mut router = diamond_router();
    let graph = router.graph().clone();

    let route = router
        .get_path(position(&graph, 1), position(&graph, 4))
        .expect("query succeeds");

    assert_eq!(route.nodes, vec![1, 2, 4]);
    assert_eq!(route.cost, 2.0);
    assert_eq!(route.path.len(), route.nodes.len());
    assert_eq!(route.path[1], position(&graph, 2));
    assert!(route.error().is_none());
}

#[test]
fn endpoints_snap_to_nearest_nodes() {
    let mut router = diamond_router();
    let route = router
        .get_path(Coordinate::new(-0.0003, 0.0002), Coordinate::new(0.0024, -0.0001))
        .expect("query succeeds");

    assert_eq!(route.source(), Some(1));
    assert_eq!(route.destination(), Some(4));
}

#[test]
fn repeated_query_reuses_cache_without_changing_route() {
    let mut router = diamond_router();
    let graph = router.graph().clone();
    let (from, to) = (position(&graph, 1), position(&graph, 4));

    let first = router.get_path(from, to).expect("first query");
    let second = router.get_path(from, to).expect("second query");

    assert_eq!(second.nodes, first.nodes);
    assert_eq!(second.path, first.path);
    assert_eq!(second.cost, first.cost);
    assert!(is_walkable(&graph, &second.nodes));
    assert_eq!(router.cache().len(), 1);
}

#[test]
fn cached_prefix_is_spliced_into_longer_route() {
    let mut router = diamond_router();
    let graph = router.graph().clone();

    router
        .get_path(position(&graph, 1), position(&graph, 2))
        .expect("prefix query");
    let route = router
        .get_path(position(&graph, 1), position(&graph, 4))
        .expect("full query");

    assert_eq!(route.nodes, vec![1, 2, 4]);
    assert_eq!(route.cost, 2.0);
    assert_eq!(route.len(), route.path.len());
    assert!(is_walkable(&graph, &route.nodes));
}

#[test]
fn hook_removing_node_two_forces_other_branch() {
    let hook = from_fn(|candidates: Vec<Candidate>, _context: &HookContext<'_>| {
        candidates
            .into_iter()
            .filter(|candidate| candidate.node != 2)
            .collect()
    });
    let mut router =
        Router::new(diamond_graph(), None, Some(Arc::new(hook))).expect("router builds");
    let graph = router.graph().clone();

    let route = router
        .get_path(position(&graph, 1), position(&graph, 4))
        .expect("query succeeds");

    assert_eq!(route.nodes, vec![1, 3, 4]);
    assert_eq!(route.cost, 5.0);
}

#[test]
fn avoiding_every_branch_leaves_destination_unreachable() {
    let mut router = Router::new(
        diamond_graph(),
        None,
        Some(Arc::new(AvoidNodes::new([2, 3]))),
    )
    .expect("router builds");
    let graph = router.graph().clone();

    let route = router
        .get_path(position(&graph, 1), position(&graph, 4))
        .expect("query succeeds");

    assert_eq!(route.nodes, vec![1, 4]);
    assert!(route.cost.is_infinite());
    assert!(route.error().is_some());
}

#[test]
fn unreachable_destination_is_a_diagnostic_not_an_error() {
    let mut router = diamond_router();
    let graph = router.graph().clone();

    let route = router
        .get_path(position(&graph, 1), position(&graph, 5))
        .expect("query still answers");

    assert_eq!(route.source(), Some(1));
    assert_eq!(route.destination(), Some(5));
    assert!(route.cost.is_infinite());
    assert!(matches!(
        route.diagnostics.as_slice(),
        [Diagnostic::UnreachableDestination {
            source_node: 1,
            destination: 5
        }]
    ));

    let document: serde_json::Value =
        serde_json::from_str(&route.to_json().expect("serialises")).expect("valid json");
    assert!(document["cost"].is_null());
    assert!(document["error"]
        .as_str()
        .expect("error field")
        .contains("no valid path found"));
}

#[test]
fn repeated_unreachable_query_keeps_its_error() {
    let mut router = diamond_router();
    let graph = router.graph().clone();
    let (from, to) = (position(&graph, 1), position(&graph, 5));

    let first = router.get_path(from, to).expect("first query");
    let second = router.get_path(from, to).expect("second query");

    assert_eq!(second.nodes, first.nodes);
    assert!(second.cost.is_infinite());
    assert_eq!(
        second.diagnostics,
        vec![Diagnostic::UnreachableDestination {
            source_node: 1,
            destination: 5,
        }]
    );
    assert_eq!(second.error(), first.error());
}

#[test]
fn avoided_node_is_not_reached_through_cached_route() {
    let mut router = diamond_router();
    let graph = router.graph().clone();
    let (from, to) = (position(&graph, 1), position(&graph, 4));

    let warm = router.get_path(from, to).expect("warm-up query");
    assert_eq!(warm.nodes, vec![1, 2, 4]);

    router.set_hook(Arc::new(AvoidNodes::new([2])));
    let route = router.get_path(from, to).expect("avoiding query");

    assert_eq!(route.nodes, vec![1, 3, 4]);
    assert_eq!(route.cost, 5.0);
    assert!(is_walkable(&graph, &route.nodes));
}

#[test]
fn out_of_bounds_query_is_flagged_but_answered() {
    let bounds: Bounds = "-0.0005,0.0015,0.0021,-0.0015".parse().expect("bounds parse");
    let mut router = Router::new(diamond_graph(), Some(bounds), None).expect("router builds");

    let route = router
        .get_path(Coordinate::new(0.0, 0.0), Coordinate::new(0.003, 0.0))
        .expect("query succeeds");

    assert_eq!(route.nodes, vec![1, 2, 4]);
    assert_eq!(route.cost, 2.0);
    assert_eq!(route.diagnostics, vec![Diagnostic::OutOfBounds]);
    assert_eq!(route.error().as_deref(), Some("query is out of bounds"));
}

#[test]
fn document_lengths_agree() {
    let mut router = diamond_router();
    let route = router
        .get_path(Coordinate::new(0.0, 0.0), Coordinate::new(0.002, 0.0))
        .expect("query succeeds");

    let document = route.document();
    assert_eq!(document.length, document.nodes.len());
    assert_eq!(document.length, document.path.len());
    assert!(document.time >= 0.0);
}
