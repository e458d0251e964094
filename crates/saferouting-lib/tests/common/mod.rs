//! Shared fixtures for the integration tests.

use std::path::PathBuf;

use saferouting_lib::{build_graph, Coordinate, Graph, GraphDocument, NodeId};

/// Path to the workspace fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Diamond graph 1→2→4 (cost 2) and 1→3→4 (cost 5), plus an isolated node 5.
pub fn diamond_graph() -> Graph {
    let document =
        GraphDocument::from_json_path(&fixtures_dir().join("diamond.json")).expect("fixture loads");
    build_graph(&document)
}

/// Coordinate of `id` in the diamond fixture.
#[allow(dead_code)]
pub fn position(graph: &Graph, id: NodeId) -> Coordinate {
    graph.coordinate(id).expect("fixture node present")
}

/// `true` when every consecutive pair of `nodes` is joined by a graph edge.
#[allow(dead_code)]
pub fn is_walkable(graph: &Graph, nodes: &[NodeId]) -> bool {
    nodes.windows(2).all(|pair| {
        graph
            .neighbours(pair[0])
            .iter()
            .any(|edge| edge.target == pair[1])
    })
}
