use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::input::GraphDocument;

/// Numeric identifier for a graph node.
pub type NodeId = i64;

/// Mean Earth radius in kilometres, used by the great-circle heuristic.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Planar coordinate of a node. `x` holds the longitude and `y` the latitude
/// when the graph comes from geographic data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to a raw `(x, y)` point.
    pub fn squared_distance(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }

    /// Great-circle distance in kilometres, reading `(x, y)` as
    /// `(longitude, latitude)` in degrees.
    pub fn haversine_km(&self, other: &Self) -> f64 {
        let lat1 = self.y.to_radians();
        let lat2 = other.y.to_radians();
        let half_dlat = (lat2 - lat1) / 2.0;
        let half_dlon = (other.x - self.x).to_radians() / 2.0;

        let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.clamp(0.0, 1.0).sqrt().asin()
    }

    /// `[x, y]` pair as used by the route document.
    pub fn to_pair(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Node within the routing graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Coordinate,
}

/// Outgoing edge within the routing graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub target: NodeId,
    pub weight: f64,
}

/// Immutable graph store: node coordinates plus directed weighted adjacency.
///
/// The adjacency is owned by each instance; two graphs never share edge lists.
/// Multiple edges between the same ordered pair are kept as separate entries.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    adjacency: HashMap<NodeId, Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    /// Assemble a graph from nodes and `(source, edge)` pairs.
    ///
    /// Duplicate node ids keep their first occurrence. Edges with an unknown
    /// endpoint or an invalid weight are dropped so every stored edge
    /// references a node with a coordinate.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = (NodeId, Edge)>,
    ) -> Self {
        let mut graph = Graph::default();

        for node in nodes {
            if graph.index.contains_key(&node.id) {
                warn!(node = node.id, "skipping duplicate node");
                continue;
            }
            graph.index.insert(node.id, graph.nodes.len());
            graph.nodes.push(node);
        }

        for (source, edge) in edges {
            if !graph.index.contains_key(&source) || !graph.index.contains_key(&edge.target) {
                warn!(
                    source,
                    target = edge.target,
                    "skipping edge referencing a node without coordinates"
                );
                continue;
            }
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                warn!(
                    source,
                    target = edge.target,
                    weight = edge.weight,
                    "skipping edge with invalid weight"
                );
                continue;
            }
            graph.adjacency.entry(source).or_default().push(edge);
            graph.edge_count += 1;
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edge_count,
            "assembled graph"
        );
        graph
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the node closest to `(x, y)` by squared Euclidean distance.
    ///
    /// Scans every node; ties resolve to the earliest inserted node. Returns
    /// `None` only for an empty graph.
    pub fn nearest_node(&self, x: f64, y: f64) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for node in &self.nodes {
            let distance = node.position.squared_distance(x, y);
            match best {
                Some((_, closest)) if closest <= distance => {}
                _ => best = Some((node.id, distance)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Coordinate of a node.
    pub fn coordinate(&self, id: NodeId) -> Result<Coordinate> {
        self.index
            .get(&id)
            .map(|&idx| self.nodes[idx].position)
            .ok_or(Error::NodeNotFound { id })
    }

    /// Outgoing edges of a node.
    ///
    /// Unknown ids and nodes without outgoing edges both yield an empty slice.
    pub fn neighbours(&self, id: NodeId) -> &[Edge] {
        self.adjacency
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Adjacency lists ordered by source id.
    pub(crate) fn sorted_adjacency(&self) -> Vec<(NodeId, &[Edge])> {
        let mut lists: Vec<(NodeId, &[Edge])> = self
            .adjacency
            .iter()
            .map(|(&source, edges)| (source, edges.as_slice()))
            .collect();
        lists.sort_by_key(|(source, _)| *source);
        lists
    }
}

/// Build a routing graph from an ingested graph document.
///
/// Nodes lacking a coordinate and edges lacking a weight are skipped with a
/// warning. Edges flagged `reversed` also produce the opposite directed edge
/// with the same weight.
pub fn build_graph(document: &GraphDocument) -> Graph {
    let nodes = document.nodes.iter().filter_map(|record| {
        match (record.x, record.y) {
            (Some(x), Some(y)) => Some(Node {
                id: record.id,
                position: Coordinate::new(x, y),
            }),
            (x, y) => {
                let missing = match (x, y) {
                    (None, None) => "x and y",
                    (None, _) => "x",
                    _ => "y",
                };
                warn!(node = record.id, missing, "skipping node due to missing coordinate");
                None
            }
        }
    });

    let mut edges = Vec::with_capacity(document.edges.len());
    for record in &document.edges {
        let Some(weight) = record.weight else {
            warn!(
                source = record.source,
                target = record.target,
                "skipping edge due to missing weight"
            );
            continue;
        };

        edges.push((
            record.source,
            Edge {
                target: record.target,
                weight,
            },
        ));
        if record.reversed.unwrap_or(false) {
            edges.push((
                record.target,
                Edge {
                    target: record.source,
                    weight,
                },
            ));
        }
    }

    Graph::from_parts(nodes, edges)
}
