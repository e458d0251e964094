use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};
use crate::graph::{Coordinate, NodeId};

/// Latency marker for routes whose query time was not measured.
pub const UNMEASURED_TIME: f64 = -1.0;

/// Non-fatal anomaly raised while answering a query.
///
/// Diagnostics never abort a query; they travel with the returned [`Route`]
/// and surface as the `error` field of its document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum Diagnostic {
    /// A query endpoint fell outside the configured bounds.
    #[error("query is out of bounds")]
    OutOfBounds,

    /// The frontier emptied before the destination was settled.
    #[error(
        "no valid path found from node {source_node} to node {destination}; \
         destination appended to the end of the best partial path"
    )]
    UnreachableDestination {
        source_node: NodeId,
        destination: NodeId,
    },

    /// The predecessor walk needed more steps than there were recorded links.
    #[error("path reconstruction exceeded {links} recorded predecessor links")]
    ReconstructionFailure { links: usize },
}

/// A computed path between two resolved nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Coordinates in source-to-destination order.
    pub path: Vec<Coordinate>,
    /// Node ids, one per entry of `path`.
    pub nodes: Vec<NodeId>,
    /// Accumulated edge weight; infinite when the destination was unreachable.
    pub cost: f64,
    /// Query latency in milliseconds, or [`UNMEASURED_TIME`].
    pub time: f64,
    pub diagnostics: Vec<Diagnostic>,
    /// Caller-supplied extension fields merged into the document.
    pub extras: BTreeMap<String, String>,
}

impl Route {
    /// Create a route without diagnostics whose latency was not measured.
    pub fn new(path: Vec<Coordinate>, nodes: Vec<NodeId>, cost: f64) -> Self {
        Self {
            path,
            nodes,
            cost,
            time: UNMEASURED_TIME,
            diagnostics: Vec::new(),
            extras: BTreeMap::new(),
        }
    }

    /// Number of nodes along the route.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// `true` when no diagnostic was raised for this route.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// All diagnostic messages joined with `"; "`, if any.
    pub fn error(&self) -> Option<String> {
        if self.diagnostics.is_empty() {
            return None;
        }
        Some(
            self.diagnostics
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Attach an extension field to the route document.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Borrowed view implementing the JSON document contract.
    pub fn document(&self) -> RouteDocument<'_> {
        RouteDocument {
            path: self.path.iter().map(|point| point.to_pair()).collect(),
            nodes: &self.nodes,
            cost: self.cost,
            length: self.len(),
            time: self.time,
            error: self.error(),
            extras: &self.extras,
        }
    }

    /// Render the route document as a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.document()).map_err(Error::from)
    }
}

/// Serialised shape of a route: `path`, `nodes`, `cost`, `length`, `time`,
/// and diagnostic or extension fields at the top level.
///
/// A non-finite `cost` serialises as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDocument<'a> {
    pub path: Vec<[f64; 2]>,
    pub nodes: &'a [NodeId],
    pub cost: f64,
    pub length: usize,
    pub time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extras: &'a BTreeMap<String, String>,
}
