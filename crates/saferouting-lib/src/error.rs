use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the saferouting library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Only construction, lookup, and persistence failures surface here. Anomalies
/// raised while searching are recorded on the returned route as
/// [`Diagnostic`](crate::route::Diagnostic) values instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a router is built without a graph or a persisted state.
    #[error("invalid router configuration: {message}")]
    Configuration { message: String },

    /// Raised when a node identifier is not present in the graph.
    #[error("node {id} not found in graph")]
    NodeNotFound { id: NodeId },

    /// Raised when a referenced state or graph input file does not exist.
    #[error("file not found at {path}")]
    PathNotFound { path: PathBuf },

    /// Raised when a router would be built over a graph with no nodes.
    #[error("graph contains no nodes; nearest-node lookups are undefined")]
    EmptyGraph,

    /// Raised when a graph input document cannot be interpreted.
    #[error("invalid graph input: {message}")]
    GraphInput { message: String },

    /// Raised when encoding the router state fails.
    #[error("failed to serialize router state: {message}")]
    StateSerialize { message: String },

    /// Raised when decoding or validating a persisted router state fails.
    #[error("failed to load router state: {message}")]
    StateLoad { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
