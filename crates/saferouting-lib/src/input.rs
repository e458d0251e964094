//! Graph input documents produced by the map ingestion step.
//!
//! The ingestion pipeline (geocoding a region and downloading its walkable
//! street network) lives outside this crate. It hands over a node list and an
//! edge list, either as one JSON document or as two CSV files:
//!
//! ```text
//! nodes.csv: id,x,y
//! edges.csv: source,target,weight,reversed
//! ```
//!
//! Missing coordinates or weights are allowed here; [`build_graph`] decides
//! what to keep.
//!
//! [`build_graph`]: crate::graph::build_graph

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::NodeId;

/// Node entry of a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// Edge entry of a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub weight: Option<f64>,
    /// When `true` the edge is also walkable from `target` to `source`.
    #[serde(default)]
    pub reversed: Option<bool>,
}

/// Node and edge lists handed over by the ingestion step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    /// Load a graph document from a JSON file, or from a directory holding
    /// `nodes.csv` and `edges.csv`.
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::from_csv_paths(&path.join("nodes.csv"), &path.join("edges.csv"))
        } else {
            Self::from_json_path(path)
        }
    }

    /// Load a JSON graph document from disk.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = open_input(path)?;
        let document = Self::from_json_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "loaded graph document"
        );
        Ok(document)
    }

    /// Parse a JSON graph document from a reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a graph document from a node CSV and an edge CSV.
    pub fn from_csv_paths(nodes: &Path, edges: &Path) -> Result<Self> {
        let document = Self::from_csv_readers(open_input(nodes)?, open_input(edges)?)?;
        debug!(
            nodes_path = %nodes.display(),
            edges_path = %edges.display(),
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "loaded graph document from csv"
        );
        Ok(document)
    }

    /// Parse a graph document from CSV readers with `id,x,y` and
    /// `source,target,weight,reversed` headers.
    pub fn from_csv_readers<N: Read, E: Read>(nodes: N, edges: E) -> Result<Self> {
        let nodes = read_csv_records(nodes, "nodes")?;
        let edges = read_csv_records(edges, "edges")?;
        Ok(Self { nodes, edges })
    }
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => Error::PathNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(err),
    })
}

fn read_csv_records<T, R>(reader: R, what: &str) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for (row, record) in csv_reader.deserialize().enumerate() {
        let record = record.map_err(|err| Error::GraphInput {
            message: format!("{what} row {}: {err}", row + 1),
        })?;
        records.push(record);
    }
    Ok(records)
}
