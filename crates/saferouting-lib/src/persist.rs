//! Binary persistence of the full engine state.
//!
//! The graph, bounds, route cache and the pruning hook's name are written as
//! one blob so a restarted process can skip graph ingestion and keep the
//! cached routes it has accumulated.
//!
//! # Serialization Format
//!
//! ```text
//! Header (16 bytes):
//!   - Magic: b"SRTE" (4 bytes)
//!   - Version: u8 (1 byte)
//!   - Flags: u8 (1 byte) - bit 0: has bounds, bit 1: has named hook
//!   - Node count: u32 LE (4 bytes)
//!   - Cached route count: u32 LE (4 bytes)
//!   - Reserved: 2 bytes
//!
//! Body:
//!   - postcard-serialized state
//!   - zstd compressed
//!
//! Footer (32 bytes):
//!   - SHA-256 checksum of compressed body
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::bounds::Bounds;
use crate::cache::RouteCache;
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, Node, NodeId};

/// Magic bytes identifying a persisted engine state.
const STATE_MAGIC: &[u8; 4] = b"SRTE";

/// Current state format version.
const STATE_VERSION: u8 = 1;

const FLAG_HAS_BOUNDS: u8 = 0x01;
const FLAG_HAS_NAMED_HOOK: u8 = 0x02;

/// Header size in bytes.
const HEADER_SIZE: usize = 16;

/// Checksum size in bytes (SHA-256).
const CHECKSUM_SIZE: usize = 32;

/// zstd compression level (balanced speed/ratio).
const COMPRESSION_LEVEL: i32 = 3;

#[derive(Serialize)]
struct StateRef<'a> {
    nodes: &'a [Node],
    adjacency: Vec<(NodeId, &'a [Edge])>,
    bounds: Option<Bounds>,
    cache: &'a RouteCache,
    hook: Option<&'a str>,
}

#[derive(Deserialize)]
struct StateOwned {
    nodes: Vec<Node>,
    adjacency: Vec<(NodeId, Vec<Edge>)>,
    bounds: Option<Bounds>,
    cache: RouteCache,
    hook: Option<String>,
}

/// Engine state recovered from bytes.
#[derive(Debug, Clone)]
pub struct PersistedState {
    pub graph: Graph,
    pub bounds: Option<Bounds>,
    pub cache: RouteCache,
    /// Name of the pruning hook in use when the state was saved.
    pub hook: Option<String>,
}

/// Encode engine state into the versioned, checksummed format.
pub fn encode_state(
    graph: &Graph,
    bounds: Option<Bounds>,
    cache: &RouteCache,
    hook: Option<&str>,
) -> Result<Vec<u8>> {
    let state = StateRef {
        nodes: graph.nodes(),
        adjacency: graph.sorted_adjacency(),
        bounds,
        cache,
        hook,
    };

    let serialized = postcard::to_allocvec(&state).map_err(|e| Error::StateSerialize {
        message: format!("postcard serialization failed: {e}"),
    })?;

    let compressed = zstd::encode_all(serialized.as_slice(), COMPRESSION_LEVEL).map_err(|e| {
        Error::StateSerialize {
            message: format!("zstd compression failed: {e}"),
        }
    })?;

    let checksum = Sha256::digest(&compressed);

    let mut flags = 0;
    if bounds.is_some() {
        flags |= FLAG_HAS_BOUNDS;
    }
    if hook.is_some() {
        flags |= FLAG_HAS_NAMED_HOOK;
    }

    let mut bytes = Vec::with_capacity(HEADER_SIZE + compressed.len() + CHECKSUM_SIZE);
    bytes.extend_from_slice(STATE_MAGIC);
    bytes.push(STATE_VERSION);
    bytes.push(flags);
    bytes.extend_from_slice(&count_u32(graph.len()).to_le_bytes());
    bytes.extend_from_slice(&count_u32(cache.len()).to_le_bytes());
    bytes.extend_from_slice(&[0u8; 2]);
    bytes.extend_from_slice(&compressed);
    bytes.extend_from_slice(&checksum);

    debug!(
        nodes = graph.len(),
        cached_routes = cache.len(),
        compressed_size = compressed.len(),
        "encoded engine state"
    );
    Ok(bytes)
}

/// Decode bytes produced by [`encode_state`], validating header and checksum.
pub fn decode_state(bytes: &[u8]) -> Result<PersistedState> {
    if bytes.len() < HEADER_SIZE + CHECKSUM_SIZE {
        return Err(load_error(format!(
            "state is truncated ({} bytes)",
            bytes.len()
        )));
    }

    let (header, rest) = bytes.split_at(HEADER_SIZE);
    if &header[0..4] != STATE_MAGIC {
        return Err(load_error("invalid magic bytes"));
    }

    let version = header[4];
    if version != STATE_VERSION {
        return Err(load_error(format!(
            "unsupported version {version} (expected {STATE_VERSION})"
        )));
    }

    let flags = header[5];
    let node_count = read_u32(&header[6..10]);
    let route_count = read_u32(&header[10..14]);

    let (compressed, stored_checksum) = rest.split_at(rest.len() - CHECKSUM_SIZE);
    let computed_checksum = Sha256::digest(compressed);
    if computed_checksum.as_slice() != stored_checksum {
        return Err(load_error("checksum mismatch - state may be corrupted"));
    }

    let decompressed = zstd::decode_all(compressed)
        .map_err(|e| load_error(format!("zstd decompression failed: {e}")))?;

    let state: StateOwned = postcard::from_bytes(&decompressed)
        .map_err(|e| load_error(format!("postcard deserialization failed: {e}")))?;

    if state.nodes.len() != node_count as usize || state.cache.len() != route_count as usize {
        warn!(
            expected_nodes = node_count,
            actual_nodes = state.nodes.len(),
            expected_routes = route_count,
            actual_routes = state.cache.len(),
            "count mismatch in engine state header"
        );
    }
    if (flags & FLAG_HAS_BOUNDS != 0) != state.bounds.is_some()
        || (flags & FLAG_HAS_NAMED_HOOK != 0) != state.hook.is_some()
    {
        warn!(flags, "flag mismatch in engine state header");
    }

    let StateOwned {
        nodes,
        adjacency,
        bounds,
        cache,
        hook,
    } = state;
    let edges = adjacency
        .into_iter()
        .flat_map(|(source, edges)| edges.into_iter().map(move |edge| (source, edge)));

    Ok(PersistedState {
        graph: Graph::from_parts(nodes, edges),
        bounds,
        cache,
        hook,
    })
}

/// Atomically write `bytes` to `path`.
///
/// Data goes to a temporary file in the destination directory first and is
/// renamed into place; a failure removes the temporary file and leaves any
/// existing state untouched.
pub fn write_state_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;

    info!(path = %path.display(), size = bytes.len(), "engine state saved");
    Ok(())
}

/// Read a state file, mapping a missing file to [`Error::PathNotFound`].
pub fn read_state_file(path: &Path) -> Result<Vec<u8>> {
    debug!(path = %path.display(), "reading engine state");
    fs::read(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => Error::PathNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(err),
    })
}

fn load_error(message: impl Into<String>) -> Error {
    Error::StateLoad {
        message: message.into(),
    }
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}
