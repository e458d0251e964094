//! Saferouting library entry points.
//!
//! This crate answers walking-route queries between two coordinates over a
//! street graph. Queries snap to the nearest nodes, run a modified A* that can
//! reuse previously cached routes as shortcuts, and consult a pruning hook at
//! every expansion so callers can avoid points of their choosing. The whole
//! engine (graph, bounds, cache and hook name) can be persisted and reloaded.
//! The CLI and HTTP service should only depend on the items exported here.
//!

#![deny(warnings)]

pub mod bootstrap;
pub mod bounds;
pub mod cache;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod hook;
pub mod input;
pub mod path;
pub mod persist;
pub mod route;
pub mod router;

pub use bootstrap::{ensure_router, BootstrapOptions};
pub use bounds::Bounds;
pub use cache::RouteCache;
pub use error::{Error, Result};
pub use frontier::Frontier;
pub use graph::{build_graph, Coordinate, Edge, Graph, Node, NodeId};
pub use hook::{
    from_fn, AvoidNodes, Candidate, FnHook, HookContext, HookFn, HookRegistry, IdentityHook,
    Link, NamedHook, PruningHook, CACHED_SHORTCUT_WEIGHT, IDENTITY_HOOK_NAME,
};
pub use input::{EdgeRecord, GraphDocument, NodeRecord};
pub use path::{modified_a_star, SearchContext, SearchOutcome};
pub use route::{Diagnostic, Route, RouteDocument, UNMEASURED_TIME};
pub use router::{Router, RouterConfig};
