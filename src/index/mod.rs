// src/index/mod.rs
// =============================================================================
// This module holds the compact path index.
//
// Submodules:
// - trie: the in-memory tree built while crawling
// - store: reading and writing the flattened edges as JSON
//
// The persisted form is just a list of edges (child id, parent id, segment
// name). Since every node except the root has exactly one parent, the edge
// list is enough to rebuild the whole tree, and every full URL.
// =============================================================================

mod store;
mod trie;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use store::{read_index, write_index};
pub use trie::PathTrie;

/// Node identifier. Assigned in creation order, root first.
pub type NodeId = usize;

/// Id of the root node of every trie.
pub const ROOT_ID: NodeId = 0;

/// One parent pointer: `child` hangs below `parent` under segment `name`.
///
/// Stored on disk as a compact `[child, parent, "name"]` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(NodeId, NodeId, String)",
    into = "(NodeId, NodeId, String)"
)]
pub struct Edge {
    pub child: NodeId,
    pub parent: NodeId,
    /// Percent-encoded path segment
    pub name: String,
}

impl From<(NodeId, NodeId, String)> for Edge {
    fn from((child, parent, name): (NodeId, NodeId, String)) -> Self {
        Self {
            child,
            parent,
            name,
        }
    }
}

impl From<Edge> for (NodeId, NodeId, String) {
    fn from(edge: Edge) -> Self {
        (edge.child, edge.parent, edge.name)
    }
}

/// Failures while loading or saving an index file.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error on index file: {0}")]
    Io(#[from] std::io::Error),
    #[error("index file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Splits a normalized URL into trie segments.
///
/// One trailing '/' is dropped first, so a directory and its listing page
/// share a node: `http://x/sub/` -> `["http:", "", "x", "sub"]`.
pub fn split_path(url: &str) -> Vec<&str> {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    trimmed.split('/').collect()
}
