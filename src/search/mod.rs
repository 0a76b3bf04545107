// src/search/mod.rs
// =============================================================================
// Offline search over a saved index.
//
// How it works:
// 1. Rebuild a map id -> (parent id, segment name) from the edge list
// 2. For a query, look at every node's segment name (percent-decoded,
//    lower-cased) and keep it if it contains every search term
// 3. Rebuild the node's full URL by following parent pointers to the root
//
// There is no inverted index: each query scans every node once. Indexes are
// small (one entry per path segment) so a linear scan is fast enough.
//
// A broken index only spoils the entries that depend on it. Edges that cannot
// be part of a tree (the root as a child, a second parent) are logged and
// skipped while decoding; a parent id that does not exist or a parent chain
// that loops fails just the hits below it. Every other hit is still returned.
// =============================================================================

use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use thiserror::Error;
use tracing::error;

use crate::index::{Edge, NodeId, ROOT_ID};

/// A search entry whose URL could not be rebuilt.
///
/// `entry` and `name` identify the node the lookup was for, not the ancestor
/// where the walk broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedIndex {
    #[error("entry {entry} ({name:?}): ancestor {missing} is not in the index")]
    MissingNode {
        entry: NodeId,
        name: String,
        missing: NodeId,
    },
    #[error("entry {entry} ({name:?}): parent chain never reaches the root")]
    Cycle { entry: NodeId, name: String },
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Percent-decoded segment name, for display
    pub name: String,
    /// Full URL of the node
    pub url: String,
}

/// Everything needed to answer queries, decoded once from the edge list.
#[derive(Debug, Default)]
pub struct DecodedIndex {
    entries: HashMap<NodeId, (NodeId, String)>,
    // Edge order from the file, so results come out in a stable order
    order: Vec<NodeId>,
    rejected: usize,
}

impl DecodedIndex {
    /// Builds the id -> (parent, name) map.
    ///
    /// Edges that cannot belong to a tree are logged and skipped: the root
    /// listed as a child, or a second parent for a child already seen (the
    /// first one wins). Everything else stays searchable.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut index = Self::default();
        for edge in edges {
            if edge.child == ROOT_ID {
                error!(
                    child = edge.child,
                    parent = edge.parent,
                    name = %edge.name,
                    "skipping index edge: root listed as a child"
                );
                index.rejected += 1;
                continue;
            }
            if let Some((first_parent, _)) = index.entries.get(&edge.child) {
                error!(
                    child = edge.child,
                    parent = edge.parent,
                    name = %edge.name,
                    kept_parent = *first_parent,
                    "skipping index edge: node already has a parent"
                );
                index.rejected += 1;
                continue;
            }
            index.order.push(edge.child);
            index.entries.insert(edge.child, (edge.parent, edge.name));
        }
        index
    }

    /// Number of non-root nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of edges `from_edges` skipped.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Prefixes `suffix` with the names of `id` and all its ancestors.
    ///
    /// `compose_url(ROOT_ID, s)` is `s`; otherwise each ancestor contributes
    /// `name + "/"`, outermost first.
    pub fn compose_url(&self, id: NodeId, suffix: &str) -> Result<String, MalformedIndex> {
        self.walk(id, id, suffix)
    }

    /// Full URL of entry `id`: its parent's URL followed by its own name.
    pub fn entry_url(&self, id: NodeId) -> Result<String, MalformedIndex> {
        let (parent, name) = self.entries.get(&id).ok_or(MalformedIndex::MissingNode {
            entry: id,
            name: String::new(),
            missing: id,
        })?;
        self.walk(id, *parent, name)
    }

    // Walks parent pointers up from `start`; errors are reported against
    // `entry`, the node the caller asked about
    fn walk(&self, entry: NodeId, start: NodeId, suffix: &str) -> Result<String, MalformedIndex> {
        let entry_name = || {
            self.entries
                .get(&entry)
                .map(|(_, name)| name.clone())
                .unwrap_or_default()
        };

        let mut names = Vec::new();
        let mut current = start;
        while current != ROOT_ID {
            // A valid chain visits each entry at most once
            if names.len() > self.entries.len() {
                return Err(MalformedIndex::Cycle {
                    entry,
                    name: entry_name(),
                });
            }
            let Some((parent, name)) = self.entries.get(&current) else {
                return Err(MalformedIndex::MissingNode {
                    entry,
                    name: entry_name(),
                    missing: current,
                });
            };
            names.push(name.as_str());
            current = *parent;
        }

        names.reverse();
        names.push(suffix);
        Ok(names.join("/"))
    }

    /// Lazily yields every node whose decoded name contains all `terms`,
    /// ignoring case.
    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> Search<'_> {
        Search {
            index: self,
            terms: terms.iter().map(|t| t.as_ref().to_lowercase()).collect(),
            position: 0,
        }
    }
}

/// Iterator returned by [`DecodedIndex::search`].
pub struct Search<'a> {
    index: &'a DecodedIndex,
    terms: Vec<String>,
    position: usize,
}

impl Iterator for Search<'_> {
    type Item = Result<SearchHit, MalformedIndex>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&id) = self.index.order.get(self.position) {
            self.position += 1;
            let (_, name) = &self.index.entries[&id];
            let display = unescape(name);
            let lowered = display.to_lowercase();
            if self.terms.iter().all(|term| lowered.contains(term.as_str())) {
                return Some(self.index.entry_url(id).map(|url| SearchHit {
                    name: display,
                    url,
                }));
            }
        }
        None
    }
}

fn unescape(name: &str) -> String {
    percent_decode_str(name).decode_utf8_lossy().into_owned()
}
