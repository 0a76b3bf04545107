// src/index/trie.rs
// =============================================================================
// The path trie: every distinct URL path prefix seen during a crawl becomes
// one node, so shared prefixes (scheme, host, parent directories) are stored
// exactly once.
//
// Layout:
// - nodes live in an arena (Vec<Node>) and are addressed by NodeId
// - a node's id is its arena index, handed out in creation order
// - the root is created by PathTrie::new and always has id 0
// - nodes are never removed, so ids stay valid for the trie's lifetime
//
// Only `add` creates nodes. `has` and `lookup` take &self and cannot.
// All walks are loops with explicit stacks, never recursion, so very deep
// directory hierarchies cannot overflow the call stack.
// =============================================================================

use std::collections::HashMap;

use super::{Edge, NodeId, ROOT_ID};

#[derive(Debug)]
struct Node {
    name: String,
    parent: NodeId,
    // Insertion order, which is the order flatten() emits children in
    children: Vec<NodeId>,
    by_name: HashMap<String, NodeId>,
}

#[derive(Debug)]
pub struct PathTrie {
    nodes: Vec<Node>,
}

impl Default for PathTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTrie {
    /// Creates a trie holding only the root node (id 0).
    pub fn new() -> Self {
        let mut trie = Self { nodes: Vec::new() };
        trie.create(ROOT_ID, String::new());
        trie
    }

    // Allocates the next node. The arena length doubles as the id counter.
    fn create(&mut self, parent: NodeId, name: String) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            name,
            parent,
            children: Vec::new(),
            by_name: HashMap::new(),
        });
        id
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts `path` below the root and returns the id of its last node.
    ///
    /// Segments that already exist are reused; an empty path adds nothing and
    /// returns the root.
    pub fn add<S: AsRef<str>>(&mut self, path: &[S]) -> NodeId {
        let mut current = ROOT_ID;
        for segment in path {
            let segment = segment.as_ref();
            current = match self.nodes[current].by_name.get(segment) {
                Some(&child) => child,
                None => {
                    let child = self.create(current, segment.to_string());
                    let node = &mut self.nodes[current];
                    node.children.push(child);
                    node.by_name.insert(segment.to_string(), child);
                    child
                }
            };
        }
        current
    }

    /// Returns the node `path` leads to, if every segment exists.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        let mut current = ROOT_ID;
        for segment in path {
            current = *self.nodes[current].by_name.get(segment.as_ref())?;
        }
        Some(current)
    }

    /// True when `path` was added before (the empty path always is).
    pub fn has<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.lookup(path).is_some()
    }

    /// Walks the tree depth first and yields one edge per non-root node.
    ///
    /// Each child's edge is immediately followed by the edges of its own
    /// subtree; siblings come in insertion order.
    pub fn flatten(&self) -> Flatten<'_> {
        let mut stack = self.nodes[ROOT_ID].children.clone();
        stack.reverse();
        Flatten { trie: self, stack }
    }
}

/// Iterator returned by [`PathTrie::flatten`].
pub struct Flatten<'a> {
    trie: &'a PathTrie,
    // Nodes still to emit, next one on top
    stack: Vec<NodeId>,
}

impl Iterator for Flatten<'_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        let id = self.stack.pop()?;
        let node = &self.trie.nodes[id];
        self.stack.extend(node.children.iter().rev());
        Some(Edge {
            child: id,
            parent: node.parent,
            name: node.name.clone(),
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why an arena (Vec<Node>) instead of nodes owning boxed children?
//    - Ids are just indices, so storing parent pointers needs no Rc/RefCell
//    - The whole tree is one allocation-friendly vector
//
// 2. Why `S: AsRef<str>`?
//    - Callers can pass &[&str], Vec<String> or Vec<&str> alike
// -----------------------------------------------------------------------------
