//! # Flow graph
//!
//! Arena representation of a flow: a map from node id to [`Node`], with
//! edges stored as ordered id lists rather than references. The map is an
//! `im::OrdMap`, so cloning a snapshot is cheap and iteration order is
//! deterministic.

use im::{HashSet, OrdMap};
use serde::{Deserialize, Serialize};

use crate::cycle;
use crate::error::Error;
use crate::node::{Node, NodeId, ROOT_NODE_KEY};
use crate::result::Result;

/// A flow graph snapshot.
///
/// Invariants of a committed graph: it is acyclic, every id in an `edges`
/// list exists as a key, and `_root` is the sole entry point. A node with
/// more than one inbound edge is a *clone*.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
    nodes: OrdMap<NodeId, Node>,
}

impl Graph {
    /// Create a graph holding only an empty `_root`.
    ///
    /// `Graph::default()` is the empty map, which is not a valid flow.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowgraph_core::Graph;
    ///
    /// let graph = Graph::new();
    /// assert!(graph.has_root());
    /// assert_eq!(graph.len(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = OrdMap::new();
        nodes.insert(ROOT_NODE_KEY.to_string(), Node::new());
        Self { nodes }
    }

    /// Parse a graph from its JSON object form.
    ///
    /// # Errors
    ///
    /// Returns `JsonParseFailed` if the text is not a JSON object of nodes.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::from)
    }

    /// Serialize the graph to its JSON object form.
    ///
    /// # Errors
    ///
    /// Returns `JsonParseFailed` if a node's data cannot be represented as
    /// a JSON value.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a node; copies the node out of shared structure.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.get(ROOT_NODE_KEY)
    }

    #[must_use]
    pub fn has_root(&self) -> bool {
        self.contains(ROOT_NODE_KEY)
    }

    /// Insert or replace a node, returning the previous one.
    pub fn insert(&mut self, id: impl Into<NodeId>, node: Node) -> Option<Node> {
        self.nodes.insert(id.into(), node)
    }

    /// Remove a node without touching edges that point at it.
    pub fn remove(&mut self, id: &str) -> Option<Node> {
        self.nodes.remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in key order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// `(id, node)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Ordered child ids of `id`; empty when the node is missing or has none.
    #[must_use]
    pub fn edges_of(&self, id: &str) -> &[NodeId] {
        self.get(id).map(Node::edges).unwrap_or_default()
    }

    /// Ids of every node that edges to `id`, in key order.
    #[must_use]
    pub fn parents_of(&self, id: &str) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.edges_to(id))
            .map(|(parent, _)| parent.clone())
            .collect()
    }

    /// Number of edges pointing at `id`.
    #[must_use]
    pub fn inbound_count(&self, id: &str) -> usize {
        self.nodes.values().filter(|node| node.edges_to(id)).count()
    }

    /// A clone is a node reached by more than one edge.
    #[must_use]
    pub fn is_clone(&self, id: &str) -> bool {
        self.inbound_count(id) > 1
    }

    /// Node ids in depth-first pre-order from `_root`.
    ///
    /// A clone appears only at its first position. Unreachable nodes are
    /// not listed.
    #[must_use]
    pub fn depth_first_ids(&self) -> Vec<NodeId> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![ROOT_NODE_KEY];

        while let Some(id) = stack.pop() {
            if visited.contains(id) || !self.contains(id) {
                continue;
            }
            visited.insert(id);
            order.push(id.to_string());
            stack.extend(self.edges_of(id).iter().rev().map(String::as_str));
        }

        order
    }

    /// Sort `ids` by their depth-first position.
    ///
    /// Ids that are not reachable from `_root` keep their relative order and
    /// go last.
    #[must_use]
    pub fn sort_ids_depth_first<I>(&self, ids: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let positions: OrdMap<NodeId, usize> = self
            .depth_first_ids()
            .into_iter()
            .enumerate()
            .map(|(position, id)| (id, position))
            .collect();

        let mut sorted: Vec<NodeId> = ids.into_iter().collect();
        sorted.sort_by_key(|id| positions.get(id).copied().unwrap_or(usize::MAX));
        sorted
    }

    /// Check every committed-graph invariant.
    ///
    /// # Errors
    ///
    /// - `InvalidGraph` when `_root` is missing
    /// - `DanglingEdge` when an edge targets a missing node
    /// - `CycleDetected` when a node can reach itself
    pub fn validate(&self) -> Result<()> {
        if !self.has_root() {
            return Err(Error::invalid_graph("missing _root"));
        }

        if let Some((from, to)) = self.iter().find_map(|(from, node)| {
            node.edges()
                .iter()
                .find(|to| !self.contains(to))
                .map(|to| (from, to))
        }) {
            return Err(Error::dangling_edge(from.as_str(), to.as_str()));
        }

        cycle::ensure_acyclic(self)
    }
}

impl FromIterator<(NodeId, Node)> for Graph {
    fn from_iter<T: IntoIterator<Item = (NodeId, Node)>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
