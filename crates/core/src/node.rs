//! Node types for the flow graph.

use serde::{Deserialize, Serialize};

/// Identifier of a node, unique within a graph.
pub type NodeId = String;

/// Opaque key/value payload carried by a node.
pub type Data = serde_json::Map<String, serde_json::Value>;

/// The reserved id of the sole entry point of every graph.
pub const ROOT_NODE_KEY: &str = "_root";

/// Component type code of a node.
///
/// The engine attaches no meaning to the code itself; a
/// [`NodeClassifier`](crate::NodeClassifier) maps codes to the traits
/// traversal needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeType(pub u16);

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for NodeType {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// One addressable unit of a flow: a screen, question, answer or content block.
///
/// Absent keys stay absent when serialized. In particular a node never
/// carries an empty `edges` list: the key is dropped instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Component type code.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    /// Component payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    /// Ordered child ids. Order is display and branch order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<NodeId>>,
}

impl Node {
    /// Create an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type code.
    #[must_use]
    pub fn with_type(mut self, node_type: impl Into<NodeType>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn with_data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the children. An empty list leaves the node without an `edges` key.
    #[must_use]
    pub fn with_edges<I, S>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        let edges: Vec<NodeId> = edges.into_iter().map(Into::into).collect();
        self.edges = if edges.is_empty() { None } else { Some(edges) };
        self
    }

    /// Ordered child ids, empty when the node has no `edges` key.
    #[must_use]
    pub fn edges(&self) -> &[NodeId] {
        self.edges.as_deref().unwrap_or_default()
    }

    /// Whether the node has at least one outgoing edge.
    #[must_use]
    pub fn has_edges(&self) -> bool {
        !self.edges().is_empty()
    }

    /// Whether the node edges directly to `child`.
    #[must_use]
    pub fn edges_to(&self, child: &str) -> bool {
        self.edges().iter().any(|edge| edge == child)
    }

    /// Look up a payload value.
    #[must_use]
    pub fn data_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.as_ref().and_then(|data| data.get(key))
    }
}
