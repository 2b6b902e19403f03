//! Arguments to the mutation operations.

use flowgraph_core::sanitize::sanitize_data;
use flowgraph_core::{Data, Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// Description of a node to create, with optional inline children.
///
/// ```
/// use flowgraph_editor::NodeSpec;
/// use serde_json::json;
///
/// let question = NodeSpec::new()
///     .with_id("q1")
///     .with_type(100)
///     .with_value("text", json!("Which fruit?"))
///     .with_child(NodeSpec::new().with_type(200).with_value("text", json!("Apple")));
/// assert_eq!(question.children.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Requested id; a fresh one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    #[serde(default, skip_serializing_if = "Data::is_empty")]
    pub data: Data,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, node_type: impl Into<NodeType>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// The childless node this spec creates, with sanitised data.
    pub(crate) fn to_node(&self) -> Node {
        let data = sanitize_data(self.data.clone());
        let mut node = Node::new();
        node.node_type = self.node_type;
        node.data = (!data.is_empty()).then_some(data);
        node
    }
}

/// Where `add`, `clone_node` and `move_node` attach a node.
///
/// Without a parent the node goes under `_root` (or, for a move, stays
/// under its current parent). Without `before` it is appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub parent: Option<NodeId>,
    pub before: Option<NodeId>,
}

impl Placement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn under(parent: impl Into<NodeId>) -> Self {
        Self {
            parent: Some(parent.into()),
            before: None,
        }
    }

    #[must_use]
    pub fn before(mut self, sibling: impl Into<NodeId>) -> Self {
        self.before = Some(sibling.into());
        self
    }
}

/// Options for `update`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Desired ordered children; only applied with `remove_key_if_missing`.
    pub children: Option<Vec<NodeSpec>>,
    /// Drop existing data keys that `new_data` does not mention, and
    /// reconcile edges against `children`.
    pub remove_key_if_missing: bool,
}

impl UpdateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace data and children wholesale.
    #[must_use]
    pub fn replace_children(children: Vec<NodeSpec>) -> Self {
        Self {
            children: Some(children),
            remove_key_if_missing: true,
        }
    }

    #[must_use]
    pub const fn remove_key_if_missing(mut self) -> Self {
        self.remove_key_if_missing = true;
        self
    }
}
