//! Disposable working copy of a graph.
//!
//! A mutation clones its input snapshot into a [`Draft`] (cheap, the node
//! map is structurally shared), edits it through the primitives below and
//! either commits it or drops it. Each primitive records its forward and
//! inverse patch as it edits, so the ops fall out of the edit itself and no
//! after-the-fact diff is needed.

use flowgraph_core::{Error, Graph, Node, NodeId, Result};
use serde_json::{Value, json};

use crate::ops::Op;
use crate::patch::{self, Patch};
use crate::path;

#[derive(Debug)]
pub(crate) struct Draft {
    graph: Graph,
    forward: Vec<Patch>,
    inverse: Vec<Patch>,
}

impl Draft {
    pub(crate) fn new(base: &Graph) -> Self {
        Self {
            graph: base.clone(),
            forward: Vec::new(),
            inverse: Vec::new(),
        }
    }

    pub(crate) const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Finish the edit: the new snapshot and the ops that produce it.
    pub(crate) fn commit(self) -> Result<(Graph, Vec<Op>)> {
        let ops = patch::translate(&self.forward, &self.inverse)?;
        Ok((self.graph, ops))
    }

    fn record(&mut self, forward: Patch, inverse: Patch) {
        self.forward.push(forward);
        self.inverse.push(inverse);
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node> {
        self.graph
            .get_mut(id)
            .ok_or_else(|| Error::id_not_found(id))
    }

    pub(crate) fn insert_node(&mut self, id: &str, node: Node) -> Result<()> {
        if self.graph.contains(id) {
            return Err(Error::id_exists(id));
        }
        let value = to_value(&node)?;
        self.graph.insert(id, node);
        self.record(Patch::add(path![id], value), Patch::remove(path![id]));
        Ok(())
    }

    /// Delete a node, leaving edges that point at it untouched.
    pub(crate) fn delete_node(&mut self, id: &str) -> Result<Node> {
        let node = self
            .graph
            .remove(id)
            .ok_or_else(|| Error::id_not_found(id))?;
        let value = to_value(&node)?;
        self.record(Patch::remove(path![id]), Patch::add(path![id], value));
        Ok(node)
    }

    /// Insert `child` into `parent`'s edges at `position`, or append when
    /// `position` is `None`. A parent without an `edges` key gains one.
    pub(crate) fn insert_edge(
        &mut self,
        parent: &str,
        position: Option<usize>,
        child: &str,
    ) -> Result<()> {
        let node = self.node_mut(parent)?;
        match node.edges.as_mut() {
            None => {
                node.edges = Some(vec![child.to_string()]);
                self.record(
                    Patch::add(path![parent, "edges"], json!([child])),
                    Patch::remove(path![parent, "edges"]),
                );
            }
            Some(edges) => {
                let index = position.unwrap_or(edges.len()).min(edges.len());
                edges.insert(index, child.to_string());
                self.record(
                    Patch::add(path![parent, "edges", index], json!(child)),
                    Patch::remove(path![parent, "edges", index]),
                );
            }
        }
        Ok(())
    }

    /// Remove the `parent -> child` edge, returning its former index, or
    /// `None` if there is no such edge. Removing the last edge drops the
    /// `edges` key.
    pub(crate) fn remove_edge(&mut self, parent: &str, child: &str) -> Result<Option<usize>> {
        let node = self.node_mut(parent)?;
        let Some(index) = node.edges().iter().position(|edge| edge == child) else {
            return Ok(None);
        };

        if node.edges().len() == 1 {
            node.edges = None;
            self.record(
                Patch::remove(path![parent, "edges"]),
                Patch::add(path![parent, "edges"], json!([child])),
            );
        } else {
            if let Some(edges) = node.edges.as_mut() {
                edges.remove(index);
            }
            self.record(
                Patch::remove(path![parent, "edges", index]),
                Patch::add(path![parent, "edges", index], json!(child)),
            );
        }
        Ok(Some(index))
    }

    /// Rewrite `parent`'s edges wholesale. An empty list drops the key.
    pub(crate) fn set_edges(&mut self, parent: &str, edges: Vec<NodeId>) -> Result<()> {
        let node = self.node_mut(parent)?;
        let old = node.edges.take();
        let new = if edges.is_empty() { None } else { Some(edges) };
        node.edges.clone_from(&new);

        match (old, new) {
            (None, None) => {}
            (None, Some(new)) => self.record(
                Patch::add(path![parent, "edges"], json!(new)),
                Patch::remove(path![parent, "edges"]),
            ),
            (Some(old), None) => self.record(
                Patch::remove(path![parent, "edges"]),
                Patch::add(path![parent, "edges"], json!(old)),
            ),
            (Some(old), Some(new)) if old != new => self.record(
                Patch::replace(path![parent, "edges"], json!(new)),
                Patch::replace(path![parent, "edges"], json!(old)),
            ),
            (Some(_), Some(_)) => {}
        }
        Ok(())
    }

    /// Set one payload value; a no-op when it already holds `value`.
    pub(crate) fn set_data_value(&mut self, id: &str, key: &str, value: Value) -> Result<()> {
        let node = self.node_mut(id)?;
        match node.data.as_mut() {
            None => {
                let mut data = flowgraph_core::Data::new();
                data.insert(key.to_string(), value.clone());
                node.data = Some(data);
                self.record(
                    Patch::add(path![id, "data"], json!({ key: value })),
                    Patch::remove(path![id, "data"]),
                );
            }
            Some(data) => match data.insert(key.to_string(), value.clone()) {
                None => self.record(
                    Patch::add(path![id, "data", key], value),
                    Patch::remove(path![id, "data", key]),
                ),
                Some(old) if old != value => self.record(
                    Patch::replace(path![id, "data", key], value),
                    Patch::replace(path![id, "data", key], old),
                ),
                Some(_) => {}
            },
        }
        Ok(())
    }

    /// Remove one payload value. Removing the last value drops the `data`
    /// key; removing an absent value is a no-op.
    pub(crate) fn remove_data_value(&mut self, id: &str, key: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        let Some(data) = node.data.as_mut() else {
            return Ok(());
        };
        let Some(old) = data.remove(key) else {
            return Ok(());
        };

        if data.is_empty() {
            node.data = None;
            self.record(
                Patch::remove(path![id, "data"]),
                Patch::add(path![id, "data"], json!({ key: old })),
            );
        } else {
            self.record(
                Patch::remove(path![id, "data", key]),
                Patch::add(path![id, "data", key], old),
            );
        }
        Ok(())
    }
}

fn to_value(node: &Node) -> Result<Value> {
    serde_json::to_value(node).map_err(|e| Error::malformed_patch(e.to_string()))
}
