//! Structural mutations over flow graphs.
//!
//! Every operation takes an immutable snapshot and returns either a
//! [`Mutation`] (the new snapshot plus the ops that produce it) or an error.
//! Edits happen on a disposable [`Draft`]; a rejected operation drops the
//! draft, so callers never observe a partial edit.

use flowgraph_core::cycle::ensure_acyclic;
use flowgraph_core::sanitize::{is_blank, sanitize_value};
use flowgraph_core::{
    ComponentCatalog, Data, Error, Graph, Node, NodeClassifier, NodeId, ROOT_NODE_KEY, Result,
    ResultExt,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::Draft;
use crate::ids::{IdSource, RandomIds};
use crate::ops::Op;
use crate::spec::{NodeSpec, Placement, UpdateOptions};

/// Outcome of an accepted mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    pub graph: Graph,
    pub ops: Vec<Op>,
}

impl Mutation {
    #[must_use]
    pub fn into_parts(self) -> (Graph, Vec<Op>) {
        (self.graph, self.ops)
    }
}

/// Applies structural edits to graph snapshots.
///
/// The classifier supplies the placement rules (root-only and clonable
/// types); the id source names nodes created without an explicit id.
#[derive(Debug, Clone, Default)]
pub struct MutationEngine<C = ComponentCatalog, I = RandomIds> {
    classifier: C,
    ids: I,
}

impl MutationEngine {
    /// Engine with an empty catalog and random ids.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: NodeClassifier, I: IdSource> MutationEngine<C, I> {
    pub const fn with_parts(classifier: C, ids: I) -> Self {
        Self { classifier, ids }
    }

    pub const fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Create a node (and its inline children) under `placement.parent`,
    /// defaulting to `_root`. A graph without `_root` gains one first.
    ///
    /// No cycle check is needed: a new node cannot be its own ancestor.
    ///
    /// # Errors
    ///
    /// - `IdExists` if the requested (or generated) id is taken
    /// - `ParentNotFound` if the parent is missing
    /// - `RootOnlyPlacement` if a root-only type is placed off `_root`
    /// - `BeforeNotFound` if `placement.before` is not a child of the parent
    pub fn add(&self, graph: &Graph, spec: &NodeSpec, placement: &Placement) -> Result<Mutation> {
        let parent = placement.parent.as_deref().unwrap_or(ROOT_NODE_KEY);
        run("add", graph, |draft| {
            if !draft.graph().has_root() {
                draft.insert_node(ROOT_NODE_KEY, Node::new())?;
            }
            self.add_in(draft, spec, parent, placement.before.as_deref())
                .map(|_| ())
        })
    }

    /// Give the existing node `id` another parent, `placement.parent`
    /// (default `_root`). Content is shared, not copied.
    ///
    /// # Errors
    ///
    /// - `IdNotFound`, `ParentNotFound` for missing nodes
    /// - `CloneToSameParent` if the parent already edges to `id`
    /// - `CloneForbidden` if the node's type is not clonable
    /// - `ToBeforeNotFound` if `placement.before` is not a child of the parent
    /// - `CycleDetected` if the new edge closes a cycle
    pub fn clone_node(&self, graph: &Graph, id: &str, placement: &Placement) -> Result<Mutation> {
        let to_parent = placement.parent.as_deref().unwrap_or(ROOT_NODE_KEY);
        run("clone", graph, |draft| {
            let node = draft.graph().get(id).ok_or_else(|| Error::id_not_found(id))?;
            let parent_node = draft
                .graph()
                .get(to_parent)
                .ok_or_else(|| Error::parent_not_found(to_parent))?;

            if parent_node.edges_to(id) {
                return Err(Error::clone_to_same_parent(id, to_parent));
            }
            if !self.classifier.is_clonable(node.node_type) {
                return Err(Error::clone_forbidden(id));
            }

            let position = to_before_position(draft.graph(), to_parent, placement.before.as_deref())?;
            draft.insert_edge(to_parent, position, id)?;
            ensure_acyclic(draft.graph())
        })
    }

    /// Move `id` from `parent` to `placement.parent`, or reorder it within
    /// `parent` when no target parent is given.
    ///
    /// # Errors
    ///
    /// - `IdNotFound`, `ParentNotFound` for missing nodes
    /// - `MoveToSameParent` if a different target parent already edges to `id`
    /// - `RootOnlyPlacement` if a root-only type is moved off `_root`
    /// - `NotConnected` if `parent` does not edge to `id`
    /// - `ToBeforeNotFound` if `placement.before` is not a child of the target
    /// - `CycleDetected` if the new edge closes a cycle
    pub fn move_node(
        &self,
        graph: &Graph,
        id: &str,
        parent: &str,
        placement: &Placement,
    ) -> Result<Mutation> {
        let to_parent = placement.parent.as_deref().unwrap_or(parent);
        run("move", graph, |draft| {
            let node = draft.graph().get(id).ok_or_else(|| Error::id_not_found(id))?;
            let node_type = node.node_type;
            if !draft.graph().contains(parent) {
                return Err(Error::parent_not_found(parent));
            }
            let target = draft
                .graph()
                .get(to_parent)
                .ok_or_else(|| Error::parent_not_found(to_parent))?;

            if parent != to_parent && target.edges_to(id) {
                return Err(Error::move_to_same_parent(id, to_parent));
            }
            if to_parent != ROOT_NODE_KEY && self.classifier.is_root_only(node_type) {
                return Err(Error::root_only_placement(id, to_parent));
            }

            if draft.remove_edge(parent, id)?.is_none() {
                return Err(Error::not_connected(id, parent));
            }
            let position = to_before_position(draft.graph(), to_parent, placement.before.as_deref())?;
            draft.insert_edge(to_parent, position, id)?;
            ensure_acyclic(draft.graph())
        })
    }

    /// Remove the `parent -> id` edge, deleting `id` once nothing refers
    /// to it. Deletion cascades to children left without parents; shared
    /// children survive.
    ///
    /// # Errors
    ///
    /// - `IdNotFound`, `ParentNotFound` for missing nodes
    /// - `NotFoundInParent` if `parent` does not edge to `id`
    pub fn remove(&self, graph: &Graph, id: &str, parent: &str) -> Result<Mutation> {
        run("remove", graph, |draft| {
            if !draft.graph().contains(id) {
                return Err(Error::id_not_found(id));
            }
            if !draft.graph().contains(parent) {
                return Err(Error::parent_not_found(parent));
            }
            if draft.remove_edge(parent, id)?.is_none() {
                return Err(Error::not_found_in_parent(id, parent));
            }
            collect_orphan(draft, id)
        })
    }

    /// Merge `new_data` into the node's data. Keys whose new value is
    /// blank (null, empty string, empty object) are removed.
    ///
    /// With `remove_key_if_missing`, keys absent from `new_data` are removed
    /// too, and when `children` is given the node's edges are reconciled
    /// against it: new children are created, dropped ones are removed
    /// (collecting orphans) and the edge order is rewritten. Existing
    /// children receive their own data update.
    ///
    /// # Errors
    ///
    /// - `IdNotFound` if the node is missing
    /// - any `add` error raised while creating a new child
    pub fn update(
        &self,
        graph: &Graph,
        id: &str,
        new_data: &Data,
        options: &UpdateOptions,
    ) -> Result<Mutation> {
        run("update", graph, |draft| {
            self.update_in(
                draft,
                id,
                new_data,
                options.children.as_deref(),
                options.remove_key_if_missing,
            )
        })
    }

    /// Give `parent` a private copy of the subtree at `id`.
    ///
    /// The top node is always copied under a fresh id and appended to
    /// `parent` (default `_root`). Below it, nodes owned by a single parent
    /// are copied too, while clones stay shared: the copy simply gains an
    /// edge to them.
    ///
    /// # Errors
    ///
    /// - `IdNotFound`, `ParentNotFound` for missing nodes
    /// - `IdExists` if a generated id is taken
    pub fn make_unique(&self, graph: &Graph, id: &str, parent: Option<&str>) -> Result<Mutation> {
        let parent = parent.unwrap_or(ROOT_NODE_KEY);
        run("make_unique", graph, |draft| {
            if !draft.graph().contains(id) {
                return Err(Error::id_not_found(id));
            }
            if !draft.graph().contains(parent) {
                return Err(Error::parent_not_found(parent));
            }
            let shared = self.duplicate(graph, draft, id, parent, true)?;
            if shared {
                ensure_acyclic(draft.graph())?;
            }
            Ok(())
        })
    }

    fn add_in(
        &self,
        draft: &mut Draft,
        spec: &NodeSpec,
        parent: &str,
        before: Option<&str>,
    ) -> Result<NodeId> {
        let id = spec.id.clone().unwrap_or_else(|| self.ids.next_id());
        if draft.graph().contains(&id) {
            return Err(Error::id_exists(id));
        }
        let parent_node = draft
            .graph()
            .get(parent)
            .ok_or_else(|| Error::parent_not_found(parent))?;
        if parent != ROOT_NODE_KEY && self.classifier.is_root_only(spec.node_type) {
            return Err(Error::root_only_placement(id, parent));
        }
        let position = match before {
            None => None,
            Some(before) => Some(
                parent_node
                    .edges()
                    .iter()
                    .position(|edge| edge == before)
                    .ok_or_else(|| Error::before_not_found(parent, before))?,
            ),
        };

        draft.insert_node(&id, spec.to_node())?;
        draft.insert_edge(parent, position, &id)?;
        for child in &spec.children {
            self.add_in(draft, child, &id, None)?;
        }
        Ok(id)
    }

    fn update_in(
        &self,
        draft: &mut Draft,
        id: &str,
        new_data: &Data,
        children: Option<&[NodeSpec]>,
        remove_key_if_missing: bool,
    ) -> Result<()> {
        let node = draft.graph().get(id).ok_or_else(|| Error::id_not_found(id))?;

        if remove_key_if_missing {
            let stale: Vec<String> = node
                .data
                .iter()
                .flat_map(|data| data.keys())
                .filter(|key| !new_data.contains_key(*key))
                .cloned()
                .collect();

            if let Some(children) = children {
                self.reconcile_children(draft, id, children)?;
            }
            for key in stale {
                draft.remove_data_value(id, &key)?;
            }
        }

        for (key, value) in new_data {
            let value = sanitize_value(value.clone());
            if is_blank(&value) {
                draft.remove_data_value(id, key)?;
            } else {
                draft.set_data_value(id, key, value)?;
            }
        }
        Ok(())
    }

    fn reconcile_children(&self, draft: &mut Draft, id: &str, children: &[NodeSpec]) -> Result<()> {
        let current = draft.graph().edges_of(id).to_vec();
        let wanted: Vec<NodeSpec> = children
            .iter()
            .map(|child| {
                let mut child = child.clone();
                child.id = Some(child.id.unwrap_or_else(|| self.ids.next_id()));
                child
            })
            .unique_by(|child| child.id.clone())
            .collect();
        let wanted_ids: Vec<NodeId> = wanted.iter().filter_map(|child| child.id.clone()).collect();

        for child in &wanted {
            if child.id.as_ref().is_some_and(|child_id| !current.contains(child_id)) {
                self.add_in(draft, child, id, None)?;
            }
        }
        for dropped in current.iter().filter(|edge| !wanted_ids.contains(edge)) {
            draft.remove_edge(id, dropped)?;
            collect_orphan(draft, dropped)?;
        }
        draft.set_edges(id, wanted_ids)?;

        for child in &wanted {
            let existing = child
                .id
                .as_deref()
                .filter(|child_id| current.iter().any(|edge| edge == child_id));
            if let Some(child_id) = existing {
                self.update_in(draft, child_id, &child.data, None, true)?;
            }
        }
        Ok(())
    }

    /// Copy `id` under `parent`; returns whether any shared node was
    /// attached along the way. Content and children are read from `base`
    /// so the copy never walks into nodes created by this same call.
    fn duplicate(
        &self,
        base: &Graph,
        draft: &mut Draft,
        id: &str,
        parent: &str,
        top: bool,
    ) -> Result<bool> {
        if !top && draft.graph().is_clone(id) {
            draft.insert_edge(parent, None, id)?;
            return Ok(true);
        }

        let original = base.get(id).ok_or_else(|| Error::id_not_found(id))?;
        let mut copy = Node::new();
        copy.node_type = original.node_type;
        copy.data.clone_from(&original.data);

        let new_id = self.ids.next_id();
        draft.insert_node(&new_id, copy)?;
        draft.insert_edge(parent, None, &new_id)?;

        let mut shared = false;
        for child in original.edges() {
            shared |= self.duplicate(base, draft, child, &new_id, false)?;
        }
        Ok(shared)
    }
}

/// Apply `edit` to a draft of `graph` and commit it, or discard the draft.
fn run<F>(operation: &str, graph: &Graph, edit: F) -> Result<Mutation>
where
    F: FnOnce(&mut Draft) -> Result<()>,
{
    let mut draft = Draft::new(graph);
    edit(&mut draft)
        .and_then(|()| draft.commit())
        .map(|(graph, ops)| {
            debug!(operation, ops = ops.len(), "mutation accepted");
            Mutation { graph, ops }
        })
        .log_rejection(operation)
}

fn to_before_position(graph: &Graph, parent: &str, before: Option<&str>) -> Result<Option<usize>> {
    before
        .map(|before| {
            graph
                .edges_of(parent)
                .iter()
                .position(|edge| edge == before)
                .ok_or_else(|| Error::to_before_not_found(parent, before))
        })
        .transpose()
}

/// Delete `id` if nothing edges to it any more, then do the same for each
/// of its children. `_root` is never collected.
fn collect_orphan(draft: &mut Draft, id: &str) -> Result<()> {
    if id == ROOT_NODE_KEY || !draft.graph().contains(id) || draft.graph().inbound_count(id) > 0 {
        return Ok(());
    }
    let node = draft.delete_node(id)?;
    for child in node.edges() {
        collect_orphan(draft, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::ids::SequentialIds;
    use crate::ops::apply_ops;
    use serde_json::json;

    fn engine() -> MutationEngine<ComponentCatalog, SequentialIds> {
        MutationEngine::with_parts(ComponentCatalog::new(), SequentialIds::new("n"))
    }

    #[test]
    fn test_add_to_empty_graph_creates_root() {
        let result = engine()
            .add(&Graph::default(), &NodeSpec::new().with_id("a"), &Placement::new())
            .unwrap();
        assert_eq!(result.graph.edges_of(ROOT_NODE_KEY), ["a".to_string()]);
        assert_eq!(apply_ops(&Graph::default(), &result.ops).unwrap(), result.graph);
    }

    #[test]
    fn test_add_generates_ids_for_children() {
        let spec = NodeSpec::new()
            .with_id("q")
            .with_child(NodeSpec::new())
            .with_child(NodeSpec::new());
        let result = engine().add(&Graph::new(), &spec, &Placement::new()).unwrap();
        assert_eq!(result.graph.edges_of("q"), ["n1".to_string(), "n2".to_string()]);
    }

    #[test]
    fn test_update_with_only_blank_values_has_no_ops() {
        let graph = Graph::from_json_str(r#"{"_root": {"edges": ["a"]}, "a": {}}"#).unwrap();
        let mut data = Data::new();
        data.insert("text".into(), json!("\u{200B}"));
        let result = engine()
            .update(&graph, "a", &data, &UpdateOptions::new())
            .unwrap();
        assert!(result.ops.is_empty());
        assert_eq!(result.graph, graph);
    }

    #[test]
    fn test_rejection_leaves_input_untouched() {
        let graph = Graph::from_json_str(r#"{"_root": {"edges": ["a"]}, "a": {}}"#).unwrap();
        let before = graph.clone();
        let err = engine()
            .move_node(&graph, "a", "_root", &Placement::new().before("zzz"))
            .unwrap_err();
        assert!(matches!(err, Error::ToBeforeNotFound { .. }));
        assert_eq!(graph, before);
    }
}
