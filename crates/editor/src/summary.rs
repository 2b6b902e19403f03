//! Human-readable change summaries for op lists.

use flowgraph_core::{Graph, Node, NodeClassifier, NodeType, ROOT_NODE_KEY};
use serde_json::Value;

use crate::ops::{Op, PathSegment, is_edge_index};

/// Properties whose values are short enough to quote in full.
const QUOTED_PROPS: [&str; 4] = ["title", "text", "fn", "val"];

/// Data keys tried, in order, when labelling a whole node.
const LABEL_KEYS: [&str; 6] = ["title", "text", "content", "fn", "val", "flowId"];

/// Describe each op as a sentence for a change log.
///
/// `graph` is the snapshot the ops were applied to; it names the nodes
/// being edited. An edge detached from one parent and attached (to the same
/// or another parent) by the next op reads as a single move. Edge splices
/// for nodes created or deleted in the same list are covered by that node's
/// own line.
///
/// ```
/// use flowgraph_core::{ComponentCatalog, ComponentKind, Graph, NodeType};
/// use flowgraph_editor::{summarize_ops, Op, path};
/// use serde_json::json;
///
/// let catalog = ComponentCatalog::new()
///     .with(ComponentKind::new(NodeType(100)).named("Question"));
/// let ops = vec![Op::ObjectInsert {
///     path: path!["q"],
///     value: json!({"type": 100, "data": {"text": "Which fruit?"}}),
/// }];
/// assert_eq!(
///     summarize_ops(&Graph::new(), &ops, &catalog),
///     vec![r#"Added Question "Which fruit?""#.to_string()]
/// );
/// ```
#[must_use]
pub fn summarize_ops<C: NodeClassifier>(graph: &Graph, ops: &[Op], classifier: &C) -> Vec<String> {
    let describe = Describer {
        graph,
        classifier,
        ops,
    };
    let mut lines = Vec::new();
    let mut remaining = ops.iter().peekable();

    while let Some(op) = remaining.next() {
        let moved = EdgeSplice::detached_by(op).and_then(|from| {
            remaining
                .peek()
                .copied()
                .and_then(EdgeSplice::attached_by)
                .filter(|to| to.child == from.child)
                .map(|to| (from, to))
        });
        match moved {
            Some((from, to)) => {
                remaining.next();
                lines.push(describe_move(&from, &to));
            }
            None => lines.extend(describe.op(op)),
        }
    }
    lines
}

/// One `parent -> child` edge added or removed by an op.
struct EdgeSplice<'a> {
    parent: &'a str,
    child: &'a str,
}

impl<'a> EdgeSplice<'a> {
    /// `ld` at an edge index, or the `od` of a single-edge list.
    fn detached_by(op: &'a Op) -> Option<Self> {
        match op {
            Op::ListDelete { path, value } if is_edge_index(path) => Self::new(path, value.as_str()),
            Op::ObjectDelete { path, value } if is_edges_key(path) => {
                Self::new(path, single_edge(value))
            }
            _ => None,
        }
    }

    /// `li` at an edge index, or the `oi` of a single-edge list.
    fn attached_by(op: &'a Op) -> Option<Self> {
        match op {
            Op::ListInsert { path, value } if is_edge_index(path) => Self::new(path, value.as_str()),
            Op::ObjectInsert { path, value } if is_edges_key(path) => {
                Self::new(path, single_edge(value))
            }
            _ => None,
        }
    }

    fn new(path: &'a [PathSegment], child: Option<&'a str>) -> Option<Self> {
        Some(Self {
            parent: path.first().and_then(PathSegment::as_key)?,
            child: child?,
        })
    }
}

fn describe_move(from: &EdgeSplice<'_>, to: &EdgeSplice<'_>) -> String {
    if from.parent == to.parent && from.parent == ROOT_NODE_KEY {
        "Re-ordered the root graph".to_string()
    } else {
        "Moved node".to_string()
    }
}

fn is_edges_key(path: &[PathSegment]) -> bool {
    matches!(path, [PathSegment::Key(_), PathSegment::Key(field)] if field == "edges")
}

fn single_edge(value: &Value) -> Option<&str> {
    match value.as_array()?.as_slice() {
        [only] => only.as_str(),
        _ => None,
    }
}

struct Describer<'a, C> {
    graph: &'a Graph,
    classifier: &'a C,
    ops: &'a [Op],
}

impl<C: NodeClassifier> Describer<'_, C> {
    fn op(&self, op: &Op) -> Option<String> {
        let path = op.path();
        let node = path
            .first()
            .and_then(PathSegment::as_key)
            .and_then(|id| self.graph.get(id));
        let field = path.get(1).and_then(PathSegment::as_key);
        let prop = path.get(2).and_then(PathSegment::as_key);

        match op {
            Op::ObjectReplace { old, new, .. } => {
                if let (Some(old_type), Some(new_type)) = (value_type(old), value_type(new)) {
                    return Some(format!(
                        "Replaced {} with {}",
                        self.labelled(old_type, old),
                        self.labelled(new_type, new)
                    ));
                }
                match (field, prop) {
                    (Some("data"), Some(prop)) if QUOTED_PROPS.contains(&prop) => Some(format!(
                        "Updated {} {prop} from \"{}\" to \"{}\"",
                        self.node_name(node, "node"),
                        plain(old),
                        plain(new)
                    )),
                    (Some("data"), Some(prop)) => {
                        Some(format!("Updated {} {prop}", self.node_name(node, "node")))
                    }
                    (Some("edges"), _) => Some(format!(
                        "Updated order of {} edges",
                        self.node_name(node, "graph")
                    )),
                    _ => None,
                }
            }
            Op::ObjectInsert { value, .. } => {
                if let Some(node_type) = value_type(value) {
                    return Some(format!("Added {}", self.labelled(node_type, value)));
                }
                match (field, prop) {
                    (Some("data"), Some(prop)) if QUOTED_PROPS.contains(&prop) => Some(format!(
                        "Added {} {prop} \"{}\"",
                        self.node_name(node, "node"),
                        plain(value)
                    )),
                    (Some("data"), Some(prop)) => {
                        Some(format!("Added {} {prop}", self.node_name(node, "node")))
                    }
                    (Some("edges"), _) => self.attached(first_edge(value)),
                    _ => None,
                }
            }
            Op::ObjectDelete { value, .. } => {
                if let Some(node_type) = value_type(value) {
                    return Some(format!("Removed {}", self.labelled(node_type, value)));
                }
                match (field, prop) {
                    (Some("data"), Some(prop)) if QUOTED_PROPS.contains(&prop) => Some(format!(
                        "Removed {} {prop} \"{}\"",
                        self.node_name(node, "node"),
                        plain(value)
                    )),
                    (Some("data"), Some(prop)) => {
                        Some(format!("Removed {} {prop}", self.node_name(node, "node")))
                    }
                    (Some("edges"), _) => self.detached(first_edge(value)),
                    _ => None,
                }
            }
            Op::ListReplace { .. } => match (path.first().and_then(PathSegment::as_key), field) {
                (Some(ROOT_NODE_KEY), Some("edges")) => Some("Re-ordered the root graph".to_string()),
                (_, Some("edges")) => Some("Moved node".to_string()),
                _ => None,
            },
            Op::ListInsert { value, .. } if is_edge_index(path) => self.attached(value.as_str()),
            Op::ListDelete { value, .. } if is_edge_index(path) => self.detached(value.as_str()),
            Op::ListInsert { .. } | Op::ListDelete { .. } => None,
        }
    }

    /// An edge to an existing node; new nodes get their own "Added" line.
    fn attached(&self, child: Option<&str>) -> Option<String> {
        let child = child?;
        if self.touches_node(child, |op| matches!(op, Op::ObjectInsert { .. })) {
            return None;
        }
        Some(format!(
            "Added {} to branch",
            self.node_name(self.graph.get(child), "node")
        ))
    }

    /// An edge to a surviving node; deleted nodes get their own "Removed" line.
    fn detached(&self, child: Option<&str>) -> Option<String> {
        let child = child?;
        if self.touches_node(child, |op| matches!(op, Op::ObjectDelete { .. })) {
            return None;
        }
        Some(format!(
            "Removed {} from branch",
            self.node_name(self.graph.get(child), "node")
        ))
    }

    /// Whether an op of the given kind targets the whole node `id`.
    fn touches_node(&self, id: &str, kind: impl Fn(&Op) -> bool) -> bool {
        self.ops.iter().any(|op| {
            kind(op) && matches!(op.path(), [PathSegment::Key(key)] if key == id)
        })
    }

    fn type_name(&self, node_type: Option<NodeType>, fallback: &'static str) -> String {
        node_type
            .and_then(|t| self.classifier.type_name(Some(t)))
            .unwrap_or(fallback)
            .to_string()
    }

    fn node_name(&self, node: Option<&Node>, fallback: &'static str) -> String {
        self.type_name(node.and_then(|n| n.node_type), fallback)
    }

    /// `Question "Which fruit?"`, or just the type name without a label.
    fn labelled(&self, node_type: NodeType, value: &Value) -> String {
        let name = self.type_name(Some(node_type), "node");
        match label(value) {
            Some(label) => format!("{name} \"{label}\""),
            None => name,
        }
    }

}

fn first_edge(value: &Value) -> Option<&str> {
    value.as_array()?.first()?.as_str()
}

fn value_type(value: &Value) -> Option<NodeType> {
    value
        .get("type")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
        .map(NodeType)
}

fn label(value: &Value) -> Option<String> {
    let data = value.get("data")?;
    LABEL_KEYS
        .iter()
        .filter_map(|key| data.get(*key))
        .find(|v| truthy(v))
        .map(plain)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > f64::EPSILON),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings print bare, everything else as JSON.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::engine::MutationEngine;
    use crate::ids::SequentialIds;
    use crate::path;
    use crate::spec::{NodeSpec, Placement};
    use flowgraph_core::{ComponentCatalog, ComponentKind};
    use serde_json::json;

    fn catalog() -> ComponentCatalog {
        ComponentCatalog::new()
            .with(ComponentKind::new(NodeType(100)).named("Question"))
            .with(ComponentKind::new(NodeType(200)).named("Answer"))
    }

    fn graph() -> Graph {
        Graph::from_json_str(
            r#"{
                "_root": {"edges": ["q"]},
                "q": {"type": 100, "data": {"text": "Fruit?"}, "edges": ["a1", "a2"]},
                "a1": {"type": 200, "data": {"text": "Apple"}},
                "a2": {"type": 200, "data": {"text": "Banana"}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_data_updates_quote_short_props_only() {
        let ops = vec![
            Op::ObjectReplace {
                path: path!["q", "data", "text"],
                old: json!("Fruit?"),
                new: json!("Which fruit?"),
            },
            Op::ObjectInsert {
                path: path!["q", "data", "moreInfo"],
                value: json!("<p>long</p>"),
            },
        ];
        assert_eq!(
            summarize_ops(&graph(), &ops, &catalog()),
            vec![
                r#"Updated Question text from "Fruit?" to "Which fruit?""#.to_string(),
                "Added Question moreInfo".to_string(),
            ]
        );
    }

    #[test]
    fn test_node_removal_and_edge_ops() {
        let ops = vec![
            Op::ListDelete {
                path: path!["q", "edges", 1],
                value: json!("a2"),
            },
            Op::ObjectDelete {
                path: path!["a2"],
                value: json!({"type": 200, "data": {"text": "Banana"}}),
            },
            Op::ListReplace {
                path: path!["_root", "edges", 0],
                old: json!("q"),
                new: json!("x"),
            },
            Op::ObjectReplace {
                path: path!["q", "edges"],
                old: json!(["a1", "a2"]),
                new: json!(["a2", "a1"]),
            },
        ];
        assert_eq!(
            summarize_ops(&graph(), &ops, &catalog()),
            vec![
                r#"Removed Answer "Banana""#.to_string(),
                "Re-ordered the root graph".to_string(),
                "Updated order of Question edges".to_string(),
            ]
        );
    }

    // ========================================================================
    // Edits produced by the engine
    // ========================================================================

    fn branching_graph() -> Graph {
        Graph::from_json_str(
            r#"{
                "_root": {"edges": ["a", "b", "c"]},
                "a": {"type": 100, "data": {"text": "Colour?"}, "edges": ["x"]},
                "b": {"type": 100, "data": {"text": "Size?"}, "edges": ["y"]},
                "c": {},
                "x": {"type": 200, "data": {"text": "Red"}},
                "y": {"type": 200, "data": {"text": "Large"}}
            }"#,
        )
        .unwrap()
    }

    fn engine() -> MutationEngine<ComponentCatalog, SequentialIds> {
        MutationEngine::with_parts(catalog(), SequentialIds::new("n"))
    }

    #[test]
    fn test_reorder_within_root_reads_as_root_reorder() {
        let graph = branching_graph();
        let mutation = engine()
            .move_node(&graph, "c", ROOT_NODE_KEY, &Placement::new().before("a"))
            .unwrap();

        assert_eq!(
            summarize_ops(&graph, &mutation.ops, &catalog()),
            vec!["Re-ordered the root graph".to_string()]
        );
    }

    #[test]
    fn test_move_between_parents_reads_as_single_move() {
        let graph = branching_graph();
        let mutation = engine()
            .move_node(&graph, "x", "a", &Placement::under("b"))
            .unwrap();

        assert_eq!(
            summarize_ops(&graph, &mutation.ops, &catalog()),
            vec!["Moved node".to_string()]
        );
    }

    #[test]
    fn test_clone_reads_as_added_to_branch() {
        let graph = branching_graph();
        let mutation = engine()
            .clone_node(&graph, "x", &Placement::under("b"))
            .unwrap();

        assert_eq!(
            summarize_ops(&graph, &mutation.ops, &catalog()),
            vec!["Added Answer to branch".to_string()]
        );
    }

    #[test]
    fn test_removing_shared_node_reads_as_removed_from_branch() {
        let graph = branching_graph();
        let (shared, _) = engine()
            .clone_node(&graph, "x", &Placement::under("b"))
            .unwrap()
            .into_parts();
        let mutation = engine().remove(&shared, "x", "b").unwrap();

        assert_eq!(
            summarize_ops(&shared, &mutation.ops, &catalog()),
            vec!["Removed Answer from branch".to_string()]
        );
    }

    #[test]
    fn test_new_node_is_described_once() {
        let graph = branching_graph();
        let spec = NodeSpec::new()
            .with_type(NodeType(200))
            .with_value("text", json!("Blue"));
        let mutation = engine()
            .add(&graph, &spec, &Placement::under("a"))
            .unwrap();

        assert_eq!(
            summarize_ops(&graph, &mutation.ops, &catalog()),
            vec![r#"Added Answer "Blue""#.to_string()]
        );
    }

    #[test]
    fn test_unknown_types_read_as_node() {
        let ops = vec![Op::ObjectInsert {
            path: path!["q", "edges"],
            value: json!(["a1"]),
        }];
        assert_eq!(
            summarize_ops(&graph(), &ops, &ComponentCatalog::new()),
            vec!["Added node to branch".to_string()]
        );
    }
}
