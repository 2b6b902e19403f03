//! Cycle detection over the `edges` relation
//!
//! Three-state depth-first search: a node is unvisited (absent from the
//! marks), in progress (on the current DFS path) or done. Reaching an
//! in-progress node again closes a cycle.
//!
//! Only needed after an operation adds an edge between two nodes that both
//! existed before it. A freshly added node has no descendants that could
//! lead back to it, so `add` never runs this check.
//!
//! # Complexity
//!
//! - Time: O(V + E)
//! - Space: O(V) for the marks and the explicit DFS stack

use im::HashMap;

use crate::error::Error;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::result::Result;

/// DFS mark of a visited node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path (gray)
    InProgress,
    /// Fully explored (black)
    Done,
}

/// Find one cycle in the graph, if any.
///
/// Returns the cycle as a path that starts and ends at the same id, e.g.
/// `["a", "b", "a"]`. Edges to missing nodes are ignored.
#[must_use]
pub fn find_cycle(graph: &Graph) -> Option<Vec<NodeId>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();

    for start in graph.ids() {
        if marks.contains_key(start.as_str()) {
            continue;
        }

        // (node, index of the next edge to follow)
        let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
        marks.insert(start.as_str(), Mark::InProgress);

        while let Some((id, next)) = stack.last().copied() {
            let Some(child) = graph.edges_of(id).get(next) else {
                marks.insert(id, Mark::Done);
                stack.pop();
                continue;
            };

            if let Some(top) = stack.last_mut() {
                top.1 = next.saturating_add(1);
            }

            match marks.get(child.as_str()) {
                Some(Mark::InProgress) => {
                    let cycle = stack
                        .iter()
                        .skip_while(|(on_path, _)| *on_path != child.as_str())
                        .map(|(on_path, _)| (*on_path).to_string())
                        .chain(std::iter::once(child.clone()))
                        .collect();
                    tracing::trace!(?cycle, "cycle found");
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None if graph.contains(child) => {
                    marks.insert(child.as_str(), Mark::InProgress);
                    stack.push((child.as_str(), 0));
                }
                None => {}
            }
        }
    }

    None
}

/// Whether any node can reach itself.
#[must_use]
pub fn is_cyclic(graph: &Graph) -> bool {
    find_cycle(graph).is_some()
}

/// Fail with `CycleDetected` if the graph contains a cycle.
///
/// # Errors
///
/// Returns `CycleDetected` carrying the offending path.
pub fn ensure_acyclic(graph: &Graph) -> Result<()> {
    find_cycle(graph).map_or(Ok(()), |path| Err(Error::cycle_detected(path)))
}
