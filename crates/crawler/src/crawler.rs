//! Next-step resolution for one traversal session.

use flowgraph_core::{ComponentCatalog, Error, Graph, NodeClassifier, NodeId, ROOT_NODE_KEY, Result};
use im::HashSet;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::breadcrumbs::Breadcrumbs;

/// Walks a graph for one applicant session.
///
/// Owns the graph and the breadcrumb history recorded so far. Upcoming ids
/// are recomputed from scratch on every call.
#[derive(Debug, Clone)]
pub struct Crawler<C = ComponentCatalog> {
    graph: Graph,
    classifier: C,
    breadcrumbs: Breadcrumbs,
}

impl<C: NodeClassifier> Crawler<C> {
    /// Start a session with no history.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGraph` if the graph has no `_root`.
    pub fn new(graph: Graph, classifier: C) -> Result<Self> {
        if !graph.has_root() {
            return Err(Error::invalid_graph("missing _root"));
        }
        Ok(Self {
            graph,
            classifier,
            breadcrumbs: Breadcrumbs::new(),
        })
    }

    /// Resume a session by replaying stored breadcrumbs in their stored
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGraph` if the graph has no `_root`, or `IdNotFound`
    /// if a stored breadcrumb names a node the graph no longer has.
    pub fn with_breadcrumbs(graph: Graph, classifier: C, breadcrumbs: Breadcrumbs) -> Result<Self> {
        let mut crawler = Self::new(graph, classifier)?;
        for crumb in breadcrumbs {
            crawler.record(&crumb.id, crumb.answers)?;
        }
        Ok(crawler)
    }

    /// Record the answers chosen at `id`.
    ///
    /// # Errors
    ///
    /// - `IdNotFound` if `id` is not in the graph
    /// - `AlreadyRecorded` if `id` already has an entry
    pub fn record(&mut self, id: &str, answers: Vec<NodeId>) -> Result<()> {
        if !self.graph.contains(id) {
            return Err(Error::id_not_found(id));
        }
        let count = answers.len();
        self.breadcrumbs.insert(id, answers)?;
        debug!(id, answers = count, "breadcrumb recorded");
        Ok(())
    }

    /// Ids to present next, first-seen order.
    ///
    /// Sources are every recorded answer, most recent first, followed by
    /// `_root`. From each source, an unvisited child is upcoming unless it
    /// is a branching node with nowhere to go; transparent children are
    /// passed through and their own children considered instead.
    #[must_use]
    pub fn upcoming_ids(&self) -> Vec<NodeId> {
        let sources = self
            .breadcrumbs
            .answers()
            .rev()
            .map(String::as_str)
            .chain(std::iter::once(ROOT_NODE_KEY))
            .unique();

        let mut expanded = HashSet::new();
        let mut upcoming = Vec::new();
        for source in sources {
            self.connected_from(source, &mut expanded, &mut upcoming);
        }

        let upcoming: Vec<NodeId> = upcoming.into_iter().unique().collect();
        trace!(count = upcoming.len(), "upcoming ids resolved");
        upcoming
    }

    /// [`upcoming_ids`](Self::upcoming_ids) in depth-first graph order.
    #[must_use]
    pub fn upcoming_ids_depth_first(&self) -> Vec<NodeId> {
        self.graph.sort_ids_depth_first(self.upcoming_ids())
    }

    /// The next node to present, if any.
    #[must_use]
    pub fn current_id(&self) -> Option<NodeId> {
        self.upcoming_ids().into_iter().next()
    }

    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    #[must_use]
    pub const fn breadcrumbs(&self) -> &Breadcrumbs {
        &self.breadcrumbs
    }

    #[must_use]
    pub fn into_breadcrumbs(self) -> Breadcrumbs {
        self.breadcrumbs
    }

    fn connected_from<'g>(
        &'g self,
        source: &str,
        expanded: &mut HashSet<&'g str>,
        upcoming: &mut Vec<NodeId>,
    ) {
        for target in self.graph.edges_of(source) {
            if self.breadcrumbs.contains(target) {
                continue;
            }
            let Some(node) = self.graph.get(target) else {
                continue;
            };

            if self.classifier.is_transparent(node.node_type) {
                // A transparent node yields the same children from any source.
                if expanded.insert(target.as_str()).is_none() {
                    self.connected_from(target, expanded, upcoming);
                }
            } else if !self.classifier.is_branching(node.node_type) || node.has_edges() {
                upcoming.push(target.clone());
            }
        }
    }
}
