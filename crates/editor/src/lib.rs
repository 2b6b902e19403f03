#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # flowgraph-editor
//!
//! Structural mutations over flow graphs. Each accepted operation yields
//! the new snapshot together with json0 ops that replay it against the old
//! one and invert cleanly.
//!
//! ```
//! use flowgraph_core::Graph;
//! use flowgraph_editor::{apply_ops, MutationEngine, NodeSpec, Placement};
//!
//! # fn main() -> flowgraph_core::Result<()> {
//! let engine = MutationEngine::new();
//! let graph = Graph::new();
//! let added = engine.add(&graph, &NodeSpec::new().with_id("intro"), &Placement::new())?;
//! assert_eq!(apply_ops(&graph, &added.ops)?, added.graph);
//! # Ok(())
//! # }
//! ```

mod draft;
pub mod engine;
pub mod ids;
pub mod ops;
pub mod patch;
pub mod spec;
pub mod summary;

pub use engine::{Mutation, MutationEngine};
pub use ids::{IdSource, RandomIds, SequentialIds};
pub use ops::{Op, Path, PathSegment, apply_ops, invert_ops, is_edge_index};
pub use patch::{Patch, PatchKind, translate};
pub use spec::{NodeSpec, Placement, UpdateOptions};
pub use summary::summarize_ops;
