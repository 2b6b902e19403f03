#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # flowgraph-core
//!
//! Core types for flow graphs: the arena data model, the shared error type,
//! cycle detection, node classification and payload cleaning.

pub mod catalog;
pub mod cycle;
pub mod error;
pub mod graph;
pub mod node;
pub mod result;
pub mod sanitize;

pub use catalog::{ComponentCatalog, ComponentKind, NodeClassifier, PredicateClassifier};
pub use error::Error;
pub use graph::Graph;
pub use node::{Data, Node, NodeId, NodeType, ROOT_NODE_KEY};
pub use result::{Result, ResultExt};
