#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # flowgraph
//!
//! Flow graph engine for form-builder services. Re-exports the workspace
//! crates and hosts the CLI plumbing.
//!
//! - [`flowgraph_core`]: graph model, cycle detection, component catalog
//! - [`flowgraph_editor`]: structural mutations and json0 ops
//! - [`flowgraph_crawler`]: breadcrumb-driven traversal

pub use flowgraph_core;
pub use flowgraph_crawler;
pub use flowgraph_editor;

pub mod cli;
pub mod commands;
pub mod config;
