#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # flowgraph-crawler
//!
//! Resolves which nodes an applicant should see next, given the answers
//! recorded so far in their session.
//!
//! ```
//! use flowgraph_core::{ComponentCatalog, Graph};
//! use flowgraph_crawler::Crawler;
//!
//! # fn main() -> flowgraph_core::Result<()> {
//! let graph = Graph::from_json_str(r#"{"_root": {"edges": ["intro"]}, "intro": {}}"#)?;
//! let mut crawler = Crawler::new(graph, ComponentCatalog::new())?;
//! assert_eq!(crawler.upcoming_ids(), ["intro".to_string()]);
//!
//! crawler.record("intro", vec![])?;
//! assert!(crawler.upcoming_ids().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod breadcrumbs;
pub mod crawler;

pub use breadcrumbs::{Breadcrumb, Breadcrumbs};
pub use crawler::Crawler;
