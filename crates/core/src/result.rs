//! Result type definition and extension traits.
//!
//! Provides a logging combinator for Results so rejected operations leave a
//! trace without unwrap/expect/panic.

use crate::error::Error;

/// The standard Result type for flowgraph operations.
///
/// All fallible operations return this type.
///
/// # Examples
///
/// ```
/// use flowgraph_core::{Error, Graph, Result};
///
/// fn root_edges(graph: &Graph) -> Result<usize> {
///     let root = graph.root().ok_or_else(|| Error::invalid_graph("missing root"))?;
///     Ok(root.edges().len())
/// }
///
/// assert!(root_edges(&Graph::new()).is_ok());
/// assert!(root_edges(&Graph::default()).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait providing side-effect combinators for Results.
pub trait ResultExt<T> {
    /// Log a rejected operation at debug level, passing the Result through.
    ///
    /// Rejections are ordinary outcomes here (a user dragged a node onto its
    /// own child), so they are not logged as errors.
    #[must_use]
    fn log_rejection(self, operation: &str) -> Self;

    /// Inspect the error without consuming the Result.
    #[must_use]
    fn inspect_error<F: FnOnce(&Error)>(self, f: F) -> Self;
}

impl<T> ResultExt<T> for Result<T> {
    fn log_rejection(self, operation: &str) -> Self {
        if let Err(ref e) = self {
            tracing::debug!(operation, error = ?e, "operation rejected: {e}");
        }
        self
    }

    fn inspect_error<F: FnOnce(&Error)>(self, f: F) -> Self {
        if let Err(ref e) = self {
            f(e);
        }
        self
    }
}
