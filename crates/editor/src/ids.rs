//! Node id generation.

use std::cell::Cell;

use flowgraph_core::NodeId;
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Default length of a generated id.
pub const DEFAULT_ID_LENGTH: usize = 10;

/// Source of fresh node ids.
///
/// Uniqueness is checked by the engine: a generated id that collides with
/// an existing node makes the operation fail with `IdExists`.
pub trait IdSource {
    fn next_id(&self) -> NodeId;
}

impl<S: IdSource + ?Sized> IdSource for &S {
    fn next_id(&self) -> NodeId {
        (**self).next_id()
    }
}

/// Random alphanumeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomIds {
    length: usize,
}

impl RandomIds {
    #[must_use]
    pub const fn with_length(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::with_length(DEFAULT_ID_LENGTH)
    }
}

impl IdSource for RandomIds {
    fn next_id(&self) -> NodeId {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Deterministic `prefix1`, `prefix2`, ... ids, for tests and replays.
#[derive(Debug, Default)]
pub struct SequentialIds {
    prefix: String,
    counter: Cell<u64>,
}

impl SequentialIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Cell::new(0),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> NodeId {
        let next = self.counter.get().saturating_add(1);
        self.counter.set(next);
        format!("{}{next}", self.prefix)
    }
}
