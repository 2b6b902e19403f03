//! Structural patches and their translation into ops.
//!
//! A [`Patch`] is one primitive edit of the graph document, recorded as a
//! forward/inverse pair while a draft is edited. [`translate`] folds each
//! pair into a single [`Op`] carrying the inserted value (from the forward
//! patch) and the deleted value (from the inverse patch).

use flowgraph_core::{Error, Result};
use serde_json::Value;

use crate::ops::{Op, Path, PathSegment, is_edge_index};

/// Kind of a primitive edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    Add,
    Remove,
    Replace,
}

/// One primitive edit at `path`.
///
/// `value` is the value written by `Add`/`Replace`; `Remove` carries none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub kind: PatchKind,
    pub path: Path,
    pub value: Option<Value>,
}

impl Patch {
    #[must_use]
    pub const fn add(path: Path, value: Value) -> Self {
        Self {
            kind: PatchKind::Add,
            path,
            value: Some(value),
        }
    }

    #[must_use]
    pub const fn remove(path: Path) -> Self {
        Self {
            kind: PatchKind::Remove,
            path,
            value: None,
        }
    }

    #[must_use]
    pub const fn replace(path: Path, value: Value) -> Self {
        Self {
            kind: PatchKind::Replace,
            path,
            value: Some(value),
        }
    }
}

/// Translate forward/inverse patch pairs into ops, preserving order.
///
/// Patches addressing an index inside some node's `edges` list become list
/// ops; all others become object ops. A replace becomes a single op holding
/// both the old and the new value.
///
/// # Errors
///
/// Returns `MalformedPatch` when the two lists differ in length, or a pair
/// lacks the value needed to build an invertible op.
pub fn translate(forward: &[Patch], inverse: &[Patch]) -> Result<Vec<Op>> {
    if forward.len() != inverse.len() {
        return Err(Error::malformed_patch(format!(
            "{} forward patches but {} inverse patches",
            forward.len(),
            inverse.len()
        )));
    }

    forward
        .iter()
        .zip(inverse)
        .map(|(fwd, bak)| translate_pair(fwd, bak))
        .collect()
}

fn translate_pair(fwd: &Patch, bak: &Patch) -> Result<Op> {
    let path = fwd.path.clone();
    let list = is_edge_index(&path);

    match fwd.kind {
        PatchKind::Add => {
            let value = required(fwd.value.as_ref(), &path, "inserted")?;
            Ok(if list {
                Op::ListInsert { path, value }
            } else {
                Op::ObjectInsert { path, value }
            })
        }
        PatchKind::Remove => {
            let value = required(bak.value.as_ref(), &path, "deleted")?;
            Ok(if list {
                Op::ListDelete { path, value }
            } else {
                Op::ObjectDelete { path, value }
            })
        }
        PatchKind::Replace => {
            let new = required(fwd.value.as_ref(), &path, "inserted")?;
            let old = required(bak.value.as_ref(), &path, "deleted")?;
            Ok(if list {
                Op::ListReplace { path, old, new }
            } else {
                Op::ObjectReplace { path, old, new }
            })
        }
    }
}

fn required(value: Option<&Value>, path: &[PathSegment], role: &str) -> Result<Value> {
    value.cloned().ok_or_else(|| {
        Error::malformed_patch(format!(
            "no {role} value at {}",
            itertools::join(path, "/")
        ))
    })
}
