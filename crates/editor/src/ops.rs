//! Operation records in the json0 shape.
//!
//! Every op names a path into the graph document and carries the value it
//! inserts and/or the value it deletes, so it can be both replayed and
//! inverted. Paths into a node's `edges` list end in an index and use the
//! list forms (`li`/`ld`); every other path uses the object forms
//! (`oi`/`od`).

use flowgraph_core::{Error, Graph, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of an op path: an object key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Key(key) => write!(f, "{key}"),
        }
    }
}

/// Path from the graph document root to the value an op touches.
pub type Path = Vec<PathSegment>;

/// Build a path from mixed keys and indices.
///
/// ```
/// use flowgraph_editor::path;
/// use flowgraph_editor::ops::PathSegment;
///
/// let p = path!["_root", "edges", 2];
/// assert_eq!(p[2], PathSegment::Index(2));
/// ```
#[macro_export]
macro_rules! path {
    ($($segment:expr),* $(,)?) => {
        vec![$($crate::ops::PathSegment::from($segment)),*]
    };
}

/// Whether `path` addresses an element of some node's `edges` list.
#[must_use]
pub fn is_edge_index(path: &[PathSegment]) -> bool {
    matches!(
        path,
        [PathSegment::Key(_), PathSegment::Key(field), PathSegment::Index(_), ..] if field == "edges"
    )
}

/// A single invertible change to a graph document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RawOp", try_from = "RawOp")]
pub enum Op {
    /// Insert `value` into a list at the path's final index.
    ListInsert { path: Path, value: Value },
    /// Delete `value` from a list at the path's final index.
    ListDelete { path: Path, value: Value },
    /// Replace list element `old` with `new`.
    ListReplace { path: Path, old: Value, new: Value },
    /// Insert `value` under the path's final key.
    ObjectInsert { path: Path, value: Value },
    /// Delete `value` from under the path's final key.
    ObjectDelete { path: Path, value: Value },
    /// Replace `old` with `new` under the path's final key.
    ObjectReplace { path: Path, old: Value, new: Value },
}

impl Op {
    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        match self {
            Self::ListInsert { path, .. }
            | Self::ListDelete { path, .. }
            | Self::ListReplace { path, .. }
            | Self::ObjectInsert { path, .. }
            | Self::ObjectDelete { path, .. }
            | Self::ObjectReplace { path, .. } => path,
        }
    }

    /// The op that undoes this one.
    #[must_use]
    pub fn invert(&self) -> Self {
        match self.clone() {
            Self::ListInsert { path, value } => Self::ListDelete { path, value },
            Self::ListDelete { path, value } => Self::ListInsert { path, value },
            Self::ListReplace { path, old, new } => Self::ListReplace {
                path,
                old: new,
                new: old,
            },
            Self::ObjectInsert { path, value } => Self::ObjectDelete { path, value },
            Self::ObjectDelete { path, value } => Self::ObjectInsert { path, value },
            Self::ObjectReplace { path, old, new } => Self::ObjectReplace {
                path,
                old: new,
                new: old,
            },
        }
    }

    /// Apply this op to a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOp` when the path does not resolve, an insert target
    /// is occupied, or a deleted/replaced value differs from the document.
    pub fn apply_to(&self, doc: &mut Value) -> Result<()> {
        let (last, parent_path) = self
            .path()
            .split_last()
            .ok_or_else(|| Error::invalid_op("empty path"))?;
        let container = resolve_mut(doc, parent_path)?;

        match (self, container, last) {
            (Self::ListInsert { value, .. }, Value::Array(items), PathSegment::Index(index)) => {
                if *index > items.len() {
                    return Err(Error::invalid_op(format!("index {index} out of bounds")));
                }
                items.insert(*index, value.clone());
                Ok(())
            }
            (Self::ListDelete { value, .. }, Value::Array(items), PathSegment::Index(index)) => {
                expect_value(items.get(*index), value)?;
                items.remove(*index);
                Ok(())
            }
            (Self::ListReplace { old, new, .. }, Value::Array(items), PathSegment::Index(index)) => {
                let slot = items
                    .get_mut(*index)
                    .ok_or_else(|| Error::invalid_op(format!("index {index} out of bounds")))?;
                expect_value(Some(&*slot), old)?;
                *slot = new.clone();
                Ok(())
            }
            (Self::ObjectInsert { value, .. }, Value::Object(map), PathSegment::Key(key)) => {
                if map.contains_key(key) {
                    return Err(Error::invalid_op(format!("key '{key}' already present")));
                }
                map.insert(key.clone(), value.clone());
                Ok(())
            }
            (Self::ObjectDelete { value, .. }, Value::Object(map), PathSegment::Key(key)) => {
                expect_value(map.get(key), value)?;
                map.remove(key);
                Ok(())
            }
            (Self::ObjectReplace { old, new, .. }, Value::Object(map), PathSegment::Key(key)) => {
                let slot = map
                    .get_mut(key)
                    .ok_or_else(|| Error::invalid_op(format!("key '{key}' not present")))?;
                expect_value(Some(&*slot), old)?;
                *slot = new.clone();
                Ok(())
            }
            _ => Err(Error::invalid_op(format!(
                "op does not fit the value at {}",
                display_path(self.path())
            ))),
        }
    }
}

fn resolve_mut<'a>(doc: &'a mut Value, path: &[PathSegment]) -> Result<&'a mut Value> {
    path.iter().try_fold(doc, |current, segment| {
        let next = match (current, segment) {
            (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
            (Value::Array(items), PathSegment::Index(index)) => items.get_mut(*index),
            _ => None,
        };
        next.ok_or_else(|| Error::invalid_op(format!("path {} does not resolve", display_path(path))))
    })
}

fn expect_value(found: Option<&Value>, expected: &Value) -> Result<()> {
    match found {
        Some(value) if value == expected => Ok(()),
        Some(value) => Err(Error::invalid_op(format!(
            "expected {expected} but found {value}"
        ))),
        None => Err(Error::invalid_op(format!("expected {expected} but found nothing"))),
    }
}

fn display_path(path: &[PathSegment]) -> String {
    itertools::join(path, "/")
}

/// Replay ops against a graph, in order.
///
/// # Errors
///
/// Returns `InvalidOp` if an op does not apply, or `JsonParseFailed` if the
/// graph cannot be serialized or the result is no longer a graph.
pub fn apply_ops(graph: &Graph, ops: &[Op]) -> Result<Graph> {
    let mut doc = graph.to_json_value()?;
    for op in ops {
        op.apply_to(&mut doc)?;
    }
    serde_json::from_value(doc).map_err(Error::from)
}

/// Ops that undo `ops`: each op inverted, in reverse order.
#[must_use]
pub fn invert_ops(ops: &[Op]) -> Vec<Op> {
    ops.iter().rev().map(Op::invert).collect()
}

/// Wire shape of an op: `{"p": [...], "li"?, "ld"?, "oi"?, "od"?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawOp {
    p: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    li: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ld: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    oi: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    od: Option<Value>,
}

impl From<Op> for RawOp {
    fn from(op: Op) -> Self {
        let raw = |p: Path| Self {
            p,
            li: None,
            ld: None,
            oi: None,
            od: None,
        };
        match op {
            Op::ListInsert { path, value } => Self {
                li: Some(value),
                ..raw(path)
            },
            Op::ListDelete { path, value } => Self {
                ld: Some(value),
                ..raw(path)
            },
            Op::ListReplace { path, old, new } => Self {
                li: Some(new),
                ld: Some(old),
                ..raw(path)
            },
            Op::ObjectInsert { path, value } => Self {
                oi: Some(value),
                ..raw(path)
            },
            Op::ObjectDelete { path, value } => Self {
                od: Some(value),
                ..raw(path)
            },
            Op::ObjectReplace { path, old, new } => Self {
                oi: Some(new),
                od: Some(old),
                ..raw(path)
            },
        }
    }
}

impl TryFrom<RawOp> for Op {
    type Error = Error;

    fn try_from(raw: RawOp) -> Result<Self> {
        let path = raw.p;
        match (raw.li, raw.ld, raw.oi, raw.od) {
            (Some(value), None, None, None) => Ok(Self::ListInsert { path, value }),
            (None, Some(value), None, None) => Ok(Self::ListDelete { path, value }),
            (Some(new), Some(old), None, None) => Ok(Self::ListReplace { path, old, new }),
            (None, None, Some(value), None) => Ok(Self::ObjectInsert { path, value }),
            (None, None, None, Some(value)) => Ok(Self::ObjectDelete { path, value }),
            (None, None, Some(new), Some(old)) => Ok(Self::ObjectReplace { path, old, new }),
            _ => Err(Error::invalid_op(format!(
                "unsupported component combination at {}",
                display_path(&path)
            ))),
        }
    }
}
