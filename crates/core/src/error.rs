//! Core error types for flowgraph operations.
//!
//! All errors are explicit, typed, and recoverable - no panics allowed.
//! The `Display` text of each graph failure is a short, stable message that
//! callers may match on; the ids involved travel as variant fields.

use std::path::PathBuf;

use thiserror::Error;

use crate::node::NodeId;

/// Core error type for flowgraph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Lookup failures
    #[error("id not found")]
    IdNotFound { id: NodeId },

    #[error("id exists")]
    IdExists { id: NodeId },

    #[error("parent not found")]
    ParentNotFound { parent: NodeId },

    #[error("before not found")]
    BeforeNotFound { parent: NodeId, before: NodeId },

    #[error("toBefore does not exist in toParent")]
    ToBeforeNotFound { parent: NodeId, before: NodeId },

    // Edge failures
    #[error("cannot clone to same parent")]
    CloneToSameParent { id: NodeId, parent: NodeId },

    #[error("cannot move to same parent")]
    MoveToSameParent { id: NodeId, parent: NodeId },

    #[error("parent does not connect to id")]
    NotConnected { id: NodeId, parent: NodeId },

    #[error("not found in parent")]
    NotFoundInParent { id: NodeId, parent: NodeId },

    #[error("cannot create cycle in graph")]
    CycleDetected { path: Vec<NodeId> },

    #[error("cannot place root-only node on a branch")]
    RootOnlyPlacement { id: NodeId, parent: NodeId },

    #[error("cannot clone this node type")]
    CloneForbidden { id: NodeId },

    // Graph shape failures
    #[error("invalid graph")]
    InvalidGraph { reason: String },

    #[error("edge {from} -> {to} points to a missing node")]
    DanglingEdge { from: NodeId, to: NodeId },

    // Traversal failures
    #[error("already recorded")]
    AlreadyRecorded { id: NodeId },

    // Op replay failures
    #[error("invalid op: {reason}")]
    InvalidOp { reason: String },

    #[error("malformed patch: {reason}")]
    MalformedPatch { reason: String },

    // Parsing errors
    #[error("JSON parse error: {reason}")]
    JsonParseFailed { reason: String },

    #[error("TOML parse error: {reason}")]
    TomlParseFailed { reason: String },

    // I/O errors
    #[error("failed to read file '{path}': {reason}")]
    FileReadFailed { path: PathBuf, reason: String },
}

impl Error {
    pub fn id_not_found(id: impl Into<NodeId>) -> Self {
        Self::IdNotFound { id: id.into() }
    }

    pub fn id_exists(id: impl Into<NodeId>) -> Self {
        Self::IdExists { id: id.into() }
    }

    pub fn parent_not_found(parent: impl Into<NodeId>) -> Self {
        Self::ParentNotFound {
            parent: parent.into(),
        }
    }

    pub fn before_not_found(parent: impl Into<NodeId>, before: impl Into<NodeId>) -> Self {
        Self::BeforeNotFound {
            parent: parent.into(),
            before: before.into(),
        }
    }

    pub fn to_before_not_found(parent: impl Into<NodeId>, before: impl Into<NodeId>) -> Self {
        Self::ToBeforeNotFound {
            parent: parent.into(),
            before: before.into(),
        }
    }

    pub fn clone_to_same_parent(id: impl Into<NodeId>, parent: impl Into<NodeId>) -> Self {
        Self::CloneToSameParent {
            id: id.into(),
            parent: parent.into(),
        }
    }

    pub fn move_to_same_parent(id: impl Into<NodeId>, parent: impl Into<NodeId>) -> Self {
        Self::MoveToSameParent {
            id: id.into(),
            parent: parent.into(),
        }
    }

    pub fn not_connected(id: impl Into<NodeId>, parent: impl Into<NodeId>) -> Self {
        Self::NotConnected {
            id: id.into(),
            parent: parent.into(),
        }
    }

    pub fn not_found_in_parent(id: impl Into<NodeId>, parent: impl Into<NodeId>) -> Self {
        Self::NotFoundInParent {
            id: id.into(),
            parent: parent.into(),
        }
    }

    pub fn root_only_placement(id: impl Into<NodeId>, parent: impl Into<NodeId>) -> Self {
        Self::RootOnlyPlacement {
            id: id.into(),
            parent: parent.into(),
        }
    }

    pub fn clone_forbidden(id: impl Into<NodeId>) -> Self {
        Self::CloneForbidden { id: id.into() }
    }

    pub fn already_recorded(id: impl Into<NodeId>) -> Self {
        Self::AlreadyRecorded { id: id.into() }
    }

    pub fn cycle_detected(path: Vec<NodeId>) -> Self {
        Self::CycleDetected { path }
    }

    pub fn invalid_graph(reason: impl Into<String>) -> Self {
        Self::InvalidGraph {
            reason: reason.into(),
        }
    }

    pub fn dangling_edge(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self::DanglingEdge {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn invalid_op(reason: impl Into<String>) -> Self {
        Self::InvalidOp {
            reason: reason.into(),
        }
    }

    pub fn malformed_patch(reason: impl Into<String>) -> Self {
        Self::MalformedPatch {
            reason: reason.into(),
        }
    }

    pub fn json_parse_failed(reason: impl Into<String>) -> Self {
        Self::JsonParseFailed {
            reason: reason.into(),
        }
    }

    pub fn toml_parse_failed(reason: impl Into<String>) -> Self {
        Self::TomlParseFailed {
            reason: reason.into(),
        }
    }

    pub fn file_read_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::json_parse_failed(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::toml_parse_failed(err.to_string())
    }
}
