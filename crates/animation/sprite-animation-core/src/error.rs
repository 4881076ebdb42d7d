//! Error types for editing operations on the animation tree.
//!
//! The per-frame path (`update`) never fails; only editor actions and snapshot
//! restoration return [`Result`].

use crate::ids::NodeId;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum AnimationError {
    /// The handle does not refer to a live node.
    #[error("Animation node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A group was required (e.g. as a parent) but a leaf was given.
    #[error("Animation node {0:?} is not a group")]
    NotAGroup(NodeId),

    /// The root group cannot be removed, cloned or moved.
    #[error("Operation not allowed on the root group")]
    RootNode,

    /// Reparenting would make a node its own ancestor.
    #[error("Moving {node:?} under {parent:?} would create a cycle")]
    WouldCycle { node: NodeId, parent: NodeId },

    /// A grid animation referenced a function missing from the registry.
    #[error("Grid function not found: {0}")]
    UnknownGridFunction(String),

    /// Snapshot content is structurally invalid.
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
