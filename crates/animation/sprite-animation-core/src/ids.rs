//! Identifiers for animation nodes and for host-owned resources.
//!
//! `NodeId` is an arena key owned by the engine. The remaining ids are opaque
//! handles allocated by the host (sprite store, script loader, property table);
//! the core only compares and forwards them.

use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Handle to a node stored in the animation arena.
    pub struct NodeId;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ScriptId(pub u32);

/// Opaque handle to a host-owned float slot (e.g. a sprite's opacity).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PropertyHandle(pub u32);
