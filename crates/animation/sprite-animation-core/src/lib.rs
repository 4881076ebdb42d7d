//! Sprite Animation Core (host-agnostic)
//!
//! Per-frame animation engine for a sprite editor: easing curves with loop
//! policy, curve-driven leaves (property, grid deformation, script) and
//! parallel/sequential groups arranged in an arena tree. Hosts receive values
//! through the [`AnimationHost`] trait and drive everything with
//! [`AnimationManager::update`] once per frame.

pub mod binding;
pub mod config;
pub mod curve;
pub mod error;
pub mod grid;
pub mod group;
pub mod ids;
pub mod leaf;
pub mod loop_component;
pub mod manager;
pub mod node;
mod playback;
mod sequential;
pub mod snapshot;
pub mod tree;

// Re-exports for hosts
pub use binding::{AnimationHost, GridCall, PropertyBinding, ScriptCall, ScriptEntry};
pub use config::Config;
pub use curve::{CurveType, EasingCurve};
pub use error::{AnimationError, Result};
pub use grid::{
    AnchorAxis, GridFunction, GridFunctionRegistry, GridParam, ParamKind, ParamSpec, ParamValue,
};
pub use group::{AnimationGroup, GroupMode};
pub use ids::{NodeId, PropertyHandle, ScriptId, SpriteId};
pub use leaf::{CurveAnimation, GridTarget, LeafTarget, PropertyTarget, ScriptTarget};
pub use loop_component::{Direction, LoopComponent, LoopMode};
pub use manager::AnimationManager;
pub use node::{AnimationNode, NodeKind, NodeType, PlaybackState, StartDelay};
pub use snapshot::{AnimationSnapshot, NodePayload, NodeSnapshot};
pub use tree::AnimationTree;
