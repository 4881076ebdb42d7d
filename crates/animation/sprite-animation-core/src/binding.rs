//! Host seam: where leaf animations deliver their values.
//!
//! The core never owns sprites, vertex buffers or script contexts. Each leaf
//! keeps opaque ids and, once per update, hands its curve value to the host
//! through [`AnimationHost`]. Hosts must clear bindings (see
//! `AnimationManager::remove_sprite`) before destroying the resources they name.

use serde::{Deserialize, Serialize};

use crate::grid::GridParam;
use crate::ids::{NodeId, PropertyHandle, ScriptId, SpriteId};

/// A float slot on a sprite, written by property animations.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PropertyBinding {
    pub sprite: SpriteId,
    pub property: PropertyHandle,
}

/// Arguments for one grid deformation call.
#[derive(Debug)]
pub struct GridCall<'a> {
    pub node: NodeId,
    pub sprite: SpriteId,
    pub function: &'a str,
    pub params: &'a [GridParam],
    pub value: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptEntry {
    Init,
    Update,
}

impl ScriptEntry {
    /// Name of the function looked up in the script object.
    pub fn name(self) -> &'static str {
        match self {
            ScriptEntry::Init => "init",
            ScriptEntry::Update => "update",
        }
    }
}

/// Arguments for one script entry-point call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptCall {
    pub node: NodeId,
    pub script: ScriptId,
    pub sprite: Option<SpriteId>,
    pub entry: ScriptEntry,
    pub value: f32,
}

/// Implemented by the editor/runtime that owns sprites and scripts.
pub trait AnimationHost {
    fn set_property(&mut self, binding: PropertyBinding, value: f32);

    fn deform_grid(&mut self, call: &GridCall<'_>);

    /// Errors are reported back as text; the animation keeps running.
    fn call_script(&mut self, call: &ScriptCall) -> Result<(), String>;
}
