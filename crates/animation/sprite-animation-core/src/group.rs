//! Group payload: ordered children plus the loop policy governing traversal.

use serde::{Deserialize, Serialize};

use crate::ids::NodeId;
use crate::loop_component::{LoopComponent, LoopMode};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    /// All enabled children run at once.
    Parallel,
    /// Exactly one child plays; completion hands off to a sibling.
    Sequential,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationGroup {
    pub mode: GroupMode,
    pub looping: LoopComponent,
    pub(crate) children: Vec<NodeId>,
}

impl AnimationGroup {
    pub fn new(mode: GroupMode) -> Self {
        Self {
            mode,
            looping: LoopComponent::default(),
            children: Vec::new(),
        }
    }

    pub fn with_loop(mut self, looping: LoopComponent) -> Self {
        self.looping = looping;
        self
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn is_sequential(&self) -> bool {
        self.mode == GroupMode::Sequential
    }

    /// True when children started by this group must run mirrored.
    pub fn should_reverse_anim_direction(&self) -> bool {
        let lc = &self.looping;
        match lc.mode {
            LoopMode::PingPong => !lc.forward,
            LoopMode::Disabled | LoopMode::Rewind => !lc.direction.is_forward(),
        }
    }
}
