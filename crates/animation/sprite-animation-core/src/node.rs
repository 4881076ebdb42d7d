//! Animation nodes: the state shared by every kind plus a per-kind payload.

use serde::{Deserialize, Serialize};

use crate::group::{AnimationGroup, GroupMode};
use crate::ids::NodeId;
use crate::leaf::{CurveAnimation, LeafTarget};

/// Playback state of an animation node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Paused,
    Playing,
}

impl PlaybackState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Paused => "paused",
            Self::Playing => "playing",
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    #[inline]
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Per-node start delay: an accumulate-until-threshold counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StartDelay {
    pub delay: f32,
    #[serde(skip)]
    current: f32,
}

impl StartDelay {
    pub fn new(delay: f32) -> Self {
        Self {
            delay: delay.max(0.0),
            current: 0.0,
        }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
    }

    /// Returns true while the configured delay has not elapsed yet.
    pub fn should_wait(&mut self, dt: f32) -> bool {
        if self.current < self.delay {
            self.current += dt;
            true
        } else {
            false
        }
    }
}

/// Node type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Property,
    Grid,
    Script,
    Parallel,
    Sequential,
}

impl NodeType {
    pub fn is_group(self) -> bool {
        matches!(self, NodeType::Parallel | NodeType::Sequential)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf(CurveAnimation),
    Group(AnimationGroup),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationNode {
    pub name: String,
    pub enabled: bool,
    pub delay: StartDelay,
    pub kind: NodeKind,
    pub(crate) state: PlaybackState,
    pub(crate) parent: Option<NodeId>,
}

impl AnimationNode {
    fn with_kind(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            delay: StartDelay::default(),
            kind,
            state: PlaybackState::Stopped,
            parent: None,
        }
    }

    pub fn leaf(name: &str, anim: CurveAnimation) -> Self {
        Self::with_kind(name, NodeKind::Leaf(anim))
    }

    pub fn group(name: &str, group: AnimationGroup) -> Self {
        Self::with_kind(name, NodeKind::Group(group))
    }

    pub fn parallel(name: &str) -> Self {
        Self::group(name, AnimationGroup::new(GroupMode::Parallel))
    }

    pub fn sequential(name: &str) -> Self {
        Self::group(name, AnimationGroup::new(GroupMode::Sequential))
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = StartDelay::new(delay);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Leaf(leaf) => match leaf.target {
                LeafTarget::Property(_) => NodeType::Property,
                LeafTarget::Grid(_) => NodeType::Grid,
                LeafTarget::Script(_) => NodeType::Script,
            },
            NodeKind::Group(g) => match g.mode {
                GroupMode::Parallel => NodeType::Parallel,
                GroupMode::Sequential => NodeType::Sequential,
            },
        }
    }

    pub fn as_leaf(&self) -> Option<&CurveAnimation> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Group(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut CurveAnimation> {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&AnimationGroup> {
        match &self.kind {
            NodeKind::Group(g) => Some(g),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut AnimationGroup> {
        match &mut self.kind {
            NodeKind::Group(g) => Some(g),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Copy of this node's own data with no parent, no children and the
    /// preview lock off. Playback state is kept so the copy can be stopped
    /// the same way as the source would be.
    pub(crate) fn unlinked_copy(&self) -> Self {
        let mut kind = self.kind.clone();
        match &mut kind {
            NodeKind::Leaf(leaf) => leaf.lock = false,
            NodeKind::Group(g) => g.children.clear(),
        }
        Self {
            name: self.name.clone(),
            enabled: self.enabled,
            delay: self.delay,
            kind,
            state: self.state,
            parent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_waits_full_duration() {
        let mut d = StartDelay::new(0.5);
        assert!(d.should_wait(0.25));
        assert!(d.should_wait(0.25));
        assert!(!d.should_wait(0.25));
        d.reset();
        assert_eq!(d.current(), 0.0);
        assert!(d.should_wait(0.25));
    }

    #[test]
    fn zero_start_delay_never_waits() {
        let mut d = StartDelay::default();
        assert!(!d.should_wait(1.0));
    }

    #[test]
    fn only_playing_can_pause() {
        assert!(PlaybackState::Playing.can_pause());
        assert!(!PlaybackState::Paused.can_pause());
        assert!(!PlaybackState::Stopped.can_pause());
        assert_eq!(PlaybackState::Paused.name(), "paused");
    }
}
