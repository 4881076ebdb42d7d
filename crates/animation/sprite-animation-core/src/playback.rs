//! Playback state machine shared by every node kind.
//!
//! - play / pause / stop transitions for leaves and groups
//! - per-frame `update` for leaves (curve stepping, idle preview) and parallel groups
//! - direction reversal helpers reused by sequential groups
//!
//! Sequential hand-off lives in `sequential.rs`.

use crate::binding::AnimationHost;
use crate::group::{AnimationGroup, GroupMode};
use crate::ids::NodeId;
use crate::loop_component::LoopMode;
use crate::node::{AnimationNode, NodeKind, NodeType, PlaybackState};
use crate::tree::AnimationTree;

impl AnimationTree {
    #[inline]
    pub(crate) fn group(&self, id: NodeId) -> Option<&AnimationGroup> {
        self.get(id).and_then(AnimationNode::as_group)
    }

    #[inline]
    pub(crate) fn group_mut(&mut self, id: NodeId) -> Option<&mut AnimationGroup> {
        self.get_mut(id).and_then(AnimationNode::as_group_mut)
    }

    #[inline]
    pub(crate) fn set_state(&mut self, id: NodeId, state: PlaybackState) {
        if let Some(node) = self.get_mut(id) {
            node.state = state;
        }
    }

    #[inline]
    fn is_enabled(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.enabled)
    }

    /// Start or resume `id`. Disabled nodes ignore the request.
    pub fn play(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.enabled {
            return;
        }
        let prev = node.state;
        match node.node_type() {
            NodeType::Property | NodeType::Grid | NodeType::Script => {
                if let Some(node) = self.get_mut(id) {
                    if prev == PlaybackState::Stopped {
                        if let Some(leaf) = node.as_leaf_mut() {
                            leaf.restart();
                        }
                    }
                    node.state = PlaybackState::Playing;
                }
            }
            NodeType::Parallel => self.play_parallel(id, prev),
            NodeType::Sequential => self.play_sequential(id, prev),
        }
    }

    fn play_parallel(&mut self, id: NodeId, prev: PlaybackState) {
        self.set_state(id, PlaybackState::Playing);
        let children = self.children(id).to_vec();
        match prev {
            PlaybackState::Stopped => {
                log::debug!("parallel group {id:?}: play {} children", children.len());
                for c in children {
                    self.play(c);
                }
            }
            PlaybackState::Paused => {
                for c in children {
                    if self.state(c) == Some(PlaybackState::Paused) {
                        self.play(c);
                    }
                }
            }
            PlaybackState::Playing => {}
        }
    }

    /// Pause `id` and every playing descendant reachable through playing groups.
    pub fn pause(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.state.can_pause() {
            return;
        }
        let children = self.children(id).to_vec();
        for c in children {
            if self.state(c) == Some(PlaybackState::Playing) {
                self.pause(c);
            }
        }
        self.set_state(id, PlaybackState::Paused);
    }

    /// Stop `id`, rewinding it and (for groups) all of its children.
    pub fn stop(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.delay.reset();
        let is_group = match &mut node.kind {
            NodeKind::Leaf(leaf) => {
                leaf.rewind();
                false
            }
            NodeKind::Group(g) => {
                g.looping.reset_delay();
                true
            }
        };
        if is_group {
            self.stop_children(id);
        }
        self.set_state(id, PlaybackState::Stopped);
    }

    fn stop_children(&mut self, id: NodeId) {
        let Some(g) = self.group(id) else {
            return;
        };
        let children = g.children().to_vec();
        let reverse = g.should_reverse_anim_direction();
        let forward = g.looping.direction.is_forward();

        if reverse {
            for &c in &children {
                if self.state(c) != Some(PlaybackState::Stopped) {
                    self.reverse_anim_direction(c);
                }
            }
        }
        if forward {
            // back-to-front so later children unwind before the ones they follow
            for &c in children.iter().rev() {
                self.stop(c);
            }
        } else {
            for &c in &children {
                self.reverse_anim_direction(c);
                self.stop(c);
                self.reverse_anim_direction(c);
            }
        }
        if let Some(g) = self.group_mut(id) {
            g.looping.reset_phase();
        }
        log::debug!("group {id:?}: stopped {} children", children.len());
    }

    /// Whether the group `id` runs its children mirrored right now.
    pub fn should_reverse_anim_direction(&self, id: NodeId) -> bool {
        self.group(id)
            .is_some_and(AnimationGroup::should_reverse_anim_direction)
    }

    /// Flip a leaf's curve direction, or a group's loop direction. Parallel
    /// groups pass the flip on to their children; sequential groups mirror
    /// their children themselves when handing off.
    pub fn reverse_anim_direction(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let recurse = match &mut node.kind {
            NodeKind::Leaf(leaf) => {
                leaf.curve.looping.reverse_direction();
                Vec::new()
            }
            NodeKind::Group(g) => {
                g.looping.reverse_direction();
                if g.mode == GroupMode::Parallel {
                    g.children().to_vec()
                } else {
                    Vec::new()
                }
            }
        };
        for c in recurse {
            self.reverse_anim_direction(c);
        }
    }

    /// Advance `id` (and its subtree) by `dt`.
    pub fn update(&mut self, id: NodeId, dt: f32, host: &mut dyn AnimationHost) {
        let Some(node) = self.get(id) else {
            return;
        };
        match node.node_type() {
            NodeType::Property | NodeType::Grid | NodeType::Script => {
                self.update_leaf(id, dt, host);
            }
            NodeType::Parallel => self.update_parallel(id, dt, host),
            NodeType::Sequential => self.update_sequential(id, dt, host),
        }
    }

    /// Forward `dt` to every enabled child of `id`, in order.
    pub(crate) fn update_children(&mut self, id: NodeId, dt: f32, host: &mut dyn AnimationHost) {
        let mut i = 0;
        while let Some(&c) = self.children(id).get(i) {
            if self.is_enabled(c) {
                self.update(c, dt, host);
            }
            i += 1;
        }
    }

    fn update_parallel(&mut self, id: NodeId, dt: f32, host: &mut dyn AnimationHost) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.state.is_playing() && node.delay.should_wait(dt) {
            return;
        }
        self.update_children(id, dt, host);
    }

    fn update_leaf(&mut self, id: NodeId, dt: f32, host: &mut dyn AnimationHost) {
        let parent = self.parent(id);
        let parent_playing = parent
            .and_then(|p| self.state(p))
            .is_some_and(|s| s.is_playing());
        let under_sequential = parent
            .and_then(|p| self.group(p))
            .is_some_and(AnimationGroup::is_sequential);

        let Some(node) = self.get_mut(id) else {
            return;
        };
        let AnimationNode {
            name,
            state,
            delay,
            kind,
            ..
        } = node;
        let NodeKind::Leaf(leaf) = kind else {
            return;
        };

        match *state {
            PlaybackState::Stopped | PlaybackState::Paused => {
                if parent_playing || !leaf.preview_enabled() {
                    return;
                }
                if let Some(initial) = leaf.curve.initial {
                    leaf.curve.set_time(initial);
                    leaf.perform(id, host);
                }
            }
            PlaybackState::Playing => {
                if delay.should_wait(dt) {
                    return;
                }
                let step = dt * leaf.speed;
                if under_sequential {
                    // the sequence owns looping; the leaf runs once per hand-off
                    let mode = leaf.curve.looping.mode;
                    leaf.curve.looping.mode = LoopMode::Disabled;
                    leaf.curve.next(step);
                    leaf.curve.looping.mode = mode;
                } else {
                    if leaf.curve.looping.should_wait_delay(dt) {
                        return;
                    }
                    leaf.curve.next(step);
                }
                leaf.perform(id, host);

                let effective = if under_sequential {
                    LoopMode::Disabled
                } else {
                    leaf.curve.loop_mode()
                };
                if effective == LoopMode::Disabled && leaf.curve.at_boundary() {
                    delay.reset();
                    leaf.curve.looping.reset_delay();
                    *state = PlaybackState::Stopped;
                    log::trace!("leaf '{name}' finished");
                }
            }
        }
    }
}
