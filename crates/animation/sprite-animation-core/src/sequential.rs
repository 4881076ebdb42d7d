//! Sequential groups: a relay where exactly one child plays at a time.
//!
//! When the playing child stops, the group picks the next one from its loop
//! mode and direction:
//! - Disabled: step once per hand-off, stop the group past either end
//! - Rewind: wrap to the opposite end and re-stop every child
//! - PingPong: replay the boundary child mirrored, then walk back
//!
//! Crossing an end sets `has_just_reset` so the group's loop delay kicks in
//! on the frame after the boundary.

use crate::binding::AnimationHost;
use crate::ids::NodeId;
use crate::loop_component::LoopMode;
use crate::node::PlaybackState;
use crate::tree::AnimationTree;

impl AnimationTree {
    pub(crate) fn play_sequential(&mut self, id: NodeId, prev: PlaybackState) {
        self.set_state(id, PlaybackState::Playing);
        match prev {
            PlaybackState::Stopped => {
                let children = self.children(id).to_vec();
                for &c in &children {
                    self.stop(c);
                }
                let Some(g) = self.group_mut(id) else {
                    return;
                };
                g.looping.reset_delay();
                g.looping.reset_phase();
                if children.is_empty() {
                    return;
                }
                let start = if g.looping.direction.is_forward() {
                    0
                } else {
                    children.len() - 1
                };
                log::debug!("sequential group {id:?}: start at child {start}");
                self.start_child(id, start);
            }
            PlaybackState::Paused => {
                let paused = self
                    .children(id)
                    .iter()
                    .copied()
                    .find(|&c| self.state(c) == Some(PlaybackState::Paused));
                if let Some(c) = paused {
                    self.play(c);
                }
            }
            PlaybackState::Playing => {}
        }
    }

    /// Index of the child currently holding the cursor.
    pub fn playing_child_index(&self, id: NodeId) -> Option<usize> {
        self.children(id)
            .iter()
            .position(|&c| self.state(c) == Some(PlaybackState::Playing))
    }

    pub(crate) fn update_sequential(&mut self, id: NodeId, dt: f32, host: &mut dyn AnimationHost) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.state.is_playing() {
            if node.delay.should_wait(dt) {
                return;
            }
            if let Some(g) = node.as_group_mut() {
                if g.looping.should_wait_delay(dt) {
                    return;
                }
            }
        }

        let playing = self.playing_child_index(id);

        // every enabled child sees the frame so off-cursor children keep previewing
        self.update_children(id, dt, host);

        let Some(index) = playing else {
            return;
        };
        let Some(&finished) = self.children(id).get(index) else {
            return;
        };
        if self.state(finished) != Some(PlaybackState::Stopped) {
            return;
        }
        if self.should_reverse_anim_direction(id) {
            self.reverse_anim_direction(finished);
        }
        self.hand_off(id, index);
    }

    /// Play child `index`, mirrored when the group currently runs reversed.
    /// A disabled child counts as finished immediately.
    fn start_child(&mut self, id: NodeId, index: usize) {
        let Some(&target) = self.children(id).get(index) else {
            return;
        };
        if !self.get(target).is_some_and(|n| n.enabled) {
            self.hand_off(id, index);
            return;
        }
        if self.should_reverse_anim_direction(id) {
            self.reverse_anim_direction(target);
        }
        self.play(target);
    }

    /// Move the cursor on from `finished` to the next enabled child.
    fn hand_off(&mut self, id: NodeId, finished: usize) {
        let len = self.children(id).len();
        let mut current = finished;
        // a full ping-pong sweep visits each slot at most twice
        for _ in 0..=2 * len {
            let Some(next) = self.next_index(id, current) else {
                self.finish_sequence(id);
                return;
            };
            let Some(&target) = self.children(id).get(next) else {
                break;
            };
            if self.get(target).is_some_and(|n| n.enabled) {
                if self.state(target) != Some(PlaybackState::Playing) {
                    if self.should_reverse_anim_direction(id) {
                        self.reverse_anim_direction(target);
                    }
                    log::trace!("sequential group {id:?}: hand off {current} -> {next}");
                    self.play(target);
                }
                return;
            }
            current = next;
        }
        log::warn!("sequential group {id:?}: no enabled child to hand off to");
        self.finish_sequence(id);
    }

    /// Next cursor position after `current` finished; `None` ends the sequence.
    fn next_index(&mut self, id: NodeId, current: usize) -> Option<usize> {
        let len = self.children(id).len() as isize;
        let g = self.group_mut(id)?;
        let lc = &mut g.looping;
        let cur = current as isize;
        let in_range = |i: isize| (0..len).contains(&i);
        let mode = lc.mode;

        match mode {
            LoopMode::Disabled => {
                let next = cur + lc.direction.sign();
                in_range(next).then_some(next as usize)
            }
            LoopMode::Rewind => {
                let step = lc.direction.sign();
                let next = cur + step;
                if in_range(next) {
                    return Some(next as usize);
                }
                lc.has_just_reset = true;
                let wrapped = if step > 0 { 0 } else { len - 1 };
                let children = g.children().to_vec();
                for c in children {
                    self.stop(c);
                }
                Some(wrapped as usize)
            }
            LoopMode::PingPong => {
                let step = if lc.forward { 1 } else { -1 };
                let next = cur + step;
                if in_range(next) {
                    return Some(next as usize);
                }
                // boundary child plays again, mirrored, before the cursor turns
                lc.has_just_reset = true;
                lc.forward = !lc.forward;
                Some(current)
            }
        }
    }

    fn finish_sequence(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.delay.reset();
        if let Some(g) = node.as_group_mut() {
            g.looping.reset_delay();
            g.looping.reset_phase();
        }
        node.state = PlaybackState::Stopped;
        log::debug!("sequential group '{}' finished", node.name);
    }
}
