//! Loop policy shared by easing curves and sequential groups.
//!
//! A [`LoopComponent`] records what happens at the end boundary (mode), which
//! way the owner traverses (direction), the current ping-pong phase, and an
//! inter-loop delay gate.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Run once and saturate at the boundary.
    #[default]
    Disabled,
    /// Jump back to the start after the boundary.
    Rewind,
    /// Bounce between both ends.
    PingPong,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }

    /// +1 for forward traversal, -1 for backward.
    #[inline]
    pub fn sign(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoopComponent {
    pub mode: LoopMode,
    pub direction: Direction,
    /// Delay inserted after a loop boundary, in (scaled) seconds.
    pub delay: f32,
    /// Ping-pong phase: true while moving towards the end.
    #[serde(skip, default = "default_forward")]
    pub forward: bool,
    /// Set when the owner crossed a loop boundary this frame.
    #[serde(skip)]
    pub has_just_reset: bool,
    #[serde(skip)]
    current_delay: f32,
    #[serde(skip)]
    wait_delay: bool,
}

fn default_forward() -> bool {
    true
}

impl Default for LoopComponent {
    fn default() -> Self {
        Self::new(LoopMode::Disabled)
    }
}

impl LoopComponent {
    pub fn new(mode: LoopMode) -> Self {
        Self {
            mode,
            direction: Direction::Forward,
            delay: 0.0,
            forward: true,
            has_just_reset: false,
            current_delay: 0.0,
            wait_delay: false,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self.forward = direction.is_forward();
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    #[inline]
    pub fn current_delay(&self) -> f32 {
        self.current_delay
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.wait_delay
    }

    pub fn reverse_direction(&mut self) {
        self.direction = self.direction.reversed();
    }

    /// Align the ping-pong phase with the base direction.
    pub fn reset_phase(&mut self) {
        self.forward = self.direction.is_forward();
    }

    pub fn reset_delay(&mut self) {
        self.has_just_reset = false;
        self.current_delay = 0.0;
        self.wait_delay = false;
    }

    /// Inter-loop delay gate.
    ///
    /// A boundary crossing (`has_just_reset`) arms the gate for the *next* call,
    /// so the frame right after the boundary still advances; the following
    /// calls return `true` until `delay` has accumulated.
    pub fn should_wait_delay(&mut self, dt: f32) -> bool {
        if self.wait_delay {
            if self.current_delay < self.delay {
                self.current_delay += dt;
                return true;
            }
            self.wait_delay = false;
            self.current_delay = 0.0;
            return false;
        }
        if self.has_just_reset {
            self.has_just_reset = false;
            self.wait_delay = true;
            self.current_delay = 0.0;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_starts_one_frame_after_boundary() {
        let mut lc = LoopComponent::new(LoopMode::Rewind).with_delay(0.5);
        lc.has_just_reset = true;

        // boundary frame + 1: arms, does not wait
        assert!(!lc.should_wait_delay(0.25));
        assert!(lc.is_waiting());
        assert!(!lc.has_just_reset);

        assert!(lc.should_wait_delay(0.25));
        assert!(lc.should_wait_delay(0.25));
        assert!(!lc.should_wait_delay(0.25));
        assert!(!lc.is_waiting());
        assert!(!lc.should_wait_delay(0.25));
    }

    #[test]
    fn zero_delay_never_waits() {
        let mut lc = LoopComponent::new(LoopMode::PingPong);
        lc.has_just_reset = true;
        assert!(!lc.should_wait_delay(0.1));
        assert!(!lc.should_wait_delay(0.1));
        assert!(!lc.is_waiting());
    }

    #[test]
    fn reset_delay_clears_gate() {
        let mut lc = LoopComponent::new(LoopMode::Rewind).with_delay(1.0);
        lc.has_just_reset = true;
        lc.should_wait_delay(0.1);
        lc.should_wait_delay(0.1);
        lc.reset_delay();
        assert_eq!(lc.current_delay(), 0.0);
        assert!(!lc.is_waiting());
        assert!(!lc.has_just_reset);
    }

    #[test]
    fn reverse_direction_toggles() {
        let mut lc = LoopComponent::default();
        lc.reverse_direction();
        assert_eq!(lc.direction, Direction::Backward);
        lc.reverse_direction();
        assert_eq!(lc.direction, Direction::Forward);
    }
}
