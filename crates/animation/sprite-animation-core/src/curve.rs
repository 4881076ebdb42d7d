//! Easing curves: a pure shape function plus a normalized time cursor.
//!
//! - `value()` maps the current progress to `shape(p) * scale + shift`
//! - `next(dt)` moves the cursor and applies the loop policy at the ends
//!
//! Progress is `time` for a forward curve and `1 - time` for a curve whose
//! loop direction is backward, so reversing a curve mirrors its output without
//! touching the cursor.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::loop_component::{LoopComponent, LoopMode};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    #[default]
    Linear,
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
}

impl CurveType {
    /// Shape function on normalized progress (no scale/shift).
    #[inline]
    pub fn shape(self, p: f32) -> f32 {
        match self {
            CurveType::Linear => p,
            CurveType::Quad => p.powi(2),
            CurveType::Cubic => p.powi(3),
            CurveType::Quart => p.powi(4),
            CurveType::Quint => p.powi(5),
            CurveType::Sine => (p * PI).sin(),
            CurveType::Expo => p.exp2(),
            CurveType::Circ => (1.0 - p * p).max(0.0).sqrt(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CurveType::Linear => "linear",
            CurveType::Quad => "quad",
            CurveType::Cubic => "cubic",
            CurveType::Quart => "quart",
            CurveType::Quint => "quint",
            CurveType::Sine => "sine",
            CurveType::Expo => "expo",
            CurveType::Circ => "circ",
        }
    }

    pub const ALL: [CurveType; 8] = [
        CurveType::Linear,
        CurveType::Quad,
        CurveType::Cubic,
        CurveType::Quart,
        CurveType::Quint,
        CurveType::Sine,
        CurveType::Expo,
        CurveType::Circ,
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EasingCurve {
    pub curve_type: CurveType,
    pub scale: f32,
    pub shift: f32,
    /// Time shown while the owning animation is idle (editor preview).
    #[serde(default)]
    pub initial: Option<f32>,
    #[serde(rename = "loop", default)]
    pub looping: LoopComponent,
    #[serde(skip)]
    time: f32,
    #[serde(skip, default = "default_forward")]
    forward: bool,
}

fn default_forward() -> bool {
    true
}

impl Default for EasingCurve {
    fn default() -> Self {
        Self::new(CurveType::Linear)
    }
}

impl EasingCurve {
    pub fn new(curve_type: CurveType) -> Self {
        Self {
            curve_type,
            scale: 1.0,
            shift: 0.0,
            initial: None,
            looping: LoopComponent::default(),
            time: 0.0,
            forward: true,
        }
    }

    pub fn with_range(mut self, scale: f32, shift: f32) -> Self {
        self.scale = scale;
        self.shift = shift;
        self
    }

    pub fn with_loop_mode(mut self, mode: LoopMode) -> Self {
        self.looping.mode = mode;
        self
    }

    pub fn with_loop(mut self, looping: LoopComponent) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_initial(mut self, initial: f32) -> Self {
        self.initial = Some(initial.clamp(0.0, 1.0));
        self
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    #[inline]
    pub fn loop_mode(&self) -> LoopMode {
        self.looping.mode
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// Rewind and restore the forward phase.
    pub fn rewind(&mut self) {
        self.time = 0.0;
        self.forward = true;
    }

    pub fn set_time(&mut self, t: f32) {
        self.time = t.clamp(0.0, 1.0);
    }

    /// Progress fed to the shape function.
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.looping.direction.is_forward() {
            self.time
        } else {
            1.0 - self.time
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.curve_type.shape(self.progress()) * self.scale + self.shift
    }

    /// Advance the cursor by `dt` and return the new value.
    /// Large `dt` is applied in one step; only one boundary is resolved.
    pub fn next(&mut self, dt: f32) -> f32 {
        if self.forward {
            self.time += dt;
        } else {
            self.time -= dt;
        }

        if self.time < 0.0 {
            self.time = 0.0;
            self.forward = true;
            if self.looping.mode == LoopMode::PingPong {
                self.looping.has_just_reset = true;
            }
        } else if self.time > 1.0 {
            match self.looping.mode {
                LoopMode::Disabled => self.time = 1.0,
                LoopMode::Rewind => {
                    self.time -= self.time.floor();
                    self.looping.has_just_reset = true;
                }
                LoopMode::PingPong => {
                    self.time = 1.0;
                    self.forward = false;
                    self.looping.has_just_reset = true;
                }
            }
        }
        self.value()
    }

    /// Whether the cursor sits on the end it is moving towards.
    #[inline]
    pub fn at_boundary(&self) -> bool {
        if self.forward {
            self.time >= 1.0
        } else {
            self.time <= 0.0
        }
    }
}
