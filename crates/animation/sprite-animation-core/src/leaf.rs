//! Curve-driven leaf animations and their effect targets.

use serde::{Deserialize, Serialize};

use crate::binding::{AnimationHost, GridCall, PropertyBinding, ScriptCall, ScriptEntry};
use crate::curve::EasingCurve;
use crate::grid::{GridFunction, GridParam};
use crate::ids::{NodeId, ScriptId, SpriteId};

/// Writes the curve value into a host-owned float slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyTarget {
    pub binding: Option<PropertyBinding>,
}

/// Runs a named grid deformation on a sprite's vertices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridTarget {
    pub sprite: Option<SpriteId>,
    pub function: String,
    pub params: Vec<GridParam>,
}

impl GridTarget {
    pub fn new(sprite: SpriteId, function: &GridFunction) -> Self {
        Self {
            sprite: Some(sprite),
            function: function.name.clone(),
            params: function.instantiate_params(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&GridParam> {
        self.params.iter().find(|p| p.spec.name == name)
    }

    pub fn param_mut(&mut self, name: &str) -> Option<&mut GridParam> {
        self.params.iter_mut().find(|p| p.spec.name == name)
    }
}

/// Calls `init`/`update` in a host script with the curve value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptTarget {
    pub sprite: Option<SpriteId>,
    pub script: Option<ScriptId>,
    /// Whether `init` already ran since the last play from stop.
    #[serde(skip)]
    pub initialized: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LeafTarget {
    Property(PropertyTarget),
    Grid(GridTarget),
    Script(ScriptTarget),
}

impl LeafTarget {
    /// Sprite this target acts on, if still bound.
    pub fn sprite(&self) -> Option<SpriteId> {
        match self {
            LeafTarget::Property(p) => p.binding.map(|b| b.sprite),
            LeafTarget::Grid(g) => g.sprite,
            LeafTarget::Script(s) => s.sprite,
        }
    }

    pub fn is_bound_to(&self, sprite: SpriteId) -> bool {
        self.sprite() == Some(sprite)
    }

    /// Drop every reference to host-owned resources.
    pub fn clear_binding(&mut self) {
        match self {
            LeafTarget::Property(p) => p.binding = None,
            LeafTarget::Grid(g) => g.sprite = None,
            LeafTarget::Script(s) => {
                s.sprite = None;
                s.script = None;
            }
        }
    }
}

/// Leaf payload: a curve, its own speed factor, and where the value goes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveAnimation {
    pub curve: EasingCurve,
    pub speed: f32,
    /// Idle preview: when set, a stopped/paused leaf shows the curve's initial value.
    pub lock: bool,
    pub target: LeafTarget,
}

impl CurveAnimation {
    pub fn new(curve: EasingCurve, target: LeafTarget) -> Self {
        let lock = !matches!(target, LeafTarget::Script(_));
        Self {
            curve,
            speed: 1.0,
            lock,
            target,
        }
    }

    pub fn property(curve: EasingCurve, binding: PropertyBinding) -> Self {
        Self::new(
            curve,
            LeafTarget::Property(PropertyTarget {
                binding: Some(binding),
            }),
        )
    }

    pub fn grid(curve: EasingCurve, sprite: SpriteId, function: &GridFunction) -> Self {
        Self::new(curve, LeafTarget::Grid(GridTarget::new(sprite, function)))
    }

    pub fn script(curve: EasingCurve, sprite: Option<SpriteId>, script: ScriptId) -> Self {
        Self::new(
            curve,
            LeafTarget::Script(ScriptTarget {
                sprite,
                script: Some(script),
                initialized: false,
            }),
        )
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Script leaves never preview; others follow `lock`.
    #[inline]
    pub fn preview_enabled(&self) -> bool {
        self.lock && !matches!(self.target, LeafTarget::Script(_))
    }

    /// Start over from time 0 (play from stop).
    pub(crate) fn restart(&mut self) {
        self.curve.reset();
        if let LeafTarget::Script(s) = &mut self.target {
            s.initialized = false;
        }
    }

    /// Return to the state of a freshly stopped leaf.
    pub(crate) fn rewind(&mut self) {
        self.curve.rewind();
        self.curve.looping.reset_delay();
        if let LeafTarget::Script(s) = &mut self.target {
            s.initialized = false;
        }
    }

    /// Deliver the current curve value to the host.
    pub(crate) fn perform(&mut self, node: NodeId, host: &mut dyn AnimationHost) {
        let value = self.curve.value();
        match &mut self.target {
            LeafTarget::Property(p) => {
                if let Some(binding) = p.binding {
                    host.set_property(binding, value);
                }
            }
            LeafTarget::Grid(g) => {
                if let Some(sprite) = g.sprite {
                    host.deform_grid(&GridCall {
                        node,
                        sprite,
                        function: &g.function,
                        params: &g.params,
                        value,
                    });
                }
            }
            LeafTarget::Script(s) => {
                let Some(script) = s.script else {
                    return;
                };
                let entry = if s.initialized {
                    ScriptEntry::Update
                } else {
                    ScriptEntry::Init
                };
                s.initialized = true;
                let call = ScriptCall {
                    node,
                    script,
                    sprite: s.sprite,
                    entry,
                    value,
                };
                if let Err(err) = host.call_script(&call) {
                    log::warn!(
                        "script {:?} entry '{}' failed: {err}",
                        script,
                        entry.name()
                    );
                }
            }
        }
    }
}
