//! Grid deformation function schemas.
//!
//! The deformation code itself lives in the host; the core only needs each
//! function's parameter schema so grid animations can carry parameter values
//! and receive anchor points.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Float,
    Vec2,
}

/// Which component(s) of a sprite-relative anchor drive a parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorAxis {
    X,
    Y,
    XY,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Float(f32),
    Vec2([f32; 2]),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Vec2(_) => ParamKind::Vec2,
        }
    }

    pub fn zero(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Float => ParamValue::Float(0.0),
            ParamKind::Vec2 => ParamValue::Vec2([0.0, 0.0]),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    #[serde(default)]
    pub default: Option<ParamValue>,
    #[serde(default)]
    pub min: Option<f32>,
    #[serde(default)]
    pub max: Option<f32>,
    #[serde(default)]
    pub anchor: Option<AnchorAxis>,
    /// Drag multiplier for editor widgets; ignored by the engine.
    #[serde(default)]
    pub multiply: Option<f32>,
}

impl ParamSpec {
    pub fn float(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Float,
            default: None,
            min: None,
            max: None,
            anchor: None,
            multiply: None,
        }
    }

    pub fn vec2(name: &str) -> Self {
        Self {
            kind: ParamKind::Vec2,
            ..Self::float(name)
        }
    }

    pub fn with_default(mut self, value: ParamValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_bounds(mut self, min: f32, max: f32) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_anchor(mut self, axis: AnchorAxis) -> Self {
        self.anchor = Some(axis);
        self
    }

    pub fn with_multiply(mut self, multiply: f32) -> Self {
        self.multiply = Some(multiply);
        self
    }

    fn clamp(&self, v: f32) -> f32 {
        let v = self.min.map_or(v, |m| v.max(m));
        self.max.map_or(v, |m| v.min(m))
    }

    /// Coerce `value` to this parameter's kind and bounds.
    pub fn sanitize(&self, value: ParamValue) -> ParamValue {
        match (self.kind, value) {
            (ParamKind::Float, ParamValue::Float(v)) => ParamValue::Float(self.clamp(v)),
            (ParamKind::Float, ParamValue::Vec2([x, _])) => ParamValue::Float(self.clamp(x)),
            (ParamKind::Vec2, ParamValue::Vec2([x, y])) => {
                ParamValue::Vec2([self.clamp(x), self.clamp(y)])
            }
            (ParamKind::Vec2, ParamValue::Float(v)) => {
                let v = self.clamp(v);
                ParamValue::Vec2([v, v])
            }
        }
    }

    pub fn initial_value(&self) -> ParamValue {
        self.sanitize(self.default.unwrap_or_else(|| ParamValue::zero(self.kind)))
    }
}

/// A parameter slot on a grid animation: schema plus current value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridParam {
    pub spec: ParamSpec,
    pub value: ParamValue,
}

impl GridParam {
    pub fn new(spec: ParamSpec) -> Self {
        let value = spec.initial_value();
        Self { spec, value }
    }

    pub fn set(&mut self, value: ParamValue) {
        self.value = self.spec.sanitize(value);
    }

    /// Write the anchor components selected by the parameter's anchor axis.
    /// Returns false when the parameter is not anchor-driven.
    pub fn assign_anchor(&mut self, anchor: [f32; 2]) -> bool {
        let Some(axis) = self.spec.anchor else {
            return false;
        };
        let next = match (axis, self.value) {
            (AnchorAxis::X, ParamValue::Float(_)) => ParamValue::Float(anchor[0]),
            (AnchorAxis::Y, ParamValue::Float(_)) => ParamValue::Float(anchor[1]),
            (AnchorAxis::XY, ParamValue::Float(_)) => ParamValue::Float(anchor[0]),
            (AnchorAxis::X, ParamValue::Vec2([_, y])) => ParamValue::Vec2([anchor[0], y]),
            (AnchorAxis::Y, ParamValue::Vec2([x, _])) => ParamValue::Vec2([x, anchor[1]]),
            (AnchorAxis::XY, ParamValue::Vec2(_)) => ParamValue::Vec2(anchor),
        };
        self.set(next);
        true
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridFunction {
    pub name: String,
    pub params: Vec<ParamSpec>,
}

impl GridFunction {
    pub fn new(name: &str, params: Vec<ParamSpec>) -> Self {
        Self {
            name: name.to_string(),
            params,
        }
    }

    pub fn has_anchor(&self) -> bool {
        self.params.iter().any(|p| p.anchor.is_some())
    }

    /// Fresh parameter slots initialized from the schema defaults.
    pub fn instantiate_params(&self) -> Vec<GridParam> {
        self.params.iter().cloned().map(GridParam::new).collect()
    }
}

/// Read-only lookup of grid functions by name, populated by the host.
#[derive(Clone, Debug, Default)]
pub struct GridFunctionRegistry {
    functions: HashMap<String, GridFunction>,
}

impl GridFunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, function: GridFunction) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn with(mut self, function: GridFunction) -> Self {
        self.register(function);
        self
    }

    pub fn get(&self, name: &str) -> Option<&GridFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}
