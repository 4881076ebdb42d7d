//! Core configuration for sprite-animation-core.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for the animation manager.
/// Keep this minimal; hosts usually only tweak `speed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial global speed multiplier applied once per frame at the manager boundary.
    pub speed: f32,
    /// Initial capacity hint for the node arena.
    pub node_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: 1.0,
            node_capacity: 64,
        }
    }
}

impl Config {
    /// Parse a config from JSON; missing fields fall back to defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
