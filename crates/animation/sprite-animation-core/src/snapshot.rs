//! Serde view of the animation tree for an external project serializer.
//!
//! Snapshots carry authored data only. Playback state, delay counters and
//! curve time are not recorded; a restored tree starts fully stopped.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AnimationError, Result};
use crate::grid::GridFunctionRegistry;
use crate::group::{AnimationGroup, GroupMode};
use crate::ids::NodeId;
use crate::leaf::{CurveAnimation, LeafTarget};
use crate::loop_component::LoopComponent;
use crate::manager::AnimationManager;
use crate::node::{AnimationNode, NodeKind, StartDelay};
use crate::tree::AnimationTree;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSnapshot {
    pub speed: f32,
    pub root: NodeSnapshot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub delay: f32,
    #[serde(flatten)]
    pub payload: NodePayload,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

fn enabled_default() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodePayload {
    Leaf { animation: CurveAnimation },
    Group {
        mode: GroupMode,
        #[serde(rename = "loop", default)]
        looping: LoopComponent,
    },
}

impl AnimationSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl AnimationManager {
    /// Capture the authored tree, root included.
    ///
    /// A stopped copy of the tree is serialized, so direction flips held by
    /// running sequences are undone and the live tree is left untouched.
    pub fn snapshot(&self) -> AnimationSnapshot {
        let mut idle = self.tree.clone();
        idle.stop(idle.root());
        AnimationSnapshot {
            speed: self.speed(),
            root: snapshot_node(&idle, idle.root(), idle.root_node()),
        }
    }

    /// Rebuild a manager from `snapshot`. Every node comes back stopped with
    /// zeroed counters; grid leaves must name a function known to `registry`.
    pub fn from_snapshot(
        snapshot: &AnimationSnapshot,
        cfg: Config,
        registry: GridFunctionRegistry,
    ) -> Result<Self> {
        let NodePayload::Group {
            mode: GroupMode::Parallel,
            looping,
        } = &snapshot.root.payload
        else {
            return Err(AnimationError::InvalidSnapshot {
                reason: "root must be a parallel group".to_string(),
            });
        };

        let mut manager = AnimationManager::new(cfg).with_grid_functions(registry);
        manager.set_speed(snapshot.speed);
        let root = manager.root();
        if let Some(node) = manager.tree.get_mut(root) {
            node.name = snapshot.root.name.clone();
            node.enabled = snapshot.root.enabled;
            node.delay = StartDelay::new(snapshot.root.delay);
            if let Some(g) = node.as_group_mut() {
                g.looping = idle_loop(looping);
            }
        }
        for child in &snapshot.root.children {
            manager.restore_node(root, child)?;
        }
        log::debug!("restored {} animations from snapshot", manager.len());
        Ok(manager)
    }

    fn restore_node(&mut self, parent: NodeId, snap: &NodeSnapshot) -> Result<()> {
        let node = match &snap.payload {
            NodePayload::Leaf { animation } => {
                if !snap.children.is_empty() {
                    return Err(AnimationError::InvalidSnapshot {
                        reason: format!("leaf '{}' has children", snap.name),
                    });
                }
                if let LeafTarget::Grid(grid) = &animation.target {
                    if !self.grid_functions().contains(&grid.function) {
                        return Err(AnimationError::UnknownGridFunction(grid.function.clone()));
                    }
                }
                let mut leaf = animation.clone();
                leaf.rewind();
                AnimationNode::leaf(&snap.name, leaf)
            }
            NodePayload::Group { mode, looping } => AnimationNode::group(
                &snap.name,
                AnimationGroup::new(*mode).with_loop(idle_loop(looping)),
            ),
        };
        let node = node.with_enabled(snap.enabled).with_delay(snap.delay);
        let id = self.tree.insert(parent, node)?;
        for child in &snap.children {
            self.restore_node(id, child)?;
        }
        Ok(())
    }
}

fn snapshot_node(tree: &AnimationTree, id: NodeId, node: &AnimationNode) -> NodeSnapshot {
    let payload = match &node.kind {
        NodeKind::Leaf(leaf) => NodePayload::Leaf {
            animation: leaf.clone(),
        },
        NodeKind::Group(g) => NodePayload::Group {
            mode: g.mode,
            looping: g.looping.clone(),
        },
    };
    NodeSnapshot {
        name: node.name.clone(),
        enabled: node.enabled,
        delay: node.delay.delay,
        payload,
        children: tree
            .children(id)
            .iter()
            .filter_map(|&c| tree.get(c).map(|n| snapshot_node(tree, c, n)))
            .collect(),
    }
}

fn idle_loop(looping: &LoopComponent) -> LoopComponent {
    let mut lc = looping.clone();
    lc.reset_delay();
    lc.reset_phase();
    lc
}
