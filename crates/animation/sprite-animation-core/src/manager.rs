//! AnimationManager: data ownership and the public per-frame entry point.
//!
//! Methods:
//! - new, with_grid_functions, add_* (editor actions), clone_animation, reparent
//! - remove_animation, remove_sprite, clear
//! - play / pause / stop on any node, update (once per frame)

use crate::binding::{AnimationHost, PropertyBinding};
use crate::config::Config;
use crate::curve::EasingCurve;
use crate::error::{AnimationError, Result};
use crate::grid::GridFunctionRegistry;
use crate::group::{AnimationGroup, GroupMode};
use crate::ids::{NodeId, ScriptId, SpriteId};
use crate::leaf::{CurveAnimation, LeafTarget};
use crate::node::{AnimationNode, NodeKind};
use crate::tree::AnimationTree;

#[derive(Debug, Clone)]
pub struct AnimationManager {
    pub(crate) tree: AnimationTree,
    speed: f32,
    grid_functions: GridFunctionRegistry,
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AnimationManager {
    pub fn new(cfg: Config) -> Self {
        Self {
            tree: AnimationTree::with_capacity(cfg.node_capacity),
            speed: cfg.speed,
            grid_functions: GridFunctionRegistry::default(),
        }
    }

    pub fn with_grid_functions(mut self, registry: GridFunctionRegistry) -> Self {
        self.grid_functions = registry;
        self
    }

    #[inline]
    pub fn grid_functions(&self) -> &GridFunctionRegistry {
        &self.grid_functions
    }

    #[inline]
    pub fn tree(&self) -> &AnimationTree {
        &self.tree
    }

    /// The root parallel group every animation hangs from.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&AnimationNode> {
        self.tree.get(id)
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut AnimationNode> {
        self.tree.get_mut(id)
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree.children(id)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id)
    }

    /// Number of animations, root excluded.
    pub fn len(&self) -> usize {
        self.tree.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Depth-first listing of every animation below the root as `(depth, node)`;
    /// direct children of the root have depth 0.
    pub fn animations(&self) -> Vec<(usize, NodeId)> {
        self.tree
            .walk()
            .into_iter()
            .skip(1)
            .map(|(depth, id)| (depth - 1, id))
            .collect()
    }

    pub fn add_animation(&mut self, parent: NodeId, node: AnimationNode) -> Result<NodeId> {
        let id = self.tree.insert(parent, node)?;
        log::debug!("added animation {id:?} under {parent:?}");
        Ok(id)
    }

    pub fn add_group(&mut self, parent: NodeId, name: &str, mode: GroupMode) -> Result<NodeId> {
        self.add_animation(parent, AnimationNode::group(name, AnimationGroup::new(mode)))
    }

    pub fn add_property_animation(
        &mut self,
        parent: NodeId,
        name: &str,
        curve: EasingCurve,
        binding: PropertyBinding,
    ) -> Result<NodeId> {
        self.add_animation(
            parent,
            AnimationNode::leaf(name, CurveAnimation::property(curve, binding)),
        )
    }

    /// Add a grid animation running `function` from the registry.
    pub fn add_grid_animation(
        &mut self,
        parent: NodeId,
        name: &str,
        curve: EasingCurve,
        sprite: SpriteId,
        function: &str,
    ) -> Result<NodeId> {
        let func = self
            .grid_functions
            .get(function)
            .ok_or_else(|| AnimationError::UnknownGridFunction(function.to_string()))?;
        let leaf = CurveAnimation::grid(curve, sprite, func);
        self.add_animation(parent, AnimationNode::leaf(name, leaf))
    }

    pub fn add_script_animation(
        &mut self,
        parent: NodeId,
        name: &str,
        curve: EasingCurve,
        sprite: Option<SpriteId>,
        script: ScriptId,
    ) -> Result<NodeId> {
        self.add_animation(
            parent,
            AnimationNode::leaf(name, CurveAnimation::script(curve, sprite, script)),
        )
    }

    /// Duplicate `id` with its subtree; the copy is stopped and placed right after it.
    pub fn clone_animation(&mut self, id: NodeId) -> Result<NodeId> {
        let copy = self.tree.clone_subtree(id)?;
        log::debug!("cloned animation {id:?} -> {copy:?}");
        Ok(copy)
    }

    pub fn reparent(&mut self, id: NodeId, parent: NodeId, index: Option<usize>) -> Result<()> {
        self.tree.reparent(id, parent, index)
    }

    /// Unlink `id` from its parent and drop it with its subtree. Leaf bindings
    /// are cleared first so no host resource is touched afterwards.
    pub fn remove_animation(&mut self, id: NodeId) -> Result<()> {
        let removed = self.tree.remove(id)?;
        log::debug!("removed animation {id:?} ({} nodes)", removed.len());
        Ok(())
    }

    /// Remove every leaf bound to `sprite`, at any depth. Groups stay in place.
    /// Returns the number of leaves removed.
    pub fn remove_sprite(&mut self, sprite: SpriteId) -> usize {
        let removed = self.remove_sprite_under(self.tree.root(), sprite);
        if removed > 0 {
            log::debug!("removed {removed} animations bound to {sprite:?}");
        }
        removed
    }

    fn remove_sprite_under(&mut self, group: NodeId, sprite: SpriteId) -> usize {
        let mut removed = 0;
        for child in self.tree.children(group).to_vec() {
            let Some(node) = self.tree.get(child) else {
                continue;
            };
            let Some(leaf) = node.as_leaf() else {
                removed += self.remove_sprite_under(child, sprite);
                continue;
            };
            let bound = leaf.target.is_bound_to(sprite);
            // remove() clears the binding before dropping the leaf
            if bound && self.tree.remove(child).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// Push a sprite-relative anchor point into every anchor-tagged parameter
    /// of grid animations bound to `sprite`. Returns the number of parameters written.
    pub fn assign_grid_anchor_to_parameters(
        &mut self,
        sprite: SpriteId,
        anchor: [f32; 2],
    ) -> usize {
        self.assign_anchor_under(self.tree.root(), sprite, anchor)
    }

    fn assign_anchor_under(&mut self, group: NodeId, sprite: SpriteId, anchor: [f32; 2]) -> usize {
        let mut written = 0;
        for child in self.tree.children(group).to_vec() {
            let Some(node) = self.tree.get_mut(child) else {
                continue;
            };
            match &mut node.kind {
                NodeKind::Leaf(leaf) => {
                    if let LeafTarget::Grid(grid) = &mut leaf.target {
                        if grid.sprite == Some(sprite) {
                            written += grid
                                .params
                                .iter_mut()
                                .map(|p| p.assign_anchor(anchor))
                                .filter(|&w| w)
                                .count();
                        }
                    }
                }
                NodeKind::Group(_) => written += self.assign_anchor_under(child, sprite, anchor),
            }
        }
        written
    }

    /// Drop every animation; the root group stays.
    pub fn clear(&mut self) {
        let before = self.len();
        self.tree.clear();
        log::debug!("cleared {before} animations");
    }

    pub fn play(&mut self, id: NodeId) -> Result<()> {
        self.tree.node(id)?;
        self.tree.play(id);
        Ok(())
    }

    pub fn pause(&mut self, id: NodeId) -> Result<()> {
        self.tree.node(id)?;
        self.tree.pause(id);
        Ok(())
    }

    pub fn stop(&mut self, id: NodeId) -> Result<()> {
        self.tree.node(id)?;
        self.tree.stop(id);
        Ok(())
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.tree.node_mut(id)?.enabled = enabled;
        Ok(())
    }

    /// Advance the whole tree by one frame. `dt` is scaled by the manager
    /// speed here and nowhere else.
    pub fn update(&mut self, dt: f32, host: &mut dyn AnimationHost) {
        let root = self.tree.root();
        self.tree.update(root, dt * self.speed, host);
    }
}
