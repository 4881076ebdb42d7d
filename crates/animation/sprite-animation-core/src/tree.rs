//! Arena-backed animation tree.
//!
//! Nodes live in a [`SlotMap`]; groups own their children through ordered
//! handle lists and every node keeps a non-owning parent handle. All structural
//! edits go through this type so both directions stay in sync. Handles of
//! removed nodes simply stop resolving.

use slotmap::SlotMap;

use crate::error::{AnimationError, Result};
use crate::ids::NodeId;
use crate::node::{AnimationNode, NodeKind, PlaybackState};

#[derive(Debug, Clone)]
pub struct AnimationTree {
    nodes: SlotMap<NodeId, AnimationNode>,
    root: NodeId,
}

impl Default for AnimationTree {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl AnimationTree {
    /// Create a tree holding only the root parallel group.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = SlotMap::with_capacity_and_key(capacity.max(1));
        let root = nodes.insert(AnimationNode::parallel("root"));
        Self { nodes, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root remains.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&AnimationNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut AnimationNode> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&AnimationNode> {
        self.nodes.get(id).ok_or(AnimationError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut AnimationNode> {
        self.nodes.get_mut(id).ok_or(AnimationError::NodeNotFound(id))
    }

    /// Children of a group; empty for leaves and unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id).and_then(AnimationNode::as_group) {
            Some(g) => g.children(),
            None => &[],
        }
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(AnimationNode::parent)
    }

    #[inline]
    pub fn state(&self, id: NodeId) -> Option<PlaybackState> {
        self.nodes.get(id).map(AnimationNode::state)
    }

    /// Append `node` as the last child of `parent`.
    pub fn insert(&mut self, parent: NodeId, node: AnimationNode) -> Result<NodeId> {
        self.insert_at(parent, None, node)
    }

    /// Insert `node` under `parent` at `index` (clamped; `None` appends).
    pub fn insert_at(
        &mut self,
        parent: NodeId,
        index: Option<usize>,
        mut node: AnimationNode,
    ) -> Result<NodeId> {
        self.require_group(parent)?;
        node.parent = None;
        if let NodeKind::Group(g) = &mut node.kind {
            g.children.clear();
        }
        let id = self.nodes.insert(node);
        self.link(parent, id, index);
        Ok(id)
    }

    fn require_group(&self, id: NodeId) -> Result<()> {
        match self.node(id)?.kind {
            NodeKind::Group(_) => Ok(()),
            NodeKind::Leaf(_) => Err(AnimationError::NotAGroup(id)),
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        if let Some(g) = self.nodes.get_mut(parent).and_then(AnimationNode::as_group_mut) {
            let at = index.map_or(g.children.len(), |i| i.min(g.children.len()));
            g.children.insert(at, child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Detach `id` from its parent; returns the slot index it occupied.
    fn unlink(&mut self, id: NodeId) -> Option<usize> {
        let parent = self.nodes.get_mut(id)?.parent.take()?;
        let g = self.nodes.get_mut(parent).and_then(AnimationNode::as_group_mut)?;
        let pos = g.children.iter().position(|&c| c == id)?;
        g.children.remove(pos);
        Some(pos)
    }

    /// True if `ancestor` is `id` or lies on the path from `id` to the root.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            if n == ancestor {
                return true;
            }
            cursor = self.parent(n);
        }
        false
    }

    /// Pre-order list of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Depth-first enumeration of the whole tree as `(depth, node)`, root at depth 0.
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0usize, self.root)];
        while let Some((depth, n)) = stack.pop() {
            out.push((depth, n));
            stack.extend(self.children(n).iter().rev().map(|&c| (depth + 1, c)));
        }
        out
    }

    /// Remove `id` and its subtree. Leaf bindings are cleared before the
    /// removed nodes are handed back.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<AnimationNode>> {
        if id == self.root {
            return Err(AnimationError::RootNode);
        }
        self.node(id)?;
        self.unlink(id);
        let mut removed = Vec::new();
        for n in self.descendants(id) {
            if let Some(mut node) = self.nodes.remove(n) {
                if let Some(leaf) = node.as_leaf_mut() {
                    leaf.target.clear_binding();
                }
                removed.push(node);
            }
        }
        Ok(removed)
    }

    /// Move `id` under `new_parent` at `index` (`None` appends).
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId, index: Option<usize>) -> Result<()> {
        if id == self.root {
            return Err(AnimationError::RootNode);
        }
        self.node(id)?;
        self.require_group(new_parent)?;
        if self.is_ancestor(id, new_parent) {
            return Err(AnimationError::WouldCycle {
                node: id,
                parent: new_parent,
            });
        }
        self.unlink(id);
        self.link(new_parent, id, index);
        Ok(())
    }

    /// Deep-copy the subtree at `id` and insert the copy right after it.
    ///
    /// The copy comes out stopped with counters zeroed. Direction flips the
    /// running source picked up from its parents are undone first, as `stop`
    /// would, so the copy carries the authored directions.
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId> {
        if id == self.root {
            return Err(AnimationError::RootNode);
        }
        let parent = self.node(id)?.parent.ok_or(AnimationError::RootNode)?;
        let pos = self.children(parent).iter().position(|&c| c == id);
        let copy = self.copy_subtree(id);
        self.link(parent, copy, pos.map(|p| p + 1));

        if self.state(copy) != Some(PlaybackState::Stopped)
            && self.should_reverse_anim_direction(parent)
        {
            self.reverse_anim_direction(copy);
        }
        self.stop(copy);
        Ok(copy)
    }

    fn copy_subtree(&mut self, src: NodeId) -> NodeId {
        let copy = self.nodes[src].unlinked_copy();
        let new_id = self.nodes.insert(copy);
        let children = self.children(src).to_vec();
        for child in children {
            let c = self.copy_subtree(child);
            self.link(new_id, c, None);
        }
        new_id
    }

    /// Drop every node except the root, which is reset to a stopped, empty
    /// group. Leaf bindings are cleared on the way out.
    pub fn clear(&mut self) {
        let root = self.root;
        self.nodes.retain(|id, node| {
            if id == root {
                return true;
            }
            if let Some(leaf) = node.as_leaf_mut() {
                leaf.target.clear_binding();
            }
            false
        });
        let node = &mut self.nodes[root];
        node.state = PlaybackState::Stopped;
        node.delay.reset();
        if let Some(g) = node.as_group_mut() {
            g.children.clear();
            g.looping.reset_delay();
        }
    }

    /// Verify parent/child links: every child points back at the group
    /// listing it, exactly once, and every non-root node is listed.
    pub fn links_consistent(&self) -> bool {
        let mut listed = 0usize;
        for (id, node) in &self.nodes {
            for &c in self.children(id) {
                listed += 1;
                if self.parent(c) != Some(id) {
                    return false;
                }
            }
            if let Some(p) = node.parent {
                let slots = self.children(p).iter().filter(|&&c| c == id).count();
                if slots != 1 {
                    return false;
                }
            } else if id != self.root {
                return false;
            }
        }
        listed + 1 == self.nodes.len()
    }

    pub(crate) fn root_node(&self) -> &AnimationNode {
        &self.nodes[self.root]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::PropertyBinding;
    use crate::curve::EasingCurve;
    use crate::ids::{PropertyHandle, SpriteId};
    use crate::leaf::CurveAnimation;

    fn leaf(name: &str) -> AnimationNode {
        AnimationNode::leaf(
            name,
            CurveAnimation::property(
                EasingCurve::default(),
                PropertyBinding {
                    sprite: SpriteId(1),
                    property: PropertyHandle(0),
                },
            ),
        )
    }

    #[test]
    fn insert_and_walk_preorder() {
        let mut t = AnimationTree::default();
        let root = t.root();
        let g = t.insert(root, AnimationNode::sequential("seq")).unwrap();
        let a = t.insert(g, leaf("a")).unwrap();
        let b = t.insert(root, leaf("b")).unwrap();
        let c = t.insert_at(g, Some(0), leaf("c")).unwrap();

        assert_eq!(t.walk(), vec![(0, root), (1, g), (2, c), (2, a), (1, b)]);
        assert!(t.links_consistent());
    }

    #[test]
    fn leaves_cannot_parent() {
        let mut t = AnimationTree::default();
        let a = t.insert(t.root(), leaf("a")).unwrap();
        assert!(matches!(
            t.insert(a, leaf("b")),
            Err(AnimationError::NotAGroup(_))
        ));
    }

    #[test]
    fn reparent_rejects_cycles_and_root() {
        let mut t = AnimationTree::default();
        let root = t.root();
        let outer = t.insert(root, AnimationNode::parallel("outer")).unwrap();
        let inner = t.insert(outer, AnimationNode::sequential("inner")).unwrap();

        assert!(matches!(
            t.reparent(outer, inner, None),
            Err(AnimationError::WouldCycle { .. })
        ));
        assert!(matches!(
            t.reparent(root, outer, None),
            Err(AnimationError::RootNode)
        ));

        t.reparent(inner, root, Some(0)).unwrap();
        assert_eq!(t.children(root), &[inner, outer]);
        assert!(t.children(outer).is_empty());
        assert!(t.links_consistent());
    }

    #[test]
    fn remove_drops_subtree_and_clears_bindings() {
        let mut t = AnimationTree::default();
        let g = t.insert(t.root(), AnimationNode::parallel("g")).unwrap();
        let a = t.insert(g, leaf("a")).unwrap();
        let removed = t.remove(g).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(removed
            .iter()
            .filter_map(AnimationNode::as_leaf)
            .all(|l| l.target.sprite().is_none()));
        assert!(!t.contains(a));
        assert!(t.is_empty());
        assert!(t.links_consistent());
    }

    #[test]
    fn clear_keeps_root() {
        let mut t = AnimationTree::default();
        let root = t.root();
        let a = t.insert(root, leaf("a")).unwrap();
        let g = t.insert(root, AnimationNode::sequential("g")).unwrap();
        let b = t.insert(g, leaf("b")).unwrap();
        t.play(root);
        t.clear();
        assert_eq!(t.len(), 1);
        assert_eq!(t.root(), root);
        assert!(t.children(root).is_empty());
        assert!(!t.contains(a) && !t.contains(g) && !t.contains(b));
        assert_eq!(t.state(root), Some(PlaybackState::Stopped));
        assert!(t.links_consistent());
    }
}
