// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena storage for nodes with allocation, topology, and mutation.

use alloc::vec::Vec;

use kurbo::Size;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, NodeId, SURFACE_PARENT};
use super::node::{Group, Node, NodeKind, Transform};
use super::property::Property;
use super::shape::Shape;
use crate::dirty;
use crate::paint::ImageKey;

/// What changed in a scene since the last drain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneChanges {
    /// Slot indices whose paint output changed, including every container
    /// above a changed node.
    pub nodes: Vec<u32>,
    /// Whether any node was inserted, attached, detached, or destroyed.
    pub topology_changed: bool,
}

/// Arena of nodes making up one surface's scene.
///
/// Nodes are addressed by [`NodeId`] handles. Destroyed slots are recycled
/// via a free list, and generation counters prevent stale handle access.
///
/// Every node has at most one parent: a group, a transform, or the surface
/// itself (for the top-level nodes listed by [`roots`](Self::roots)). The
/// parent link is used only to decide whether a change must reach the
/// surface; ownership flows strictly downward through child lists.
#[derive(Debug)]
pub struct Scene {
    // -- Payload --
    pub(crate) nodes: Vec<Option<Node>>,

    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) roots: Vec<u32>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) needs_repaint: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            parent: Vec::new(),
            children: Vec::new(),
            roots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            needs_repaint: false,
        }
    }

    // -- Allocation API --

    /// Inserts a detached node and returns its handle.
    pub fn insert(&mut self, node: impl Into<Node>) -> NodeId {
        let idx = self.alloc(node.into());
        self.id_at(idx)
    }

    /// Inserts a transform wrapping `child` and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if `child` is stale or already has a parent.
    pub fn insert_transform(&mut self, transform: Transform, child: NodeId) -> NodeId {
        self.validate(child);
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let t = self.alloc(Node {
            kind: NodeKind::Transform(transform),
            visible: true,
        });
        self.link(t, c);
        self.id_at(t)
    }

    /// Destroys a node and its entire subtree, freeing their slots.
    ///
    /// If the node is attached, it is detached from its parent first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        match self.parent[idx as usize] {
            INVALID => {}
            SURFACE_PARENT => {
                self.roots.retain(|&r| r != idx);
                self.parent[idx as usize] = INVALID;
                self.needs_repaint = true;
            }
            p => {
                self.children[p as usize].retain(|&c| c != idx);
                self.unlink(p, idx);
                self.mark_dirty(p);
            }
        }

        let mut stack = alloc::vec![idx];
        while let Some(i) = stack.pop() {
            stack.append(&mut self.children[i as usize]);
            self.dirty.remove_key(i);
            self.generation[i as usize] += 1;
            self.nodes[i as usize] = None;
            self.parent[i as usize] = INVALID;
            self.free_list.push(i);
        }
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.nodes[id.idx as usize].is_some()
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    // -- Topology API --

    /// Appends `node` to the surface's top-level list.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node already has a parent.
    pub fn add_root(&mut self, node: NodeId) -> &mut Self {
        self.validate(node);
        let n = node.idx;
        assert!(
            self.parent[n as usize] == INVALID,
            "child already has a parent"
        );
        self.parent[n as usize] = SURFACE_PARENT;
        self.roots.push(n);
        self.dirty.mark(n, dirty::TOPOLOGY);
        self.mark_dirty(n);
        self
    }

    /// Removes `node` from the surface's top-level list, if present.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_root(&mut self, node: NodeId) -> &mut Self {
        self.validate(node);
        let n = node.idx;
        if self.parent[n as usize] == SURFACE_PARENT {
            self.roots.retain(|&r| r != n);
            self.parent[n as usize] = INVALID;
            self.dirty.mark(n, dirty::TOPOLOGY);
            self.needs_repaint = true;
        }
        self
    }

    /// Appends `child` to `group`'s children.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `group` is not a group, if
    /// `child` already has a parent, or if `child` is `group` or one of its
    /// ancestors.
    pub fn add_child(&mut self, group: NodeId, child: NodeId) -> &mut Self {
        self.validate(group);
        self.validate(child);
        let g = group.idx;
        let c = child.idx;
        assert!(
            matches!(self.kind(g), NodeKind::Group(_)),
            "node is not a group: {group:?}"
        );
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            !self.is_ancestor_or_self(c, g),
            "cannot attach a node under its own descendant"
        );
        self.link(g, c);
        self.mark_dirty(g);
        self
    }

    /// Removes `child` from `group`'s children, if it is one.
    ///
    /// The group is marked dirty either way.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or `group` is not a group.
    pub fn remove_child(&mut self, group: NodeId, child: NodeId) -> &mut Self {
        self.validate(group);
        self.validate(child);
        let g = group.idx;
        let c = child.idx;
        assert!(
            matches!(self.kind(g), NodeKind::Group(_)),
            "node is not a group: {group:?}"
        );
        let kids = &mut self.children[g as usize];
        if let Some(pos) = kids.iter().position(|&k| k == c) {
            kids.remove(pos);
            self.unlink(g, c);
        }
        self.mark_dirty(g);
        self
    }

    /// Detaches every child of `group`.
    ///
    /// The children stay alive as detached nodes.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `group` is not a group.
    pub fn clear(&mut self, group: NodeId) -> &mut Self {
        self.validate(group);
        let g = group.idx;
        assert!(
            matches!(self.kind(g), NodeKind::Group(_)),
            "node is not a group: {group:?}"
        );
        let kids = core::mem::take(&mut self.children[g as usize]);
        for c in kids {
            self.unlink(g, c);
        }
        self.mark_dirty(g);
        self
    }

    /// Returns the parent of a node, if it is a group or transform.
    ///
    /// Top-level nodes and detached nodes both return `None`; use
    /// [`is_root`](Self::is_root) to tell them apart.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        match self.parent[id.idx as usize] {
            INVALID | SURFACE_PARENT => None,
            p => Some(self.id_at(p)),
        }
    }

    /// Returns whether the node is in the surface's top-level list.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.validate(id);
        self.parent[id.idx as usize] == SURFACE_PARENT
    }

    /// Returns whether the node is reachable from the surface.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.validate(id);
        self.reaches_surface(id.idx)
    }

    /// Returns the top-level nodes in paint order.
    pub fn roots(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.roots.iter().map(|&r| self.id_at(r))
    }

    /// Returns the children of a group (or the single child of a transform)
    /// in paint order. Shapes have no children.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn children(&self, id: NodeId) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.validate(id);
        self.children[id.idx as usize]
            .iter()
            .map(|&c| self.id_at(c))
    }

    /// Returns the number of children.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.children[id.idx as usize].len()
    }

    /// Returns the child at `index`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.validate(id);
        self.children[id.idx as usize]
            .get(index)
            .map(|&c| self.id_at(c))
    }

    // -- Node access --

    /// Returns the node, or `None` if the handle is stale.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if self.is_alive(id) {
            self.nodes[id.idx as usize].as_ref()
        } else {
            None
        }
    }

    /// Returns the node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        self.validate(id);
        self.node_at(id.idx)
    }

    /// Returns a group for editing and marks it dirty.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node is not a group.
    pub fn group_mut(&mut self, id: NodeId) -> &mut Group {
        self.validate(id);
        self.mark_dirty(id.idx);
        match &mut self.node_at_mut(id.idx).kind {
            NodeKind::Group(group) => group,
            _ => panic!("node is not a group: {id:?}"),
        }
    }

    /// Returns a transform for editing and marks it dirty.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node is not a transform.
    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        self.validate(id);
        self.mark_dirty(id.idx);
        match &mut self.node_at_mut(id.idx).kind {
            NodeKind::Transform(transform) => transform,
            _ => panic!("node is not a transform: {id:?}"),
        }
    }

    /// Returns a shape for editing and marks it dirty.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node is not a shape.
    pub fn shape_mut(&mut self, id: NodeId) -> &mut Shape {
        self.validate(id);
        self.mark_dirty(id.idx);
        match &mut self.node_at_mut(id.idx).kind {
            NodeKind::Shape(shape) => shape,
            _ => panic!("node is not a shape: {id:?}"),
        }
    }

    /// Shows or hides a node and marks it dirty.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> &mut Self {
        self.validate(id);
        self.node_at_mut(id.idx).visible = visible;
        self.mark_dirty(id.idx);
        self
    }

    /// Reads a numeric property, or `None` if the node lacks it.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn property(&self, id: NodeId, property: Property) -> Option<f64> {
        self.node(id).property(property)
    }

    /// Writes a numeric property and marks the node dirty. Returns `false`,
    /// touching nothing, if the node lacks the property.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_property(&mut self, id: NodeId, property: Property, value: f64) -> bool {
        self.validate(id);
        let applied = self.node_at_mut(id.idx).set_property(property, value);
        if applied {
            self.mark_dirty(id.idx);
        }
        applied
    }

    // -- Dirty tracking --

    /// Marks a node as changed without editing it.
    ///
    /// Use this after mutating shared state the scene cannot observe, such
    /// as a custom [`PaintGenerator`](crate::paint::PaintGenerator).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn invalidate(&mut self, id: NodeId) {
        self.validate(id);
        self.mark_dirty(id.idx);
    }

    /// Records that the host finished loading `image`.
    ///
    /// Image views showing it adopt `size`, pattern fills stop painting their
    /// fallback color, and every such shape is marked changed. Returns the
    /// number of shapes marked.
    pub fn image_loaded(&mut self, image: ImageKey, size: Size) -> usize {
        let waiting: Vec<u32> = (0..self.len)
            .filter(|&idx| {
                self.nodes[idx as usize]
                    .as_ref()
                    .and_then(Node::as_shape)
                    .is_some_and(|shape| shape.awaits_image(image))
            })
            .collect();
        for &idx in &waiting {
            if let NodeKind::Shape(shape) = &mut self.node_at_mut(idx).kind {
                shape.image_loaded(image, size);
            }
            self.mark_dirty(idx);
        }
        waiting.len()
    }

    /// Returns whether the surface needs a repaint.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.needs_repaint
    }

    /// Drains the change record and clears the repaint flag.
    pub fn drain_changes(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.drain_changes_into(&mut changes);
        changes
    }

    /// Like [`drain_changes`](Self::drain_changes), reusing `changes`'
    /// allocation.
    pub fn drain_changes_into(&mut self, changes: &mut SceneChanges) {
        changes.nodes.clear();
        changes.nodes.extend(
            self.dirty
                .drain(dirty::PAINT)
                .affected()
                .deterministic()
                .run(),
        );
        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();
        self.needs_repaint = false;
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn node_at(&self, idx: u32) -> &Node {
        match &self.nodes[idx as usize] {
            Some(node) => node,
            None => unreachable!("slot {idx} is free"),
        }
    }

    fn node_at_mut(&mut self, idx: u32) -> &mut Node {
        match &mut self.nodes[idx as usize] {
            Some(node) => node,
            None => unreachable!("slot {idx} is free"),
        }
    }

    fn kind(&self, idx: u32) -> &NodeKind {
        &self.node_at(idx).kind
    }

    fn alloc(&mut self, node: Node) -> u32 {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Generation was already bumped when the slot was freed.
            self.nodes[idx as usize] = Some(node);
            self.parent[idx as usize] = INVALID;
            self.children[idx as usize].clear();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.nodes.push(Some(node));
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.generation.push(0);
            idx
        };
        self.dirty.mark(idx, dirty::TOPOLOGY);
        idx
    }

    /// Sets `p` as the parent of `c` and appends `c` to its child list.
    fn link(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.children[p as usize].push(c);
        let _ = self.dirty.add_dependency(p, c, dirty::PAINT);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Clears `c`'s parent link; the caller has already removed it from the
    /// child list of `p`.
    fn unlink(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = INVALID;
        self.dirty.remove_dependency(p, c, dirty::PAINT);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    fn is_ancestor_or_self(&self, candidate: u32, mut idx: u32) -> bool {
        loop {
            if idx == candidate {
                return true;
            }
            match self.parent[idx as usize] {
                INVALID | SURFACE_PARENT => return false,
                p => idx = p,
            }
        }
    }

    fn reaches_surface(&self, mut idx: u32) -> bool {
        loop {
            match self.parent[idx as usize] {
                INVALID => return false,
                SURFACE_PARENT => return true,
                p => idx = p,
            }
        }
    }

    /// Records a change to `idx` and, if it is attached, flags the surface.
    fn mark_dirty(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::PAINT, &EagerPolicy);
        if self.reaches_surface(idx) {
            self.needs_repaint = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;

    use super::*;
    use crate::paint::{Fill, PatternFill, Repeat};
    use crate::scene::shape::{Geometry, ImageView, Shape};

    fn rect() -> Shape {
        Shape::rect(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn insert_and_destroy() {
        let mut scene = Scene::new();
        let id = scene.insert(rect());
        assert!(scene.is_alive(id));
        scene.destroy(id);
        assert!(!scene.is_alive(id));
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut scene = Scene::new();
        let a = scene.insert(rect());
        scene.destroy(a);
        let b = scene.insert(rect());
        assert_eq!(a.index(), b.index(), "slot is reused");
        assert_ne!(a.generation(), b.generation());
        assert!(!scene.is_alive(a));
        assert!(scene.is_alive(b));
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut scene = Scene::new();
        let group = scene.insert(Group::new());
        let a = scene.insert(rect());
        let b = scene.insert(rect());
        scene.add_child(group, a).add_child(group, b);

        assert_eq!(scene.children(group).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(scene.parent(a), Some(group));
        assert_eq!(scene.child(group, 1), Some(b));
        assert_eq!(scene.child_count(group), 2);
    }

    #[test]
    fn remove_child_detaches() {
        let mut scene = Scene::new();
        let group = scene.insert(Group::new());
        let a = scene.insert(rect());
        scene.add_child(group, a);
        scene.remove_child(group, a);
        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.child_count(group), 0);
        // Now free to attach elsewhere.
        scene.add_root(a);
        assert!(scene.is_root(a));
    }

    #[test]
    fn clear_detaches_all_children() {
        let mut scene = Scene::new();
        let group = scene.insert(Group::new());
        let a = scene.insert(rect());
        let b = scene.insert(rect());
        scene.add_child(group, a).add_child(group, b);
        scene.clear(group);
        assert_eq!(scene.child_count(group), 0);
        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.parent(b), None);
        assert!(scene.is_alive(a), "cleared children stay alive");
    }

    #[test]
    fn destroy_frees_subtree() {
        let mut scene = Scene::new();
        let outer = scene.insert(Group::new());
        let inner = scene.insert(Group::new());
        let leaf = scene.insert(rect());
        scene.add_root(outer);
        scene.add_child(outer, inner).add_child(inner, leaf);

        scene.destroy(inner);
        assert!(!scene.is_alive(inner));
        assert!(!scene.is_alive(leaf));
        assert_eq!(scene.child_count(outer), 0);
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn transform_wraps_one_child() {
        let mut scene = Scene::new();
        let leaf = scene.insert(rect());
        let t = scene.insert_transform(Transform::new(), leaf);
        assert_eq!(scene.parent(leaf), Some(t));
        assert_eq!(scene.children(t).collect::<Vec<_>>(), vec![leaf]);
    }

    #[test]
    fn dirty_only_reaches_surface_when_attached() {
        let mut scene = Scene::new();
        let group = scene.insert(Group::new());
        let leaf = scene.insert(rect());
        scene.add_child(group, leaf);
        let _ = scene.drain_changes();

        scene.shape_mut(leaf).set_stroke_width(3.0);
        assert!(!scene.is_dirty(), "detached subtree does not flag the surface");

        scene.add_root(group);
        let _ = scene.drain_changes();
        assert!(!scene.is_dirty());

        scene.shape_mut(leaf).set_stroke_width(4.0);
        assert!(scene.is_dirty(), "change bubbles through the group to the surface");
    }

    #[test]
    fn changes_include_ancestors() {
        let mut scene = Scene::new();
        let group = scene.insert(Group::new());
        let leaf = scene.insert(rect());
        scene.add_root(group).add_child(group, leaf);
        let first = scene.drain_changes();
        assert!(first.topology_changed);

        scene.set_property(leaf, Property::X, 5.0);
        let changes = scene.drain_changes();
        assert!(!changes.topology_changed);
        assert!(changes.nodes.contains(&leaf.index()));
        assert!(
            changes.nodes.contains(&group.index()),
            "paint changes propagate to containers"
        );
    }

    #[test]
    fn unsupported_property_is_not_applied() {
        let mut scene = Scene::new();
        let group = scene.insert(Group::new());
        scene.add_root(group);
        let _ = scene.drain_changes();
        assert!(!scene.set_property(group, Property::Radius, 1.0));
        assert!(!scene.is_dirty());
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_attach_panics() {
        let mut scene = Scene::new();
        let g1 = scene.insert(Group::new());
        let g2 = scene.insert(Group::new());
        let leaf = scene.insert(rect());
        scene.add_child(g1, leaf);
        scene.add_child(g2, leaf);
    }

    #[test]
    fn image_load_marks_waiting_shapes() {
        let mut scene = Scene::new();
        let pattern = Rc::new(PatternFill::new(ImageKey(1), Repeat::Repeat));
        let a = scene.insert(rect().with_fill(Fill::generator(Rc::clone(&pattern))));
        let b = scene.insert(rect().with_fill(Fill::generator(Rc::clone(&pattern))));
        let view = scene.insert(Shape::image(ImageView::new(ImageKey(1))));
        let other = scene.insert(Shape::image(ImageView::new(ImageKey(2))));
        scene.add_root(a).add_root(b).add_root(view).add_root(other);
        let _ = scene.drain_changes();

        let size = Size::new(32.0, 16.0);
        assert_eq!(scene.image_loaded(ImageKey(1), size), 3, "two fills and one view");
        assert!(scene.is_dirty(), "loaded image needs a repaint");
        assert!(pattern.is_loaded(), "shared pattern loaded once for both shapes");
        match scene.get(view).and_then(Node::as_shape).map(Shape::geometry) {
            Some(Geometry::Image(v)) => assert_eq!(v.size(), size, "view adopts the image size"),
            other => panic!("expected an image view, got {other:?}"),
        }

        let changes = scene.drain_changes();
        for id in [a, b, view] {
            assert!(changes.nodes.contains(&id.index()), "{id:?} marked changed");
        }
        assert!(!changes.nodes.contains(&other.index()), "other image untouched");

        assert_eq!(scene.image_loaded(ImageKey(1), size), 0, "nothing waits twice");
        assert!(!scene.is_dirty(), "repeated load does not dirty the scene");
    }

    #[test]
    #[should_panic(expected = "cannot attach a node under its own descendant")]
    fn cycle_panics() {
        let mut scene = Scene::new();
        let outer = scene.insert(Group::new());
        let inner = scene.insert(Group::new());
        scene.add_child(outer, inner);
        scene.add_child(inner, outer);
    }

    #[test]
    #[should_panic(expected = "node is not a group")]
    fn add_child_to_shape_panics() {
        let mut scene = Scene::new();
        let a = scene.insert(rect());
        let b = scene.insert(rect());
        scene.add_child(a, b);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_edit() {
        let mut scene = Scene::new();
        let id = scene.insert(rect());
        scene.destroy(id);
        let _ = scene.shape_mut(id);
    }
}
