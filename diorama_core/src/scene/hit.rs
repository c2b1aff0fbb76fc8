// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Front-to-back hit testing.
//!
//! The search mirrors paint order: lists are scanned from the last entry to
//! the first, so the node drawn on top is found first. A visible node that
//! contains the point wins outright. Otherwise a visible group is searched
//! recursively, with the point moved into the group's child space by
//! subtracting the group's offset.
//!
//! Transforms are opaque to hit testing: a transform never contains a point
//! and the search does not descend into its child.

use kurbo::Point;

use super::id::NodeId;
use super::node::NodeKind;
use super::store::Scene;

impl Scene {
    /// Returns the topmost visible node containing `pt`, given in surface
    /// coordinates, or `None` if nothing is hit.
    #[must_use]
    pub fn hit_test(&self, pt: Point) -> Option<NodeId> {
        self.search(&self.roots, pt)
    }

    fn search(&self, list: &[u32], pt: Point) -> Option<NodeId> {
        for &idx in list.iter().rev() {
            let node = self.node_at(idx);
            if !node.visible {
                continue;
            }
            if node.contains(pt) {
                return Some(self.id_at(idx));
            }
            if let NodeKind::Group(group) = &node.kind {
                let local = group.convert_to_child_coords(pt);
                if let Some(hit) = self.search(&self.children[idx as usize], local) {
                    return Some(hit);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use crate::scene::{Group, Scene, Shape, Transform};

    #[test]
    fn rect_in_offset_group_is_hit() {
        let mut scene = Scene::new();
        let group = scene.insert(Group::new().with_offset(10.0, 10.0));
        let rect = scene.insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        scene.add_root(group).add_child(group, rect);

        assert_eq!(scene.hit_test(Point::new(15.0, 15.0)), Some(rect));
        assert_eq!(scene.hit_test(Point::new(5.0, 5.0)), None, "left of the group");
    }

    #[test]
    fn last_child_wins() {
        let mut scene = Scene::new();
        let group = scene.insert(Group::new());
        let back = scene.insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        let front = scene.insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        scene.add_root(group).add_child(group, back).add_child(group, front);

        assert_eq!(scene.hit_test(Point::new(25.0, 25.0)), Some(front));
    }

    #[test]
    fn later_roots_win() {
        let mut scene = Scene::new();
        let a = scene.insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        let b = scene.insert(Shape::rect(25.0, 25.0, 50.0, 50.0));
        scene.add_root(a).add_root(b);

        assert_eq!(scene.hit_test(Point::new(30.0, 30.0)), Some(b));
        assert_eq!(scene.hit_test(Point::new(10.0, 10.0)), Some(a));
    }

    #[test]
    fn nested_groups_translate_at_each_level() {
        let mut scene = Scene::new();
        let outer = scene.insert(Group::new().with_offset(100.0, 0.0));
        let inner = scene.insert(Group::new().with_offset(0.0, 100.0));
        let leaf = scene.insert(Shape::rect(0.0, 0.0, 10.0, 10.0));
        scene.add_root(outer).add_child(outer, inner).add_child(inner, leaf);

        assert_eq!(scene.hit_test(Point::new(105.0, 105.0)), Some(leaf));
        assert_eq!(scene.hit_test(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn hidden_nodes_and_groups_are_skipped() {
        let mut scene = Scene::new();
        let group = scene.insert(Group::new());
        let inside = scene.insert(Shape::rect(0.0, 0.0, 10.0, 10.0));
        let below = scene.insert(Shape::rect(0.0, 0.0, 10.0, 10.0));
        scene.add_root(below).add_root(group).add_child(group, inside);

        assert_eq!(scene.hit_test(Point::new(5.0, 5.0)), Some(inside));
        scene.set_visible(group, false);
        assert_eq!(scene.hit_test(Point::new(5.0, 5.0)), Some(below));
        scene.set_visible(below, false);
        assert_eq!(scene.hit_test(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn transformed_children_are_not_hit() {
        let mut scene = Scene::new();
        let leaf = scene.insert(Shape::rect(0.0, 0.0, 50.0, 50.0));
        let t = scene.insert_transform(Transform::new(), leaf);
        scene.add_root(t);

        assert_eq!(
            scene.hit_test(Point::new(25.0, 25.0)),
            None,
            "transforms do not forward hit tests"
        );
    }
}
