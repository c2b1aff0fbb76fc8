// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first paint traversal.
//!
//! Nodes paint in child-list order, so later children draw on top. Each
//! container leaves the surface's transform and global alpha exactly as it
//! found them:
//!
//! - A **group** saves the global alpha, replaces it with its own opacity
//!   (opacities do not multiply down the tree), translates by its offset,
//!   paints its children, then translates back and restores the alpha.
//! - A **transform** brackets its work in `save`/`restore` and builds
//!   translate → anchor → rotate → scale → un-anchor before painting its
//!   child. Rotation is taken modulo 360 degrees; scaling is skipped when
//!   both factors are 1.
//!
//! Hidden nodes paint nothing, including their subtrees.

use super::id::NodeId;
use super::node::{Group, NodeKind, Transform};
use super::store::Scene;
use crate::draw::DrawingSurface;

impl Scene {
    /// Paints every top-level node in order.
    ///
    /// Callers own any background fill and the outer save/restore bracket.
    pub fn paint(&self, surface: &mut dyn DrawingSurface) {
        for &idx in &self.roots {
            self.paint_at(idx, surface);
        }
    }

    /// Paints a single node and its subtree.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn paint_node(&self, id: NodeId, surface: &mut dyn DrawingSurface) {
        self.validate(id);
        self.paint_at(id.idx, surface);
    }

    fn paint_at(&self, idx: u32, surface: &mut dyn DrawingSurface) {
        let node = self.node_at(idx);
        if !node.visible {
            return;
        }
        match &node.kind {
            NodeKind::Shape(shape) => shape.paint(surface),
            NodeKind::Group(group) => self.paint_group(idx, group, surface),
            NodeKind::Transform(transform) => self.paint_transform(idx, transform, surface),
        }
    }

    fn paint_group(&self, idx: u32, group: &Group, surface: &mut dyn DrawingSurface) {
        let alpha = surface.global_alpha();
        surface.set_global_alpha(group.opacity());
        surface.translate(group.x(), group.y());
        for &child in &self.children[idx as usize] {
            self.paint_at(child, surface);
        }
        surface.translate(-group.x(), -group.y());
        surface.set_global_alpha(alpha);
    }

    fn paint_transform(&self, idx: u32, t: &Transform, surface: &mut dyn DrawingSurface) {
        surface.save();
        surface.translate(t.translate_x() + t.anchor_x(), t.translate_y() + t.anchor_y());
        surface.rotate((t.rotate() % 360.0).to_radians());
        if t.scale_x() != 1.0 || t.scale_y() != 1.0 {
            surface.scale(t.scale_x(), t.scale_y());
        }
        surface.translate(-t.anchor_x(), -t.anchor_y());
        for &child in &self.children[idx as usize] {
            self.paint_at(child, surface);
        }
        surface.restore();
    }
}
