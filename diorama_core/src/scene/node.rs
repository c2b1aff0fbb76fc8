// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node variants and their local properties.
//!
//! A [`Node`] is the per-slot payload stored in a [`Scene`](super::Scene).
//! Topology (parent link, child list) lives in the scene itself, so the
//! values here can be freely edited in place without breaking ownership
//! invariants.

use kurbo::Point;

use super::shape::{Geometry, Shape};

/// Container offset and opacity.
///
/// The children themselves are stored by the scene; see
/// [`Scene::children`](super::Scene::children).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Group {
    x: f64,
    y: f64,
    opacity: f64,
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    /// Creates a group at the origin with full opacity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            opacity: 1.0,
        }
    }

    /// Returns a copy offset to `(x, y)`.
    #[must_use]
    pub const fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Returns a copy with the given opacity.
    #[must_use]
    pub const fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Horizontal offset of the children.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical offset of the children.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Opacity in `0.0..=1.0`.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Sets the horizontal offset.
    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.x = x;
        self
    }

    /// Sets the vertical offset.
    pub fn set_y(&mut self, y: f64) -> &mut Self {
        self.y = y;
        self
    }

    /// Sets the opacity.
    pub fn set_opacity(&mut self, opacity: f64) -> &mut Self {
        self.opacity = opacity;
        self
    }

    /// Converts a point from the group's coordinate space into its
    /// children's space.
    #[must_use]
    pub fn convert_to_child_coords(&self, pt: Point) -> Point {
        Point::new(pt.x - self.x, pt.y - self.y)
    }
}

/// Translate, rotate, and scale about an anchor, applied to one wrapped child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    translate_x: f64,
    translate_y: f64,
    scale_x: f64,
    scale_y: f64,
    rotate: f64,
    anchor_x: f64,
    anchor_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! transform_field {
    ($get:ident, $set:ident, $with:ident, $doc:literal) => {
        #[doc = concat!("Returns the ", $doc, ".")]
        #[must_use]
        pub fn $get(&self) -> f64 {
            self.$get
        }

        #[doc = concat!("Sets the ", $doc, ".")]
        pub fn $set(&mut self, value: f64) -> &mut Self {
            self.$get = value;
            self
        }

        #[doc = concat!("Returns a copy with the given ", $doc, ".")]
        #[must_use]
        pub fn $with(mut self, value: f64) -> Self {
            self.$get = value;
            self
        }
    };
}

impl Transform {
    /// Creates an identity transform.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotate: 0.0,
            anchor_x: 0.0,
            anchor_y: 0.0,
        }
    }

    transform_field!(translate_x, set_translate_x, with_translate_x, "horizontal translation");
    transform_field!(translate_y, set_translate_y, with_translate_y, "vertical translation");
    transform_field!(scale_x, set_scale_x, with_scale_x, "horizontal scale factor");
    transform_field!(scale_y, set_scale_y, with_scale_y, "vertical scale factor");
    transform_field!(rotate, set_rotate, with_rotate, "rotation in degrees");
    transform_field!(anchor_x, set_anchor_x, with_anchor_x, "pivot x for rotation and scale");
    transform_field!(anchor_y, set_anchor_y, with_anchor_y, "pivot y for rotation and scale");
}

/// What a node is.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// A drawable leaf.
    Shape(Shape),
    /// An ordered container.
    Group(Group),
    /// A single-child transform wrapper.
    Transform(Transform),
}

/// Identifies a node's variant for the property registry and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// [`Group`].
    Group,
    /// [`Transform`].
    Transform,
    /// Rectangle shape.
    Rect,
    /// Circle shape.
    Circle,
    /// Ellipse shape.
    Ellipse,
    /// Path shape.
    Path,
    /// Text shape.
    Text,
    /// Image shape.
    Image,
}

impl NodeType {
    /// Returns a lowercase name for display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Transform => "transform",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Path => "path",
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

/// A scene-graph node: its variant plus the visibility flag.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) visible: bool,
}

impl Node {
    /// Returns the node's variant.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns whether the node is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the node's variant tag.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Group(_) => NodeType::Group,
            NodeKind::Transform(_) => NodeType::Transform,
            NodeKind::Shape(shape) => match shape.geometry() {
                Geometry::Rect(_) => NodeType::Rect,
                Geometry::Circle(_) => NodeType::Circle,
                Geometry::Ellipse(_) => NodeType::Ellipse,
                Geometry::Path(_) => NodeType::Path,
                Geometry::Text(_) => NodeType::Text,
                Geometry::Image(_) => NodeType::Image,
            },
        }
    }

    /// Returns the shape, if this node is one.
    #[must_use]
    pub fn as_shape(&self) -> Option<&Shape> {
        match &self.kind {
            NodeKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    /// Returns the group, if this node is one.
    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Returns the transform, if this node is one.
    #[must_use]
    pub fn as_transform(&self) -> Option<&Transform> {
        match &self.kind {
            NodeKind::Transform(transform) => Some(transform),
            _ => None,
        }
    }

    /// Returns whether `pt`, in the node's local space, hits the node itself.
    ///
    /// Containers never contain a point; only their descendants can.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        match &self.kind {
            NodeKind::Shape(shape) => shape.contains(pt),
            NodeKind::Group(_) | NodeKind::Transform(_) => false,
        }
    }
}

impl From<Shape> for Node {
    fn from(shape: Shape) -> Self {
        Self {
            kind: NodeKind::Shape(shape),
            visible: true,
        }
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Self {
            kind: NodeKind::Group(group),
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_child_coords_subtract_offset() {
        let group = Group::new().with_offset(10.0, 20.0);
        assert_eq!(
            group.convert_to_child_coords(Point::new(15.0, 25.0)),
            Point::new(5.0, 5.0)
        );
    }

    #[test]
    fn containers_never_contain() {
        let group = Node::from(Group::new());
        assert!(!group.contains(Point::ORIGIN));
        assert_eq!(group.node_type(), NodeType::Group);
    }

    #[test]
    fn transform_defaults_to_identity() {
        let t = Transform::new();
        assert_eq!(t.scale_x(), 1.0);
        assert_eq!(t.scale_y(), 1.0);
        assert_eq!(t.rotate(), 0.0);
        let t = t.with_rotate(90.0).with_anchor_x(5.0);
        assert_eq!(t.rotate(), 90.0);
        assert_eq!(t.anchor_x(), 5.0);
    }

    #[test]
    fn shapes_report_their_type() {
        assert_eq!(Node::from(Shape::circle(0.0, 0.0, 1.0)).node_type(), NodeType::Circle);
        assert_eq!(Node::from(Shape::text("t", 0.0, 0.0)).node_type(), NodeType::Text);
    }
}
