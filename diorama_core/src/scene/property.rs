// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animatable numeric properties.
//!
//! Each [`NodeType`] has a fixed table of the [`Property`] values it
//! supports. Animations resolve their property against that table once, when
//! they are created, so an unknown or unsupported name is reported to the
//! caller instead of surfacing inside the frame loop.
//!
//! | Node type | Properties |
//! |---|---|
//! | group | `x`, `y`, `opacity` |
//! | transform | `translate_x`, `translate_y`, `scale_x`, `scale_y`, `rotate`, `anchor_x`, `anchor_y` |
//! | rect, ellipse | `x`, `y`, `width`, `height`, `stroke_width` |
//! | circle | `x`, `y`, `radius`, `stroke_width` |
//! | text | `x`, `y`, `stroke_width` |
//! | path | `stroke_width` |
//! | image | `x`, `y` |

use super::node::{Node, NodeKind, NodeType};
use super::shape::Geometry;

/// A numeric node property that can be read, written, and animated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Horizontal position or offset.
    X,
    /// Vertical position or offset.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
    /// Circle radius.
    Radius,
    /// Group opacity.
    Opacity,
    /// Stroke width.
    StrokeWidth,
    /// Transform horizontal translation.
    TranslateX,
    /// Transform vertical translation.
    TranslateY,
    /// Transform horizontal scale.
    ScaleX,
    /// Transform vertical scale.
    ScaleY,
    /// Transform rotation in degrees.
    Rotate,
    /// Transform pivot x.
    AnchorX,
    /// Transform pivot y.
    AnchorY,
}

impl Property {
    const ALL: [Self; 14] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Radius,
        Self::Opacity,
        Self::StrokeWidth,
        Self::TranslateX,
        Self::TranslateY,
        Self::ScaleX,
        Self::ScaleY,
        Self::Rotate,
        Self::AnchorX,
        Self::AnchorY,
    ];

    /// Returns the property's registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Radius => "radius",
            Self::Opacity => "opacity",
            Self::StrokeWidth => "stroke_width",
            Self::TranslateX => "translate_x",
            Self::TranslateY => "translate_y",
            Self::ScaleX => "scale_x",
            Self::ScaleY => "scale_y",
            Self::Rotate => "rotate",
            Self::AnchorX => "anchor_x",
            Self::AnchorY => "anchor_y",
        }
    }

    /// Looks a property up by its registry name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl NodeType {
    /// Returns the properties this node type supports.
    #[must_use]
    pub const fn properties(self) -> &'static [Property] {
        use Property::*;
        match self {
            Self::Group => &[X, Y, Opacity],
            Self::Transform => &[
                TranslateX, TranslateY, ScaleX, ScaleY, Rotate, AnchorX, AnchorY,
            ],
            Self::Rect | Self::Ellipse => &[X, Y, Width, Height, StrokeWidth],
            Self::Circle => &[X, Y, Radius, StrokeWidth],
            Self::Text => &[X, Y, StrokeWidth],
            Self::Path => &[StrokeWidth],
            Self::Image => &[X, Y],
        }
    }

    /// Returns whether this node type supports `property`.
    #[must_use]
    pub fn supports(self, property: Property) -> bool {
        self.properties().contains(&property)
    }
}

impl Node {
    /// Reads a numeric property, or `None` if this node does not have it.
    #[must_use]
    pub fn property(&self, property: Property) -> Option<f64> {
        use Property::*;
        let value = match (&self.kind, property) {
            (NodeKind::Group(g), X) => g.x(),
            (NodeKind::Group(g), Y) => g.y(),
            (NodeKind::Group(g), Opacity) => g.opacity(),
            (NodeKind::Transform(t), TranslateX) => t.translate_x(),
            (NodeKind::Transform(t), TranslateY) => t.translate_y(),
            (NodeKind::Transform(t), ScaleX) => t.scale_x(),
            (NodeKind::Transform(t), ScaleY) => t.scale_y(),
            (NodeKind::Transform(t), Rotate) => t.rotate(),
            (NodeKind::Transform(t), AnchorX) => t.anchor_x(),
            (NodeKind::Transform(t), AnchorY) => t.anchor_y(),
            (NodeKind::Shape(s), StrokeWidth) if !matches!(s.geometry(), Geometry::Image(_)) => {
                s.stroke_width()
            }
            (NodeKind::Shape(s), _) => match (s.geometry(), property) {
                (Geometry::Rect(r), X) => r.x,
                (Geometry::Rect(r), Y) => r.y,
                (Geometry::Rect(r), Width) => r.width,
                (Geometry::Rect(r), Height) => r.height,
                (Geometry::Ellipse(e), X) => e.x,
                (Geometry::Ellipse(e), Y) => e.y,
                (Geometry::Ellipse(e), Width) => e.width,
                (Geometry::Ellipse(e), Height) => e.height,
                (Geometry::Circle(c), X) => c.x,
                (Geometry::Circle(c), Y) => c.y,
                (Geometry::Circle(c), Radius) => c.radius,
                (Geometry::Text(t), X) => t.x,
                (Geometry::Text(t), Y) => t.y,
                (Geometry::Image(i), X) => i.x,
                (Geometry::Image(i), Y) => i.y,
                _ => return None,
            },
            _ => return None,
        };
        Some(value)
    }

    /// Writes a numeric property. Returns `false` if this node does not have
    /// it, leaving the node untouched.
    pub fn set_property(&mut self, property: Property, value: f64) -> bool {
        use Property::*;
        match (&mut self.kind, property) {
            (NodeKind::Group(g), X) => _ = g.set_x(value),
            (NodeKind::Group(g), Y) => _ = g.set_y(value),
            (NodeKind::Group(g), Opacity) => _ = g.set_opacity(value),
            (NodeKind::Transform(t), TranslateX) => _ = t.set_translate_x(value),
            (NodeKind::Transform(t), TranslateY) => _ = t.set_translate_y(value),
            (NodeKind::Transform(t), ScaleX) => _ = t.set_scale_x(value),
            (NodeKind::Transform(t), ScaleY) => _ = t.set_scale_y(value),
            (NodeKind::Transform(t), Rotate) => _ = t.set_rotate(value),
            (NodeKind::Transform(t), AnchorX) => _ = t.set_anchor_x(value),
            (NodeKind::Transform(t), AnchorY) => _ = t.set_anchor_y(value),
            (NodeKind::Shape(s), StrokeWidth) if !matches!(s.geometry(), Geometry::Image(_)) => {
                _ = s.set_stroke_width(value);
            }
            (NodeKind::Shape(s), _) => {
                let slot = match (s.geometry_mut(), property) {
                    (Geometry::Rect(r), X) => &mut r.x,
                    (Geometry::Rect(r), Y) => &mut r.y,
                    (Geometry::Rect(r), Width) => &mut r.width,
                    (Geometry::Rect(r), Height) => &mut r.height,
                    (Geometry::Ellipse(e), X) => &mut e.x,
                    (Geometry::Ellipse(e), Y) => &mut e.y,
                    (Geometry::Ellipse(e), Width) => &mut e.width,
                    (Geometry::Ellipse(e), Height) => &mut e.height,
                    (Geometry::Circle(c), X) => &mut c.x,
                    (Geometry::Circle(c), Y) => &mut c.y,
                    (Geometry::Circle(c), Radius) => &mut c.radius,
                    (Geometry::Text(t), X) => &mut t.x,
                    (Geometry::Text(t), Y) => &mut t.y,
                    (Geometry::Image(i), X) => &mut i.x,
                    (Geometry::Image(i), Y) => &mut i.y,
                    _ => return false,
                };
                *slot = value;
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::{Group, Transform};
    use crate::scene::shape::{ImageView, Shape};
    use crate::paint::ImageKey;
    use crate::path::Path;

    fn all_types() -> [Node; 7] {
        [
            Node::from(Group::new()),
            Node {
                kind: NodeKind::Transform(Transform::new()),
                visible: true,
            },
            Node::from(Shape::rect(0.0, 0.0, 1.0, 1.0)),
            Node::from(Shape::circle(0.0, 0.0, 1.0)),
            Node::from(Shape::ellipse(0.0, 0.0, 1.0, 1.0)),
            Node::from(Shape::text("t", 0.0, 0.0)),
            Node::from(Shape::image(ImageView::new(ImageKey(0)))),
        ]
    }

    #[test]
    fn names_round_trip() {
        for p in Property::ALL {
            assert_eq!(Property::from_name(p.name()), Some(p), "{p:?}");
        }
        assert_eq!(Property::from_name("color"), None);
    }

    #[test]
    fn registry_matches_accessors() {
        let mut nodes = all_types();
        for node in &mut nodes {
            let ty = node.node_type();
            for p in Property::ALL {
                let supported = ty.supports(p);
                assert_eq!(
                    node.property(p).is_some(),
                    supported,
                    "getter for {p:?} on {}",
                    ty.name()
                );
                assert_eq!(
                    node.set_property(p, 7.0),
                    supported,
                    "setter for {p:?} on {}",
                    ty.name()
                );
                if supported {
                    assert_eq!(node.property(p), Some(7.0));
                }
            }
        }
    }

    #[test]
    fn path_only_has_stroke_width() {
        let path = Path::builder().move_to(0.0, 0.0).build();
        let mut node = Node::from(Shape::path(path));
        assert_eq!(node.node_type().properties(), &[Property::StrokeWidth]);
        assert!(!node.set_property(Property::X, 1.0));
    }
}
