// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording [`DrawingSurface`].
//!
//! [`DisplayList`] keeps the canvas-style state machine (transform stack,
//! global alpha, current brush, path under construction) and appends one
//! [`DrawItem`] per visible draw operation, in submission order. Each item
//! carries the world transform and alpha that were current when it was
//! issued, so callers can assert on composed coordinate spaces without a
//! rasterizer.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Point, Rect, Size};

use crate::draw::DrawingSurface;
use crate::paint::{Brush, Color, ImageKey};

/// What a recorded item draws.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// A filled rectangle.
    FillRect(Rect),
    /// A filled path, in local coordinates.
    FillPath(BezPath),
    /// An image blit.
    Image {
        /// Which image.
        image: ImageKey,
        /// Top-left corner in local coordinates.
        origin: Point,
    },
    /// A text run.
    Text {
        /// Text content.
        text: String,
        /// Baseline origin in local coordinates.
        origin: Point,
        /// Font description.
        font: String,
    },
}

/// One recorded draw operation with its composed state.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    /// The operation.
    pub op: DrawOp,
    /// Transform from local to surface coordinates when the op was issued.
    pub transform: Affine,
    /// Global alpha when the op was issued.
    pub alpha: f64,
    /// Brush installed when the op was issued (ignored for images).
    pub brush: Brush,
}

#[derive(Clone, Copy, Debug)]
struct State {
    transform: Affine,
    alpha: f64,
}

/// A drawing surface that records operations instead of rasterizing them.
#[derive(Clone, Debug)]
pub struct DisplayList {
    size: Size,
    state: State,
    stack: Vec<State>,
    brush: Brush,
    path: BezPath,
    items: Vec<DrawItem>,
    max_depth: usize,
}

impl DisplayList {
    /// Creates an empty list for a surface of the given size.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            state: State {
                transform: Affine::IDENTITY,
                alpha: 1.0,
            },
            stack: Vec::new(),
            brush: Brush::Solid(Color::BLACK),
            path: BezPath::new(),
            items: Vec::new(),
            max_depth: 0,
        }
    }

    /// Returns the recorded items in submission order.
    #[must_use]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Returns the current transform.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    /// Returns the current save-stack depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the deepest save-stack depth reached since the last clear.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Drops all recorded items and resets the state machine.
    pub fn clear(&mut self) {
        self.items.clear();
        self.stack.clear();
        self.state = State {
            transform: Affine::IDENTITY,
            alpha: 1.0,
        };
        self.path = BezPath::new();
        self.max_depth = 0;
    }

    fn push(&mut self, op: DrawOp) {
        self.items.push(DrawItem {
            op,
            transform: self.state.transform,
            alpha: self.state.alpha,
            brush: self.brush.clone(),
        });
    }
}

impl DrawingSurface for DisplayList {
    fn size(&self) -> Size {
        self.size
    }

    fn save(&mut self) {
        self.stack.push(self.state);
        self.max_depth = self.max_depth.max(self.stack.len());
    }

    fn restore(&mut self) {
        // Unbalanced restores are ignored, as canvas contexts do.
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform * Affine::translate((dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform = self.state.transform * Affine::rotate(radians);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform * Affine::scale_non_uniform(sx, sy);
    }

    fn global_alpha(&self) -> f64 {
        self.state.alpha
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha;
    }

    fn set_fill(&mut self, brush: &Brush) {
        self.brush = brush.clone();
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: Point) {
        self.path.line_to(p);
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.path.curve_to(c1, c2, p);
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

    fn fill(&mut self) {
        let path = self.path.clone();
        self.push(DrawOp::FillPath(path));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.push(DrawOp::FillRect(rect));
    }

    fn draw_image(&mut self, image: ImageKey, origin: Point) {
        self.push(DrawOp::Image { image, origin });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font: &str) {
        self.push(DrawOp::Text {
            text: String::from(text),
            origin,
            font: String::from(font),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_brackets_transform_and_alpha() {
        let mut list = DisplayList::new(Size::new(100.0, 100.0));
        list.save();
        list.translate(10.0, 5.0);
        list.set_global_alpha(0.5);
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        list.restore();
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));

        let items = list.items();
        assert_eq!(items[0].transform, Affine::translate((10.0, 5.0)));
        assert_eq!(items[0].alpha, 0.5);
        assert_eq!(items[1].transform, Affine::IDENTITY, "restore pops");
        assert_eq!(items[1].alpha, 1.0);
        assert_eq!(list.depth(), 0);
        assert_eq!(list.max_depth(), 1);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut list = DisplayList::new(Size::new(1.0, 1.0));
        list.translate(3.0, 0.0);
        list.restore();
        assert_eq!(list.transform(), Affine::translate((3.0, 0.0)));
    }

    #[test]
    fn path_is_captured_on_fill() {
        let mut list = DisplayList::new(Size::new(1.0, 1.0));
        list.begin_path();
        list.move_to(Point::new(0.0, 0.0));
        list.line_to(Point::new(1.0, 0.0));
        list.close_path();
        list.fill();
        match &list.items()[0].op {
            DrawOp::FillPath(path) => assert_eq!(path.elements().len(), 3),
            other => panic!("expected a path fill, got {other:?}"),
        }
    }
}
