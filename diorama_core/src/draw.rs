// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing-surface contract for rasterizing backends.
//!
//! The scene graph never rasterizes anything itself. Paint traversal drives a
//! [`DrawingSurface`], an immediate-mode 2D context in the style of an HTML
//! canvas: a save/restore stack of transform and alpha state, fill-style
//! assignment, path construction, rectangle fill, image blit, and text fill.
//!
//! Backends implement the trait for their native context. The crate ships one
//! implementation, [`DisplayList`](crate::record::DisplayList), which records
//! operations for tests and diagnostics.
//!
//! # Contract
//!
//! - [`save`](DrawingSurface::save) pushes the current transform and global
//!   alpha; [`restore`](DrawingSurface::restore) pops them. Every node's paint
//!   leaves the stack depth and state exactly as it found them.
//! - Transform calls post-multiply the current transform, so later calls
//!   apply first to geometry (canvas semantics).
//! - [`rotate`](DrawingSurface::rotate) takes radians.

use kurbo::{PathEl, Point, Rect, Size};

use crate::paint::{Brush, ColorStop, ImageKey, Repeat};

/// An immediate-mode 2D drawing context.
pub trait DrawingSurface {
    /// Returns the size of the drawable area in surface units.
    fn size(&self) -> Size;

    /// Pushes the current transform and global alpha.
    fn save(&mut self);

    /// Pops the state pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Translates the current transform.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotates the current transform about the origin by `radians`.
    fn rotate(&mut self, radians: f64);

    /// Scales the current transform.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Returns the current global alpha.
    fn global_alpha(&self) -> f64;

    /// Replaces the current global alpha.
    fn set_global_alpha(&mut self, alpha: f64);

    /// Installs the brush used by subsequent fills.
    fn set_fill(&mut self, brush: &Brush);

    /// Builds a linear gradient brush.
    ///
    /// Backends with native gradient objects override this; the default
    /// returns the portable description.
    fn linear_gradient(&mut self, start: Point, end: Point, stops: &[ColorStop]) -> Brush {
        Brush::LinearGradient {
            start,
            end,
            stops: stops.to_vec(),
        }
    }

    /// Builds a radial gradient brush.
    fn radial_gradient(&mut self, center: Point, radius: f64, stops: &[ColorStop]) -> Brush {
        Brush::RadialGradient {
            center,
            radius,
            stops: stops.to_vec(),
        }
    }

    /// Builds a pattern brush from a loaded image.
    fn pattern(&mut self, image: ImageKey, repeat: Repeat) -> Brush {
        Brush::Pattern { image, repeat }
    }

    /// Starts a new path, discarding any path under construction.
    fn begin_path(&mut self);

    /// Starts a new subpath at `p`.
    fn move_to(&mut self, p: Point);

    /// Adds a straight segment to `p`.
    fn line_to(&mut self, p: Point);

    /// Adds a cubic Bézier segment.
    fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point);

    /// Closes the current subpath.
    fn close_path(&mut self);

    /// Fills the current path with the current brush.
    fn fill(&mut self);

    /// Fills a rectangle with the current brush.
    fn fill_rect(&mut self, rect: Rect);

    /// Draws an image with its top-left corner at `origin`.
    fn draw_image(&mut self, image: ImageKey, origin: Point);

    /// Fills `text` with its baseline origin at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font: &str);
}

/// Feeds kurbo path elements into a surface as path-construction calls.
///
/// Quadratic segments are raised to cubics since the surface contract only
/// knows cubic curves.
pub fn emit_path(surface: &mut dyn DrawingSurface, elements: impl IntoIterator<Item = PathEl>) {
    let mut last = Point::ORIGIN;
    let mut start = Point::ORIGIN;
    for el in elements {
        match el {
            PathEl::MoveTo(p) => {
                surface.move_to(p);
                start = p;
                last = p;
            }
            PathEl::LineTo(p) => {
                surface.line_to(p);
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                let cubic = kurbo::QuadBez::new(last, p1, p2).raise();
                surface.bezier_curve_to(cubic.p1, cubic.p2, cubic.p3);
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                surface.bezier_curve_to(p1, p2, p3);
                last = p3;
            }
            PathEl::ClosePath => {
                surface.close_path();
                last = start;
            }
        }
    }
}
