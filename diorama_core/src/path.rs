// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable paths and parametric sampling.
//!
//! A [`Path`] is built once through [`PathBuilder`] and then shared by any
//! number of drawable nodes; cloning a path only bumps a reference count.
//!
//! [`Path::point_at_t`] maps a fraction in `0.0..1.0` onto the segment list
//! uniformly by segment index (not by arc length): with `n + 1` segments the
//! fraction range is split into `n` equal spans, span `i` interpolating from
//! segment `i`'s anchor to segment `i + 1`.

use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::{BezPath, CubicBez, ParamCurve, Point};

use crate::draw::DrawingSurface;

/// One drawing instruction of a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    /// Start a subpath at the point.
    MoveTo(Point),
    /// Straight line to the point.
    LineTo(Point),
    /// Cubic Bézier to `end` through two control points.
    CurveTo {
        /// First control point.
        c1: Point,
        /// Second control point.
        c2: Point,
        /// End point.
        end: Point,
    },
    /// Close the path. The point is the segment's anchor for sampling.
    CloseTo(Point),
}

impl Segment {
    /// Returns the point the segment ends on.
    #[must_use]
    pub fn anchor(&self) -> Point {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::CloseTo(p) => p,
            Self::CurveTo { end, .. } => end,
        }
    }
}

/// An immutable sequence of [`Segment`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    segments: Rc<[Segment]>,
    closed: bool,
}

impl Path {
    /// Starts building a path.
    #[must_use]
    pub fn builder() -> PathBuilder {
        PathBuilder::default()
    }

    /// Returns the segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns whether a close segment was added.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Samples the path at `fract`.
    ///
    /// `point_at_t(0.0)` is the first segment's anchor. Fractions outside
    /// `0.0..1.0`, NaN, and paths with fewer than two segments yield
    /// [`Point::ORIGIN`].
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the scaled fraction is non-negative and below the segment count"
    )]
    pub fn point_at_t(&self, fract: f64) -> Point {
        if !(0.0..1.0).contains(&fract) || self.segments.len() < 2 {
            return Point::ORIGIN;
        }
        let spans = (self.segments.len() - 1) as f64;
        let scaled = fract * spans;
        let index = scaled as usize;
        let local = scaled - index as f64;

        let prev = self.segments[index].anchor();
        match self.segments[index + 1] {
            Segment::MoveTo(_) => Point::ORIGIN,
            Segment::LineTo(p) => prev.lerp(p, local),
            Segment::CurveTo { c1, c2, end } => CubicBez::new(prev, c1, c2, end).eval(local),
            Segment::CloseTo(_) => prev.lerp(self.segments[0].anchor(), local),
        }
    }

    /// Converts the path to a kurbo [`BezPath`].
    #[must_use]
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for segment in self.segments.iter() {
            match *segment {
                Segment::MoveTo(p) => path.move_to(p),
                Segment::LineTo(p) => path.line_to(p),
                Segment::CurveTo { c1, c2, end } => path.curve_to(c1, c2, end),
                Segment::CloseTo(_) => path.close_path(),
            }
        }
        path
    }

    /// Replays the path into the surface's path under construction.
    pub fn emit(&self, surface: &mut dyn DrawingSurface) {
        for segment in self.segments.iter() {
            match *segment {
                Segment::MoveTo(p) => surface.move_to(p),
                Segment::LineTo(p) => surface.line_to(p),
                Segment::CurveTo { c1, c2, end } => surface.bezier_curve_to(c1, c2, end),
                Segment::CloseTo(_) => surface.close_path(),
            }
        }
    }
}

/// Accumulates segments for a [`Path`].
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    segments: Vec<Segment>,
    closed: bool,
}

impl PathBuilder {
    /// Starts a subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.segments.push(Segment::MoveTo(Point::new(x, y)));
        self
    }

    /// Adds a line to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.segments.push(Segment::LineTo(Point::new(x, y)));
        self
    }

    /// Adds a cubic curve to `(x, y)`.
    pub fn curve_to(
        &mut self,
        cx1: f64,
        cy1: f64,
        cx2: f64,
        cy2: f64,
        x: f64,
        y: f64,
    ) -> &mut Self {
        self.segments.push(Segment::CurveTo {
            c1: Point::new(cx1, cy1),
            c2: Point::new(cx2, cy2),
            end: Point::new(x, y),
        });
        self
    }

    /// Closes the path, anchoring the close segment at `(x, y)`.
    pub fn close_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.segments.push(Segment::CloseTo(Point::new(x, y)));
        self.closed = true;
        self
    }

    /// Freezes the accumulated segments into a [`Path`].
    #[must_use]
    pub fn build(&self) -> Path {
        Path {
            segments: Rc::from(self.segments.as_slice()),
            closed: self.closed,
        }
    }
}
