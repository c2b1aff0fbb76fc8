// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill values: solid colors and paint generators.
//!
//! A shape's [`Fill`] is either a literal [`Color`] or a [`PaintGenerator`]
//! that builds a [`Brush`] against the drawing surface at paint time. The
//! surface is involved because gradients and patterns are surface-dependent
//! objects in most 2D backends.
//!
//! Generators shipped here:
//!
//! - [`LinearGradient`] and [`RadialGradient`]: color ramps.
//! - [`PatternFill`]: a repeated image. It resolves to
//!   [`PatternFill::FALLBACK`] until its image is marked loaded.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use kurbo::{Point, Size};

use crate::draw::DrawingSurface;

/// An 8-bit-per-channel sRGB color with straight alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque mid gray.
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with the given alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// One stop of a gradient ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the ramp in `0.0..=1.0`.
    pub offset: f64,
    /// Color at this position.
    pub color: Color,
}

/// Opaque reference to an image resource owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageKey(pub u32);

/// How a pattern image tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Repeat {
    /// Tile in both directions.
    #[default]
    Repeat,
    /// Tile horizontally only.
    RepeatX,
    /// Tile vertically only.
    RepeatY,
    /// Draw the image once.
    NoRepeat,
}

/// A concrete paint value the drawing surface can install as its fill style.
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    /// A flat color.
    Solid(Color),
    /// A linear ramp between two points.
    LinearGradient {
        /// Start of the ramp.
        start: Point,
        /// End of the ramp.
        end: Point,
        /// Stops in ascending offset order.
        stops: Vec<ColorStop>,
    },
    /// A radial ramp from a center outwards.
    RadialGradient {
        /// Center of both circles.
        center: Point,
        /// Radius of the outer circle.
        radius: f64,
        /// Stops in ascending offset order.
        stops: Vec<ColorStop>,
    },
    /// A tiled image.
    Pattern {
        /// Image to tile.
        image: ImageKey,
        /// Tiling mode.
        repeat: Repeat,
    },
}

/// Produces a [`Brush`] against a specific drawing surface at paint time.
pub trait PaintGenerator {
    /// Builds the brush for the current paint pass.
    fn generate(&self, surface: &mut dyn DrawingSurface) -> Brush;

    /// Returns whether the brush is still a placeholder waiting on `image`.
    fn awaits_image(&self, image: ImageKey) -> bool {
        _ = image;
        false
    }

    /// Called when the host finishes loading `image`.
    fn image_loaded(&self, image: ImageKey, size: Size) {
        _ = (image, size);
    }
}

/// A shape's fill: either a literal color or a generator.
#[derive(Clone)]
pub enum Fill {
    /// Use the color as-is.
    Solid(Color),
    /// Ask the generator for a brush at paint time.
    Generator(Rc<dyn PaintGenerator>),
}

impl Fill {
    /// Wraps a generator.
    pub fn generator(generator: impl PaintGenerator + 'static) -> Self {
        Self::Generator(Rc::new(generator))
    }

    /// Resolves this fill against the surface.
    pub fn resolve(&self, surface: &mut dyn DrawingSurface) -> Brush {
        match self {
            Self::Solid(color) => Brush::Solid(*color),
            Self::Generator(generator) => generator.generate(surface),
        }
    }
}

impl Default for Fill {
    fn default() -> Self {
        Self::Solid(Color::GRAY)
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl fmt::Debug for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => f.debug_tuple("Solid").field(color).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// A linear gradient between two points.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    start: Point,
    end: Point,
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    /// Creates a gradient with no stops.
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Appends a stop.
    #[must_use]
    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }
}

impl PaintGenerator for LinearGradient {
    fn generate(&self, surface: &mut dyn DrawingSurface) -> Brush {
        surface.linear_gradient(self.start, self.end, &self.stops)
    }
}

/// A radial gradient around a center point.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    center: Point,
    radius: f64,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Creates a gradient with no stops.
    #[must_use]
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            stops: Vec::new(),
        }
    }

    /// Appends a stop.
    #[must_use]
    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }
}

impl PaintGenerator for RadialGradient {
    fn generate(&self, surface: &mut dyn DrawingSurface) -> Brush {
        surface.radial_gradient(self.center, self.radius, &self.stops)
    }
}

/// An image pattern.
///
/// Until the host reports the image through
/// [`Engine::image_loaded`](crate::engine::Engine::image_loaded) or
/// [`Scene::image_loaded`](crate::scene::Scene::image_loaded), the pattern
/// paints as [`FALLBACK`]. Both mark the shapes using it as changed.
///
/// [`FALLBACK`]: Self::FALLBACK
#[derive(Debug)]
pub struct PatternFill {
    image: ImageKey,
    repeat: Repeat,
    size: Cell<Option<Size>>,
}

impl PatternFill {
    /// Color used while the image is not loaded yet.
    pub const FALLBACK: Color = Color::RED;

    /// Creates a pattern whose image has not loaded yet.
    #[must_use]
    pub fn new(image: ImageKey, repeat: Repeat) -> Self {
        Self {
            image,
            repeat,
            size: Cell::new(None),
        }
    }

    /// Returns whether the image has loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.size.get().is_some()
    }
}

impl PaintGenerator for PatternFill {
    fn generate(&self, surface: &mut dyn DrawingSurface) -> Brush {
        if self.is_loaded() {
            surface.pattern(self.image, self.repeat)
        } else {
            Brush::Solid(Self::FALLBACK)
        }
    }

    fn awaits_image(&self, image: ImageKey) -> bool {
        self.image == image && !self.is_loaded()
    }

    fn image_loaded(&self, image: ImageKey, size: Size) {
        if self.image == image {
            self.size.set(Some(size));
        }
    }
}

impl PaintGenerator for Rc<PatternFill> {
    fn generate(&self, surface: &mut dyn DrawingSurface) -> Brush {
        (**self).generate(surface)
    }

    fn awaits_image(&self, image: ImageKey) -> bool {
        (**self).awaits_image(image)
    }

    fn image_loaded(&self, image: ImageKey, size: Size) {
        (**self).image_loaded(image, size);
    }
}
