// Copyright 2026 the Diorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf drawables.
//!
//! Every [`Shape`] pairs a [`Geometry`] with fill and stroke settings. Both
//! [`Shape::paint`] and [`Shape::contains`] work purely in the shape's local
//! coordinate space; ancestors are responsible for moving the drawing surface
//! or the query point into that space first.

use alloc::string::String;

use kurbo::{Point, Shape as _, Size};

use crate::draw::{DrawingSurface, emit_path};
use crate::paint::{Brush, Color, Fill, ImageKey};
use crate::path::Path;

/// Flattening tolerance used when turning circles and ellipses into curves.
const CURVE_TOLERANCE: f64 = 0.1;

/// Size of the placeholder block painted for an image that has not loaded.
const IMAGE_PLACEHOLDER: f64 = 100.0;

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Default for Rect {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        }
    }
}

impl Rect {
    /// Sets all four fields at once.
    pub fn set(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        *self = Self {
            x,
            y,
            width,
            height,
        };
        self
    }

    fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// A circle given by its center and radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Radius.
    pub radius: f64,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: 10.0,
        }
    }
}

impl Circle {
    /// Sets center and radius at once.
    pub fn set(&mut self, x: f64, y: f64, radius: f64) -> &mut Self {
        *self = Self { x, y, radius };
        self
    }
}

/// An axis-aligned ellipse inscribed in the box at `(x, y)` of the given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    /// Left edge of the bounding box.
    pub x: f64,
    /// Top edge of the bounding box.
    pub y: f64,
    /// Width of the bounding box.
    pub width: f64,
    /// Height of the bounding box.
    pub height: f64,
}

impl Default for Ellipse {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 20.0,
            height: 10.0,
        }
    }
}

impl Ellipse {
    /// Sets the bounding box at once.
    pub fn set(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        *self = Self {
            x,
            y,
            width,
            height,
        };
        self
    }
}

/// A shape drawn from a shared [`Path`].
#[derive(Clone, Debug, PartialEq)]
pub struct PathShape {
    /// The path. Only closed paths are filled or hit.
    pub path: Path,
}

/// A single line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// Content.
    pub text: String,
    /// Baseline origin x.
    pub x: f64,
    /// Baseline origin y.
    pub y: f64,
    /// Font description, in CSS font shorthand.
    pub font: String,
}

impl Text {
    /// Font used when none is given.
    pub const DEFAULT_FONT: &'static str = "12pt sans-serif";

    /// Creates a text run at `(x, y)` with the default font.
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font: String::from(Self::DEFAULT_FONT),
        }
    }

    /// Sets content and position at once.
    pub fn set(&mut self, text: impl Into<String>, x: f64, y: f64) -> &mut Self {
        self.text = text.into();
        self.x = x;
        self.y = y;
        self
    }
}

/// An image placed with its top-left corner at `(x, y)`.
///
/// Until [`mark_loaded`](Self::mark_loaded) is called the image measures
/// 10×10 for hit-testing and paints as a red placeholder block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageView {
    /// Host image resource.
    pub image: ImageKey,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    size: Size,
    loaded: bool,
}

impl ImageView {
    /// Creates a view of an image that has not loaded yet.
    #[must_use]
    pub fn new(image: ImageKey) -> Self {
        Self {
            image,
            x: 0.0,
            y: 0.0,
            size: Size::new(10.0, 10.0),
            loaded: false,
        }
    }

    /// Creates a view of an image that is already available.
    #[must_use]
    pub fn loaded(image: ImageKey, size: Size) -> Self {
        Self {
            size,
            loaded: true,
            ..Self::new(image)
        }
    }

    /// Records the image's arrival and adopts its natural size.
    pub fn mark_loaded(&mut self, size: Size) -> &mut Self {
        self.size = size;
        self.loaded = true;
        self
    }

    /// Returns whether the image has loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns the current size (10×10 until loaded).
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }
}

/// The local geometry of a [`Shape`].
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A rectangle.
    Rect(Rect),
    /// A circle.
    Circle(Circle),
    /// An ellipse.
    Ellipse(Ellipse),
    /// A path.
    Path(PathShape),
    /// A text run.
    Text(Text),
    /// An image.
    Image(ImageView),
}

/// A drawable leaf: geometry plus paint settings.
#[derive(Clone, Debug)]
pub struct Shape {
    geometry: Geometry,
    fill: Fill,
    stroke: Color,
    stroke_width: f64,
}

impl Shape {
    /// Creates a shape with gray fill, black stroke, and stroke width 1.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            fill: Fill::default(),
            stroke: Color::BLACK,
            stroke_width: 1.0,
        }
    }

    /// A rectangle shape.
    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Geometry::Rect(Rect {
            x,
            y,
            width,
            height,
        }))
    }

    /// A circle shape.
    #[must_use]
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self::new(Geometry::Circle(Circle { x, y, radius }))
    }

    /// An ellipse shape.
    #[must_use]
    pub fn ellipse(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Geometry::Ellipse(Ellipse {
            x,
            y,
            width,
            height,
        }))
    }

    /// A path shape.
    #[must_use]
    pub fn path(path: Path) -> Self {
        Self::new(Geometry::Path(PathShape { path }))
    }

    /// A text shape with the default font.
    #[must_use]
    pub fn text(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(Geometry::Text(Text::new(text, x, y)))
    }

    /// An image shape.
    #[must_use]
    pub fn image(view: ImageView) -> Self {
        Self::new(Geometry::Image(view))
    }

    /// Replaces the fill.
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<Fill>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Replaces the stroke color.
    #[must_use]
    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = stroke;
        self
    }

    /// Replaces the stroke width.
    #[must_use]
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    /// Returns the geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Returns the geometry for in-place edits.
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    /// Returns whether the shape paints a placeholder until `image` loads.
    pub(crate) fn awaits_image(&self, image: ImageKey) -> bool {
        let view = matches!(
            &self.geometry,
            Geometry::Image(view) if view.image == image && !view.is_loaded()
        );
        let fill = matches!(&self.fill, Fill::Generator(g) if g.awaits_image(image));
        view || fill
    }

    /// Hands a loaded `image` to the image view and fill generator.
    pub(crate) fn image_loaded(&mut self, image: ImageKey, size: Size) {
        if let Geometry::Image(view) = &mut self.geometry
            && view.image == image
        {
            view.mark_loaded(size);
        }
        if let Fill::Generator(generator) = &self.fill {
            generator.image_loaded(image, size);
        }
    }

    /// Returns the fill.
    pub fn fill(&self) -> &Fill {
        &self.fill
    }

    /// Replaces the fill.
    pub fn set_fill(&mut self, fill: impl Into<Fill>) -> &mut Self {
        self.fill = fill.into();
        self
    }

    /// Returns the stroke color.
    pub fn stroke(&self) -> Color {
        self.stroke
    }

    /// Replaces the stroke color.
    pub fn set_stroke(&mut self, stroke: Color) -> &mut Self {
        self.stroke = stroke;
        self
    }

    /// Returns the stroke width.
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Replaces the stroke width.
    pub fn set_stroke_width(&mut self, width: f64) -> &mut Self {
        self.stroke_width = width;
        self
    }

    /// Paints the shape in local coordinates.
    ///
    /// The fill is resolved first (running its generator if it has one) and
    /// installed on the surface. Images ignore the fill.
    pub fn paint(&self, surface: &mut dyn DrawingSurface) {
        if let Geometry::Image(view) = &self.geometry {
            if view.loaded {
                surface.draw_image(view.image, Point::new(view.x, view.y));
            } else {
                surface.set_fill(&Brush::Solid(Color::RED));
                surface.fill_rect(kurbo::Rect::new(
                    view.x,
                    view.y,
                    view.x + IMAGE_PLACEHOLDER,
                    view.y + IMAGE_PLACEHOLDER,
                ));
            }
            return;
        }

        let brush = self.fill.resolve(surface);
        surface.set_fill(&brush);

        match &self.geometry {
            Geometry::Rect(rect) => surface.fill_rect(rect.bounds()),
            Geometry::Circle(circle) => {
                let shape = kurbo::Circle::new((circle.x, circle.y), circle.radius);
                fill_closed(surface, shape.path_elements(CURVE_TOLERANCE));
            }
            Geometry::Ellipse(ellipse) => {
                let bounds = kurbo::Rect::new(
                    ellipse.x,
                    ellipse.y,
                    ellipse.x + ellipse.width,
                    ellipse.y + ellipse.height,
                );
                let shape = kurbo::Ellipse::from_rect(bounds);
                fill_closed(surface, shape.path_elements(CURVE_TOLERANCE));
            }
            Geometry::Path(shape) => {
                surface.begin_path();
                shape.path.emit(surface);
                if shape.path.is_closed() {
                    surface.fill();
                }
            }
            Geometry::Text(text) => {
                surface.fill_text(&text.text, Point::new(text.x, text.y), &text.font);
            }
            Geometry::Image(_) => {}
        }
    }

    /// Returns whether `pt`, in local coordinates, lies inside the shape.
    ///
    /// Rectangles and images use inclusive bounds. Text never contains a
    /// point, and neither does an open path.
    pub fn contains(&self, pt: Point) -> bool {
        match &self.geometry {
            Geometry::Rect(rect) => within(pt, rect.x, rect.y, rect.width, rect.height),
            Geometry::Circle(circle) => {
                let dx = pt.x - circle.x;
                let dy = pt.y - circle.y;
                dx * dx + dy * dy <= circle.radius * circle.radius
            }
            Geometry::Ellipse(ellipse) => {
                if ellipse.width <= 0.0 || ellipse.height <= 0.0 {
                    return false;
                }
                let rx = ellipse.width / 2.0;
                let ry = ellipse.height / 2.0;
                let nx = (pt.x - ellipse.x - rx) / rx;
                let ny = (pt.y - ellipse.y - ry) / ry;
                nx * nx + ny * ny <= 1.0
            }
            Geometry::Path(shape) => {
                shape.path.is_closed() && shape.path.to_bez_path().contains(pt)
            }
            Geometry::Text(_) => false,
            Geometry::Image(view) => within(pt, view.x, view.y, view.size.width, view.size.height),
        }
    }
}

fn within(pt: Point, x: f64, y: f64, width: f64, height: f64) -> bool {
    pt.x >= x && pt.x <= x + width && pt.y >= y && pt.y <= y + height
}

fn fill_closed(surface: &mut dyn DrawingSurface, elements: impl Iterator<Item = kurbo::PathEl>) {
    surface.begin_path();
    emit_path(surface, elements);
    surface.save();
    surface.fill();
    surface.restore();
}
