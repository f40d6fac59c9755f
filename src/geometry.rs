//! Render output: line segments and their bounding box.
//!
//! A [`Drawing`] is the engine-agnostic result of rendering an L-string. It can be
//! serialized as is (JSON) or handed to an output sink such as [`crate::svg`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An RGB color as evaluated from the source; channels are nominally `0..=255`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// One stroked line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: DVec2,
    pub end: DVec2,
    pub width: f64,
    pub color: Rgb,
}

/// Axis-aligned bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// A degenerate box holding only `point`.
    pub fn at(point: DVec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn include(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::at(DVec2::ZERO)
    }
}

/// Everything produced by one render.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Segments in drawing order.
    pub segments: Vec<LineSegment>,

    pub bounds: BoundingBox,

    /// Sum of the branch depth at every transform application. Diagnostic only.
    pub complexity_rating: usize,
}

impl Drawing {
    pub fn new(origin: DVec2) -> Self {
        Self {
            segments: Vec::new(),
            bounds: BoundingBox::at(origin),
            complexity_rating: 0,
        }
    }

    /// Appends a segment and grows the bounds to cover both endpoints.
    pub fn add_segment(&mut self, segment: LineSegment) {
        self.bounds.include(segment.start);
        self.bounds.include(segment.end);
        self.segments.push(segment);
    }
}
