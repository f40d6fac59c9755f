//! SVG output for a [`Drawing`].

use crate::geometry::{Drawing, Rgb};
use glam::DVec2;

/// Layout settings for SVG output.
#[derive(Clone, Debug)]
pub struct SvgConfig {
    /// Pixels per drawing unit.
    pub scale: f64,
    /// Stroke width is `segment.width * scale / line_width_factor`.
    pub line_width_factor: f64,
    /// Blank border around the drawing, in pixels.
    pub margin: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            scale: 50.0,
            line_width_factor: 40.0,
            margin: 5.0,
        }
    }
}

fn channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

fn rgb(color: Rgb) -> String {
    format!(
        "rgb({},{},{})",
        channel(color.r),
        channel(color.g),
        channel(color.b)
    )
}

/// Serializes `drawing` as a standalone SVG document.
///
/// The y axis is flipped (drawing "up" is SVG "up") and everything is shifted by the
/// bounding-box minimum so all coordinates are non-negative.
pub fn write_svg(drawing: &Drawing, config: &SvgConfig) -> String {
    let bounds = drawing.bounds;
    let size = bounds.size() * config.scale + DVec2::splat(2.0 * config.margin);
    let map = |p: DVec2| {
        DVec2::new(
            config.margin + (p.x - bounds.min.x) * config.scale,
            config.margin + (bounds.max.y - p.y) * config.scale,
        )
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">\n",
        size.x, size.y, size.x, size.y
    ));
    for segment in &drawing.segments {
        let a = map(segment.start);
        let b = map(segment.end);
        svg.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>\n",
            a.x,
            a.y,
            b.x,
            b.y,
            rgb(segment.color),
            segment.width * config.scale / config.line_width_factor
        ));
    }
    svg.push_str("</svg>\n");
    svg
}
