//! Turtle state and operations for 2D line rendering.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// The pose of the drawing turtle.
///
/// Tracks position and heading only; stroke width and color belong to the
/// transform being applied, not to the turtle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current position of the "cursor".
    pub position: DVec2,

    /// Heading in radians, counter-clockwise from +X.
    pub heading: f64,
}

/// Replaces values whose magnitude is below `epsilon` with exactly zero.
pub fn snap(value: f64, epsilon: f64) -> f64 {
    if value.abs() < epsilon { 0.0 } else { value }
}

fn snap_vec(v: DVec2, epsilon: f64) -> DVec2 {
    DVec2::new(snap(v.x, epsilon), snap(v.y, epsilon))
}

impl TurtleState {
    pub fn new(position: DVec2, heading: f64) -> Self {
        Self { position, heading }
    }

    /// Unit vector along the current heading.
    pub fn direction(&self) -> DVec2 {
        DVec2::from_angle(self.heading)
    }

    /// Turns the heading by `angle` radians.
    pub fn rotate(&mut self, angle: f64, epsilon: f64) {
        self.heading = snap(self.heading + angle, epsilon);
    }

    /// Moves `distance` along the heading.
    pub fn advance(&mut self, distance: f64, epsilon: f64) {
        let offset = snap_vec(self.direction() * distance, epsilon);
        self.translate(offset, epsilon);
    }

    /// Moves by a fixed offset; the heading is unchanged.
    pub fn translate(&mut self, offset: DVec2, epsilon: f64) {
        self.position = snap_vec(self.position + offset, epsilon);
    }
}
