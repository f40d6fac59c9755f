//! Renderer that converts an L-string into a [`Drawing`].
//!
//! The entry point is [`TurtleRenderer`]. Configure it with a [`RenderConfig`], then call
//! [`TurtleRenderer::render`] with the [`Specification`], the rewritten L-string and the
//! context used during rewriting.

use crate::ast::{ColorExpr, Symbol, Unit};
use crate::context::EvalContext;
use crate::error::{RenderError, Result};
use crate::eval::evaluate;
use crate::geometry::{Drawing, LineSegment, Rgb};
use crate::spec::{Specification, Transform, TransformOp};
use crate::turtle::TurtleState;
use glam::DVec2;
use tracing::debug;

/// Configuration for turtle rendering.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Starting heading in degrees. Default: 90 (pointing up).
    pub initial_heading: f64,
    /// Results of rotation/translation arithmetic smaller than this snap to zero.
    pub epsilon: f64,
    /// Maximum branch nesting depth. A `[` beyond it is a [`RenderError::StackOverflow`].
    pub max_stack_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            initial_heading: 90.0,
            epsilon: 1e-10,
            max_stack_depth: 4096,
        }
    }
}

/// Walks an L-string and emits line segments.
pub struct TurtleRenderer {
    config: RenderConfig,
}

impl Default for TurtleRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl TurtleRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Renders `lstring` and returns the resulting [`Drawing`].
    ///
    /// The turtle starts at the origin with the configured heading. Each symbol is
    /// handled in order:
    ///
    /// * `[` pushes a copy of the current pose and increases the branch depth.
    /// * `]` restores the previous pose. Popping the root pose is a
    ///   [`RenderError::StackUnderflow`].
    /// * A named symbol applies the transform registered under that name, or the
    ///   specification's default forward move when there is none.
    ///
    /// Transform parameters must evaluate to finite numbers, and a pose that overflows
    /// while moving is a [`RenderError::NonFinitePose`].
    ///
    /// Before each transform the context copy binds `x`, `y`, `heading` (radians) and
    /// `depth` (branch depth), so transform parameters can depend on the turtle.
    /// Translations emit one segment from the old to the new position.
    pub fn render(
        &self,
        spec: &Specification,
        lstring: &[Symbol],
        ctx: &EvalContext,
    ) -> Result<Drawing> {
        let mut ctx = ctx.clone();
        let origin = TurtleState::new(DVec2::ZERO, self.config.initial_heading.to_radians());
        let mut drawing = Drawing::new(origin.position);
        let mut stack = vec![origin];
        let fallback = spec.default_transform();

        for (position, symbol) in lstring.iter().enumerate() {
            match symbol {
                Symbol::Push => {
                    if stack.len() > self.config.max_stack_depth {
                        return Err(RenderError::StackOverflow {
                            position,
                            limit: self.config.max_stack_depth,
                        }
                        .into());
                    }
                    let top = stack[stack.len() - 1];
                    stack.push(top);
                }
                Symbol::Pop => {
                    if stack.len() <= 1 {
                        return Err(RenderError::StackUnderflow { position }.into());
                    }
                    stack.pop();
                }
                Symbol::Ident(name) => {
                    let transform = spec.transform(name).unwrap_or(&fallback);
                    let depth = stack.len() - 1;
                    if let Some(turtle) = stack.last_mut() {
                        self.apply(transform, turtle, depth, &mut ctx, &mut drawing)?;
                        if !(turtle.position.is_finite() && turtle.heading.is_finite()) {
                            return Err(RenderError::NonFinitePose { position }.into());
                        }
                    }
                }
            }
        }

        debug!(
            segments = drawing.segments.len(),
            complexity = drawing.complexity_rating,
            "rendered drawing"
        );
        Ok(drawing)
    }

    fn apply(
        &self,
        transform: &Transform,
        turtle: &mut TurtleState,
        depth: usize,
        ctx: &mut EvalContext,
        drawing: &mut Drawing,
    ) -> Result<()> {
        let eps = self.config.epsilon;
        drawing.complexity_rating += depth;

        ctx.set("x", turtle.position.x);
        ctx.set("y", turtle.position.y);
        ctx.set("heading", turtle.heading);
        ctx.set("depth", depth as f64);

        let start = turtle.position;
        let (width, color) = match &transform.op {
            TransformOp::Rotate { angle, unit } => {
                let angle = evaluate(angle, ctx)?;
                let radians = match unit {
                    Unit::Deg => angle.to_radians(),
                    Unit::Rad => angle,
                };
                turtle.rotate(radians, eps);
                return Ok(());
            }
            TransformOp::Forward {
                distance,
                width,
                color,
            } => {
                let distance = evaluate(distance, ctx)?;
                let stroke = (evaluate(width, ctx)?, eval_color(color, ctx)?);
                turtle.advance(distance, eps);
                stroke
            }
            TransformOp::Absolute {
                dx,
                dy,
                width,
                color,
            } => {
                let offset = DVec2::new(evaluate(dx, ctx)?, evaluate(dy, ctx)?);
                let stroke = (evaluate(width, ctx)?, eval_color(color, ctx)?);
                turtle.translate(offset, eps);
                stroke
            }
        };

        drawing.add_segment(LineSegment {
            start,
            end: turtle.position,
            width,
            color,
        });
        Ok(())
    }
}

fn eval_color(color: &ColorExpr, ctx: &mut EvalContext) -> Result<Rgb> {
    Ok(Rgb::new(
        evaluate(&color.r, ctx)?,
        evaluate(&color.g, ctx)?,
        evaluate(&color.b, ctx)?,
    ))
}
