//! Validated view over a parsed program.

use crate::ast::{ColorExpr, Decl, Expr, Root, Symbol, TransformKind, Unit};
use crate::context::EvalContext;
use crate::error::{EvalError, SpecError};
use crate::eval::evaluate;
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use tracing::{debug, trace};

/// One rewrite alternative for symbols called `name`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub name: String,
    pub body: Vec<Symbol>,
    /// Relative weight among same-named rules. Re-evaluated at every selection.
    pub bias: Expr,
}

/// A turtle operation bound to a symbol name.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub name: String,
    pub op: TransformOp,
}

/// Transform parameters with defaults resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum TransformOp {
    /// Turn the heading; draws nothing.
    Rotate { angle: Expr, unit: Unit },
    /// Move `distance` along the heading, drawing a line.
    Forward {
        distance: Expr,
        width: Expr,
        color: ColorExpr,
    },
    /// Move by `(dx, dy)`, drawing a line; heading unchanged.
    Absolute {
        dx: Expr,
        dy: Expr,
        width: Expr,
        color: ColorExpr,
    },
}

impl Transform {
    pub fn rotate(name: impl Into<String>, degrees: f64) -> Self {
        Self {
            name: name.into(),
            op: TransformOp::Rotate {
                angle: Expr::Num(degrees),
                unit: Unit::Deg,
            },
        }
    }

    fn from_decl(name: String, kind: TransformKind) -> Self {
        let default_width = || Expr::Num(1.0);
        let op = match kind {
            TransformKind::Rotate { angle, unit } => TransformOp::Rotate { angle, unit },
            TransformKind::ForwardTranslate {
                distance,
                width,
                color,
            } => TransformOp::Forward {
                distance,
                width: width.unwrap_or_else(default_width),
                color: color.unwrap_or_else(ColorExpr::black),
            },
            TransformKind::AbsoluteTranslate {
                dx,
                dy,
                width,
                color,
            } => TransformOp::Absolute {
                dx,
                dy,
                width: width.unwrap_or_else(default_width),
                color: color.unwrap_or_else(ColorExpr::black),
            },
        };
        Self { name, op }
    }
}

/// The validated program: one axiom, global length/width/color/iterate, named rules
/// (same-named rules are weighted alternatives), transforms by name, and variables.
///
/// Every instance owns its collections; nothing is shared between specifications.
#[derive(Clone, Debug)]
pub struct Specification {
    axiom: Vec<Symbol>,
    length: Expr,
    width: Expr,
    color: ColorExpr,
    iterate: Expr,
    rules: Vec<Rule>,
    /// Rule indices per name, in declaration order.
    rules_by_name: HashMap<String, Vec<usize>>,
    transforms: HashMap<String, Transform>,
    variables: Vec<(String, Expr)>,
}

/// Tracks a declaration that may appear at most once.
fn set_once<T>(slot: &mut Option<T>, value: T, what: &'static str) -> Result<(), SpecError> {
    if slot.is_some() {
        return Err(SpecError::DuplicateDeclaration(what));
    }
    *slot = Some(value);
    Ok(())
}

impl Specification {
    /// Assembles a specification from the declarations of `root`, in source order.
    ///
    /// `+` and `-` start out as ±90° rotations; any transform declaration replaces an
    /// earlier one of the same name. Length, width and iterate default to 1, color to
    /// black.
    pub fn build(root: &Root) -> Result<Self, SpecError> {
        let mut axiom = None;
        let mut length = None;
        let mut width = None;
        let mut color = None;
        let mut iterate = None;
        let mut rules = Vec::new();
        let mut rules_by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut variables: Vec<(String, Expr)> = Vec::new();

        let mut transforms = HashMap::new();
        for default in [Transform::rotate("+", 90.0), Transform::rotate("-", -90.0)] {
            transforms.insert(default.name.clone(), default);
        }

        for decl in &root.body {
            match decl.clone() {
                Decl::Axiom(symbols) => set_once(&mut axiom, symbols, "Axiom")?,
                Decl::Length(e) => set_once(&mut length, e, "Length")?,
                Decl::Width(e) => set_once(&mut width, e, "Width")?,
                Decl::Color(c) => set_once(&mut color, c, "Color")?,
                Decl::Iterate(e) => set_once(&mut iterate, e, "Iterate")?,
                Decl::Rule { name, body, bias } => {
                    if body.is_empty() {
                        return Err(SpecError::EmptyRule(name));
                    }
                    rules_by_name
                        .entry(name.clone())
                        .or_default()
                        .push(rules.len());
                    rules.push(Rule {
                        name,
                        body,
                        bias: bias.unwrap_or(Expr::Num(1.0)),
                    });
                }
                Decl::Transform(t) => {
                    transforms.insert(t.name.clone(), Transform::from_decl(t.name, t.kind));
                }
                Decl::Var { name, value } => {
                    if variables.iter().any(|(existing, _)| *existing == name) {
                        return Err(SpecError::DuplicateVariable(name));
                    }
                    variables.push((name, value));
                }
            }
        }

        let spec = Self {
            axiom: axiom.ok_or(SpecError::MissingAxiom)?,
            length: length.unwrap_or(Expr::Num(1.0)),
            width: width.unwrap_or(Expr::Num(1.0)),
            color: color.unwrap_or_else(ColorExpr::black),
            iterate: iterate.unwrap_or(Expr::Num(1.0)),
            rules,
            rules_by_name,
            transforms,
            variables,
        };

        debug!(
            axiom = spec.axiom.len(),
            rules = spec.rules.len(),
            transforms = spec.transforms.len(),
            variables = spec.variables.len(),
            "built specification"
        );
        Ok(spec)
    }

    pub fn axiom(&self) -> &[Symbol] {
        &self.axiom
    }

    pub fn length(&self) -> &Expr {
        &self.length
    }

    pub fn width(&self) -> &Expr {
        &self.width
    }

    pub fn color(&self) -> &ColorExpr {
        &self.color
    }

    pub fn iterate(&self) -> &Expr {
        &self.iterate
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn variables(&self) -> &[(String, Expr)] {
        &self.variables
    }

    pub fn transform(&self, name: &str) -> Option<&Transform> {
        self.transforms.get(name)
    }

    /// Forward transform used for symbols without a registered transform, drawn with
    /// the global length, width and color.
    pub fn default_transform(&self) -> Transform {
        Transform {
            name: String::new(),
            op: TransformOp::Forward {
                distance: self.length.clone(),
                width: self.width.clone(),
                color: self.color.clone(),
            },
        }
    }

    /// Creates an evaluation context with every `var` declaration bound.
    pub fn create_context(&self, rng: StdRng) -> EvalContext {
        let mut ctx = EvalContext::new(rng);
        for (name, value) in &self.variables {
            ctx.define(name.clone(), value.clone());
        }
        ctx
    }

    /// Picks the rule that rewrites `name`.
    ///
    /// No candidates yields `None`; a single candidate is returned as is. With several,
    /// each bias is evaluated once, `r` is drawn from `[0, total)` and the first rule
    /// whose cumulative bias exceeds `r` wins.
    pub fn select_rule(
        &self,
        name: &str,
        ctx: &mut EvalContext,
    ) -> Result<Option<&Rule>, EvalError> {
        let indices = match self.rules_by_name.get(name) {
            None => return Ok(None),
            Some(indices) => indices,
        };
        if let [only] = indices.as_slice() {
            return Ok(Some(&self.rules[*only]));
        }

        let mut weighted = Vec::with_capacity(indices.len());
        let mut total = 0.0;
        for &i in indices {
            let rule = &self.rules[i];
            let bias = evaluate(&rule.bias, ctx)?;
            if !bias.is_finite() || bias < 0.0 {
                return Err(EvalError::InvalidBias {
                    rule: rule.name.clone(),
                    value: bias,
                });
            }
            total += bias;
            weighted.push((rule, bias));
        }
        if !total.is_finite() || total <= 0.0 {
            return Err(EvalError::InvalidBias {
                rule: name.to_string(),
                value: total,
            });
        }

        let draw = ctx.rng().random::<f64>() * total;
        trace!(rule = name, draw, total, "weighted rule selection");

        let mut remainder = draw;
        for &(rule, bias) in &weighted {
            remainder -= bias;
            if remainder < 0.0 {
                return Ok(Some(rule));
            }
        }
        // Rounding can leave a tiny non-negative remainder; the last weighted rule owns it.
        Ok(weighted
            .iter()
            .rev()
            .find(|(_, bias)| *bias > 0.0)
            .map(|(rule, _)| *rule))
    }
}
