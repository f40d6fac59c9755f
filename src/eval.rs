//! Expression evaluation.

use crate::ast::{BinaryOp, Expr};
use crate::context::EvalContext;
use crate::error::EvalError;

/// Maximum chain of variable lookups inside one evaluation.
///
/// Parsed trees are already bounded in height by [`crate::parser::MAX_NESTING`]; this
/// bounds how many of them a single evaluation can stack up through variables.
pub const MAX_EVAL_DEPTH: usize = 64;

/// Evaluates `expr` to a number under `ctx`.
///
/// Identifiers evaluate the expression bound to them; function arguments are
/// evaluated left to right before the native function runs. Division by zero is
/// reported as [`EvalError::DivisionByZero`], and any other infinite or NaN result
/// as [`EvalError::NonFinite`].
pub fn evaluate(expr: &Expr, ctx: &mut EvalContext) -> Result<f64, EvalError> {
    eval_at(expr, ctx, 0)
}

fn eval_at(expr: &Expr, ctx: &mut EvalContext, depth: usize) -> Result<f64, EvalError> {
    let value = match expr {
        Expr::Num(value) => *value,
        Expr::Ident(name) => {
            if depth >= MAX_EVAL_DEPTH {
                return Err(EvalError::DepthExceeded(MAX_EVAL_DEPTH));
            }
            let bound = ctx
                .variable(name)
                .ok_or_else(|| EvalError::UnknownVariable(name.clone()))?;
            eval_at(&bound, ctx, depth + 1)?
        }
        Expr::Call { name, args } => {
            let function = ctx
                .function(name)
                .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
            let values = args
                .iter()
                .map(|arg| eval_at(arg, ctx, depth))
                .collect::<Result<Vec<_>, _>>()?;
            function(&values, ctx.rng())?
        }
        Expr::Group(inner) => eval_at(inner, ctx, depth)?,
        Expr::Binary { op, lhs, rhs } => {
            let l = eval_at(lhs, ctx, depth)?;
            let r = eval_at(rhs, ctx, depth)?;
            match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div if r == 0.0 => return Err(EvalError::DivisionByZero),
                BinaryOp::Div => l / r,
            }
        }
        Expr::Neg(inner) => -eval_at(inner, ctx, depth)?,
    };

    if !value.is_finite() {
        return Err(EvalError::NonFinite {
            expr: expr.to_string(),
            value,
        });
    }
    Ok(value)
}
