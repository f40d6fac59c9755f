//! Name environment used to evaluate expressions.

use crate::ast::Expr;
use crate::error::EvalError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::f64::consts::{E, PI};
use std::rc::Rc;

/// A native numeric function. Receives the already evaluated arguments and the
/// run's random generator.
pub type NativeFn = fn(&[f64], &mut StdRng) -> Result<f64, EvalError>;

/// Variables (bound to expression subtrees), native functions, and the random source
/// for one run.
///
/// Variables are evaluated lazily on every lookup, so a variable bound to
/// `random(10)` yields a fresh draw each time it is referenced.
#[derive(Clone, Debug)]
pub struct EvalContext {
    vars: HashMap<String, Rc<Expr>>,
    funcs: HashMap<String, NativeFn>,
    rng: StdRng,
}

impl EvalContext {
    /// Creates a context holding `pi`, `e` and the builtins `random`, `min`, `max`.
    pub fn new(rng: StdRng) -> Self {
        let mut ctx = Self {
            vars: HashMap::new(),
            funcs: HashMap::new(),
            rng,
        };
        ctx.set("pi", PI);
        ctx.set("e", E);
        ctx.define_function("random", random);
        ctx.define_function("min", min);
        ctx.define_function("max", max);
        ctx
    }

    /// A context whose random draws are reproducible from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Binds `name` to an expression, replacing any previous binding.
    pub fn define(&mut self, name: impl Into<String>, value: Expr) {
        self.vars.insert(name.into(), Rc::new(value));
    }

    /// Binds `name` to a constant.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.define(name, Expr::Num(value));
    }

    pub fn variable(&self, name: &str) -> Option<Rc<Expr>> {
        self.vars.get(name).cloned()
    }

    pub fn define_function(&mut self, name: impl Into<String>, function: NativeFn) {
        self.funcs.insert(name.into(), function);
    }

    pub fn function(&self, name: &str) -> Option<NativeFn> {
        self.funcs.get(name).copied()
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

// --- Builtins ---

/// `random()` → `[0, 1)`, `random(max)` → `[0, max)`, `random(min, max)` → `[min, max)`.
fn random(args: &[f64], rng: &mut StdRng) -> Result<f64, EvalError> {
    let (lo, hi) = match *args {
        [] => (0.0, 1.0),
        [max] => (0.0, max),
        [min, max] => (min, max),
        _ => {
            return Err(EvalError::Arity {
                function: "random",
                expected: "0, 1 or 2",
                found: args.len(),
            });
        }
    };
    Ok(lo + (hi - lo) * rng.random::<f64>())
}

fn min(args: &[f64], _rng: &mut StdRng) -> Result<f64, EvalError> {
    extremum("min", args, f64::min)
}

fn max(args: &[f64], _rng: &mut StdRng) -> Result<f64, EvalError> {
    extremum("max", args, f64::max)
}

fn extremum(
    function: &'static str,
    args: &[f64],
    pick: fn(f64, f64) -> f64,
) -> Result<f64, EvalError> {
    let (first, rest) = args.split_first().ok_or(EvalError::Arity {
        function,
        expected: "at least 1",
        found: 0,
    })?;
    Ok(rest.iter().fold(*first, |acc, &v| pick(acc, v)))
}
