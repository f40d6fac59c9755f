//! Generational string rewriting.
//!
//! [`Rewriter`] starts from the axiom and, once per generation, replaces every named
//! symbol that has a rule with the chosen rule's body. Replacements are spliced in
//! flat and are not expanded again within the same generation.

use crate::ast::Symbol;
use crate::context::EvalContext;
use crate::error::{Result, RewriteError};
use crate::eval::evaluate;
use crate::spec::Specification;
use tracing::{debug, warn};

/// Limits for rewriting.
#[derive(Clone, Debug)]
pub struct RewriteConfig {
    /// Longest L-string a generation may produce.
    pub max_symbols: usize,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_symbols: 10_000_000,
        }
    }
}

pub struct Rewriter<'a> {
    spec: &'a Specification,
    config: RewriteConfig,
    lstring: Vec<Symbol>,
    generations: usize,
}

impl<'a> Rewriter<'a> {
    pub fn new(spec: &'a Specification, config: RewriteConfig) -> Self {
        Self {
            spec,
            config,
            lstring: spec.axiom().to_vec(),
            generations: 0,
        }
    }

    /// The current L-string.
    pub fn lstring(&self) -> &[Symbol] {
        &self.lstring
    }

    pub fn into_lstring(self) -> Vec<Symbol> {
        self.lstring
    }

    /// Generations actually performed by the last [`iterate`](Self::iterate); may be
    /// fewer than requested when a generation matched no rule.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Rewrites the axiom for the number of generations given by the specification's
    /// `iterate` expression (floored).
    ///
    /// Binds `iterations` to the target count and `depth` to the current generation
    /// index in `ctx`, so rule biases can depend on them. Stops early once a
    /// generation matches no rule at all.
    pub fn iterate(&mut self, ctx: &mut EvalContext) -> Result<&[Symbol]> {
        let requested = evaluate(self.spec.iterate(), ctx)?.floor();
        let target = if requested.is_nan() || requested < 0.0 {
            warn!(requested, "iterate count is not a non-negative number, using 0");
            0
        } else {
            requested as usize
        };

        self.lstring = self.spec.axiom().to_vec();
        self.generations = 0;
        ctx.set("iterations", target as f64);
        ctx.set("depth", 0.0);

        while self.generations < target {
            if !self.step(ctx)? {
                debug!(generation = self.generations, "no rule matched, stopping early");
                break;
            }
        }
        Ok(&self.lstring)
    }

    /// Performs one generation. Returns `false` if no symbol matched a rule.
    pub fn step(&mut self, ctx: &mut EvalContext) -> Result<bool> {
        let mut next = Vec::with_capacity(self.lstring.len());
        let mut matched = false;

        for symbol in &self.lstring {
            let rule = match symbol {
                Symbol::Ident(name) => self.spec.select_rule(name, ctx)?,
                Symbol::Push | Symbol::Pop => None,
            };
            match rule {
                Some(rule) => {
                    matched = true;
                    next.extend_from_slice(&rule.body);
                }
                None => next.push(symbol.clone()),
            }

            if next.len() > self.config.max_symbols {
                return Err(RewriteError::SequenceTooLong {
                    generation: self.generations + 1,
                    length: next.len(),
                    limit: self.config.max_symbols,
                }
                .into());
            }
        }

        if matched {
            self.lstring = next;
            self.generations += 1;
            ctx.set("depth", self.generations as f64);
            debug!(
                generation = self.generations,
                symbols = self.lstring.len(),
                "rewrote generation"
            );
        }
        Ok(matched)
    }
}

/// Renders an L-string as space-separated symbols, e.g. `F [ + F ] F`.
pub fn format_symbols(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
