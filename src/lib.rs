//! # lsys-turtle
//!
//! A compiler and turtle renderer for a small language describing stochastic
//! L-Systems.
//!
//! The pipeline is `source → tokens → AST → Specification → L-string → Drawing`:
//!
//! ```no_run
//! use lsys_turtle::{EvalContext, RewriteConfig, Rewriter, TurtleRenderer, compile};
//!
//! let spec = compile("axiom F; rule F = F [ + F ] F; iterate 3;")?;
//! let mut ctx = EvalContext::seeded(7);
//! let mut rewriter = Rewriter::new(&spec, RewriteConfig::default());
//! let lstring = rewriter.iterate(&mut ctx)?.to_vec();
//! let drawing = TurtleRenderer::default().render(&spec, &lstring, &ctx)?;
//! # Ok::<(), lsys_turtle::Error>(())
//! ```
//!
//! Weighted rule choice draws only from the [`EvalContext`]'s generator, so a fixed
//! seed reproduces an expansion exactly.

pub mod ast;
pub mod context;
pub mod error;
pub mod eval;
pub mod geometry;
pub mod lexer;
pub mod parser;
pub mod renderer;
pub mod rewriter;
pub mod spec;
pub mod svg;
pub mod token;
pub mod turtle;

pub use ast::{Root, Symbol};
pub use context::EvalContext;
pub use error::{Error, EvalError, RenderError, Result, RewriteError, SpecError, SyntaxError};
pub use eval::evaluate;
pub use geometry::*;
pub use lexer::{Lexer, tokenize};
pub use parser::{Parser, parse};
pub use renderer::{RenderConfig, TurtleRenderer};
pub use rewriter::{RewriteConfig, Rewriter, format_symbols};
pub use spec::{Rule, Specification, Transform, TransformOp};
pub use svg::{SvgConfig, write_svg};
pub use turtle::TurtleState;

/// Parses `source` and assembles its [`Specification`].
pub fn compile(source: &str) -> Result<Specification> {
    let root = parse(source)?;
    Ok(Specification::build(&root)?)
}
