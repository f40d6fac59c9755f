//! Error kinds raised by each pipeline stage.
//!
//! Every stage returns its own error type; [`Error`] unifies them so the
//! full lex → parse → build → rewrite → render pipeline can propagate with `?`.

use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Any fatal failure of a pipeline stage.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A lexing or parsing failure, located in the source text.
///
/// Displays as `[line:column] message`, followed by the offending source line
/// and a caret pointing at the column.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("[{line}:{column}] {message}\n{excerpt}")]
pub struct SyntaxError {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    pub message: String,
    /// The source line plus a caret line.
    pub excerpt: String,
}

impl SyntaxError {
    /// Builds an error at `line:column` of `source`, capturing the excerpt.
    pub fn new(source: &str, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            excerpt: excerpt(source, line, column),
        }
    }
}

fn excerpt(source: &str, line: usize, column: usize) -> String {
    let text = source
        .split('\n')
        .nth(line.saturating_sub(1))
        .unwrap_or("")
        .trim_end_matches('\r');
    format!("{}\n{}^", text, " ".repeat(column.saturating_sub(1)))
}

/// Violations found while assembling a [`crate::Specification`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpecError {
    /// `what` is one of `Axiom`, `Length`, `Width`, `Color`, `Iterate`.
    #[error("{0} declared more than once")]
    DuplicateDeclaration(&'static str),

    #[error("Redeclaration of variable '{0}'")]
    DuplicateVariable(String),

    #[error("Rule '{0}' has an empty replacement")]
    EmptyRule(String),

    #[error("No axiom declared")]
    MissingAxiom,
}

/// Failures while evaluating an expression.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("No variable with name '{0}' exists")]
    UnknownVariable(String),

    #[error("No function with name '{0}' exists")]
    UnknownFunction(String),

    #[error("Function '{function}' expects {expected} argument(s), got {found}")]
    Arity {
        function: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Variable references nested deeper than {0} (self-referential variable?)")]
    DepthExceeded(usize),

    /// An operation overflowed or otherwise left the finite range.
    #[error("'{expr}' evaluated to {value}")]
    NonFinite { expr: String, value: f64 },

    #[error("Invalid bias {value} for rule '{rule}'")]
    InvalidBias { rule: String, value: f64 },
}

/// Failures of the generational rewriting engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("Generation {generation} produced {length} symbols, exceeding the limit of {limit}")]
    SequenceTooLong {
        generation: usize,
        length: usize,
        limit: usize,
    },
}

/// Failures of the turtle renderer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A `]` was reached while only the root pose remained on the stack.
    #[error("Turtle stack underflow at symbol {position}")]
    StackUnderflow { position: usize },

    #[error("Turtle stack exceeded maximum depth {limit} at symbol {position}")]
    StackOverflow { position: usize, limit: usize },

    /// Accumulated moves or turns overflowed the turtle pose.
    #[error("Turtle pose is no longer finite at symbol {position}")]
    NonFinitePose { position: usize },
}
