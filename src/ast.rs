//! Abstract syntax tree for the L-System language.
//!
//! The tree is a closed set of enums; evaluation lives in [`crate::eval`] and matches
//! exhaustively over [`Expr`]. Every node implements [`fmt::Display`] and prints back
//! to source text that parses to an equal tree.

use std::fmt;

/// A whole program: the declarations in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Root {
    pub body: Vec<Decl>,
}

/// One `;`-terminated top-level declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    /// `var name = value;`
    Var { name: String, value: Expr },
    /// `rule name = body bias expr;`
    Rule {
        name: String,
        body: Vec<Symbol>,
        bias: Option<Expr>,
    },
    Axiom(Vec<Symbol>),
    Length(Expr),
    Width(Expr),
    Color(ColorExpr),
    Iterate(Expr),
    Transform(TransformDecl),
}

/// An element of an axiom or rule body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A named symbol; `+` and `-` are names too.
    Ident(String),
    /// `[`: save the turtle pose.
    Push,
    /// `]`: restore the last saved pose.
    Pop,
}

impl Symbol {
    pub fn ident(name: impl Into<String>) -> Self {
        Symbol::Ident(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// Numeric expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Ident(String),
    Call { name: String, args: Vec<Expr> },
    /// Parenthesized sub-expression, kept so the tree prints back faithfully.
    Group(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Neg(Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// `+ -` bind at 0, `* /` at 1.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 0,
            BinaryOp::Mul | BinaryOp::Div => 1,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// An RGB triple of expressions. A single-expression color is stored as a gray triple.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorExpr {
    pub r: Expr,
    pub g: Expr,
    pub b: Expr,
}

impl ColorExpr {
    pub fn gray(value: Expr) -> Self {
        Self {
            r: value.clone(),
            g: value.clone(),
            b: value,
        }
    }

    pub fn black() -> Self {
        Self::gray(Expr::Num(0.0))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Unit {
    #[default]
    Deg,
    Rad,
}

/// `transform name ...;`
#[derive(Clone, Debug, PartialEq)]
pub struct TransformDecl {
    pub name: String,
    pub kind: TransformKind,
}

/// The tail of a transform declaration. Width and color overrides stay optional here;
/// their defaults are filled in by [`crate::Specification::build`].
#[derive(Clone, Debug, PartialEq)]
pub enum TransformKind {
    /// `rotate angle [deg|rad]`
    Rotate { angle: Expr, unit: Unit },
    /// `translate distance [width w] [color c]`: move along the heading.
    ForwardTranslate {
        distance: Expr,
        width: Option<Expr>,
        color: Option<ColorExpr>,
    },
    /// `translate dx, dy [width w] [color c]`: move by a fixed offset.
    AbsoluteTranslate {
        dx: Expr,
        dy: Expr,
        width: Option<Expr>,
        color: Option<ColorExpr>,
    },
}

// --- Source printing ---

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decl in &self.body {
            writeln!(f, "{}", decl)?;
        }
        Ok(())
    }
}

struct Symbols<'a>(&'a [Symbol]);

impl fmt::Display for Symbols<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decl::Var { name, value } => write!(f, "var {} = {};", name, value),
            Decl::Rule { name, body, bias } => {
                write!(f, "rule {}", name)?;
                if !body.is_empty() {
                    write!(f, " = {}", Symbols(body))?;
                }
                if let Some(bias) = bias {
                    write!(f, " bias {}", bias)?;
                }
                f.write_str(";")
            }
            Decl::Axiom(symbols) => write!(f, "axiom {};", Symbols(symbols)),
            Decl::Length(e) => write!(f, "length {};", e),
            Decl::Width(e) => write!(f, "width {};", e),
            Decl::Color(c) => write!(f, "color {};", c),
            Decl::Iterate(e) => write!(f, "iterate {};", e),
            Decl::Transform(t) => write!(f, "{};", t),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Ident(name) => f.write_str(name),
            Symbol::Push => f.write_str("["),
            Symbol::Pop => f.write_str("]"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{}", v),
            Expr::Ident(name) => f.write_str(name),
            Expr::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Expr::Group(inner) => write!(f, "({})", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.symbol(), rhs),
            Expr::Neg(inner) => write!(f, "-{}", inner),
        }
    }
}

impl fmt::Display for ColorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.r == self.g && self.g == self.b {
            write!(f, "{}", self.r)
        } else {
            write!(f, "{}, {}, {}", self.r, self.g, self.b)
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Deg => f.write_str("deg"),
            Unit::Rad => f.write_str("rad"),
        }
    }
}

impl fmt::Display for TransformDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transform {} ", self.name)?;
        let (width, color) = match &self.kind {
            TransformKind::Rotate { angle, unit } => return write!(f, "rotate {} {}", angle, unit),
            TransformKind::ForwardTranslate {
                distance,
                width,
                color,
            } => {
                write!(f, "translate {}", distance)?;
                (width, color)
            }
            TransformKind::AbsoluteTranslate {
                dx,
                dy,
                width,
                color,
            } => {
                write!(f, "translate {}, {}", dx, dy)?;
                (width, color)
            }
        };
        if let Some(width) = width {
            write!(f, " width {}", width)?;
        }
        if let Some(color) = color {
            write!(f, " color {}", color)?;
        }
        Ok(())
    }
}
