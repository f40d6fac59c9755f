//! Recursive-descent parser with one token of lookahead.
//!
//! ```text
//! program   := { decl ';' }
//! decl      := 'var' ID '=' expr
//!            | 'rule' ID [ '=' symbols ] [ 'bias' expr ]
//!            | 'axiom' symbols
//!            | 'length' expr | 'width' expr | 'iterate' expr
//!            | 'color' color
//!            | 'transform' (ID | '+' | '-') (rotate | translate)
//! rotate    := 'rotate' expr [ 'deg' | 'rad' ]
//! translate := 'translate' expr [ ',' expr ] [ 'width' expr ] [ 'color' color ]
//! color     := expr [ ',' expr ',' expr ]
//! symbols   := { ID | '+' | '-' | '[' | ']' }
//! ```
//!
//! Binary expressions are assembled by precedence climbing over an explicit stack of
//! pending operators, see [`Parser::expression`]. The height of every expression tree
//! is bounded by [`MAX_NESTING`], so evaluating, cloning and dropping a parsed tree
//! never recurses deeper than that.

use crate::ast::{BinaryOp, ColorExpr, Decl, Expr, Root, Symbol, TransformDecl, TransformKind, Unit};
use crate::error::SyntaxError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Tallest accepted expression tree. Groups, calls, negations and every operator of
/// a chain each add a level, so `1 + 1 + ... + 1` is limited as well.
pub const MAX_NESTING: usize = 256;

/// Parses `source` into a syntax tree.
pub fn parse(source: &str) -> Result<Root, SyntaxError> {
    Parser::new(source)?.parse_root()
}

pub struct Parser<'input> {
    lexer: Lexer<'input>,
    lookahead: Token<'input>,
    nesting: usize,
}

impl<'input> Parser<'input> {
    pub fn new(source: &'input str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let lookahead = lexer.next_token()?;
        Ok(Self {
            lexer,
            lookahead,
            nesting: 0,
        })
    }

    // --- Token helpers ---

    fn is_next(&self, kind: TokenKind) -> bool {
        self.lookahead.kind == kind
    }

    fn is_next_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.lookahead.kind)
    }

    fn advance(&mut self) -> Result<Token<'input>, SyntaxError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    /// Error located at the start of the lookahead token.
    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(
            self.lexer.source(),
            self.lookahead.line,
            self.lookahead.column,
            message,
        )
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        if self.is_next(TokenKind::Eof) {
            self.error(format!("Unexpected end of input, expected {}", expected))
        } else if matches!(self.lookahead.kind, TokenKind::Ident | TokenKind::Num) {
            self.error(format!(
                "Unexpected {} '{}', expected {}",
                self.lookahead.kind, self.lookahead.text, expected
            ))
        } else {
            self.error(format!(
                "Unexpected token {}, expected {}",
                self.lookahead.kind, expected
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token<'input>, SyntaxError> {
        self.consume_any(&[kind])
    }

    fn consume_any(&mut self, kinds: &[TokenKind]) -> Result<Token<'input>, SyntaxError> {
        if self.is_next_any(kinds) {
            return self.advance();
        }
        let expected = kinds
            .iter()
            .map(|k| k.describe())
            .collect::<Vec<_>>()
            .join(" or ");
        Err(self.unexpected(&expected))
    }

    /// Consumes the token if it is of `kind`; leaves the stream untouched otherwise.
    fn consume_optional(
        &mut self,
        kind: TokenKind,
    ) -> Result<Option<Token<'input>>, SyntaxError> {
        if self.is_next(kind) {
            self.advance().map(Some)
        } else {
            Ok(None)
        }
    }

    // --- Declarations ---

    pub fn parse_root(&mut self) -> Result<Root, SyntaxError> {
        let mut body = Vec::new();
        while !self.is_next(TokenKind::Eof) {
            body.push(self.declaration()?);
        }
        Ok(Root { body })
    }

    fn declaration(&mut self) -> Result<Decl, SyntaxError> {
        let decl = match self.lookahead.kind {
            TokenKind::Var => self.var()?,
            TokenKind::Rule => self.rule()?,
            TokenKind::Axiom => {
                self.advance()?;
                Decl::Axiom(self.symbols()?)
            }
            TokenKind::Length => {
                self.advance()?;
                Decl::Length(self.expression()?)
            }
            TokenKind::Width => {
                self.advance()?;
                Decl::Width(self.expression()?)
            }
            TokenKind::Color => {
                self.advance()?;
                Decl::Color(self.color()?)
            }
            TokenKind::Iterate => {
                self.advance()?;
                Decl::Iterate(self.expression()?)
            }
            TokenKind::Transform => Decl::Transform(self.transform()?),
            _ => return Err(self.unexpected("declaration")),
        };
        self.consume(TokenKind::Semicolon)?;
        Ok(decl)
    }

    fn identifier(&mut self) -> Result<String, SyntaxError> {
        Ok(self.consume(TokenKind::Ident)?.text.to_string())
    }

    fn var(&mut self) -> Result<Decl, SyntaxError> {
        self.consume(TokenKind::Var)?;
        let name = self.identifier()?;
        self.consume(TokenKind::Assign)?;
        let value = self.expression()?;
        Ok(Decl::Var { name, value })
    }

    fn rule(&mut self) -> Result<Decl, SyntaxError> {
        self.consume(TokenKind::Rule)?;
        let name = self.identifier()?;

        let mut body = Vec::new();
        if self.consume_optional(TokenKind::Assign)?.is_some() {
            body = self.symbols()?;
            if body.is_empty() {
                return Err(self.error("Empty rule string"));
            }
        }

        let bias = match self.consume_optional(TokenKind::Bias)? {
            Some(_) => Some(self.expression()?),
            None => None,
        };

        Ok(Decl::Rule { name, body, bias })
    }

    fn symbols(&mut self) -> Result<Vec<Symbol>, SyntaxError> {
        let mut symbols = Vec::new();
        while !self.is_next_any(&[TokenKind::Bias, TokenKind::Semicolon, TokenKind::Eof]) {
            let symbol = match self.lookahead.kind {
                TokenKind::Ident | TokenKind::Plus | TokenKind::Minus => {
                    Symbol::Ident(self.advance()?.text.to_string())
                }
                TokenKind::LBracket => {
                    self.advance()?;
                    Symbol::Push
                }
                TokenKind::RBracket => {
                    self.advance()?;
                    Symbol::Pop
                }
                _ => return Err(self.unexpected("symbol, '[' or ']'")),
            };
            symbols.push(symbol);
        }
        Ok(symbols)
    }

    fn transform(&mut self) -> Result<TransformDecl, SyntaxError> {
        self.consume(TokenKind::Transform)?;
        let name = self
            .consume_any(&[TokenKind::Ident, TokenKind::Plus, TokenKind::Minus])?
            .text
            .to_string();

        let kind = match self.lookahead.kind {
            TokenKind::Rotate => self.rotate()?,
            TokenKind::Translate => self.translate()?,
            _ => return Err(self.unexpected("transform type 'rotate' or 'translate'")),
        };
        Ok(TransformDecl { name, kind })
    }

    fn rotate(&mut self) -> Result<TransformKind, SyntaxError> {
        self.consume(TokenKind::Rotate)?;
        let angle = self.expression()?;
        let unit = if self.consume_optional(TokenKind::Rad)?.is_some() {
            Unit::Rad
        } else {
            self.consume_optional(TokenKind::Deg)?;
            Unit::Deg
        };
        Ok(TransformKind::Rotate { angle, unit })
    }

    fn translate(&mut self) -> Result<TransformKind, SyntaxError> {
        self.consume(TokenKind::Translate)?;
        let x = self.expression()?;
        let y = match self.consume_optional(TokenKind::Comma)? {
            Some(_) => Some(self.expression()?),
            None => None,
        };
        let width = match self.consume_optional(TokenKind::Width)? {
            Some(_) => Some(self.expression()?),
            None => None,
        };
        let color = match self.consume_optional(TokenKind::Color)? {
            Some(_) => Some(self.color()?),
            None => None,
        };

        Ok(match y {
            None => TransformKind::ForwardTranslate {
                distance: x,
                width,
                color,
            },
            Some(dy) => TransformKind::AbsoluteTranslate {
                dx: x,
                dy,
                width,
                color,
            },
        })
    }

    fn color(&mut self) -> Result<ColorExpr, SyntaxError> {
        let r = self.expression()?;
        if self.consume_optional(TokenKind::Comma)?.is_none() {
            return Ok(ColorExpr::gray(r));
        }
        let g = self.expression()?;
        self.consume(TokenKind::Comma)?;
        let b = self.expression()?;
        Ok(ColorExpr { r, g, b })
    }

    // --- Expressions ---

    fn peek_operator(&self) -> Option<BinaryOp> {
        match self.lookahead.kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            _ => None,
        }
    }

    /// Parses `operand { op operand }`.
    pub fn expression(&mut self) -> Result<Expr, SyntaxError> {
        Ok(self.expression_tree()?.expr)
    }

    /// Each pending entry is a left operand waiting for its operator's right side.
    /// Before an incoming operator is stacked, every pending operator of greater or
    /// equal precedence is reduced, which makes `+ -` and `* /` left-associative.
    /// What remains has strictly increasing precedence and is reduced right to left.
    fn expression_tree(&mut self) -> Result<Operand, SyntaxError> {
        let mut pending: Vec<(Operand, BinaryOp)> = Vec::new();
        let mut current = self.operand()?;

        while let Some(op) = self.peek_operator() {
            loop {
                match pending.pop() {
                    Some((lhs, top)) if top.precedence() >= op.precedence() => {
                        current = self.combine(lhs, top, current)?;
                    }
                    Some(entry) => {
                        pending.push(entry);
                        break;
                    }
                    None => break,
                }
            }
            self.advance()?;
            pending.push((current, op));
            current = self.operand()?;
        }

        while let Some((lhs, op)) = pending.pop() {
            current = self.combine(lhs, op, current)?;
        }
        Ok(current)
    }

    fn combine(&self, lhs: Operand, op: BinaryOp, rhs: Operand) -> Result<Operand, SyntaxError> {
        let height = lhs.height.max(rhs.height) + 1;
        self.nested(Expr::binary(op, lhs.expr, rhs.expr), height)
    }

    /// Wraps a composite node, rejecting trees taller than [`MAX_NESTING`].
    fn nested(&self, expr: Expr, height: usize) -> Result<Operand, SyntaxError> {
        if height > MAX_NESTING {
            return Err(self.too_deep());
        }
        Ok(Operand { expr, height })
    }

    fn too_deep(&self) -> SyntaxError {
        self.error(format!(
            "Expression nested deeper than {} levels",
            MAX_NESTING
        ))
    }

    fn operand(&mut self) -> Result<Operand, SyntaxError> {
        if self.nesting >= MAX_NESTING {
            return Err(self.too_deep());
        }
        self.nesting += 1;
        let result = self.operand_inner();
        self.nesting -= 1;
        result
    }

    fn operand_inner(&mut self) -> Result<Operand, SyntaxError> {
        match self.lookahead.kind {
            TokenKind::Num => {
                let token = self.advance()?;
                let value = token
                    .text
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        SyntaxError::new(
                            self.lexer.source(),
                            token.line,
                            token.column,
                            format!("Invalid number '{}'", token.text),
                        )
                    })?;
                Ok(Operand::leaf(Expr::Num(value)))
            }
            TokenKind::Ident => {
                let name = self.identifier()?;
                if self.is_next(TokenKind::LParen) {
                    self.call(name)
                } else {
                    Ok(Operand::leaf(Expr::Ident(name)))
                }
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.expression_tree()?;
                self.consume(TokenKind::RParen)?;
                self.nested(Expr::Group(Box::new(inner.expr)), inner.height + 1)
            }
            TokenKind::Minus => {
                self.advance()?;
                let inner = self.operand()?;
                self.nested(Expr::Neg(Box::new(inner.expr)), inner.height + 1)
            }
            _ => Err(self.unexpected("value")),
        }
    }

    fn call(&mut self, name: String) -> Result<Operand, SyntaxError> {
        self.consume(TokenKind::LParen)?;
        let mut args = Vec::new();
        let mut height = 0;
        if self.consume_optional(TokenKind::RParen)?.is_none() {
            loop {
                let arg = self.expression_tree()?;
                height = height.max(arg.height);
                args.push(arg.expr);
                if self.consume_optional(TokenKind::RParen)?.is_some() {
                    break;
                }
                self.consume(TokenKind::Comma)?;
            }
        }
        self.nested(Expr::Call { name, args }, height + 1)
    }
}

/// A parsed expression with the height of its tree.
struct Operand {
    expr: Expr,
    height: usize,
}

impl Operand {
    fn leaf(expr: Expr) -> Self {
        Self { expr, height: 1 }
    }
}
