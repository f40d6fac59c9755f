//! Token definitions shared by the lexer and parser.

use std::fmt;

/// The kind of a lexeme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // --- Keywords ---
    Var,
    Transform,
    Rule,
    Axiom,
    Length,
    Width,
    Color,
    Iterate,
    Bias,
    Rotate,
    Translate,
    Rad,
    Deg,

    // --- Punctuation ---
    Assign,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Semicolon,

    // --- Operators ---
    Plus,
    Minus,
    Star,
    Slash,

    // --- Literals ---
    Num,
    Ident,

    Eof,
}

/// Reserved words, checked after a full identifier has been scanned.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("var", TokenKind::Var),
    ("transform", TokenKind::Transform),
    ("rule", TokenKind::Rule),
    ("axiom", TokenKind::Axiom),
    ("length", TokenKind::Length),
    ("width", TokenKind::Width),
    ("color", TokenKind::Color),
    ("iterate", TokenKind::Iterate),
    ("bias", TokenKind::Bias),
    ("rotate", TokenKind::Rotate),
    ("translate", TokenKind::Translate),
    ("rad", TokenKind::Rad),
    ("deg", TokenKind::Deg),
];

impl TokenKind {
    /// Looks up a keyword by its exact spelling.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(w, _)| *w == word)
            .map(|(_, kind)| *kind)
    }

    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Var => "'var'",
            TokenKind::Transform => "'transform'",
            TokenKind::Rule => "'rule'",
            TokenKind::Axiom => "'axiom'",
            TokenKind::Length => "'length'",
            TokenKind::Width => "'width'",
            TokenKind::Color => "'color'",
            TokenKind::Iterate => "'iterate'",
            TokenKind::Bias => "'bias'",
            TokenKind::Rotate => "'rotate'",
            TokenKind::Translate => "'translate'",
            TokenKind::Rad => "'rad'",
            TokenKind::Deg => "'deg'",
            TokenKind::Assign => "'='",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Num => "number",
            TokenKind::Ident => "identifier",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// One lexeme with its raw text and the position of its first character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'input> {
    pub kind: TokenKind,
    pub text: &'input str,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column of the first character.
    pub column: usize,
}
