//! Lexer turning L-System source text into [`Token`]s.
//!
//! Tokens are produced lazily by [`Lexer::next_token`]; [`tokenize`] collects the
//! whole stream. Spaces, tabs, newlines and line comments (`//` or `#` up to the end
//! of the line) are skipped. Identifiers are scanned in full before the keyword table
//! is consulted, so `rotation` lexes as one identifier rather than `rotate` + `ion`.

use crate::error::SyntaxError;
use crate::token::{Token, TokenKind};

pub struct Lexer<'input> {
    source: &'input str,
    /// Byte offset of the live cursor.
    pos: usize,
    line: usize,
    column: usize,
    /// Position of the most recently produced token.
    token_line: usize,
    token_column: usize,
}

impl<'input> Lexer<'input> {
    pub fn new(source: &'input str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
        }
    }

    pub fn source(&self) -> &'input str {
        self.source
    }

    /// Live cursor position as `(line, column)`.
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Start position of the last token handed out.
    pub fn token_position(&self) -> (usize, usize) {
        (self.token_line, self.token_column)
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += 1;
            if c == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn bump_while(&mut self, keep_going: impl Fn(u8) -> bool) {
        while let Some(c) = self.peek() {
            if !keep_going(c) {
                break;
            }
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => self.bump(),
                Some(b'#') => self.bump_while(|c| c != b'\n'),
                Some(b'/') if self.peek_at(1) == Some(b'/') => self.bump_while(|c| c != b'\n'),
                _ => return,
            }
        }
    }

    /// Produces the next token, or an [`TokenKind::Eof`] token once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token<'input>, SyntaxError> {
        self.skip_trivia();
        self.token_line = self.line;
        self.token_column = self.column;
        let start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        let kind = match c {
            b'0'..=b'9' => {
                self.number();
                TokenKind::Num
            }
            b'.' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => {
                self.number();
                TokenKind::Num
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.bump_while(is_identifier_continue);
                TokenKind::keyword(&self.source[start..self.pos]).unwrap_or(TokenKind::Ident)
            }
            _ => {
                let kind = match c {
                    b'=' => TokenKind::Assign,
                    b'[' => TokenKind::LBracket,
                    b']' => TokenKind::RBracket,
                    b'(' => TokenKind::LParen,
                    b')' => TokenKind::RParen,
                    b',' => TokenKind::Comma,
                    b';' => TokenKind::Semicolon,
                    b'+' => TokenKind::Plus,
                    b'-' => TokenKind::Minus,
                    b'*' => TokenKind::Star,
                    b'/' => TokenKind::Slash,
                    _ => {
                        let ch = self.source[start..].chars().next().unwrap_or('?');
                        return Err(SyntaxError::new(
                            self.source,
                            self.line,
                            self.column,
                            format!("Unexpected character '{}'", ch),
                        ));
                    }
                };
                self.bump();
                kind
            }
        };

        Ok(self.token(kind, start))
    }

    /// `\d+(\.\d+)?` or `\.\d+`; the caller guarantees a digit or `.digit` at the cursor.
    fn number(&mut self) {
        self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'input> {
        Token {
            kind,
            text: &self.source[start..self.pos],
            line: self.token_line,
            column: self.token_column,
        }
    }
}

fn is_identifier_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Lexes the whole `source`, including the trailing [`TokenKind::Eof`] token.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, SyntaxError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
