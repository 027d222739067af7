//! Expression lexer
//!
//! Numbers are decimal with an optional fraction and exponent. Identifiers are
//! ASCII letters, digits and underscores; whether a name is allowed is the
//! parser's concern.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::EvalError;
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    /// `**`
    Power,
    Slash,
    /// `//`
    FloorDiv,
    Percent,
    LParen,
    RParen,
    Comma,
    Dot,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub position: usize,
}

pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
        }

        let Some((start, c)) = self.chars.next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position: self.source.len(),
            });
        };

        let kind = match c {
            '0'..='9' => self.scan_number(start)?,
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start)?,
            'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(start),
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' if self.advance_if('*') => TokenKind::Power,
            '*' => TokenKind::Star,
            '/' if self.advance_if('/') => TokenKind::FloorDiv,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            other => {
                return Err(EvalError::Syntax {
                    position: start,
                    message: format!("unexpected character {other:?}"),
                })
            }
        };

        Ok(Token {
            kind,
            position: start,
        })
    }

    fn scan_number(&mut self, start: usize) -> Result<TokenKind> {
        let mut end = start + 1;
        let mut seen_dot = self.source[start..].starts_with('.');
        let mut seen_exp = false;

        while let Some(&(i, c)) = self.chars.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' if !seen_dot && !seen_exp => seen_dot = true,
                'e' | 'E' if !seen_exp => {
                    seen_exp = true;
                    self.chars.next();
                    end = i + 1;
                    if let Some(&(j, sign @ ('+' | '-'))) = self.chars.peek() {
                        self.chars.next();
                        end = j + sign.len_utf8();
                    }
                    continue;
                }
                _ => break,
            }
            self.chars.next();
            end = i + c.len_utf8();
        }

        let text: String = self.source[start..end].chars().filter(|&c| c != '_').collect();
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| EvalError::Syntax {
                position: start,
                message: format!("invalid number {:?}", &self.source[start..end]),
            })
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        let mut end = start + 1;
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.chars.next();
                end = i + 1;
            } else {
                break;
            }
        }
        TokenKind::Ident(self.source[start..end].to_string())
    }
}
