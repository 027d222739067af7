//! Recursive-descent parser
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | name | name '(' args ')' | '(' expr ')'
//! name    := IDENT | 'math' '.' IDENT
//! ```
//!
//! Names are resolved here, so an expression that mentions anything outside
//! the math namespace never reaches evaluation.

use crate::error::EvalError;
use crate::lexer::{Token, TokenKind};
use crate::namespace::{Constant, Function};
use crate::Result;

const MODULE_PREFIX: &str = "math";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Constant(Constant),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, max_depth: usize) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let position = tokens.last().map(|t| t.position).unwrap_or(0);
            tokens.push(Token {
                kind: TokenKind::Eof,
                position,
            });
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    pub fn parse(mut self) -> Result<Expr> {
        let expr = self.parse_expr()?;
        match self.peek() {
            TokenKind::Eof => Ok(expr),
            _ => Err(self.unexpected()),
        }
    }

    /// The token stream always ends in `Eof` and the cursor never moves past it
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn position(&self) -> usize {
        self.current().position
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> EvalError {
        match self.peek() {
            TokenKind::Eof => EvalError::UnexpectedEnd,
            other => EvalError::Syntax {
                position: self.position(),
                message: format!("unexpected {}", describe(other)),
            },
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(EvalError::TooDeep(self.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.enter()?;
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.leave();
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::FloorDiv => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_power(),
        };
        self.advance();

        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave();
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if !self.eat(&TokenKind::Power) {
            return Ok(base);
        }

        self.enter()?;
        let exponent = self.parse_unary()?;
        self.leave();
        Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)))
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.peek().clone() {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::Number(value))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                self.advance();
                let name = self.qualified_name(name)?;
                self.resolve(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `math.x` resolves to `x`; any other dotted access is refused
    fn qualified_name(&mut self, first: String) -> Result<String> {
        if !self.eat(&TokenKind::Dot) {
            return Ok(first);
        }
        if first != MODULE_PREFIX {
            return Err(EvalError::ForbiddenName(first));
        }
        match self.advance() {
            TokenKind::Ident(member) => Ok(member),
            TokenKind::Eof => Err(EvalError::UnexpectedEnd),
            other => Err(EvalError::Syntax {
                position: self.position(),
                message: format!("expected a name after 'math.', found {}", describe(&other)),
            }),
        }
    }

    fn resolve(&mut self, name: String) -> Result<Expr> {
        let is_call = self.peek() == &TokenKind::LParen;

        if let Some(function) = Function::lookup(&name) {
            if !is_call {
                return Err(EvalError::NotAValue(name));
            }
            self.advance();
            let args = self.parse_args()?;
            function.check_arity(args.len())?;
            return Ok(Expr::Call(function, args));
        }

        if let Some(constant) = Constant::lookup(&name) {
            if is_call {
                return Err(EvalError::NotCallable(name));
            }
            return Ok(Expr::Constant(constant));
        }

        tracing::debug!(name = %name, "Rejected name outside math namespace");
        Err(EvalError::ForbiddenName(name))
    }

    /// Arguments after the opening parenthesis, through the closing one
    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => format!("number {n}"),
        TokenKind::Ident(name) => format!("name '{name}'"),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::Power => "'**'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::FloorDiv => "'//'".to_string(),
        TokenKind::Percent => "'%'".to_string(),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::Comma => "','".to_string(),
        TokenKind::Dot => "'.'".to_string(),
        TokenKind::Eof => "end of input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Result<Expr> {
        Parser::new(Lexer::new(source).tokenize()?, 32).parse()
    }

    #[test]
    fn test_precedence() {
        let expr = parse("2+3*4").unwrap();
        assert_eq!(
            expr,
            Expr::Binary(
                BinaryOp::Add,
                Box::new(Expr::Number(2.0)),
                Box::new(Expr::Binary(
                    BinaryOp::Mul,
                    Box::new(Expr::Number(3.0)),
                    Box::new(Expr::Number(4.0)),
                )),
            )
        );
    }

    #[test]
    fn test_power_binds_tighter_than_negation() {
        let expr = parse("-2**2").unwrap();
        assert!(matches!(expr, Expr::Unary(UnaryOp::Neg, _)));
    }

    #[test]
    fn test_forbidden_names() {
        assert_eq!(
            parse("import os"),
            Err(EvalError::ForbiddenName("import".to_string()))
        );
        assert_eq!(
            parse("__import__(1)"),
            Err(EvalError::ForbiddenName("__import__".to_string()))
        );
        assert_eq!(
            parse("os.system(1)"),
            Err(EvalError::ForbiddenName("os".to_string()))
        );
        // Rejected even when it is never evaluated
        assert_eq!(
            parse("0 * open(1)"),
            Err(EvalError::ForbiddenName("open".to_string()))
        );
    }

    #[test]
    fn test_math_prefix() {
        assert_eq!(parse("math.pi").unwrap(), Expr::Constant(Constant::Pi));
        assert!(matches!(
            parse("math.sqrt(4)").unwrap(),
            Expr::Call(Function::Sqrt, _)
        ));
        assert_eq!(
            parse("math.system(1)"),
            Err(EvalError::ForbiddenName("system".to_string()))
        );
    }

    #[test]
    fn test_call_shape_errors() {
        assert_eq!(parse("pi(2)"), Err(EvalError::NotCallable("pi".to_string())));
        assert_eq!(parse("sqrt"), Err(EvalError::NotAValue("sqrt".to_string())));
        assert!(matches!(parse("pow(2)"), Err(EvalError::Arity { .. })));
    }

    #[test]
    fn test_incomplete() {
        assert_eq!(parse("2 +"), Err(EvalError::UnexpectedEnd));
        assert_eq!(parse("(1 + 2"), Err(EvalError::UnexpectedEnd));
        assert!(matches!(parse("1 2"), Err(EvalError::Syntax { .. })));
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}1{}", "(".repeat(40), ")".repeat(40));
        assert_eq!(parse(&deep), Err(EvalError::TooDeep(32)));
        assert_eq!(parse(&"-".repeat(40)), Err(EvalError::TooDeep(32)));
    }
}
