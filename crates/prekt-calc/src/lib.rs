//! PrekT Calc
//!
//! A sandboxed evaluator for the console's `calc` command. Input is tokenized,
//! parsed against a fixed math namespace and then evaluated over `f64`.
//! Nothing outside that namespace can be named, so no expression can reach
//! the environment, the filesystem or the network.
//!
//! Operators follow the usual calculator conventions: `+ - * / % ** //`
//! with `**` right-associative and binding tighter than unary minus.

mod error;
mod eval;
mod lexer;
mod namespace;
mod parser;

pub use error::EvalError;

use lexer::Lexer;
use parser::Parser;

pub type Result<T> = std::result::Result<T, EvalError>;

pub const DEFAULT_MAX_LEN: usize = 256;
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Values with no fractional part below this magnitude print as integers
const INTEGER_DISPLAY_LIMIT: f64 = 1e16;

#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    max_len: usize,
    max_depth: usize,
}

impl Evaluator {
    pub fn new(max_len: usize, max_depth: usize) -> Self {
        Self { max_len, max_depth }
    }

    pub fn evaluate(&self, source: &str) -> Result<f64> {
        let source = source.trim();
        let len = source.chars().count();
        if len > self.max_len {
            return Err(EvalError::TooLong {
                len,
                max: self.max_len,
            });
        }

        let tokens = Lexer::new(source).tokenize()?;
        let expr = Parser::new(tokens, self.max_depth).parse()?;
        eval::eval(&expr)
    }

    /// Result or error, rendered for display. Never fails.
    pub fn evaluate_to_string(&self, source: &str) -> String {
        match self.evaluate(source) {
            Ok(value) => format_number(value),
            Err(e) => format!("Error: {e}"),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEN, DEFAULT_MAX_DEPTH)
    }
}

pub fn evaluate(source: &str) -> Result<f64> {
    Evaluator::default().evaluate(source)
}

pub fn evaluate_to_string(source: &str) -> String {
    Evaluator::default().evaluate_to_string(source)
}

pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < INTEGER_DISPLAY_LIMIT {
        return format!("{}", value as i64);
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        assert_eq!(evaluate_to_string("2+3*4"), "14");
        assert_eq!(evaluate_to_string("(2+3)*4"), "20");
        assert_eq!(evaluate_to_string("7/2"), "3.5");
        assert_eq!(evaluate_to_string("2**10"), "1024");
        assert_eq!(evaluate_to_string("2**3**2"), "512");
        assert_eq!(evaluate_to_string("-2**2"), "-4");
        assert_eq!(evaluate_to_string("17 // 5 + 17 % 5"), "5");
    }

    #[test]
    fn test_math_namespace() {
        assert_eq!(evaluate_to_string("sqrt(16) + math.floor(2.7)"), "6");
        assert_eq!(evaluate_to_string("factorial(5)"), "120");
        assert_eq!(evaluate("math.pi").unwrap(), std::f64::consts::PI);
        assert_eq!(evaluate_to_string("max(1, 9, 4)"), "9");
    }

    #[test]
    fn test_errors_are_rendered() {
        assert_eq!(
            evaluate_to_string("import os"),
            "Error: name 'import' is not allowed"
        );
        assert_eq!(evaluate_to_string("1/0"), "Error: division by zero");
        assert_eq!(
            evaluate_to_string("sqrt(-1)"),
            "Error: math domain error in sqrt()"
        );
        assert!(evaluate_to_string("2 +").starts_with("Error:"));
    }

    #[test]
    fn test_length_limit() {
        let long = "1+".repeat(200) + "1";
        assert!(matches!(
            evaluate(&long),
            Err(EvalError::TooLong { max: DEFAULT_MAX_LEN, .. })
        ));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NAN), "nan");
    }
}
