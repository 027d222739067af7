//! Evaluator error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("invalid syntax at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("name '{0}' is not allowed")]
    ForbiddenName(String),

    #[error("'{0}' is a constant, not a function")]
    NotCallable(String),

    #[error("'{0}' is a function and must be called")]
    NotAValue(String),

    #[error("{name}() takes {expected} argument(s) ({found} given)")]
    Arity {
        name: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("math domain error in {0}()")]
    Domain(&'static str),

    #[error("numeric result out of range")]
    Overflow,

    #[error("expression nested too deeply (limit {0})")]
    TooDeep(usize),

    #[error("expression too long ({len} characters, limit {max})")]
    TooLong { len: usize, max: usize },
}
