//! Tree-walking evaluation over parsed expressions

use crate::error::EvalError;
use crate::parser::{BinaryOp, Expr, UnaryOp};
use crate::Result;

pub fn eval(expr: &Expr) -> Result<f64> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Constant(constant) => Ok(constant.value()),
        Expr::Unary(op, operand) => {
            let value = eval(operand)?;
            Ok(match op {
                UnaryOp::Plus => value,
                UnaryOp::Neg => -value,
            })
        }
        Expr::Binary(op, lhs, rhs) => binary(*op, eval(lhs)?, eval(rhs)?),
        Expr::Call(function, args) => {
            let values = args.iter().map(eval).collect::<Result<Vec<_>>>()?;
            function.apply(&values)
        }
    }
}

fn binary(op: BinaryOp, a: f64, b: f64) -> Result<f64> {
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Sub => Ok(a - b),
        BinaryOp::Mul => Ok(a * b),
        BinaryOp::Div => {
            nonzero(b)?;
            Ok(a / b)
        }
        BinaryOp::FloorDiv => {
            nonzero(b)?;
            Ok((a / b).floor())
        }
        BinaryOp::Mod => {
            nonzero(b)?;
            // Result takes the sign of the divisor
            let r = a % b;
            Ok(if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r })
        }
        BinaryOp::Pow => power(a, b),
    }
}

fn nonzero(divisor: f64) -> Result<()> {
    if divisor == 0.0 {
        Err(EvalError::DivisionByZero)
    } else {
        Ok(())
    }
}

fn power(base: f64, exponent: f64) -> Result<f64> {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 && exponent.is_finite() {
        return Err(EvalError::Domain("pow"));
    }

    let value = base.powf(exponent);
    if value.is_infinite() && base.is_finite() && exponent.is_finite() {
        return Err(EvalError::Overflow);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_semantics() {
        assert_eq!(binary(BinaryOp::FloorDiv, 7.0, 2.0).unwrap(), 3.0);
        assert_eq!(binary(BinaryOp::FloorDiv, -7.0, 2.0).unwrap(), -4.0);
        assert_eq!(binary(BinaryOp::Mod, -7.0, 3.0).unwrap(), 2.0);
        assert_eq!(binary(BinaryOp::Mod, 7.0, -3.0).unwrap(), -2.0);
    }

    #[test]
    fn test_division_by_zero() {
        for op in [BinaryOp::Div, BinaryOp::FloorDiv, BinaryOp::Mod] {
            assert_eq!(binary(op, 1.0, 0.0), Err(EvalError::DivisionByZero));
        }
        assert_eq!(power(0.0, -1.0), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_power_limits() {
        assert_eq!(power(-8.0, 0.5), Err(EvalError::Domain("pow")));
        assert_eq!(power(10.0, 400.0), Err(EvalError::Overflow));
        assert_eq!(power(-2.0, 3.0).unwrap(), -8.0);
    }
}
