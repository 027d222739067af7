//! The whitelisted math namespace
//!
//! Names resolve only against these tables, bare or behind a `math.` prefix.
//! There is no other scope.

use crate::error::EvalError;
use crate::Result;

/// Largest n for which n! is finite in f64
const FACTORIAL_MAX: f64 = 170.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
    Pi,
    E,
    Tau,
    Inf,
    Nan,
}

impl Constant {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            "tau" => Some(Constant::Tau),
            "inf" => Some(Constant::Inf),
            "nan" => Some(Constant::Nan),
            _ => None,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::Tau => std::f64::consts::TAU,
            Constant::Inf => f64::INFINITY,
            Constant::Nan => f64::NAN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sqrt,
    Exp,
    Log,
    Log10,
    Log2,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Abs,
    Floor,
    Ceil,
    Trunc,
    Round,
    Pow,
    Hypot,
    Factorial,
    Degrees,
    Radians,
    Min,
    Max,
}

/// Accepted argument counts
enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exactly(k) => n == k,
            Arity::Between(lo, hi) => (lo..=hi).contains(&n),
            Arity::AtLeast(k) => n >= k,
        }
    }

    fn describe(&self) -> &'static str {
        match *self {
            Arity::Exactly(1) => "exactly 1",
            Arity::Exactly(2) => "exactly 2",
            Arity::Between(1, 2) => "1 or 2",
            Arity::AtLeast(1) => "at least 1",
            _ => "a different number of",
        }
    }
}

impl Function {
    pub fn lookup(name: &str) -> Option<Self> {
        let function = match name {
            "sqrt" => Function::Sqrt,
            "exp" => Function::Exp,
            "log" => Function::Log,
            "log10" => Function::Log10,
            "log2" => Function::Log2,
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "asin" => Function::Asin,
            "acos" => Function::Acos,
            "atan" => Function::Atan,
            "atan2" => Function::Atan2,
            "sinh" => Function::Sinh,
            "cosh" => Function::Cosh,
            "tanh" => Function::Tanh,
            "abs" | "fabs" => Function::Abs,
            "floor" => Function::Floor,
            "ceil" => Function::Ceil,
            "trunc" => Function::Trunc,
            "round" => Function::Round,
            "pow" => Function::Pow,
            "hypot" => Function::Hypot,
            "factorial" => Function::Factorial,
            "degrees" => Function::Degrees,
            "radians" => Function::Radians,
            "min" => Function::Min,
            "max" => Function::Max,
            _ => return None,
        };
        Some(function)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sqrt => "sqrt",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Log2 => "log2",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Atan2 => "atan2",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Abs => "abs",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Trunc => "trunc",
            Function::Round => "round",
            Function::Pow => "pow",
            Function::Hypot => "hypot",
            Function::Factorial => "factorial",
            Function::Degrees => "degrees",
            Function::Radians => "radians",
            Function::Min => "min",
            Function::Max => "max",
        }
    }

    fn arity(&self) -> Arity {
        match self {
            Function::Log => Arity::Between(1, 2),
            Function::Atan2 | Function::Pow | Function::Hypot => Arity::Exactly(2),
            Function::Min | Function::Max => Arity::AtLeast(1),
            _ => Arity::Exactly(1),
        }
    }

    /// Checked at parse time so a bad call never reaches evaluation
    pub fn check_arity(&self, found: usize) -> Result<()> {
        let arity = self.arity();
        if arity.accepts(found) {
            Ok(())
        } else {
            Err(EvalError::Arity {
                name: self.name(),
                expected: arity.describe(),
                found,
            })
        }
    }

    pub fn apply(&self, args: &[f64]) -> Result<f64> {
        self.check_arity(args.len())?;
        let x = args[0];
        let domain = |ok: bool| if ok { Ok(()) } else { Err(EvalError::Domain(self.name())) };

        let value = match self {
            Function::Sqrt => {
                domain(x >= 0.0)?;
                x.sqrt()
            }
            Function::Exp => x.exp(),
            Function::Log => {
                domain(x > 0.0)?;
                match args.get(1) {
                    Some(&base) => {
                        domain(base > 0.0 && base != 1.0)?;
                        x.ln() / base.ln()
                    }
                    None => x.ln(),
                }
            }
            Function::Log10 => {
                domain(x > 0.0)?;
                x.log10()
            }
            Function::Log2 => {
                domain(x > 0.0)?;
                x.log2()
            }
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Asin => {
                domain((-1.0..=1.0).contains(&x))?;
                x.asin()
            }
            Function::Acos => {
                domain((-1.0..=1.0).contains(&x))?;
                x.acos()
            }
            Function::Atan => x.atan(),
            Function::Atan2 => x.atan2(args[1]),
            Function::Sinh => x.sinh(),
            Function::Cosh => x.cosh(),
            Function::Tanh => x.tanh(),
            Function::Abs => x.abs(),
            Function::Floor => x.floor(),
            Function::Ceil => x.ceil(),
            Function::Trunc => x.trunc(),
            Function::Round => round_half_even(x),
            Function::Pow => x.powf(args[1]),
            Function::Hypot => x.hypot(args[1]),
            Function::Factorial => {
                domain(x >= 0.0 && x.fract() == 0.0)?;
                if x > FACTORIAL_MAX {
                    return Err(EvalError::Overflow);
                }
                (2..=x as u32).fold(1.0, |acc, k| acc * f64::from(k))
            }
            Function::Degrees => x.to_degrees(),
            Function::Radians => x.to_radians(),
            Function::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
            Function::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        };

        Ok(value)
    }
}

/// Banker's rounding
fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - x.signum()
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Function::lookup("fabs"), Some(Function::Abs));
        assert_eq!(Function::lookup("open"), None);
        assert_eq!(Constant::lookup("pi"), Some(Constant::Pi));
        assert_eq!(Constant::lookup("os"), None);
    }

    #[test]
    fn test_domain_errors() {
        assert_eq!(
            Function::Sqrt.apply(&[-1.0]),
            Err(EvalError::Domain("sqrt"))
        );
        assert_eq!(Function::Log.apply(&[0.0]), Err(EvalError::Domain("log")));
        assert_eq!(
            Function::Factorial.apply(&[2.5]),
            Err(EvalError::Domain("factorial"))
        );
        assert_eq!(Function::Factorial.apply(&[171.0]), Err(EvalError::Overflow));
    }

    #[test]
    fn test_values() {
        assert_eq!(Function::Factorial.apply(&[5.0]).unwrap(), 120.0);
        assert_eq!(Function::Log.apply(&[8.0, 2.0]).unwrap(), 3.0);
        assert_eq!(Function::Max.apply(&[1.0, 7.0, 3.0]).unwrap(), 7.0);
        assert_eq!(Function::Round.apply(&[2.5]).unwrap(), 2.0);
        assert_eq!(Function::Round.apply(&[3.5]).unwrap(), 4.0);
        assert_eq!(Function::Round.apply(&[-2.5]).unwrap(), -2.0);
    }

    #[test]
    fn test_arity() {
        assert!(Function::Sqrt.check_arity(1).is_ok());
        assert!(matches!(
            Function::Pow.check_arity(1),
            Err(EvalError::Arity { name: "pow", found: 1, .. })
        ));
        assert!(Function::Log.check_arity(2).is_ok());
        assert!(Function::Min.check_arity(0).is_err());
    }
}
