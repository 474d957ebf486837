//! Tree-walking interpreter for parsed formulas.
//!
//! The evaluator is a pure function of the expression tree and a read-only
//! [`Sheet`] snapshot: no host access, no mutation, no I/O. Cell and range
//! references resolve through the sheet's defensive policies, and function
//! calls dispatch into the fixed table in [`crate::functions`]; nothing
//! else is callable.

use std::cmp::Ordering;

use crate::error::{EngineError, Result};
use crate::functions;
use crate::grid::Sheet;
use crate::parser::{BinOp, Expr, UnaryOp};
use crate::value::Value;

pub struct Evaluator<'a> {
    sheet: &'a Sheet,
}

impl<'a> Evaluator<'a> {
    pub fn new(sheet: &'a Sheet) -> Evaluator<'a> {
        Evaluator { sheet }
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Text(s.clone())),
            Expr::Cell(cell) => Ok(self.sheet.resolve_cell(*cell)),
            Expr::Range(_, _) => Err(EngineError::Syntax(
                "range reference outside a function call".to_string(),
            )),
            Expr::Unary(op, inner) => self.eval_unary(*op, inner),
            Expr::Binary(op, left, right) => self.eval_binary(*op, left, right),
            Expr::Call(name, args) => {
                let values = self.flatten_args(args)?;
                functions::apply(name, values)
            }
        }
    }

    /// Evaluate call arguments, expanding each range argument to its
    /// enclosed cell values in row-major order.
    fn flatten_args(&self, args: &[Expr]) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                Expr::Range(start, end) => {
                    self.sheet.expand_range(*start, *end, &mut values)?;
                }
                other => values.push(self.eval(other)?),
            }
        }
        Ok(values)
    }

    fn eval_unary(&self, op: UnaryOp, inner: &Expr) -> Result<Value> {
        let n = self.eval(inner)?.expect_number()?;
        match op {
            UnaryOp::Neg => Ok(Value::Number(-n)),
            UnaryOp::Plus => Ok(Value::Number(n)),
        }
    }

    fn eval_binary(&self, op: BinOp, left: &Expr, right: &Expr) -> Result<Value> {
        let l = self.eval(left)?;
        let r = self.eval(right)?;
        match op {
            // `&` was rewritten to `+` in the source dialect; both behave as
            // addition that falls back to concatenation when text is involved.
            BinOp::Add | BinOp::Concat => {
                if matches!(l, Value::Text(_)) || matches!(r, Value::Text(_)) {
                    Ok(Value::Text(format!(
                        "{}{}",
                        l.to_display_string(),
                        r.to_display_string()
                    )))
                } else {
                    finite(l.expect_number()? + r.expect_number()?)
                }
            }
            BinOp::Sub => finite(l.expect_number()? - r.expect_number()?),
            BinOp::Mul => finite(l.expect_number()? * r.expect_number()?),
            BinOp::Div => finite(l.expect_number()? / r.expect_number()?),
            BinOp::Eq => Ok(Value::Bool(l.strict_eq(&r))),
            BinOp::Ne => Ok(Value::Bool(!l.strict_eq(&r))),
            BinOp::Lt => Ok(ordered(l.compare(&r), |o| o == Ordering::Less)),
            BinOp::Gt => Ok(ordered(l.compare(&r), |o| o == Ordering::Greater)),
            BinOp::Le => Ok(ordered(l.compare(&r), |o| o != Ordering::Greater)),
            BinOp::Ge => Ok(ordered(l.compare(&r), |o| o != Ordering::Less)),
        }
    }
}

/// An undecided comparison (mixed types that do not coerce) is false.
fn ordered(ord: Option<Ordering>, pred: impl Fn(Ordering) -> bool) -> Value {
    Value::Bool(ord.is_some_and(pred))
}

/// Guard arithmetic against Infinity/NaN leaking into results.
fn finite(n: f64) -> Result<Value> {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(EngineError::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn sheet() -> Sheet {
        Sheet::new(
            vec!["A".into(), "B".into()],
            vec![
                vec!["10".into(), "20".into()],
                vec!["5".into(), "x".into()],
            ],
        )
    }

    fn eval(src: &str) -> Result<Value> {
        let sheet = sheet();
        let expr = parse(src)?;
        Evaluator::new(&sheet).eval(&expr)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("A2+B2").unwrap(), Value::Number(30.0));
        assert_eq!(eval("B2/A2-1").unwrap(), Value::Number(1.0));
        assert_eq!(eval("-A2*2").unwrap(), Value::Number(-20.0));
    }

    #[test]
    fn test_concat_aliases_add() {
        // Numeric operands add even under `&`.
        assert_eq!(eval("A2&B2").unwrap(), Value::Number(30.0));
        // Text forces concatenation for both spellings.
        assert_eq!(
            eval("B3&\"!\"").unwrap(),
            Value::Text("x!".into())
        );
        assert_eq!(
            eval("\"n=\"+A2").unwrap(),
            Value::Text("n=10".into())
        );
    }

    #[test]
    fn test_strict_equality() {
        assert_eq!(eval("A2=10").unwrap(), Value::Bool(true));
        assert_eq!(eval("A2=\"10\"").unwrap(), Value::Bool(false));
        assert_eq!(eval("A2!=11").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_mixed_comparison_is_false() {
        assert_eq!(eval("B3>10").unwrap(), Value::Bool(false));
        assert_eq!(eval("B3<10").unwrap(), Value::Bool(false));
        assert_eq!(eval("A2>=10").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_division_by_zero_is_error() {
        assert!(matches!(eval("A2/0").unwrap_err(), EngineError::NonFinite));
    }

    #[test]
    fn test_subtraction_requires_numbers() {
        assert!(matches!(
            eval("B3-1").unwrap_err(),
            EngineError::NotANumber(_)
        ));
    }

    #[test]
    fn test_range_outside_call_is_error() {
        assert!(eval("A2:A3").is_err());
    }
}
