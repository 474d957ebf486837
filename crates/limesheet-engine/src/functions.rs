//! Built-in formula functions and their metadata.
//!
//! Conventions:
//! - Sheet-facing names are ALL CAPS (`SUM`, `AVERAGE`, ...); lookup is over
//!   the already-uppercased identifier from the tokenizer.
//! - The table is closed: there is no registration hook, and the evaluator
//!   cannot call anything that is not listed here.
//! - Aggregates are variadic; range arguments arrive pre-expanded to their
//!   cell values.

use crate::error::{EngineError, Result};
use crate::value::Value;

pub struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        description: "Sum of arguments; non-numeric arguments count as 0",
    },
    Builtin {
        name: "AVERAGE",
        description: "Arithmetic mean of the numeric arguments; 0 when none",
    },
    Builtin {
        name: "MIN",
        description: "Minimum of the numeric arguments",
    },
    Builtin {
        name: "MAX",
        description: "Maximum of the numeric arguments",
    },
    Builtin {
        name: "COUNT",
        description: "Count of non-empty numeric arguments",
    },
    Builtin {
        name: "IF",
        description: "IF(condition, if_true, if_false)",
    },
];

/// Apply a built-in by (uppercased) name.
pub fn apply(name: &str, args: Vec<Value>) -> Result<Value> {
    match name {
        "SUM" => Ok(Value::Number(
            args.iter()
                .map(|v| v.coerce_number().unwrap_or(0.0))
                .sum(),
        )),
        "AVERAGE" => {
            let nums: Vec<f64> = numeric(&args);
            if nums.is_empty() {
                Ok(Value::Number(0.0))
            } else {
                Ok(Value::Number(nums.iter().sum::<f64>() / nums.len() as f64))
            }
        }
        "MIN" => fold_numeric("MIN", &args, f64::min),
        "MAX" => fold_numeric("MAX", &args, f64::max),
        "COUNT" => Ok(Value::Number(
            args.iter()
                .filter(|v| match v {
                    Value::Text(s) if s.is_empty() => false,
                    other => other.coerce_number().is_some(),
                })
                .count() as f64,
        )),
        "IF" => {
            if args.len() != 3 {
                return Err(EngineError::Arity {
                    name: "IF",
                    expected: 3,
                    got: args.len(),
                });
            }
            let mut args = args;
            let if_false = args.remove(2);
            let if_true = args.remove(1);
            let condition = args.remove(0);
            Ok(if condition.is_truthy() { if_true } else { if_false })
        }
        other => Err(EngineError::UnknownFunction(other.to_string())),
    }
}

/// The arguments that coerce to a number, in order.
fn numeric(args: &[Value]) -> Vec<f64> {
    args.iter().filter_map(|v| v.coerce_number()).collect()
}

fn fold_numeric(name: &'static str, args: &[Value], f: fn(f64, f64) -> f64) -> Result<Value> {
    let nums = numeric(args);
    let mut iter = nums.into_iter();
    let first = iter.next().ok_or(EngineError::NoNumericArgs(name))?;
    Ok(Value::Number(iter.fold(first, f)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_sum_coerces_non_numeric_to_zero() {
        let result = apply("SUM", vec![num(1.0), text("x"), text("2")]).unwrap();
        assert_eq!(result, num(3.0));
        assert_eq!(apply("SUM", vec![]).unwrap(), num(0.0));
    }

    #[test]
    fn test_average_filters_non_numeric() {
        let result = apply("AVERAGE", vec![num(10.0), text("x"), num(20.0)]).unwrap();
        assert_eq!(result, num(15.0));
        assert_eq!(apply("AVERAGE", vec![text("x")]).unwrap(), num(0.0));
    }

    #[test]
    fn test_min_max() {
        let args = vec![num(3.0), num(-1.0), text("7")];
        assert_eq!(apply("MIN", args.clone()).unwrap(), num(-1.0));
        assert_eq!(apply("MAX", args).unwrap(), num(7.0));
        assert!(apply("MIN", vec![text("x")]).is_err());
    }

    #[test]
    fn test_count_excludes_empty_and_non_numeric() {
        let args = vec![num(1.0), text(""), text("x"), text("5"), num(0.0)];
        assert_eq!(apply("COUNT", args).unwrap(), num(3.0));
    }

    #[test]
    fn test_if_selects_branch() {
        let high = apply("IF", vec![Value::Bool(true), text("High"), text("Low")]).unwrap();
        assert_eq!(high, text("High"));
        let low = apply("IF", vec![num(0.0), text("High"), text("Low")]).unwrap();
        assert_eq!(low, text("Low"));
        assert!(apply("IF", vec![num(1.0)]).is_err());
    }

    #[test]
    fn test_unknown_function() {
        assert!(matches!(
            apply("MEDIAN", vec![]).unwrap_err(),
            EngineError::UnknownFunction(_)
        ));
    }

    #[test]
    fn test_table_and_dispatch_agree() {
        for builtin in BUILTINS {
            // Every listed builtin dispatches (possibly to an arity error),
            // never to UnknownFunction.
            let result = apply(builtin.name, vec![]);
            assert!(!matches!(result, Err(EngineError::UnknownFunction(_))));
        }
    }
}
