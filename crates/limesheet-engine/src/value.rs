//! Runtime values and their coercion rules.
//!
//! The formula language inherits its operator behavior from the loosely
//! typed expression semantics of the original sheet dialect: `+` adds
//! numbers but concatenates as soon as text is involved, equality is strict
//! across types, and ordering comparisons between mixed types are false.
//! Those rules live here so the evaluator and the function table share one
//! coercion story.

use crate::error::{EngineError, Result};

/// A value produced during formula evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    /// Truthiness for `IF`: nonzero number, nonempty text, or `true`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            Value::Bool(b) => *b,
        }
    }

    /// Loose numeric coercion: numbers pass through, booleans become 0/1,
    /// blank text becomes 0, numeric text parses, anything else is None.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Some(0.0);
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    /// Numeric coercion that fails loudly, for operators that require numbers.
    pub fn expect_number(&self) -> Result<f64> {
        self.coerce_number()
            .ok_or_else(|| EngineError::NotANumber(self.to_display_string()))
    }

    /// Strict equality: values of different kinds are never equal.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering for `< > <= >=`. Text compares lexicographically against
    /// text; any other pairing compares numerically, and a side that does
    /// not coerce makes the comparison undecided (the operator yields false).
    pub fn compare(&self, other: &Value) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => {
                let a = self.coerce_number()?;
                let b = other.coerce_number()?;
                a.partial_cmp(&b)
            }
        }
    }

    /// Render the value the way the display layer shows it.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        }
    }
}

/// Format a number for display. Integral values print without a decimal
/// point; everything else uses the shortest round-trip form.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Covers -0.0 as well.
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
