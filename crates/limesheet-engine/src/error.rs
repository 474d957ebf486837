//! Error types for the formula engine.

use thiserror::Error;

/// Errors raised while tokenizing, parsing, or evaluating a formula.
///
/// None of these escape [`crate::evaluate`]; they collapse to the `#ERROR`
/// sentinel at the public boundary.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("{name} expects {expected} arguments, got {got}")]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0} requires at least one numeric argument")]
    NoNumericArgs(&'static str),

    #[error("expected a number, got '{0}'")]
    NotANumber(String),

    #[error("non-finite result")]
    NonFinite,

    #[error("range expands to {cells} cells (limit {limit})")]
    RangeTooLarge { cells: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
