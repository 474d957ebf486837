//! Document model: sheet state, mutation ops, display evaluation.

mod eval;
mod ops;
mod state;

pub use ops::ROW_PLACEHOLDER;
pub use state::{DEFAULT_HEADERS, DEFAULT_ROWS, Document};
