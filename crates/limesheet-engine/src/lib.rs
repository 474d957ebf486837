//! limesheet_engine - the LimeSheet formula engine.
//!
//! A cell's stored text is a formula exactly when it starts with `=`. This
//! crate turns such text into a display string against a [`Sheet`] snapshot:
//!
//! - [`CellRef`] - A1-notation parsing (row 1 is the header row)
//! - [`Sheet`] - headers + dense string rows, defensive reference resolution
//! - tokenizer -> recursive descent parser -> tree-walking interpreter over
//!   a closed grammar; the expression can reach the fixed function table and
//!   nothing else
//! - [`evaluate`] - the one public contract: pass-through for non-formulas,
//!   `#BLOCKED` / `#ERROR` sentinels instead of exceptions
//!
//! [`evaluate`] is pure and synchronous: no I/O, no mutation, safe to call
//! once per visible cell on every render pass.

mod cell_ref;
mod error;
mod eval;
mod functions;
mod grid;
mod parser;
mod token;
mod value;

pub use cell_ref::CellRef;
pub use error::{EngineError, Result};
pub use eval::Evaluator;
pub use functions::{BUILTINS, Builtin};
pub use grid::{MAX_RANGE_CELLS, Sheet};
pub use parser::{BinOp, Expr, Parser, UnaryOp, parse};
pub use value::{Value, format_number};

/// Sentinel returned when evaluation fails for any reason.
pub const ERROR_SENTINEL: &str = "#ERROR";

/// Sentinel returned when the expression contains a denylisted identifier.
pub const BLOCKED_SENTINEL: &str = "#BLOCKED";

/// Identifiers that mark an attempt to reach the host environment. The
/// interpreter cannot call anything outside the builtin table, so this is
/// redundant defense kept for its distinct, user-visible sentinel.
const BLOCKED_TOKENS: &[&str] = &["fetch", "window", "document"];

/// Evaluate a cell's stored text against a sheet snapshot.
///
/// Text not starting with `=` is returned unchanged. Formulas evaluate to
/// their display string; any failure collapses to [`ERROR_SENTINEL`] and a
/// denylisted identifier to [`BLOCKED_SENTINEL`]. Never panics, never
/// mutates the sheet.
pub fn evaluate(formula: &str, sheet: &Sheet) -> String {
    let Some(expression) = formula.strip_prefix('=') else {
        return formula.to_string();
    };

    let lowered = expression.to_ascii_lowercase();
    if BLOCKED_TOKENS.iter().any(|tok| lowered.contains(tok)) {
        return BLOCKED_SENTINEL.to_string();
    }

    match evaluate_expression(expression, sheet) {
        Ok(value) => value.to_display_string(),
        Err(_) => ERROR_SENTINEL.to_string(),
    }
}

/// Parse and evaluate an expression (without the leading `=`), surfacing
/// the underlying error instead of a sentinel.
pub fn evaluate_expression(expression: &str, sheet: &Sheet) -> Result<Value> {
    let expr = parse(expression)?;
    Evaluator::new(sheet).eval(&expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_sheet() -> Sheet {
        Sheet::new(
            vec!["A".into(), "B".into()],
            vec![
                vec!["10".into(), "20".into()],
                vec!["2".into(), "x".into()],
                vec!["3".into(), "".into()],
            ],
        )
    }

    #[test]
    fn test_pass_through_for_non_formulas() {
        let sheet = sales_sheet();
        for s in ["", "hello", "123", " =A2", "A2+B2"] {
            assert_eq!(evaluate(s, &sheet), s);
        }
    }

    #[test]
    fn test_reference_resolution_row_offset() {
        // Row 2 maps to data row 0.
        let sheet = sales_sheet();
        assert_eq!(evaluate("=A2+B2", &sheet), "30");
    }

    #[test]
    fn test_range_sum() {
        let sheet = Sheet::new(
            vec!["A".into()],
            vec![vec!["1".into()], vec!["2".into()], vec!["3".into()]],
        );
        assert_eq!(evaluate("=SUM(A2:A4)", &sheet), "6");
    }

    #[test]
    fn test_out_of_bounds_reference_resolves_to_zero() {
        let sheet = sales_sheet();
        assert_eq!(evaluate("=A99*2", &sheet), "0");
        // Header row is reachable syntax but resolves to 0 as well.
        assert_eq!(evaluate("=A1+1", &sheet), "1");
    }

    #[test]
    fn test_text_coercion_in_range() {
        let sheet = sales_sheet();
        // B3 holds "x": COUNT excludes it, SUM treats it as 0.
        assert_eq!(evaluate("=COUNT(B2:B4)", &sheet), "2");
        assert_eq!(evaluate("=SUM(B2:B4)", &sheet), "20");
    }

    #[test]
    fn test_blocked_tokens() {
        let sheet = sales_sheet();
        assert_eq!(evaluate("=window.alert(1)", &sheet), "#BLOCKED");
        assert_eq!(evaluate("=FETCH(A2)", &sheet), "#BLOCKED");
        assert_eq!(evaluate("=document", &sheet), "#BLOCKED");
        // The screen is substring containment over the whole expression,
        // so a string literal containing a blocked word is blocked too.
        assert_eq!(evaluate("=\"prefetched\"", &sheet), "#BLOCKED");
    }

    #[test]
    fn test_malformed_expression_is_error() {
        let sheet = sales_sheet();
        assert_eq!(evaluate("=A2+", &sheet), "#ERROR");
        assert_eq!(evaluate("=SUM(A2", &sheet), "#ERROR");
        assert_eq!(evaluate("=NOPE(1)", &sheet), "#ERROR");
        assert_eq!(evaluate("=", &sheet), "#ERROR");
    }

    #[test]
    fn test_if_branch_selection() {
        let sheet = sales_sheet();
        assert_eq!(evaluate("=IF(A2>5,\"High\",\"Low\")", &sheet), "High");
        assert_eq!(evaluate("=IF(A3>5,\"High\",\"Low\")", &sheet), "Low");
    }

    #[test]
    fn test_idempotence() {
        let sheet = sales_sheet();
        let first = evaluate("=SUM(A2:A4)*2", &sheet);
        for _ in 0..5 {
            assert_eq!(evaluate("=SUM(A2:A4)*2", &sheet), first);
        }
    }

    #[test]
    fn test_case_insensitive_structure() {
        let sheet = sales_sheet();
        assert_eq!(
            evaluate("=sum(a2:a4)", &sheet),
            evaluate("=SUM(A2:A4)", &sheet)
        );
        assert_eq!(evaluate("=if(a2=10,\"Yes\",\"No\")", &sheet), "Yes");
    }

    #[test]
    fn test_string_literal_case_preserved() {
        let sheet = sales_sheet();
        assert_eq!(evaluate("=if(1,\"MiXeD case\",\"no\")", &sheet), "MiXeD case");
    }

    #[test]
    fn test_non_ascii_string_literal_intact() {
        let sheet = sales_sheet();
        assert_eq!(evaluate("=\"café\"&\"\"", &sheet), "café");
        assert_eq!(evaluate("=IF(A2>5,\"über\",\"unter\")", &sheet), "über");
    }

    #[test]
    fn test_referenced_formula_is_not_recursively_evaluated() {
        let sheet = Sheet::new(
            vec!["A".into(), "B".into()],
            vec![vec!["=1+1".into(), "5".into()]],
        );
        // A2 holds formula text; it resolves as opaque text, so A2&"" shows it.
        assert_eq!(evaluate("=A2&\"\"", &sheet), "=1+1");
        // And as a SUM argument it coerces to 0.
        assert_eq!(evaluate("=SUM(A2,B2)", &sheet), "5");
    }

    #[test]
    fn test_concatenation_quirk() {
        let sheet = sales_sheet();
        // `&` on numbers adds; text on either side concatenates.
        assert_eq!(evaluate("=A2&B2", &sheet), "30");
        assert_eq!(evaluate("=A2&\" units\"", &sheet), "10 units");
        assert_eq!(evaluate("=\"total: \"&SUM(A2:A4)", &sheet), "total: 15");
    }

    #[test]
    fn test_division_by_zero_is_error_sentinel() {
        let sheet = sales_sheet();
        assert_eq!(evaluate("=1/0", &sheet), "#ERROR");
    }

    #[test]
    fn test_comparison_display() {
        let sheet = sales_sheet();
        assert_eq!(evaluate("=A2>5", &sheet), "true");
        assert_eq!(evaluate("=A2<5", &sheet), "false");
        assert_eq!(evaluate("=A2=10", &sheet), "true");
        assert_eq!(evaluate("=B3=\"x\"", &sheet), "true");
    }

    #[test]
    fn test_huge_range_is_error() {
        let sheet = sales_sheet();
        assert_eq!(evaluate("=SUM(A2:Z99999)", &sheet), "#ERROR");
    }

    #[test]
    fn test_evaluate_does_not_mutate_sheet() {
        let sheet = sales_sheet();
        let before = sheet.rows().to_vec();
        let _ = evaluate("=SUM(A2:B4)", &sheet);
        assert_eq!(sheet.rows(), &before[..]);
    }
}
