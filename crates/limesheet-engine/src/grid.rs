//! Sheet storage and reference resolution.
//!
//! A [`Sheet`] is a rectangular table: one header row plus dense data rows of
//! string cells. Formulas address it through 1-based reference rows where
//! row 1 is the header row, so a reference's data-row index is `row - 2`.
//!
//! Resolution is deliberately forgiving: an out-of-bounds row, a missing
//! cell, or blank text all resolve to the number 0, and a referenced cell
//! that itself holds a formula resolves to its raw `=...` text rather than
//! its computed value (formula cells are never evaluated recursively).

use serde::{Deserialize, Serialize};

use crate::cell_ref::CellRef;
use crate::error::{EngineError, Result};
use crate::value::Value;

/// Upper bound on the number of cells a single range may expand to.
pub const MAX_RANGE_CELLS: usize = 10_000;

/// A rectangular dataset: header names plus rows of string-valued cells.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Sheet {
        Sheet { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    /// Raw cell text at (data-row, column), if present. Rows shorter than
    /// the header row simply have no cell at the missing columns.
    pub fn cell_text(&self, data_row: usize, col: usize) -> Option<&str> {
        self.rows.get(data_row)?.get(col).map(String::as_str)
    }

    /// Store raw text at (data-row, column); short rows pad with blanks.
    /// Out-of-range coordinates are ignored (the editor keeps rows and
    /// columns in range; the store stays defensive).
    pub fn set_cell(&mut self, data_row: usize, col: usize, text: String) {
        let Some(row) = self.rows.get_mut(data_row) else {
            return;
        };
        if col >= self.headers.len() {
            return;
        }
        if row.len() <= col {
            row.resize(col + 1, String::new());
        }
        row[col] = text;
    }

    pub fn set_header(&mut self, col: usize, name: String) {
        if let Some(header) = self.headers.get_mut(col) {
            *header = name;
        }
    }

    /// Append an empty row sized to the header width.
    pub fn push_row(&mut self) {
        self.rows.push(vec![String::new(); self.headers.len()]);
    }

    /// Append a column with the given header and a blank cell in every row.
    pub fn push_column(&mut self, name: String) {
        self.headers.push(name);
        for row in &mut self.rows {
            row.resize(self.headers.len(), String::new());
        }
    }

    pub fn remove_row(&mut self, data_row: usize) {
        if data_row < self.rows.len() {
            self.rows.remove(data_row);
        }
    }

    pub fn remove_column(&mut self, col: usize) {
        if col >= self.headers.len() {
            return;
        }
        self.headers.remove(col);
        for row in &mut self.rows {
            if col < row.len() {
                row.remove(col);
            }
        }
    }

    /// Resolve a single cell reference to a runtime value.
    ///
    /// Header-row references (row 1) and anything out of bounds resolve to
    /// 0; blank text resolves to 0; numeric text becomes a number; any other
    /// text is carried verbatim, original case included.
    pub fn resolve_cell(&self, cell: CellRef) -> Value {
        let Some(data_row) = cell.data_row() else {
            return Value::Number(0.0);
        };
        match self.cell_text(data_row, cell.col) {
            Some(text) => text_to_value(text),
            None => Value::Number(0.0),
        }
    }

    /// Expand a range to the ordered values of every enclosed cell,
    /// row-major. Endpoints may be given in either direction on either
    /// axis; min/max are normalized per axis.
    pub fn expand_range(&self, a: CellRef, b: CellRef, out: &mut Vec<Value>) -> Result<()> {
        let min_col = a.col.min(b.col);
        let max_col = a.col.max(b.col);
        let min_row = a.row.min(b.row);
        let max_row = a.row.max(b.row);

        let cells = (max_col - min_col + 1).saturating_mul(max_row - min_row + 1);
        if cells > MAX_RANGE_CELLS {
            return Err(EngineError::RangeTooLarge {
                cells,
                limit: MAX_RANGE_CELLS,
            });
        }

        out.reserve(cells);
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                out.push(self.resolve_cell(CellRef::new(col, row)));
            }
        }
        Ok(())
    }
}

/// Stored cell text to value: blank -> 0, finite number -> number,
/// everything else (including `=...` formula text) -> text.
fn text_to_value(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Number(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Text(text.to_string()),
    }
}
