//! Document mutation operations.
//!
//! Every operation goes through [`Document::touch`] so the version counter
//! advances and the display cache is dropped. The `{{row}}` placeholder in
//! column formulas expands to the 1-based reference row of each data row
//! (data row 0 is reference row 2).

use regex::Regex;
use std::sync::OnceLock;

use super::state::Document;
use crate::error::{CoreError, Result};

/// Placeholder in a column formula pattern, replaced per row.
pub const ROW_PLACEHOLDER: &str = "{{row}}";

impl Document {
    pub fn set_cell(&mut self, data_row: usize, col: usize, value: &str) -> Result<()> {
        self.check_row(data_row)?;
        self.check_col(col)?;
        self.sheet.set_cell(data_row, col, value.to_string());
        self.touch();
        Ok(())
    }

    pub fn set_header(&mut self, col: usize, name: &str) -> Result<()> {
        self.check_col(col)?;
        self.sheet.set_header(col, name.to_string());
        self.touch();
        Ok(())
    }

    pub fn add_row(&mut self) {
        self.sheet.push_row();
        self.touch();
    }

    pub fn add_column(&mut self, name: &str) {
        self.sheet.push_column(name.to_string());
        self.touch();
    }

    pub fn delete_row(&mut self, data_row: usize) -> Result<()> {
        self.check_row(data_row)?;
        self.sheet.remove_row(data_row);
        self.touch();
        Ok(())
    }

    pub fn delete_column(&mut self, col: usize) -> Result<()> {
        self.check_col(col)?;
        self.sheet.remove_column(col);
        self.touch();
        Ok(())
    }

    pub fn rename(&mut self, filename: &str) {
        self.filename = filename.to_string();
    }

    /// Fill a whole column from a formula pattern, expanding `{{row}}` to
    /// each cell's 1-based reference row (first data row is row 2).
    pub fn apply_column_formula(&mut self, col: usize, pattern: &str) -> Result<()> {
        self.check_col(col)?;
        for data_row in 0..self.sheet.row_count() {
            let reference_row = (data_row + 2).to_string();
            let value = pattern.replace(ROW_PLACEHOLDER, &reference_row);
            self.sheet.set_cell(data_row, col, value);
        }
        self.touch();
        Ok(())
    }

    /// Reverse of [`apply_column_formula`]: if the column's first data cell
    /// holds a formula, turn its row-2 references back into `{{row}}`
    /// placeholders so the pattern can be edited and re-applied.
    ///
    /// [`apply_column_formula`]: Document::apply_column_formula
    pub fn detect_column_pattern(&self, col: usize) -> Option<String> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"(\D)2(\D|$)").expect("row pattern regex must compile")
        });

        let first = self.sheet.cell_text(0, col)?;
        if !first.starts_with('=') {
            return None;
        }
        Some(re.replace_all(first, "${1}{{row}}${2}").to_string())
    }

    fn check_row(&self, data_row: usize) -> Result<()> {
        if data_row < self.sheet.row_count() {
            Ok(())
        } else {
            Err(CoreError::RowOutOfRange(data_row))
        }
    }

    fn check_col(&self, col: usize) -> Result<()> {
        if col < self.sheet.col_count() {
            Ok(())
        } else {
            Err(CoreError::ColumnOutOfRange(col))
        }
    }
}
