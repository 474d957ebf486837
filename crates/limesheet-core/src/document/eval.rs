//! Display evaluation with a version-guarded cache.

use limesheet_engine::evaluate;

use super::state::Document;

impl Document {
    /// The display string for a cell: formulas evaluate, plain text passes
    /// through, sentinels (`#ERROR`, `#BLOCKED`) come back as data.
    ///
    /// Results are cached per cell position; every mutation clears the
    /// cache, so a hit is always an evaluation of the current grid and the
    /// output is identical to calling the engine directly.
    pub fn display_value(&self, data_row: usize, col: usize) -> String {
        if let Some(cached) = self.display_cache.get(&(data_row, col)) {
            return cached.clone();
        }

        let raw = self.sheet.cell_text(data_row, col).unwrap_or("");
        let display = evaluate(raw, &self.sheet);
        self.display_cache
            .insert((data_row, col), display.clone());
        display
    }

    /// All data rows, evaluated for display.
    pub fn evaluated_rows(&self) -> Vec<Vec<String>> {
        (0..self.sheet.row_count())
            .map(|r| {
                (0..self.sheet.col_count())
                    .map(|c| self.display_value(r, c))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value_evaluates_formulas() {
        let doc = Document::from_csv("A,B,Total\n10,20,=A2+B2\n", "test").unwrap();
        assert_eq!(doc.display_value(0, 0), "10");
        assert_eq!(doc.display_value(0, 2), "30");
    }

    #[test]
    fn test_cache_is_invalidated_by_mutation() {
        let mut doc = Document::from_csv("A,Total\n10,=A2*2\n", "test").unwrap();
        assert_eq!(doc.display_value(0, 1), "20");
        doc.set_cell(0, 0, "50").unwrap();
        assert_eq!(doc.display_value(0, 1), "100");
    }

    #[test]
    fn test_cache_invalidated_by_unrelated_mutation() {
        // A range formula can capture any rectangle, so even edits outside
        // a formula's referenced cells must invalidate.
        let mut doc = Document::from_csv("A,Total\n1,=SUM(A2:A9)\n2,\n", "test").unwrap();
        assert_eq!(doc.display_value(0, 1), "3");
        doc.add_row();
        doc.set_cell(2, 0, "4").unwrap();
        assert_eq!(doc.display_value(0, 1), "7");
    }

    #[test]
    fn test_sentinels_are_data() {
        let doc = Document::from_csv("A,B\n1,=A2+\n", "test").unwrap();
        assert_eq!(doc.display_value(0, 1), "#ERROR");
    }
}
