//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A2", "B3", "AA100") and column/row coordinates. Columns are
//! 0-indexed base-26 letter sequences. Rows keep their 1-based reference
//! number: row 1 is the header row, row 2 is the first data row, so the
//! data-row index of a reference is `row - 2`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by column index (0-based) and row number (1-based).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub col: usize,
    pub row: usize,
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("A1 regex must compile")
    })
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { col, row }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A2", "aa10").
    /// Case-insensitive. Returns None if the input is invalid or the row is 0.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name)?;
        let col = Self::letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<usize>().ok()?;
        if row == 0 {
            return None;
        }
        Some(CellRef::new(col, row))
    }

    /// Decode a base-26 column letter sequence (A -> 0, Z -> 25, AA -> 26).
    /// Returns None on overflow or empty input.
    pub fn letters_to_col(letters: &str) -> Option<usize> {
        if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        let mut acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            acc = acc.checked_mul(26)?.checked_add(digit)?;
        }
        acc.checked_sub(1)
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// Data-row index of this reference, or None for the header row (row 1).
    /// Row 2 maps to data row 0.
    pub fn data_row(&self) -> Option<usize> {
        self.row.checked_sub(2)
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;

    #[test]
    fn test_from_str_single_letter_columns() {
        let a2 = CellRef::from_str("A2").unwrap();
        assert_eq!(a2.col, 0);
        assert_eq!(a2.row, 2);

        let z9 = CellRef::from_str("Z9").unwrap();
        assert_eq!(z9.col, 25);
        assert_eq!(z9.row, 9);
    }

    #[test]
    fn test_from_str_multi_letter_columns() {
        assert_eq!(CellRef::from_str("AA1").unwrap().col, 26);
        assert_eq!(CellRef::from_str("AB1").unwrap().col, 27);
        assert_eq!(CellRef::from_str("AZ1").unwrap().col, 51);
        assert_eq!(CellRef::from_str("BA1").unwrap().col, 52);
    }

    #[test]
    fn test_from_str_case_insensitive() {
        let lower = CellRef::from_str("b3").unwrap();
        assert_eq!(lower.col, 1);
        assert_eq!(lower.row, 3);
        assert_eq!(CellRef::from_str("aA1").unwrap().col, 26);
    }

    #[test]
    fn test_from_str_invalid_inputs() {
        assert!(CellRef::from_str("").is_none());
        assert!(CellRef::from_str("123").is_none());
        assert!(CellRef::from_str("ABC").is_none());
        assert!(CellRef::from_str("A0").is_none());
        assert!(CellRef::from_str("1A").is_none());
        assert!(CellRef::from_str("A 1").is_none());
    }

    #[test]
    fn test_from_str_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_data_row_offset() {
        // Row 1 is the header row and has no data-row index.
        assert_eq!(CellRef::from_str("A1").unwrap().data_row(), None);
        assert_eq!(CellRef::from_str("A2").unwrap().data_row(), Some(0));
        assert_eq!(CellRef::from_str("C10").unwrap().data_row(), Some(8));
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["A1", "B2", "Z99", "AA10", "BA3"] {
            let cr = CellRef::from_str(name).unwrap();
            assert_eq!(cr.to_string(), name);
        }
    }
}
