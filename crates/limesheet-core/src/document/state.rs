//! UI-agnostic document state.

use dashmap::DashMap;

use limesheet_engine::Sheet;

use crate::error::Result;
use crate::storage;

/// Default dataset shown before anything is imported.
pub const DEFAULT_HEADERS: [&str; 5] = ["Product", "Q1 Sales", "Q2 Sales", "Q3 Sales", "Q4 Sales"];

pub const DEFAULT_ROWS: [[&str; 5]; 4] = [
    ["Wireless Earbuds", "1200", "1500", "1100", "2000"],
    ["Smart Watch", "800", "950", "1050", "1400"],
    ["Portable Charger", "2300", "2100", "2400", "2800"],
    ["Laptop Stand", "450", "500", "600", "750"],
];

/// The editable spreadsheet document: a sheet plus its identity and a
/// display cache for evaluated cells.
pub struct Document {
    pub(crate) sheet: Sheet,
    pub filename: String,
    pub modified: bool,
    /// Bumped on every mutation; pairs with the display cache so cached
    /// evaluations can never survive a grid change.
    pub(crate) version: u64,
    pub(crate) display_cache: DashMap<(usize, usize), String>,
}

impl Document {
    /// Create an empty document with the given headers.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, filename: &str) -> Document {
        let mut doc = Document {
            sheet: Sheet::default(),
            filename: filename.to_string(),
            modified: false,
            version: 0,
            display_cache: DashMap::new(),
        };
        doc.set_data(headers, rows);
        doc.modified = false;
        doc
    }

    /// The sample sales dataset used for a fresh, unnamed sheet.
    pub fn sample() -> Document {
        let headers = DEFAULT_HEADERS.iter().map(|s| s.to_string()).collect();
        let rows = DEFAULT_ROWS
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect();
        Document::new(headers, rows, "Untitled Sheet")
    }

    /// Build a document from CSV text.
    pub fn from_csv(text: &str, filename: &str) -> Result<Document> {
        let (headers, rows) = storage::parse_csv(text)?;
        Ok(Document::new(headers, rows, filename))
    }

    /// Serialize the raw cell contents (formulas included) to CSV.
    pub fn to_csv(&self) -> String {
        storage::serialize_csv(self.sheet.headers(), self.sheet.rows())
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn headers(&self) -> &[String] {
        self.sheet.headers()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        self.sheet.rows()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the whole dataset, normalizing every row to the header
    /// width (short rows pad with blanks, long rows truncate).
    pub fn set_data(&mut self, headers: Vec<String>, mut rows: Vec<Vec<String>>) {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        self.sheet = Sheet::new(headers, rows);
        self.touch();
    }

    /// Record a mutation: mark dirty, bump the version, drop every cached
    /// display value (a range formula may read any cell, so partial
    /// invalidation is never safe).
    pub(crate) fn touch(&mut self) {
        self.modified = true;
        self.version += 1;
        self.display_cache.clear();
    }
}

impl Default for Document {
    fn default() -> Document {
        Document::sample()
    }
}
