//! Storage module for CSV import/export.

mod csv;
mod remote;

pub use csv::{parse_csv, serialize_csv, sheet_export_url};
pub use remote::fetch_csv;
