//! CSV import/export.
//!
//! The wire format is plain CSV with the header row first. Fields are
//! trimmed on input and empty lines are skipped, matching how datasets
//! round-trip through the assistant (which replies with fenced CSV blocks).

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{CoreError, Result};

/// Parse CSV text into headers plus data rows.
pub fn parse_csv(text: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut records = parse_csv_records(text).into_iter();
    let Some(headers) = records.next() else {
        return Err(CoreError::EmptyCsv);
    };
    Ok((headers, records.collect()))
}

/// Serialize headers plus rows back to CSV text.
pub fn serialize_csv(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    push_row(&mut out, headers);
    for row in rows {
        push_row(&mut out, row);
    }
    out
}

fn push_row(out: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
    out.push_str(&escaped.join(","));
    out.push('\n');
}

/// Parse CSV text into records with a single quote-aware scan. Separators
/// only count outside quotes, so a quoted field may contain commas, doubled
/// quotes, and line breaks. Fields are trimmed and blank lines are skipped.
pub(crate) fn parse_csv_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => {
                    fields.push(current.trim().to_string());
                    current = String::new();
                }
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    end_record(&mut records, &mut fields, &mut current);
                }
                '\n' => end_record(&mut records, &mut fields, &mut current),
                _ => current.push(c),
            }
        }
    }
    end_record(&mut records, &mut fields, &mut current);
    records
}

/// Close the current record; a record that is a single empty field came
/// from a blank line and is dropped.
fn end_record(records: &mut Vec<Vec<String>>, fields: &mut Vec<String>, current: &mut String) {
    fields.push(current.trim().to_string());
    current.clear();
    let record = std::mem::take(fields);
    if record.len() > 1 || !record[0].is_empty() {
        records.push(record);
    }
}

/// Escape a field for CSV output.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Normalize a Google Sheets edit URL to its CSV export URL. URLs that do
/// not carry a `/d/<key>` segment pass through unchanged (they may already
/// point at raw CSV).
pub fn sheet_export_url(url: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"/d/([a-zA-Z0-9-_]+)").expect("sheet key regex must compile")
    });

    match re.captures(url) {
        Some(caps) => format!(
            "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
            &caps[1]
        ),
        None => url.to_string(),
    }
}
