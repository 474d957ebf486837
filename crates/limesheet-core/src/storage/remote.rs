//! Remote CSV import.

use tracing::debug;

use super::csv::sheet_export_url;
use crate::error::{CoreError, Result};

/// Fetch CSV text from a URL. Google Sheets edit URLs are normalized to
/// their CSV export endpoint first; anything else is fetched as-is.
pub fn fetch_csv(url: &str) -> Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CoreError::InvalidSheetUrl(url.to_string()));
    }
    let target = sheet_export_url(url);
    debug!(url = %target, "fetching remote CSV");

    let started = std::time::Instant::now();
    let body = reqwest::blocking::get(&target)?.error_for_status()?.text()?;
    debug!(bytes = body.len(), elapsed_ms = started.elapsed().as_millis() as u64, "fetched remote CSV");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_http_url_is_rejected() {
        assert!(matches!(
            fetch_csv("ftp://example.com/data.csv"),
            Err(CoreError::InvalidSheetUrl(_))
        ));
        assert!(matches!(
            fetch_csv("data.csv"),
            Err(CoreError::InvalidSheetUrl(_))
        ));
    }
}
