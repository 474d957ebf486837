//! Error types for LimeSheet core.

use thiserror::Error;

/// Errors that can occur in the LimeSheet document and collaborator layer.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV input is empty")]
    EmptyCsv,

    #[error("column {0} is out of range")]
    ColumnOutOfRange(usize),

    #[error("row {0} is out of range")]
    RowOutOfRange(usize),

    #[error("API key not set")]
    MissingApiKey,

    #[error("assistant request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("assistant returned no usable reply")]
    EmptyReply,

    #[error("malformed chart configuration: {0}")]
    ChartJson(#[from] serde_json::Error),

    #[error("not a recognizable sheet URL: {0}")]
    InvalidSheetUrl(String),

    #[error("settings file error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
