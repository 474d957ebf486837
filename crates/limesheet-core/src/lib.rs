//! limesheet_core - UI-agnostic document model and collaborators.
//!
//! Ties the formula engine to the things around it: the editable
//! [`Document`] with its display cache, the CSV codec, assistant settings,
//! and the assistant client with its reply parser.

pub mod assistant;
pub mod document;
mod error;
pub mod settings;
pub mod storage;

pub use document::{Document, ROW_PLACEHOLDER};
pub use error::{CoreError, Result};
pub use settings::Settings;
