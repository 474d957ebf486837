//! Assistant reply parsing.
//!
//! The assistant answers in free text that may embed two kinds of fenced
//! blocks: a `csv` block carrying a full replacement dataset, and a
//! `json-chart` block carrying a chart configuration. Parsing is a pure
//! function over the reply text so it can be exercised without a network.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::Result;

/// Chart type the assistant may propose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Pie,
    Radar,
}

/// A chart configuration proposed by the assistant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    /// Header used for the X axis or labels.
    pub data_key: String,
    /// Headers to plot.
    pub series: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A parsed assistant reply.
#[derive(Clone, Debug, Default)]
pub struct AssistantReply {
    /// The reply text with all fenced blocks removed.
    pub prose: String,
    /// Replacement dataset, when the assistant rewrote the sheet.
    pub replacement_csv: Option<String>,
    /// Chart proposal, when the assistant suggested a visualization.
    pub chart: Option<ChartConfig>,
}

fn csv_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```csv\n(.*?)```").expect("csv block regex must compile"))
}

fn chart_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```json-chart\n(.*?)```").expect("chart block regex must compile")
    })
}

/// Split an assistant reply into prose, replacement CSV, and chart config.
///
/// A malformed chart block is an error (the caller decides whether to
/// surface or drop it); a missing block is simply `None`.
pub fn parse_reply(text: &str) -> Result<AssistantReply> {
    let replacement_csv = csv_block_re()
        .captures(text)
        .map(|caps| caps[1].to_string());

    let chart = match chart_block_re().captures(text) {
        Some(caps) => Some(serde_json::from_str::<ChartConfig>(&caps[1])?),
        None => None,
    };

    let prose = chart_block_re()
        .replace_all(&csv_block_re().replace_all(text, ""), "")
        .trim()
        .to_string();

    let prose = if prose.is_empty() {
        if replacement_csv.is_some() {
            "I've updated the spreadsheet.".to_string()
        } else {
            "Here is the result.".to_string()
        }
    } else {
        prose
    };

    Ok(AssistantReply {
        prose,
        replacement_csv,
        chart,
    })
}
