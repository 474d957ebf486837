//! Assistant HTTP client.
//!
//! A thin blocking client for the Gemini `generateContent` endpoint. The
//! key and model live in an explicit [`AssistantConfig`] passed at
//! construction; there is no ambient shared instance.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{CoreError, Result};

/// System instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = r#"
You are LimeSheet, an expert data analyst AI embedded in a spreadsheet application.
Your goal is to assist the user by analyzing their data, creating formulas, modifying the dataset, or generating charts.

RULES:
1. If the user asks to MODIFY the data (e.g., "add a total column", "sort by sales", "fill missing values"):
   - You MUST return the COMPLETE updated CSV content in a code block tagged with 'csv'.
   - Do NOT abbreviate the data. Return the full dataset.

2. If the user asks for VISUALIZATION (e.g., "show me a chart", "plot revenue"):
   - You MUST return a JSON configuration in a code block tagged with 'json-chart'.
   - Format: { "type": "bar"|"line"|"area"|"pie", "dataKey": "NameOfXAxisColumn", "series": ["Column1", "Column2"], "title": "Chart Title" }
   - Example: { "type": "bar", "dataKey": "Product", "series": ["Q1 Sales", "Q4 Sales"], "title": "Sales Comparison" }

3. If the user asks a QUESTION (e.g., "what is the highest selling item?"):
   - Answer concisely in plain text.

4. Keep responses short and helpful. Be friendly but professional.
"#;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Assistant configuration: key and model, owned explicitly by whoever
/// issues requests.
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    pub api_key: String,
    pub model: String,
}

impl AssistantConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> AssistantConfig {
        AssistantConfig {
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

pub struct AssistantClient {
    config: AssistantConfig,
    http: reqwest::blocking::Client,
}

// Request/response wire types (camelCase on the wire).

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ReplyContent>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl AssistantClient {
    pub fn new(config: AssistantConfig) -> AssistantClient {
        AssistantClient {
            config,
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Send the serialized dataset plus the user's instruction; return the
    /// assistant's raw reply text (parse it with
    /// [`crate::assistant::parse_reply`]).
    pub fn ask(&self, csv_context: &str, user_prompt: &str) -> Result<String> {
        let prompt = format!(
            "CURRENT DATASET (CSV format):\n```csv\n{}\n```\n\nUSER REQUEST:\n{}",
            csv_context, user_prompt
        );

        let request = GenerateContentRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = format!("{}/{}:generateContent", API_BASE, self.config.model);
        tracing::debug!(model = %self.config.model, "sending assistant request");
        let started = Instant::now();

        let response: GenerateContentResponse = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "assistant replied");

        let text: String = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(CoreError::EmptyReply);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: "sys".into(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part { text: "hi".into() }],
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"contents\""));
    }

    #[test]
    fn test_response_deserializes_candidate_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Hello"},{"text":" there"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let text: String = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect();
        assert_eq!(text, "Hello there");
    }
}
